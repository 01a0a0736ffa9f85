//! Admin CRUD over every catalog entity

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        book::{display_genre, InlineBook},
        book_instance::InlineBookInstance,
        Author, AuthorInput, Book, BookInput, BookInstance, BookInstanceInput, DueBackFilter,
        Genre, GenreInput, InstanceFilter, Language, LanguageInput, LoanStatus,
    },
    pagination::{paginate, Page, PageNumber, ADMIN_PAGE_SIZE},
    repository::{AuthorStore, BookInstanceStore, BookStore, GenreStore, LanguageStore, Store},
};

/// Book change-list row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BookAdminRow {
    pub id: i32,
    pub title: String,
    pub author: Option<String>,
    /// First three genre names
    pub display_genre: String,
    pub language: Option<String>,
}

/// Book instance change-list row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct InstanceAdminRow {
    pub id: Uuid,
    /// Title of the book this is a copy of
    pub book: Option<String>,
    pub status: LoanStatus,
    pub due_back: Option<NaiveDate>,
}

impl From<BookInstance> for InstanceAdminRow {
    fn from(instance: BookInstance) -> Self {
        Self {
            id: instance.id,
            book: instance.book_title,
            status: instance.status,
            due_back: instance.due_back,
        }
    }
}

/// Author edit page with the inline books
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthorAdminDetail {
    pub author: Author,
    pub books: Vec<Book>,
}

/// Book edit page with the inline copies
#[derive(Debug, Serialize, ToSchema)]
pub struct BookAdminDetail {
    pub book: Book,
    pub instances: Vec<BookInstance>,
}

#[derive(Clone)]
pub struct AdminService {
    store: Store,
}

impl AdminService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    // ----- Genres -----

    pub async fn list_genres(&self, page: PageNumber) -> AppResult<Page<Genre>> {
        paginate(self.store.genres_list().await?, ADMIN_PAGE_SIZE, page)
    }

    pub async fn get_genre(&self, id: i32) -> AppResult<Genre> {
        self.store.genres_get(id).await
    }

    pub async fn create_genre(&self, data: GenreInput) -> AppResult<Genre> {
        data.validate()?;
        let genre = self.store.genres_create(&data).await?;
        tracing::info!("Admin: created genre id={} name={:?}", genre.id, genre.name);
        Ok(genre)
    }

    pub async fn update_genre(&self, id: i32, data: GenreInput) -> AppResult<Genre> {
        data.validate()?;
        let genre = self.store.genres_update(id, &data).await?;
        tracing::info!("Admin: updated genre id={}", id);
        Ok(genre)
    }

    pub async fn delete_genre(&self, id: i32) -> AppResult<()> {
        self.store.genres_delete(id).await?;
        tracing::info!("Admin: deleted genre id={}", id);
        Ok(())
    }

    // ----- Languages -----

    pub async fn list_languages(&self, page: PageNumber) -> AppResult<Page<Language>> {
        paginate(self.store.languages_list().await?, ADMIN_PAGE_SIZE, page)
    }

    pub async fn get_language(&self, id: i32) -> AppResult<Language> {
        self.store.languages_get(id).await
    }

    pub async fn create_language(&self, data: LanguageInput) -> AppResult<Language> {
        data.validate()?;
        let language = self.store.languages_create(&data).await?;
        tracing::info!("Admin: created language id={} name={:?}", language.id, language.name);
        Ok(language)
    }

    pub async fn update_language(&self, id: i32, data: LanguageInput) -> AppResult<Language> {
        data.validate()?;
        let language = self.store.languages_update(id, &data).await?;
        tracing::info!("Admin: updated language id={}", id);
        Ok(language)
    }

    pub async fn delete_language(&self, id: i32) -> AppResult<()> {
        self.store.languages_delete(id).await?;
        tracing::info!("Admin: deleted language id={}", id);
        Ok(())
    }

    // ----- Authors -----

    pub async fn list_authors(&self, page: PageNumber) -> AppResult<Page<Author>> {
        paginate(self.store.authors_list(None).await?, ADMIN_PAGE_SIZE, page)
    }

    pub async fn get_author(&self, id: i32) -> AppResult<AuthorAdminDetail> {
        let author = self.store.authors_get(id).await?;
        let books = self.store.books_by_author(id).await?;
        Ok(AuthorAdminDetail { author, books })
    }

    pub async fn create_author(&self, data: AuthorInput) -> AppResult<Author> {
        data.validate()?;
        let author = self.store.authors_create(&data).await?;
        tracing::info!("Admin: created author id={} ({})", author.id, author);
        Ok(author)
    }

    pub async fn update_author(&self, id: i32, data: AuthorInput) -> AppResult<Author> {
        data.validate()?;
        let author = self.store.authors_update(id, &data).await?;
        tracing::info!("Admin: updated author id={}", id);
        Ok(author)
    }

    pub async fn delete_author(&self, id: i32) -> AppResult<()> {
        self.store.authors_delete(id).await?;
        tracing::info!("Admin: deleted author id={}", id);
        Ok(())
    }

    /// Inline: books written by the author
    pub async fn author_books(&self, id: i32) -> AppResult<Vec<Book>> {
        self.store.authors_get(id).await?;
        self.store.books_by_author(id).await
    }

    /// Inline: add a book to the author
    pub async fn add_author_book(&self, id: i32, data: InlineBook) -> AppResult<Book> {
        self.store.authors_get(id).await?;
        self.create_book(data.into_input(id)).await
    }

    // ----- Books -----

    pub async fn list_books(&self, page: PageNumber) -> AppResult<Page<BookAdminRow>> {
        let genre_names: HashMap<i32, String> = self
            .store
            .genres_list()
            .await?
            .into_iter()
            .map(|g| (g.id, g.name))
            .collect();

        let rows = self
            .store
            .books_list(None)
            .await?
            .into_iter()
            .map(|book| BookAdminRow {
                display_genre: display_genre(
                    book.genre_ids
                        .iter()
                        .filter_map(|id| genre_names.get(id).map(String::as_str)),
                ),
                id: book.id,
                title: book.title,
                author: book.author_label,
                language: book.language_name,
            })
            .collect();

        paginate(rows, ADMIN_PAGE_SIZE, page)
    }

    pub async fn get_book(&self, id: i32) -> AppResult<BookAdminDetail> {
        let book = self.store.books_get(id).await?;
        let instances = self.store.instances_list(&Self::copies_of(id)).await?;
        Ok(BookAdminDetail { book, instances })
    }

    pub async fn create_book(&self, data: BookInput) -> AppResult<Book> {
        data.check()?;
        let book = self.store.books_create(&data).await?;
        tracing::info!("Admin: created book id={} title={:?}", book.id, book.title);
        Ok(book)
    }

    pub async fn update_book(&self, id: i32, data: BookInput) -> AppResult<Book> {
        data.check()?;
        let book = self.store.books_update(id, &data).await?;
        tracing::info!("Admin: updated book id={}", id);
        Ok(book)
    }

    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.store.books_delete(id).await?;
        tracing::info!("Admin: deleted book id={}", id);
        Ok(())
    }

    /// Inline: copies of the book
    pub async fn book_instances(&self, id: i32) -> AppResult<Vec<BookInstance>> {
        self.store.books_get(id).await?;
        self.store.instances_list(&Self::copies_of(id)).await
    }

    /// Inline: add a copy of the book
    pub async fn add_book_instance(
        &self,
        id: i32,
        data: InlineBookInstance,
    ) -> AppResult<BookInstance> {
        self.store.books_get(id).await?;
        self.create_instance(data.into_input(id)).await
    }

    fn copies_of(book_id: i32) -> InstanceFilter {
        InstanceFilter {
            book_id: Some(book_id),
            ..Default::default()
        }
    }

    // ----- Book instances -----

    /// Change list with the status and due-back filters; date ranges are
    /// relative to `today`.
    pub async fn list_instances(
        &self,
        status: Option<LoanStatus>,
        due_back: Option<DueBackFilter>,
        today: NaiveDate,
        page: PageNumber,
    ) -> AppResult<Page<InstanceAdminRow>> {
        let filter = InstanceFilter {
            book_id: None,
            status,
            due_back: due_back.map(|f| f.resolve(today)),
        };
        let rows = self
            .store
            .instances_list(&filter)
            .await?
            .into_iter()
            .map(InstanceAdminRow::from)
            .collect();
        paginate(rows, ADMIN_PAGE_SIZE, page)
    }

    pub async fn get_instance(&self, id: Uuid) -> AppResult<BookInstance> {
        self.store.instances_get(id).await
    }

    pub async fn create_instance(&self, data: BookInstanceInput) -> AppResult<BookInstance> {
        data.validate()?;
        let instance = self.store.instances_create(&data).await?;
        tracing::info!("Admin: created book instance {}", instance);
        Ok(instance)
    }

    pub async fn update_instance(
        &self,
        id: Uuid,
        data: BookInstanceInput,
    ) -> AppResult<BookInstance> {
        data.validate()?;
        let instance = self.store.instances_update(id, &data).await?;
        tracing::info!("Admin: updated book instance {} status={}", id, instance.status.code());
        Ok(instance)
    }

    pub async fn delete_instance(&self, id: Uuid) -> AppResult<()> {
        self.store.instances_delete(id).await?;
        tracing::info!("Admin: deleted book instance {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::AppError, models::genre, repository::MemoryStore};
    use std::sync::Arc;

    fn service() -> AdminService {
        AdminService::new(Arc::new(MemoryStore::new()))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn author_and_language(admin: &AdminService) -> (Author, Language) {
        let author = admin
            .create_author(AuthorInput {
                first_name: "Italo".to_string(),
                last_name: "Calvino".to_string(),
                date_of_birth: Some(date(1923, 10, 15)),
                date_of_death: Some(date(1985, 9, 19)),
            })
            .await
            .unwrap();
        let language = admin
            .create_language(LanguageInput { name: "Italian".to_string() })
            .await
            .unwrap();
        (author, language)
    }

    fn inline_book(title: &str, language_id: i32, genre_ids: Vec<i32>) -> InlineBook {
        InlineBook {
            title: title.to_string(),
            summary: "Summary".to_string(),
            isbn: "9780156439619".to_string(),
            language_id,
            genre_ids,
        }
    }

    #[tokio::test]
    async fn test_duplicate_genre_rejected() {
        let admin = service();
        admin
            .create_genre(GenreInput { name: "Fantasy".to_string() })
            .await
            .unwrap();
        let err = admin
            .create_genre(GenreInput { name: "fantasy".to_string() })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), genre::DUPLICATE_NAME_MESSAGE);
    }

    #[tokio::test]
    async fn test_invalid_input_rejected_before_store() {
        let admin = service();
        let err = admin
            .create_genre(GenreInput { name: String::new() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let (author, language) = author_and_language(&admin).await;
        let mut book = inline_book("Invisible Cities", language.id, vec![]);
        book.isbn = "97801564".to_string();
        let err = admin.add_author_book(author.id, book).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_book_rows_show_three_genres() {
        let admin = service();
        let (author, language) = author_and_language(&admin).await;
        let mut genre_ids = Vec::new();
        for name in ["Fable", "Fantasy", "Satire", "Travel"] {
            genre_ids.push(
                admin
                    .create_genre(GenreInput { name: name.to_string() })
                    .await
                    .unwrap()
                    .id,
            );
        }
        admin
            .add_author_book(author.id, inline_book("Invisible Cities", language.id, genre_ids))
            .await
            .unwrap();

        let page = admin.list_books(PageNumber::default()).await.unwrap();
        assert_eq!(
            page.items,
            vec![BookAdminRow {
                id: 1,
                title: "Invisible Cities".to_string(),
                author: Some("Calvino, Italo".to_string()),
                display_genre: "Fable, Fantasy, Satire".to_string(),
                language: Some("Italian".to_string()),
            }]
        );
        assert_eq!(page.per_page, ADMIN_PAGE_SIZE);
    }

    #[tokio::test]
    async fn test_author_inline_books() {
        let admin = service();
        let (author, language) = author_and_language(&admin).await;
        let book = admin
            .add_author_book(author.id, inline_book("Baron in the Trees", language.id, vec![]))
            .await
            .unwrap();
        assert_eq!(book.author_id, author.id);

        let detail = admin.get_author(author.id).await.unwrap();
        assert_eq!(detail.books, vec![book]);

        let err = admin
            .add_author_book(999, inline_book("Nope", language.id, vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_instance_filters() {
        let admin = service();
        let (author, language) = author_and_language(&admin).await;
        let book = admin
            .add_author_book(author.id, inline_book("Cosmicomics", language.id, vec![]))
            .await
            .unwrap();

        let today = date(2024, 6, 15);
        for (status, due_back) in [
            (LoanStatus::OnLoan, Some(date(2024, 6, 15))),
            (LoanStatus::OnLoan, Some(date(2024, 5, 2))),
            (LoanStatus::Available, None),
        ] {
            admin
                .add_book_instance(
                    book.id,
                    InlineBookInstance {
                        imprint: "Einaudi".to_string(),
                        due_back,
                        status,
                    },
                )
                .await
                .unwrap();
        }

        let on_loan = admin
            .list_instances(Some(LoanStatus::OnLoan), None, today, PageNumber::default())
            .await
            .unwrap();
        assert_eq!(on_loan.count, 2);
        assert!(on_loan.items.iter().all(|r| r.book.as_deref() == Some("Cosmicomics")));

        let due_today = admin
            .list_instances(None, Some(DueBackFilter::Today), today, PageNumber::default())
            .await
            .unwrap();
        assert_eq!(due_today.count, 1);
        assert_eq!(due_today.items[0].due_back, Some(today));

        let undated = admin
            .list_instances(None, Some(DueBackFilter::NoDate), today, PageNumber::default())
            .await
            .unwrap();
        assert_eq!(undated.count, 1);
        assert_eq!(undated.items[0].status, LoanStatus::Available);

        let this_month = admin
            .list_instances(
                Some(LoanStatus::OnLoan),
                Some(DueBackFilter::ThisMonth),
                today,
                PageNumber::default(),
            )
            .await
            .unwrap();
        assert_eq!(this_month.count, 1);
    }

    #[tokio::test]
    async fn test_book_with_copies_is_protected() {
        let admin = service();
        let (author, language) = author_and_language(&admin).await;
        let book = admin
            .add_author_book(author.id, inline_book("Mr Palomar", language.id, vec![]))
            .await
            .unwrap();
        let copy = admin
            .add_book_instance(
                book.id,
                InlineBookInstance {
                    imprint: "Einaudi".to_string(),
                    due_back: None,
                    status: LoanStatus::default(),
                },
            )
            .await
            .unwrap();

        assert!(matches!(
            admin.delete_book(book.id).await,
            Err(AppError::ReferentialIntegrity(_))
        ));
        admin.delete_instance(copy.id).await.unwrap();
        admin.delete_book(book.id).await.unwrap();
        assert!(matches!(admin.get_book(book.id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_admin_pages_hold_one_hundred_rows() {
        let admin = service();
        for i in 0..101 {
            admin
                .create_genre(GenreInput { name: format!("Genre {}", i) })
                .await
                .unwrap();
        }
        let first = admin.list_genres(PageNumber::default()).await.unwrap();
        assert_eq!(first.items.len(), 100);
        let last = admin.list_genres(PageNumber::Last).await.unwrap();
        assert_eq!(last.number, 2);
        assert_eq!(last.items.len(), 1);
    }
}
