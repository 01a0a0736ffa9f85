//! Catalog read side: home summary, paginated lists and detail pages

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        Author, Book, BookInstance, Genre, InstanceFilter, Language, LoanStatus, Locator,
    },
    pagination::{Page, PageNumber, PageWindow, CATALOG_PAGE_SIZE},
    repository::{AuthorStore, BookInstanceStore, BookStore, GenreStore, LanguageStore, Store},
    session::Session,
};

/// Word searched for in book titles on the home page
pub const TITLE_WORD: &str = "of";

/// Static auxiliary value carried on the book list
pub const BOOK_LIST_EXTRA: &str = "This is just some data";

/// Counts shown on the home page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct HomeSummary {
    pub num_books: i64,
    pub num_instances: i64,
    /// Copies with status Available
    pub num_instances_available: i64,
    pub num_authors: i64,
    pub num_genres: i64,
    /// Books whose title contains "of", ignoring case
    pub num_books_with_word: i64,
    /// Visits by this session before the current one
    pub num_visits: i64,
}

/// Book row on the catalog list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BookListEntry {
    pub id: i32,
    pub title: String,
    /// Author label ("last, first")
    pub author: Option<String>,
    pub url: String,
}

impl From<Book> for BookListEntry {
    fn from(book: Book) -> Self {
        Self {
            url: book.absolute_url(),
            id: book.id,
            title: book.title,
            author: book.author_label,
        }
    }
}

/// One page of the book list
#[derive(Debug, Serialize, ToSchema)]
pub struct BookListPage {
    pub items: Vec<BookListEntry>,
    pub number: i64,
    pub num_pages: i64,
    pub count: i64,
    pub per_page: i64,
    pub has_next: bool,
    pub has_previous: bool,
    pub some_data: String,
}

impl BookListPage {
    fn new(page: Page<BookListEntry>) -> Self {
        Self {
            items: page.items,
            number: page.number,
            num_pages: page.num_pages,
            count: page.count,
            per_page: page.per_page,
            has_next: page.has_next,
            has_previous: page.has_previous,
            some_data: BOOK_LIST_EXTRA.to_string(),
        }
    }
}

/// Author row on the catalog list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AuthorListEntry {
    pub id: i32,
    /// "last, first"
    pub name: String,
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub date_of_death: Option<chrono::NaiveDate>,
    pub url: String,
}

impl From<Author> for AuthorListEntry {
    fn from(author: Author) -> Self {
        Self {
            url: author.absolute_url(),
            name: author.to_string(),
            id: author.id,
            date_of_birth: author.date_of_birth,
            date_of_death: author.date_of_death,
        }
    }
}

/// Copy shown on a book's detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct InstanceEntry {
    pub id: uuid::Uuid,
    pub imprint: String,
    pub status: LoanStatus,
    /// Human readable status
    pub status_label: String,
    pub due_back: Option<chrono::NaiveDate>,
}

impl From<BookInstance> for InstanceEntry {
    fn from(instance: BookInstance) -> Self {
        Self {
            id: instance.id,
            imprint: instance.imprint,
            status_label: instance.status.label().to_string(),
            status: instance.status,
            due_back: instance.due_back,
        }
    }
}

/// Book detail page
#[derive(Debug, Serialize, ToSchema)]
pub struct BookDetail {
    pub book: Book,
    pub author: Author,
    pub author_url: String,
    pub language: Language,
    pub genres: Vec<Genre>,
    pub instances: Vec<InstanceEntry>,
}

/// Author detail page
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthorDetail {
    pub author: Author,
    pub books: Vec<BookListEntry>,
}

#[derive(Clone)]
pub struct CatalogService {
    store: Store,
}

impl CatalogService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Site-wide counts plus this session's visit count.
    ///
    /// Increments the session counter; the caller persists the session.
    pub async fn home_summary(&self, session: &mut Session) -> AppResult<HomeSummary> {
        let num_books = self.store.books_count().await?;
        let num_instances = self.store.instances_count(None).await?;
        let num_instances_available = self
            .store
            .instances_count(Some(LoanStatus::Available))
            .await?;
        let num_authors = self.store.authors_count().await?;
        let num_genres = self.store.genres_count().await?;
        let num_books_with_word = self.store.books_count_title_contains(TITLE_WORD).await?;

        Ok(HomeSummary {
            num_books,
            num_instances,
            num_instances_available,
            num_authors,
            num_genres,
            num_books_with_word,
            num_visits: session.record_visit(),
        })
    }

    pub async fn list_books(&self, page: PageNumber) -> AppResult<BookListPage> {
        let count = self.store.books_count().await?;
        let window = PageWindow::resolve(count, CATALOG_PAGE_SIZE, page)?;
        let books = self.store.books_list(Some(window)).await?;
        let items = books.into_iter().map(BookListEntry::from).collect();
        Ok(BookListPage::new(Page::from_window(window, items)))
    }

    pub async fn get_book(&self, id: i32) -> AppResult<BookDetail> {
        let book = self.store.books_get(id).await?;
        let author = self.store.authors_get(book.author_id).await?;
        let language = self.store.languages_get(book.language_id).await?;
        let genres = self.store.genres_by_ids(&book.genre_ids).await?;
        let instances = self
            .store
            .instances_list(&InstanceFilter {
                book_id: Some(book.id),
                ..Default::default()
            })
            .await?;

        Ok(BookDetail {
            author_url: author.absolute_url(),
            book,
            author,
            language,
            genres,
            instances: instances.into_iter().map(InstanceEntry::from).collect(),
        })
    }

    pub async fn list_authors(&self, page: PageNumber) -> AppResult<Page<AuthorListEntry>> {
        let count = self.store.authors_count().await?;
        let window = PageWindow::resolve(count, CATALOG_PAGE_SIZE, page)?;
        let authors = self.store.authors_list(Some(window)).await?;
        let items = authors.into_iter().map(AuthorListEntry::from).collect();
        Ok(Page::from_window(window, items))
    }

    pub async fn get_author(&self, id: i32) -> AppResult<AuthorDetail> {
        let author = self.store.authors_get(id).await?;
        let books = self.store.books_by_author(id).await?;
        Ok(AuthorDetail {
            author,
            books: books.into_iter().map(BookListEntry::from).collect(),
        })
    }

    pub async fn get_genre(&self, id: i32) -> AppResult<Genre> {
        self.store.genres_get(id).await
    }

    pub async fn get_language(&self, id: i32) -> AppResult<Language> {
        self.store.languages_get(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::AppError,
        models::{AuthorInput, BookInput, BookInstanceInput, GenreInput, LanguageInput},
        repository::MemoryStore,
    };
    use std::sync::Arc;

    struct Fixture {
        service: CatalogService,
        store: Store,
        author_id: i32,
        language_id: i32,
    }

    async fn fixture() -> Fixture {
        let store: Store = Arc::new(MemoryStore::new());
        let author = store
            .authors_create(&AuthorInput {
                first_name: "Ursula".to_string(),
                last_name: "Le Guin".to_string(),
                date_of_birth: None,
                date_of_death: None,
            })
            .await
            .unwrap();
        let language = store
            .languages_create(&LanguageInput { name: "English".to_string() })
            .await
            .unwrap();
        Fixture {
            service: CatalogService::new(store.clone()),
            store,
            author_id: author.id,
            language_id: language.id,
        }
    }

    impl Fixture {
        async fn add_book(&self, title: &str) -> Book {
            self.store
                .books_create(&BookInput {
                    title: title.to_string(),
                    summary: "Summary".to_string(),
                    isbn: "9780441478125".to_string(),
                    author_id: self.author_id,
                    language_id: self.language_id,
                    genre_ids: vec![],
                })
                .await
                .unwrap()
        }

        async fn add_copy(&self, book_id: i32, status: LoanStatus) -> BookInstance {
            self.store
                .instances_create(&BookInstanceInput {
                    book_id,
                    imprint: "Ace, 1969".to_string(),
                    due_back: None,
                    status,
                })
                .await
                .unwrap()
        }
    }

    #[tokio::test]
    async fn test_home_summary_counts() {
        let fx = fixture().await;
        let a = fx.add_book("The Left Hand of Darkness").await;
        let b = fx.add_book("A Wizard of Earthsea").await;
        fx.add_book("The Dispossessed").await;
        fx.add_copy(a.id, LoanStatus::Available).await;
        fx.add_copy(a.id, LoanStatus::OnLoan).await;
        fx.add_copy(b.id, LoanStatus::Available).await;
        fx.store
            .genres_create(&GenreInput { name: "Science Fiction".to_string() })
            .await
            .unwrap();

        let mut session = Session::new();
        let summary = fx.service.home_summary(&mut session).await.unwrap();

        assert_eq!(
            summary,
            HomeSummary {
                num_books: 3,
                num_instances: 3,
                num_instances_available: 2,
                num_authors: 1,
                num_genres: 1,
                num_books_with_word: 2,
                num_visits: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_home_summary_counts_visits_per_session() {
        let fx = fixture().await;
        let mut first = Session::new();
        let mut second = Session::new();

        for expected in 0..3 {
            let summary = fx.service.home_summary(&mut first).await.unwrap();
            assert_eq!(summary.num_visits, expected);
        }
        let summary = fx.service.home_summary(&mut second).await.unwrap();
        assert_eq!(summary.num_visits, 0);
        assert_eq!(first.data.num_visits, 3);
    }

    #[tokio::test]
    async fn test_list_books_pages_of_five() {
        let fx = fixture().await;
        for i in 0..12 {
            fx.add_book(&format!("Book {}", i)).await;
        }

        let first = fx.service.list_books(PageNumber::Number(1)).await.unwrap();
        assert_eq!(first.items.len(), 5);
        assert_eq!(first.num_pages, 3);
        assert_eq!(first.count, 12);
        assert!(first.has_next);
        assert!(!first.has_previous);
        assert_eq!(first.some_data, BOOK_LIST_EXTRA);
        assert_eq!(first.items[0].author.as_deref(), Some("Le Guin, Ursula"));

        let last = fx.service.list_books(PageNumber::Last).await.unwrap();
        assert_eq!(last.number, 3);
        assert_eq!(last.items.len(), 2);
        assert_eq!(last.items[1].title, "Book 11");

        let err = fx.service.list_books(PageNumber::Number(4)).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidPage(_)));
    }

    #[tokio::test]
    async fn test_empty_lists_have_a_first_page() {
        let fx = fixture().await;
        let page = fx.service.list_books(PageNumber::default()).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.num_pages, 1);
    }

    #[tokio::test]
    async fn test_book_detail_includes_related_records() {
        let fx = fixture().await;
        let genre = fx
            .store
            .genres_create(&GenreInput { name: "Fantasy".to_string() })
            .await
            .unwrap();
        let book = fx
            .store
            .books_create(&BookInput {
                title: "Tehanu".to_string(),
                summary: "Summary".to_string(),
                isbn: "9780689315954".to_string(),
                author_id: fx.author_id,
                language_id: fx.language_id,
                genre_ids: vec![genre.id],
            })
            .await
            .unwrap();
        let copy = fx.add_copy(book.id, LoanStatus::Reserved).await;

        let detail = fx.service.get_book(book.id).await.unwrap();
        assert_eq!(detail.author.id, fx.author_id);
        assert_eq!(detail.author_url, format!("/catalog/author/{}", fx.author_id));
        assert_eq!(detail.language.name, "English");
        assert_eq!(detail.genres, vec![genre]);
        assert_eq!(detail.instances.len(), 1);
        assert_eq!(detail.instances[0].id, copy.id);
        assert_eq!(detail.instances[0].status_label, "Reserved");
    }

    #[tokio::test]
    async fn test_missing_records_are_not_found() {
        let fx = fixture().await;
        assert!(matches!(fx.service.get_book(999).await, Err(AppError::NotFound(_))));
        assert!(matches!(fx.service.get_author(999).await, Err(AppError::NotFound(_))));
        assert!(matches!(fx.service.get_genre(999).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_author_detail_lists_books() {
        let fx = fixture().await;
        let book = fx.add_book("The Lathe of Heaven").await;

        let detail = fx.service.get_author(fx.author_id).await.unwrap();
        assert_eq!(detail.books.len(), 1);
        assert_eq!(detail.books[0].url, format!("/catalog/book/{}", book.id));

        let authors = fx.service.list_authors(PageNumber::Number(1)).await.unwrap();
        assert_eq!(authors.items[0].name, "Le Guin, Ursula");
    }

    #[tokio::test]
    async fn test_home_summary_on_empty_store() {
        let service = CatalogService::new(Arc::new(MemoryStore::new()));
        let mut session = Session::new();
        let empty = HomeSummary {
            num_books: 0,
            num_instances: 0,
            num_instances_available: 0,
            num_authors: 0,
            num_genres: 0,
            num_books_with_word: 0,
            num_visits: 0,
        };

        assert_eq!(service.home_summary(&mut session).await.unwrap(), empty);
        assert_eq!(
            service.home_summary(&mut session).await.unwrap(),
            HomeSummary { num_visits: 1, ..empty }
        );
    }

    #[tokio::test]
    async fn test_deleted_author_is_not_found() {
        let fx = fixture().await;
        let admin = crate::services::admin::AdminService::new(fx.store.clone());
        let author = admin
            .create_author(AuthorInput {
                first_name: "James".to_string(),
                last_name: "Tiptree".to_string(),
                date_of_birth: None,
                date_of_death: None,
            })
            .await
            .unwrap();
        assert!(fx.service.get_author(author.id).await.is_ok());

        admin.delete_author(author.id).await.unwrap();
        assert!(matches!(
            fx.service.get_author(author.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
