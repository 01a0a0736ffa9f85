//! In-process entity store.
//!
//! Enforces the same integrity rules as the PostgreSQL schema: case-insensitive
//! unique names, restrict-on-delete references and default orderings
//! (undated copies sort last, as with `ASC NULLS LAST`; names compare
//! byte-wise, as with `COLLATE "C"`).

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    authors::author_not_found, book_instances::instance_not_found, books::book_not_found,
    genres::genre_not_found, languages::language_not_found, AuthorStore, BookInstanceStore,
    BookStore, CatalogStore, GenreStore, LanguageStore,
};
use crate::{
    error::{AppError, AppResult},
    models::{
        author, book, book_instance, genre, language, Author, AuthorInput, Book, BookInput,
        BookInstance, BookInstanceInput, Genre, GenreInput, InstanceFilter, Language,
        LanguageInput, LoanStatus,
    },
    pagination::PageWindow,
};

#[derive(Debug, Clone)]
struct BookRecord {
    title: String,
    summary: String,
    isbn: String,
    author_id: i32,
    language_id: i32,
    genre_ids: Vec<i32>,
}

impl BookRecord {
    fn from_input(data: &BookInput) -> Self {
        Self {
            title: data.title.clone(),
            summary: data.summary.clone(),
            isbn: data.isbn.clone(),
            author_id: data.author_id,
            language_id: data.language_id,
            genre_ids: data.normalized_genre_ids(),
        }
    }
}

#[derive(Default)]
struct MemoryState {
    genres: BTreeMap<i32, Genre>,
    languages: BTreeMap<i32, Language>,
    authors: BTreeMap<i32, Author>,
    books: BTreeMap<i32, BookRecord>,
    instances: HashMap<Uuid, BookInstance>,
    genre_seq: i32,
    language_seq: i32,
    author_seq: i32,
    book_seq: i32,
}

fn next_id(seq: &mut i32) -> i32 {
    *seq += 1;
    *seq
}

fn name_taken<'a>(
    mut existing: impl Iterator<Item = (i32, &'a str)>,
    name: &str,
    exclude: Option<i32>,
) -> bool {
    let wanted = name.to_lowercase();
    existing.any(|(id, other)| Some(id) != exclude && other.to_lowercase() == wanted)
}

fn window_slice<T>(rows: Vec<T>, window: Option<PageWindow>) -> Vec<T> {
    match window {
        Some(w) => rows
            .into_iter()
            .skip(w.offset() as usize)
            .take(w.limit() as usize)
            .collect(),
        None => rows,
    }
}

impl MemoryState {
    fn book_view(&self, id: i32, record: &BookRecord) -> Book {
        Book {
            id,
            title: record.title.clone(),
            summary: record.summary.clone(),
            isbn: record.isbn.clone(),
            author_id: record.author_id,
            language_id: record.language_id,
            genre_ids: record.genre_ids.clone(),
            author_label: self.authors.get(&record.author_id).map(|a| a.to_string()),
            language_name: self.languages.get(&record.language_id).map(|l| l.name.clone()),
        }
    }

    fn instance_view(&self, instance: &BookInstance) -> BookInstance {
        BookInstance {
            book_title: self.books.get(&instance.book_id).map(|b| b.title.clone()),
            ..instance.clone()
        }
    }

    fn check_book_references(&self, data: &BookInput) -> AppResult<()> {
        if !self.authors.contains_key(&data.author_id) {
            return Err(AppError::ReferentialIntegrity(book::MISSING_AUTHOR_MESSAGE.to_string()));
        }
        if !self.languages.contains_key(&data.language_id) {
            return Err(AppError::ReferentialIntegrity(book::MISSING_LANGUAGE_MESSAGE.to_string()));
        }
        if data.genre_ids.iter().any(|id| !self.genres.contains_key(id)) {
            return Err(AppError::ReferentialIntegrity(book::MISSING_GENRE_MESSAGE.to_string()));
        }
        Ok(())
    }

    fn check_instance_references(&self, data: &BookInstanceInput) -> AppResult<()> {
        if !self.books.contains_key(&data.book_id) {
            return Err(AppError::ReferentialIntegrity(
                book_instance::MISSING_BOOK_MESSAGE.to_string(),
            ));
        }
        Ok(())
    }
}

/// Entity store kept entirely in process memory
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[async_trait]
impl GenreStore for MemoryStore {
    async fn genres_list(&self) -> AppResult<Vec<Genre>> {
        let state = self.state.read().await;
        Ok(state.genres.values().cloned().collect())
    }

    async fn genres_by_ids(&self, ids: &[i32]) -> AppResult<Vec<Genre>> {
        let state = self.state.read().await;
        Ok(state
            .genres
            .values()
            .filter(|g| ids.contains(&g.id))
            .cloned()
            .collect())
    }

    async fn genres_get(&self, id: i32) -> AppResult<Genre> {
        let state = self.state.read().await;
        state.genres.get(&id).cloned().ok_or_else(|| genre_not_found(id))
    }

    async fn genres_create(&self, data: &GenreInput) -> AppResult<Genre> {
        let mut state = self.state.write().await;
        let existing = state.genres.values().map(|g| (g.id, g.name.as_str()));
        if name_taken(existing, &data.name, None) {
            return Err(AppError::UniquenessViolation(genre::DUPLICATE_NAME_MESSAGE.to_string()));
        }
        let id = next_id(&mut state.genre_seq);
        let row = Genre {
            id,
            name: data.name.clone(),
        };
        state.genres.insert(id, row.clone());
        Ok(row)
    }

    async fn genres_update(&self, id: i32, data: &GenreInput) -> AppResult<Genre> {
        let mut state = self.state.write().await;
        if !state.genres.contains_key(&id) {
            return Err(genre_not_found(id));
        }
        let existing = state.genres.values().map(|g| (g.id, g.name.as_str()));
        if name_taken(existing, &data.name, Some(id)) {
            return Err(AppError::UniquenessViolation(genre::DUPLICATE_NAME_MESSAGE.to_string()));
        }
        let row = Genre {
            id,
            name: data.name.clone(),
        };
        state.genres.insert(id, row.clone());
        Ok(row)
    }

    async fn genres_delete(&self, id: i32) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state.genres.remove(&id).is_none() {
            return Err(genre_not_found(id));
        }
        for record in state.books.values_mut() {
            record.genre_ids.retain(|g| *g != id);
        }
        Ok(())
    }

    async fn genres_count(&self) -> AppResult<i64> {
        Ok(self.state.read().await.genres.len() as i64)
    }
}

#[async_trait]
impl LanguageStore for MemoryStore {
    async fn languages_list(&self) -> AppResult<Vec<Language>> {
        let state = self.state.read().await;
        Ok(state.languages.values().cloned().collect())
    }

    async fn languages_get(&self, id: i32) -> AppResult<Language> {
        let state = self.state.read().await;
        state.languages.get(&id).cloned().ok_or_else(|| language_not_found(id))
    }

    async fn languages_create(&self, data: &LanguageInput) -> AppResult<Language> {
        let mut state = self.state.write().await;
        let existing = state.languages.values().map(|l| (l.id, l.name.as_str()));
        if name_taken(existing, &data.name, None) {
            return Err(AppError::UniquenessViolation(
                language::DUPLICATE_NAME_MESSAGE.to_string(),
            ));
        }
        let id = next_id(&mut state.language_seq);
        let row = Language {
            id,
            name: data.name.clone(),
        };
        state.languages.insert(id, row.clone());
        Ok(row)
    }

    async fn languages_update(&self, id: i32, data: &LanguageInput) -> AppResult<Language> {
        let mut state = self.state.write().await;
        if !state.languages.contains_key(&id) {
            return Err(language_not_found(id));
        }
        let existing = state.languages.values().map(|l| (l.id, l.name.as_str()));
        if name_taken(existing, &data.name, Some(id)) {
            return Err(AppError::UniquenessViolation(
                language::DUPLICATE_NAME_MESSAGE.to_string(),
            ));
        }
        let row = Language {
            id,
            name: data.name.clone(),
        };
        state.languages.insert(id, row.clone());
        Ok(row)
    }

    async fn languages_delete(&self, id: i32) -> AppResult<()> {
        let mut state = self.state.write().await;
        if !state.languages.contains_key(&id) {
            return Err(language_not_found(id));
        }
        if state.books.values().any(|b| b.language_id == id) {
            return Err(AppError::ReferentialIntegrity(language::PROTECTED_MESSAGE.to_string()));
        }
        state.languages.remove(&id);
        Ok(())
    }

    async fn languages_count(&self) -> AppResult<i64> {
        Ok(self.state.read().await.languages.len() as i64)
    }
}

#[async_trait]
impl AuthorStore for MemoryStore {
    async fn authors_list(&self, window: Option<PageWindow>) -> AppResult<Vec<Author>> {
        let state = self.state.read().await;
        let mut rows: Vec<Author> = state.authors.values().cloned().collect();
        rows.sort_by(|a, b| {
            (&a.last_name, &a.first_name, a.id).cmp(&(&b.last_name, &b.first_name, b.id))
        });
        Ok(window_slice(rows, window))
    }

    async fn authors_get(&self, id: i32) -> AppResult<Author> {
        let state = self.state.read().await;
        state.authors.get(&id).cloned().ok_or_else(|| author_not_found(id))
    }

    async fn authors_create(&self, data: &AuthorInput) -> AppResult<Author> {
        let mut state = self.state.write().await;
        let id = next_id(&mut state.author_seq);
        let row = Author {
            id,
            first_name: data.first_name.clone(),
            last_name: data.last_name.clone(),
            date_of_birth: data.date_of_birth,
            date_of_death: data.date_of_death,
        };
        state.authors.insert(id, row.clone());
        Ok(row)
    }

    async fn authors_update(&self, id: i32, data: &AuthorInput) -> AppResult<Author> {
        let mut state = self.state.write().await;
        let row = state.authors.get_mut(&id).ok_or_else(|| author_not_found(id))?;
        row.first_name = data.first_name.clone();
        row.last_name = data.last_name.clone();
        row.date_of_birth = data.date_of_birth;
        row.date_of_death = data.date_of_death;
        Ok(row.clone())
    }

    async fn authors_delete(&self, id: i32) -> AppResult<()> {
        let mut state = self.state.write().await;
        if !state.authors.contains_key(&id) {
            return Err(author_not_found(id));
        }
        if state.books.values().any(|b| b.author_id == id) {
            return Err(AppError::ReferentialIntegrity(author::PROTECTED_MESSAGE.to_string()));
        }
        state.authors.remove(&id);
        Ok(())
    }

    async fn authors_count(&self) -> AppResult<i64> {
        Ok(self.state.read().await.authors.len() as i64)
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn books_list(&self, window: Option<PageWindow>) -> AppResult<Vec<Book>> {
        let state = self.state.read().await;
        let rows = state
            .books
            .iter()
            .map(|(id, record)| state.book_view(*id, record))
            .collect();
        Ok(window_slice(rows, window))
    }

    async fn books_by_author(&self, author_id: i32) -> AppResult<Vec<Book>> {
        let state = self.state.read().await;
        Ok(state
            .books
            .iter()
            .filter(|(_, record)| record.author_id == author_id)
            .map(|(id, record)| state.book_view(*id, record))
            .collect())
    }

    async fn books_get(&self, id: i32) -> AppResult<Book> {
        let state = self.state.read().await;
        state
            .books
            .get(&id)
            .map(|record| state.book_view(id, record))
            .ok_or_else(|| book_not_found(id))
    }

    async fn books_create(&self, data: &BookInput) -> AppResult<Book> {
        let mut state = self.state.write().await;
        state.check_book_references(data)?;
        let id = next_id(&mut state.book_seq);
        let record = BookRecord::from_input(data);
        let view = state.book_view(id, &record);
        state.books.insert(id, record);
        Ok(view)
    }

    async fn books_update(&self, id: i32, data: &BookInput) -> AppResult<Book> {
        let mut state = self.state.write().await;
        if !state.books.contains_key(&id) {
            return Err(book_not_found(id));
        }
        state.check_book_references(data)?;
        let record = BookRecord::from_input(data);
        let view = state.book_view(id, &record);
        state.books.insert(id, record);
        Ok(view)
    }

    async fn books_delete(&self, id: i32) -> AppResult<()> {
        let mut state = self.state.write().await;
        if !state.books.contains_key(&id) {
            return Err(book_not_found(id));
        }
        if state.instances.values().any(|i| i.book_id == id) {
            return Err(AppError::ReferentialIntegrity(book::PROTECTED_MESSAGE.to_string()));
        }
        state.books.remove(&id);
        Ok(())
    }

    async fn books_count(&self) -> AppResult<i64> {
        Ok(self.state.read().await.books.len() as i64)
    }

    async fn books_count_title_contains(&self, needle: &str) -> AppResult<i64> {
        let needle = needle.to_lowercase();
        let state = self.state.read().await;
        Ok(state
            .books
            .values()
            .filter(|b| b.title.to_lowercase().contains(&needle))
            .count() as i64)
    }
}

#[async_trait]
impl BookInstanceStore for MemoryStore {
    async fn instances_list(&self, filter: &InstanceFilter) -> AppResult<Vec<BookInstance>> {
        let state = self.state.read().await;
        let mut rows: Vec<BookInstance> = state
            .instances
            .values()
            .filter(|i| filter.matches(i))
            .map(|i| state.instance_view(i))
            .collect();
        rows.sort_by(|a, b| {
            (a.due_back.is_none(), a.due_back, a.id).cmp(&(b.due_back.is_none(), b.due_back, b.id))
        });
        Ok(rows)
    }

    async fn instances_get(&self, id: Uuid) -> AppResult<BookInstance> {
        let state = self.state.read().await;
        state
            .instances
            .get(&id)
            .map(|i| state.instance_view(i))
            .ok_or_else(|| instance_not_found(id))
    }

    async fn instances_create(&self, data: &BookInstanceInput) -> AppResult<BookInstance> {
        let mut state = self.state.write().await;
        state.check_instance_references(data)?;
        let row = BookInstance {
            id: Uuid::new_v4(),
            book_id: data.book_id,
            imprint: data.imprint.clone(),
            due_back: data.due_back,
            status: data.status,
            book_title: None,
        };
        let view = state.instance_view(&row);
        state.instances.insert(row.id, row);
        Ok(view)
    }

    async fn instances_update(&self, id: Uuid, data: &BookInstanceInput) -> AppResult<BookInstance> {
        let mut state = self.state.write().await;
        if !state.instances.contains_key(&id) {
            return Err(instance_not_found(id));
        }
        state.check_instance_references(data)?;
        let row = BookInstance {
            id,
            book_id: data.book_id,
            imprint: data.imprint.clone(),
            due_back: data.due_back,
            status: data.status,
            book_title: None,
        };
        let view = state.instance_view(&row);
        state.instances.insert(id, row);
        Ok(view)
    }

    async fn instances_delete(&self, id: Uuid) -> AppResult<()> {
        let mut state = self.state.write().await;
        state
            .instances
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| instance_not_found(id))
    }

    async fn instances_count(&self, status: Option<LoanStatus>) -> AppResult<i64> {
        let state = self.state.read().await;
        Ok(state
            .instances
            .values()
            .filter(|i| status.map_or(true, |s| i.status == s))
            .count() as i64)
    }
}
