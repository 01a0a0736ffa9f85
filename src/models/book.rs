//! Book model (bibliographic record, not a physical copy)

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::Locator;
use crate::error::{AppError, AppResult};

pub const ISBN_LENGTH: usize = 13;

pub const MISSING_AUTHOR_MESSAGE: &str = "Book references an author that does not exist.";
pub const MISSING_LANGUAGE_MESSAGE: &str = "Book references a language that does not exist.";
pub const MISSING_GENRE_MESSAGE: &str = "Book references a genre that does not exist.";
pub const PROTECTED_MESSAGE: &str =
    "Cannot delete book: it is referenced by one or more book instances.";

/// Full book model from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub author_id: i32,
    pub language_id: i32,
    /// Linked genre ids, ascending
    #[sqlx(default)]
    #[serde(default)]
    pub genre_ids: Vec<i32>,
    // Computed fields (populated when queried with JOINs)
    #[sqlx(default)]
    #[serde(default)]
    pub author_label: Option<String>,
    #[sqlx(default)]
    #[serde(default)]
    pub language_name: Option<String>,
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)
    }
}

impl Locator for Book {
    const DETAIL_ROUTE: &'static str = "book";

    fn locator_key(&self) -> String {
        self.id.to_string()
    }
}

/// Create/update book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BookInput {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 1000, message = "Summary must be 1-1000 characters"))]
    pub summary: String,
    /// 13 character ISBN number
    pub isbn: String,
    pub author_id: i32,
    pub language_id: i32,
    #[serde(default)]
    pub genre_ids: Vec<i32>,
}

impl BookInput {
    /// Field validation plus the ISBN format check.
    pub fn check(&self) -> AppResult<()> {
        self.validate()?;
        if !is_valid_isbn(&self.isbn) {
            return Err(AppError::Validation(format!(
                "isbn: ISBN must be exactly {} digits",
                ISBN_LENGTH
            )));
        }
        Ok(())
    }

    /// Genre ids sorted with duplicates removed
    pub fn normalized_genre_ids(&self) -> Vec<i32> {
        let mut ids = self.genre_ids.clone();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

/// Book created inline from an author's admin page; the author comes from the path.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct InlineBook {
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub language_id: i32,
    #[serde(default)]
    pub genre_ids: Vec<i32>,
}

impl InlineBook {
    pub fn into_input(self, author_id: i32) -> BookInput {
        BookInput {
            title: self.title,
            summary: self.summary,
            isbn: self.isbn,
            author_id,
            language_id: self.language_id,
            genre_ids: self.genre_ids,
        }
    }
}

pub fn is_valid_isbn(isbn: &str) -> bool {
    isbn.len() == ISBN_LENGTH && isbn.bytes().all(|b| b.is_ascii_digit())
}

/// Admin list column: the first three genre names, comma separated.
pub fn display_genre<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    names.into_iter().take(3).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(isbn: &str) -> BookInput {
        BookInput {
            title: "The Fall of Hyperion".to_string(),
            summary: "Sequel.".to_string(),
            isbn: isbn.to_string(),
            author_id: 1,
            language_id: 1,
            genre_ids: vec![3, 1, 3],
        }
    }

    #[test]
    fn test_isbn_format() {
        assert!(is_valid_isbn("9780553288209"));
        assert!(!is_valid_isbn("978-0553288209"));
        assert!(!is_valid_isbn("055328820X"));
        assert!(input("9780553288209").check().is_ok());
        assert!(matches!(input("123").check(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_empty_title_rejected() {
        let mut book = input("9780553288209");
        book.title.clear();
        assert!(matches!(book.check(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_genre_ids_normalized() {
        assert_eq!(input("9780553288209").normalized_genre_ids(), vec![1, 3]);
    }

    #[test]
    fn test_display_genre_takes_three() {
        let names = ["Fantasy", "Horror", "Poetry", "Science Fiction"];
        assert_eq!(display_genre(names), "Fantasy, Horror, Poetry");
        assert_eq!(display_genre(Vec::<&str>::new()), "");
    }
}
