//! Data models for the catalog

pub mod author;
pub mod book;
pub mod book_instance;
pub mod genre;
pub mod language;

// Re-export commonly used types
pub use author::{Author, AuthorInput};
pub use book::{Book, BookInput};
pub use book_instance::{BookInstance, BookInstanceInput, DueBackFilter, InstanceFilter, LoanStatus};
pub use genre::{Genre, GenreInput};
pub use language::{Language, LanguageInput};

/// Canonical navigation locator for a record: maps its identity to the
/// catalog detail route that serves it.
pub trait Locator {
    /// Path segment of the detail route (`/catalog/{DETAIL_ROUTE}/{key}`)
    const DETAIL_ROUTE: &'static str;

    fn locator_key(&self) -> String;

    fn absolute_url(&self) -> String {
        format!("/catalog/{}/{}", Self::DETAIL_ROUTE, self.locator_key())
    }
}
