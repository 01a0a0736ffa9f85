//! Repository layer: the entity store behind the catalog.
//!
//! Each entity has its own store trait; [`CatalogStore`] bundles them. The
//! PostgreSQL [`Repository`] is the production backend, [`MemoryStore`]
//! enforces the same constraints in process.

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;
pub mod languages;
pub mod memory;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use std::sync::Arc;

use crate::error::AppResult;

pub use authors::AuthorStore;
pub use book_instances::BookInstanceStore;
pub use books::BookStore;
pub use genres::GenreStore;
pub use languages::LanguageStore;
pub use memory::MemoryStore;

/// The full entity store
#[async_trait]
pub trait CatalogStore:
    GenreStore + LanguageStore + AuthorStore + BookStore + BookInstanceStore
{
    /// Check that the store is reachable
    async fn ping(&self) -> AppResult<()>;
}

/// Shared handle to the entity store
pub type Store = Arc<dyn CatalogStore>;

/// PostgreSQL-backed store holding the connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for Repository {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Escape `%`, `_` and `\` so user text matches literally inside a LIKE pattern.
pub(crate) fn like_contains_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_contains_pattern("of"), "%of%");
        assert_eq!(like_contains_pattern("50%_off"), "%50\\%\\_off%");
    }
}
