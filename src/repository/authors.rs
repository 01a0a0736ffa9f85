//! Authors repository

use async_trait::async_trait;

use super::Repository;
use crate::{
    error::{is_foreign_key_violation, AppError, AppResult},
    models::author::{self, Author, AuthorInput},
    pagination::PageWindow,
};

#[async_trait]
pub trait AuthorStore: Send + Sync {
    /// Authors in default order (last name, first name); one page when `window` is set
    async fn authors_list(&self, window: Option<PageWindow>) -> AppResult<Vec<Author>>;
    async fn authors_get(&self, id: i32) -> AppResult<Author>;
    async fn authors_create(&self, data: &AuthorInput) -> AppResult<Author>;
    async fn authors_update(&self, id: i32, data: &AuthorInput) -> AppResult<Author>;
    /// Delete an author; refused while any book references it
    async fn authors_delete(&self, id: i32) -> AppResult<()>;
    async fn authors_count(&self) -> AppResult<i64>;
}

pub(crate) fn author_not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Author {} not found", id))
}

const AUTHOR_COLUMNS: &str = "id, first_name, last_name, date_of_birth, date_of_death";

#[async_trait]
impl AuthorStore for Repository {
    async fn authors_list(&self, window: Option<PageWindow>) -> AppResult<Vec<Author>> {
        let mut query = format!(
            "SELECT {} FROM authors ORDER BY last_name COLLATE \"C\", first_name COLLATE \"C\", id",
            AUTHOR_COLUMNS
        );
        if window.is_some() {
            query.push_str(" LIMIT $1 OFFSET $2");
        }

        let mut builder = sqlx::query_as::<_, Author>(&query);
        if let Some(w) = window {
            builder = builder.bind(w.limit()).bind(w.offset());
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn authors_get(&self, id: i32) -> AppResult<Author> {
        let query = format!("SELECT {} FROM authors WHERE id = $1", AUTHOR_COLUMNS);
        sqlx::query_as::<_, Author>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| author_not_found(id))
    }

    async fn authors_create(&self, data: &AuthorInput) -> AppResult<Author> {
        let query = format!(
            r#"
            INSERT INTO authors (first_name, last_name, date_of_birth, date_of_death)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            AUTHOR_COLUMNS
        );
        let row = sqlx::query_as::<_, Author>(&query)
            .bind(&data.first_name)
            .bind(&data.last_name)
            .bind(data.date_of_birth)
            .bind(data.date_of_death)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn authors_update(&self, id: i32, data: &AuthorInput) -> AppResult<Author> {
        let query = format!(
            r#"
            UPDATE authors
            SET first_name = $1, last_name = $2, date_of_birth = $3, date_of_death = $4
            WHERE id = $5
            RETURNING {}
            "#,
            AUTHOR_COLUMNS
        );
        sqlx::query_as::<_, Author>(&query)
            .bind(&data.first_name)
            .bind(&data.last_name)
            .bind(data.date_of_birth)
            .bind(data.date_of_death)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| author_not_found(id))
    }

    async fn authors_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    AppError::ReferentialIntegrity(author::PROTECTED_MESSAGE.to_string())
                } else {
                    e.into()
                }
            })?;
        if result.rows_affected() == 0 {
            return Err(author_not_found(id));
        }
        Ok(())
    }

    async fn authors_count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
