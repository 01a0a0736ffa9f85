//! Genres repository

use async_trait::async_trait;

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::genre::{Genre, GenreInput},
};

#[async_trait]
pub trait GenreStore: Send + Sync {
    async fn genres_list(&self) -> AppResult<Vec<Genre>>;
    async fn genres_by_ids(&self, ids: &[i32]) -> AppResult<Vec<Genre>>;
    async fn genres_get(&self, id: i32) -> AppResult<Genre>;
    async fn genres_create(&self, data: &GenreInput) -> AppResult<Genre>;
    async fn genres_update(&self, id: i32, data: &GenreInput) -> AppResult<Genre>;
    /// Delete a genre; its book links go with it
    async fn genres_delete(&self, id: i32) -> AppResult<()>;
    async fn genres_count(&self) -> AppResult<i64>;
}

pub(crate) fn genre_not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Genre {} not found", id))
}

#[async_trait]
impl GenreStore for Repository {
    async fn genres_list(&self) -> AppResult<Vec<Genre>> {
        let rows = sqlx::query_as::<_, Genre>("SELECT id, name FROM genres ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn genres_by_ids(&self, ids: &[i32]) -> AppResult<Vec<Genre>> {
        let rows = sqlx::query_as::<_, Genre>(
            "SELECT id, name FROM genres WHERE id = ANY($1) ORDER BY id",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn genres_get(&self, id: i32) -> AppResult<Genre> {
        sqlx::query_as::<_, Genre>("SELECT id, name FROM genres WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| genre_not_found(id))
    }

    async fn genres_create(&self, data: &GenreInput) -> AppResult<Genre> {
        let row = sqlx::query_as::<_, Genre>(
            "INSERT INTO genres (name) VALUES ($1) RETURNING id, name",
        )
        .bind(&data.name)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn genres_update(&self, id: i32, data: &GenreInput) -> AppResult<Genre> {
        sqlx::query_as::<_, Genre>(
            "UPDATE genres SET name = $1 WHERE id = $2 RETURNING id, name",
        )
        .bind(&data.name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| genre_not_found(id))
    }

    async fn genres_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM genres WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(genre_not_found(id));
        }
        Ok(())
    }

    async fn genres_count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM genres")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
