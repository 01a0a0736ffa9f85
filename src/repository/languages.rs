//! Languages repository

use async_trait::async_trait;

use super::Repository;
use crate::{
    error::{is_foreign_key_violation, AppError, AppResult},
    models::language::{self, Language, LanguageInput},
};

#[async_trait]
pub trait LanguageStore: Send + Sync {
    async fn languages_list(&self) -> AppResult<Vec<Language>>;
    async fn languages_get(&self, id: i32) -> AppResult<Language>;
    async fn languages_create(&self, data: &LanguageInput) -> AppResult<Language>;
    async fn languages_update(&self, id: i32, data: &LanguageInput) -> AppResult<Language>;
    /// Delete a language; refused while any book references it
    async fn languages_delete(&self, id: i32) -> AppResult<()>;
    async fn languages_count(&self) -> AppResult<i64>;
}

pub(crate) fn language_not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Language {} not found", id))
}

#[async_trait]
impl LanguageStore for Repository {
    async fn languages_list(&self) -> AppResult<Vec<Language>> {
        let rows = sqlx::query_as::<_, Language>("SELECT id, name FROM languages ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn languages_get(&self, id: i32) -> AppResult<Language> {
        sqlx::query_as::<_, Language>("SELECT id, name FROM languages WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| language_not_found(id))
    }

    async fn languages_create(&self, data: &LanguageInput) -> AppResult<Language> {
        let row = sqlx::query_as::<_, Language>(
            "INSERT INTO languages (name) VALUES ($1) RETURNING id, name",
        )
        .bind(&data.name)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn languages_update(&self, id: i32, data: &LanguageInput) -> AppResult<Language> {
        sqlx::query_as::<_, Language>(
            "UPDATE languages SET name = $1 WHERE id = $2 RETURNING id, name",
        )
        .bind(&data.name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| language_not_found(id))
    }

    async fn languages_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM languages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    AppError::ReferentialIntegrity(language::PROTECTED_MESSAGE.to_string())
                } else {
                    e.into()
                }
            })?;
        if result.rows_affected() == 0 {
            return Err(language_not_found(id));
        }
        Ok(())
    }

    async fn languages_count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM languages")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
