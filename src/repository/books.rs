//! Books repository

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};

use super::{like_contains_pattern, Repository};
use crate::{
    error::{is_foreign_key_violation, AppError, AppResult},
    models::book::{self, Book, BookInput},
    pagination::PageWindow,
};

#[async_trait]
pub trait BookStore: Send + Sync {
    /// Books in default order (id); one page when `window` is set
    async fn books_list(&self, window: Option<PageWindow>) -> AppResult<Vec<Book>>;
    async fn books_by_author(&self, author_id: i32) -> AppResult<Vec<Book>>;
    async fn books_get(&self, id: i32) -> AppResult<Book>;
    /// Insert the book and its genre links atomically
    async fn books_create(&self, data: &BookInput) -> AppResult<Book>;
    async fn books_update(&self, id: i32, data: &BookInput) -> AppResult<Book>;
    /// Delete a book; refused while any copy references it
    async fn books_delete(&self, id: i32) -> AppResult<()>;
    async fn books_count(&self) -> AppResult<i64>;
    /// Count books whose title contains `needle`, ignoring case
    async fn books_count_title_contains(&self, needle: &str) -> AppResult<i64>;
}

pub(crate) fn book_not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Book {} not found", id))
}

/// Book columns with genre ids and the author/language labels.
/// Callers append WHERE, then `BOOK_GROUP_BY`.
const BOOK_SELECT: &str = r#"
    SELECT b.id, b.title, b.summary, b.isbn, b.author_id, b.language_id,
           COALESCE(
               ARRAY_AGG(bg.genre_id ORDER BY bg.genre_id) FILTER (WHERE bg.genre_id IS NOT NULL),
               '{}'
           ) AS genre_ids,
           a.last_name || ', ' || a.first_name AS author_label,
           l.name AS language_name
    FROM books b
    JOIN authors a ON a.id = b.author_id
    JOIN languages l ON l.id = b.language_id
    LEFT JOIN book_genres bg ON bg.book_id = b.id
"#;

const BOOK_GROUP_BY: &str = "GROUP BY b.id, a.id, l.id";

impl Repository {
    async fn books_replace_genres(
        tx: &mut Transaction<'_, Postgres>,
        book_id: i32,
        genre_ids: &[i32],
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
            .bind(book_id)
            .execute(&mut **tx)
            .await?;

        if !genre_ids.is_empty() {
            sqlx::query(
                "INSERT INTO book_genres (book_id, genre_id) SELECT $1, UNNEST($2::int[])",
            )
            .bind(book_id)
            .bind(genre_ids)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl BookStore for Repository {
    async fn books_list(&self, window: Option<PageWindow>) -> AppResult<Vec<Book>> {
        let mut query = format!("{} {} ORDER BY b.id", BOOK_SELECT, BOOK_GROUP_BY);
        if window.is_some() {
            query.push_str(" LIMIT $1 OFFSET $2");
        }

        let mut builder = sqlx::query_as::<_, Book>(&query);
        if let Some(w) = window {
            builder = builder.bind(w.limit()).bind(w.offset());
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn books_by_author(&self, author_id: i32) -> AppResult<Vec<Book>> {
        let query = format!(
            "{} WHERE b.author_id = $1 {} ORDER BY b.id",
            BOOK_SELECT, BOOK_GROUP_BY
        );
        let rows = sqlx::query_as::<_, Book>(&query)
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn books_get(&self, id: i32) -> AppResult<Book> {
        let query = format!("{} WHERE b.id = $1 {}", BOOK_SELECT, BOOK_GROUP_BY);
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| book_not_found(id))
    }

    async fn books_create(&self, data: &BookInput) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO books (title, summary, isbn, author_id, language_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&data.title)
        .bind(&data.summary)
        .bind(&data.isbn)
        .bind(data.author_id)
        .bind(data.language_id)
        .fetch_one(&mut *tx)
        .await?;

        Self::books_replace_genres(&mut tx, id, &data.normalized_genre_ids()).await?;
        tx.commit().await?;

        self.books_get(id).await
    }

    async fn books_update(&self, id: i32, data: &BookInput) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE books
            SET title = $1, summary = $2, isbn = $3, author_id = $4, language_id = $5
            WHERE id = $6
            "#,
        )
        .bind(&data.title)
        .bind(&data.summary)
        .bind(&data.isbn)
        .bind(data.author_id)
        .bind(data.language_id)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(book_not_found(id));
        }

        Self::books_replace_genres(&mut tx, id, &data.normalized_genre_ids()).await?;
        tx.commit().await?;

        self.books_get(id).await
    }

    async fn books_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    AppError::ReferentialIntegrity(book::PROTECTED_MESSAGE.to_string())
                } else {
                    e.into()
                }
            })?;
        if result.rows_affected() == 0 {
            return Err(book_not_found(id));
        }
        Ok(())
    }

    async fn books_count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn books_count_title_contains(&self, needle: &str) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE title ILIKE $1")
            .bind(like_contains_pattern(needle))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
