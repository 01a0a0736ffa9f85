//! Book instances (copies) repository

use async_trait::async_trait;
use uuid::Uuid;

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::book_instance::{BookInstance, BookInstanceInput, DueBackRange, InstanceFilter, LoanStatus},
};

#[async_trait]
pub trait BookInstanceStore: Send + Sync {
    /// Copies matching `filter`, ordered by due date (undated last)
    async fn instances_list(&self, filter: &InstanceFilter) -> AppResult<Vec<BookInstance>>;
    async fn instances_get(&self, id: Uuid) -> AppResult<BookInstance>;
    /// Insert a copy under a freshly drawn random id
    async fn instances_create(&self, data: &BookInstanceInput) -> AppResult<BookInstance>;
    /// Update every field except the id
    async fn instances_update(&self, id: Uuid, data: &BookInstanceInput) -> AppResult<BookInstance>;
    async fn instances_delete(&self, id: Uuid) -> AppResult<()>;
    /// Count copies, optionally only those with the given status
    async fn instances_count(&self, status: Option<LoanStatus>) -> AppResult<i64>;
}

pub(crate) fn instance_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Book instance {} not found", id))
}

const INSTANCE_SELECT: &str = r#"
    SELECT bi.id, bi.book_id, bi.imprint, bi.due_back, bi.status, b.title AS book_title
    FROM book_instances bi
    JOIN books b ON b.id = bi.book_id
"#;

#[async_trait]
impl BookInstanceStore for Repository {
    async fn instances_list(&self, filter: &InstanceFilter) -> AppResult<Vec<BookInstance>> {
        let mut conditions = Vec::new();
        let mut idx = 1;

        if filter.book_id.is_some() {
            conditions.push(format!("bi.book_id = ${}", idx));
            idx += 1;
        }
        if filter.status.is_some() {
            conditions.push(format!("bi.status = ${}", idx));
            idx += 1;
        }
        match filter.due_back {
            Some(DueBackRange::Between { .. }) => {
                conditions.push(format!("bi.due_back >= ${} AND bi.due_back < ${}", idx, idx + 1));
            }
            Some(DueBackRange::IsNull) => conditions.push("bi.due_back IS NULL".to_string()),
            Some(DueBackRange::NotNull) => conditions.push("bi.due_back IS NOT NULL".to_string()),
            None => {}
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "{} {} ORDER BY bi.due_back ASC NULLS LAST, bi.id",
            INSTANCE_SELECT, where_clause
        );

        let mut builder = sqlx::query_as::<_, BookInstance>(&query);
        if let Some(book_id) = filter.book_id {
            builder = builder.bind(book_id);
        }
        if let Some(status) = filter.status {
            builder = builder.bind(status);
        }
        if let Some(DueBackRange::Between { from, until }) = filter.due_back {
            builder = builder.bind(from).bind(until);
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn instances_get(&self, id: Uuid) -> AppResult<BookInstance> {
        let query = format!("{} WHERE bi.id = $1", INSTANCE_SELECT);
        sqlx::query_as::<_, BookInstance>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| instance_not_found(id))
    }

    async fn instances_create(&self, data: &BookInstanceInput) -> AppResult<BookInstance> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO book_instances (id, book_id, imprint, due_back, status)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id)
        .bind(data.book_id)
        .bind(&data.imprint)
        .bind(data.due_back)
        .bind(data.status)
        .execute(&self.pool)
        .await?;

        self.instances_get(id).await
    }

    async fn instances_update(&self, id: Uuid, data: &BookInstanceInput) -> AppResult<BookInstance> {
        let result = sqlx::query(
            r#"
            UPDATE book_instances
            SET book_id = $1, imprint = $2, due_back = $3, status = $4
            WHERE id = $5
            "#,
        )
        .bind(data.book_id)
        .bind(&data.imprint)
        .bind(data.due_back)
        .bind(data.status)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(instance_not_found(id));
        }
        self.instances_get(id).await
    }

    async fn instances_delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM book_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(instance_not_found(id));
        }
        Ok(())
    }

    async fn instances_count(&self, status: Option<LoanStatus>) -> AppResult<i64> {
        let count: i64 = match status {
            Some(status) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = $1")
                    .bind(status)
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM book_instances")
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(count)
    }
}
