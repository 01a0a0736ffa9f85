//! Error types for the catalog server

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::models::{genre, language, book, book_instance};

/// SQLSTATE for unique_violation
const PG_UNIQUE_VIOLATION: &str = "23505";
/// SQLSTATE for foreign_key_violation
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

/// Stable numeric error codes returned in error bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    DbFailure = 2,
    NoSuchRecord = 3,
    Duplicate = 4,
    ProtectedRecord = 5,
    InvalidPage = 6,
    BadValue = 7,
    SessionFailure = 8,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    UniquenessViolation(String),

    #[error("{0}")]
    ReferentialIntegrity(String),

    #[error("Invalid page: {0}")]
    InvalidPage(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::NotFound(_) => ErrorCode::NoSuchRecord,
            AppError::UniquenessViolation(_) => ErrorCode::Duplicate,
            AppError::ReferentialIntegrity(_) => ErrorCode::ProtectedRecord,
            AppError::InvalidPage(_) => ErrorCode::InvalidPage,
            AppError::Validation(_) => ErrorCode::BadValue,
            AppError::Database(_) => ErrorCode::DbFailure,
            AppError::Session(_) => ErrorCode::SessionFailure,
            AppError::Internal(_) => ErrorCode::Failure,
        }
    }
}

/// Returns true when the error is a PostgreSQL foreign key violation.
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some(PG_FOREIGN_KEY_VIOLATION))
}

impl From<sqlx::Error> for AppError {
    /// Classifies constraint violations raised by the store into domain errors.
    fn from(err: sqlx::Error) -> Self {
        let (code, constraint) = match &err {
            sqlx::Error::RowNotFound => {
                return AppError::NotFound("Record not found".to_string());
            }
            sqlx::Error::Database(db) => (
                db.code().map(|c| c.into_owned()),
                db.constraint().map(str::to_string),
            ),
            _ => return AppError::Database(err),
        };

        match (code.as_deref(), constraint.as_deref()) {
            (Some(PG_UNIQUE_VIOLATION), Some(genre::NAME_UNIQUE_CONSTRAINT)) => {
                AppError::UniquenessViolation(genre::DUPLICATE_NAME_MESSAGE.to_string())
            }
            (Some(PG_UNIQUE_VIOLATION), Some(language::NAME_UNIQUE_CONSTRAINT)) => {
                AppError::UniquenessViolation(language::DUPLICATE_NAME_MESSAGE.to_string())
            }
            (Some(PG_UNIQUE_VIOLATION), other) => AppError::UniquenessViolation(format!(
                "Unique constraint {} violated",
                other.unwrap_or("unknown")
            )),
            (Some(PG_FOREIGN_KEY_VIOLATION), Some("books_author_id_fkey")) => {
                AppError::ReferentialIntegrity(book::MISSING_AUTHOR_MESSAGE.to_string())
            }
            (Some(PG_FOREIGN_KEY_VIOLATION), Some("books_language_id_fkey")) => {
                AppError::ReferentialIntegrity(book::MISSING_LANGUAGE_MESSAGE.to_string())
            }
            (Some(PG_FOREIGN_KEY_VIOLATION), Some("book_genres_genre_id_fkey")) => {
                AppError::ReferentialIntegrity(book::MISSING_GENRE_MESSAGE.to_string())
            }
            (Some(PG_FOREIGN_KEY_VIOLATION), Some("book_instances_book_id_fkey")) => {
                AppError::ReferentialIntegrity(book_instance::MISSING_BOOK_MESSAGE.to_string())
            }
            (Some(PG_FOREIGN_KEY_VIOLATION), other) => AppError::ReferentialIntegrity(format!(
                "Foreign key constraint {} violated",
                other.unwrap_or("unknown")
            )),
            _ => AppError::Database(err),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        AppError::Session(err.to_string())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, message) = match &self {
            AppError::NotFound(msg) | AppError::InvalidPage(msg) => {
                (StatusCode::NOT_FOUND, msg.clone())
            }
            AppError::UniquenessViolation(msg) | AppError::ReferentialIntegrity(msg) => {
                (StatusCode::CONFLICT, msg.clone())
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }
            AppError::Session(msg) => {
                tracing::error!("Session error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Session error".to_string())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.code(), ErrorCode::NoSuchRecord);
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::InvalidPage("x".into()), StatusCode::NOT_FOUND),
            (AppError::UniquenessViolation("x".into()), StatusCode::CONFLICT),
            (AppError::ReferentialIntegrity("x".into()), StatusCode::CONFLICT),
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_uniqueness_message_is_user_visible() {
        let err = AppError::UniquenessViolation(genre::DUPLICATE_NAME_MESSAGE.to_string());
        assert_eq!(
            err.to_string(),
            "Genre with this name already exists (case insensitive match)."
        );
    }
}
