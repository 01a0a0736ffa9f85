//! Language model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::Locator;

/// Name of the `LOWER(name)` unique index on `languages`
pub const NAME_UNIQUE_CONSTRAINT: &str = "language_name_case_insensitive_unique";

pub const DUPLICATE_NAME_MESSAGE: &str =
    "Language with this name already exists (case insensitive match).";

pub const PROTECTED_MESSAGE: &str =
    "Cannot delete language: it is referenced by one or more books.";

/// Natural language a book is written in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Language {
    pub id: i32,
    pub name: String,
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Locator for Language {
    const DETAIL_ROUTE: &'static str = "language";

    fn locator_key(&self) -> String {
        self.id.to_string()
    }
}

/// Create/update language request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LanguageInput {
    /// Language name (e.g. English, French, Japanese), unique ignoring case
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
}
