//! Genre model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::Locator;

/// Name of the `LOWER(name)` unique index on `genres`
pub const NAME_UNIQUE_CONSTRAINT: &str = "genre_name_case_insensitive_unique";

pub const DUPLICATE_NAME_MESSAGE: &str =
    "Genre with this name already exists (case insensitive match).";

/// Book genre (e.g. Science Fiction, French Poetry)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

impl std::fmt::Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Locator for Genre {
    const DETAIL_ROUTE: &'static str = "genre";

    fn locator_key(&self) -> String {
        self.id.to_string()
    }
}

/// Create/update genre request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct GenreInput {
    /// Genre name, unique ignoring case
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
}
