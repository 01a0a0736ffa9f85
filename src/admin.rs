//! Admin site registry.
//!
//! Each entity exposed under `/admin` is described by a [`ModelAdmin`]: the
//! columns of its change list, its field layout, list filters and inline
//! child records. The handlers in `api::admin` are written by hand; these
//! descriptions are what `GET /admin` serves to the admin front end.

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    models::{DueBackFilter, LoanStatus},
    pagination::ADMIN_PAGE_SIZE,
};

/// One selectable value of a list filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FilterChoice {
    /// Query parameter value
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ListFilter {
    /// Field (and query parameter) the filter applies to
    pub field: String,
    pub choices: Vec<FilterChoice>,
}

/// Group of fields on the edit form. Each row lists fields shown side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Fieldset {
    pub title: Option<String>,
    pub rows: Vec<Vec<String>>,
}

/// Child records edited from the parent's page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Inline {
    pub model: String,
    /// Route template of the inline collection
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ModelAdmin {
    pub model: String,
    /// Collection route of the CRUD handlers
    pub path: String,
    pub list_display: Vec<String>,
    pub list_filter: Vec<ListFilter>,
    pub fieldsets: Vec<Fieldset>,
    pub inlines: Vec<Inline>,
    pub list_per_page: i64,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn single_fields(fields: &[&str]) -> Vec<Vec<String>> {
    fields.iter().map(|f| vec![f.to_string()]).collect()
}

impl ModelAdmin {
    /// Registration with default settings: every field on its own row, label column only
    fn default_for(model: &str, path: &str, fields: &[&str]) -> Self {
        Self {
            model: model.to_string(),
            path: path.to_string(),
            list_display: strings(&["__str__"]),
            list_filter: Vec::new(),
            fieldsets: vec![Fieldset {
                title: None,
                rows: single_fields(fields),
            }],
            inlines: Vec::new(),
            list_per_page: ADMIN_PAGE_SIZE,
        }
    }

    pub fn genre() -> Self {
        Self::default_for("Genre", "/admin/genres", &["name"])
    }

    pub fn language() -> Self {
        Self::default_for("Language", "/admin/languages", &["name"])
    }

    pub fn author() -> Self {
        Self {
            model: "Author".to_string(),
            path: "/admin/authors".to_string(),
            list_display: strings(&["last_name", "first_name", "date_of_birth", "date_of_death"]),
            list_filter: Vec::new(),
            fieldsets: vec![Fieldset {
                title: None,
                rows: vec![
                    strings(&["first_name"]),
                    strings(&["last_name"]),
                    strings(&["date_of_birth", "date_of_death"]),
                ],
            }],
            inlines: vec![Inline {
                model: "Book".to_string(),
                path: "/admin/authors/{id}/books".to_string(),
            }],
            list_per_page: ADMIN_PAGE_SIZE,
        }
    }

    pub fn book() -> Self {
        Self {
            model: "Book".to_string(),
            path: "/admin/books".to_string(),
            list_display: strings(&["title", "author", "display_genre", "language"]),
            list_filter: Vec::new(),
            fieldsets: vec![Fieldset {
                title: None,
                rows: single_fields(&["title", "author", "summary", "isbn", "genre", "language"]),
            }],
            inlines: vec![Inline {
                model: "BookInstance".to_string(),
                path: "/admin/books/{id}/instances".to_string(),
            }],
            list_per_page: ADMIN_PAGE_SIZE,
        }
    }

    pub fn book_instance() -> Self {
        let status = ListFilter {
            field: "status".to_string(),
            choices: LoanStatus::ALL
                .iter()
                .map(|s| FilterChoice {
                    value: s.code().to_string(),
                    label: s.label().to_string(),
                })
                .collect(),
        };
        let due_back = ListFilter {
            field: "due_back".to_string(),
            choices: DueBackFilter::ALL
                .iter()
                .map(|f| FilterChoice {
                    value: f.query_value().to_string(),
                    label: f.label().to_string(),
                })
                .collect(),
        };

        Self {
            model: "BookInstance".to_string(),
            path: "/admin/instances".to_string(),
            list_display: strings(&["id", "book", "status", "due_back"]),
            list_filter: vec![status, due_back],
            fieldsets: vec![
                Fieldset {
                    title: None,
                    rows: single_fields(&["book", "imprint", "id"]),
                },
                Fieldset {
                    title: Some("Availability".to_string()),
                    rows: single_fields(&["status", "due_back"]),
                },
            ],
            inlines: Vec::new(),
            list_per_page: ADMIN_PAGE_SIZE,
        }
    }
}

/// Every registered model, in admin index order
pub fn registry() -> Vec<ModelAdmin> {
    vec![
        ModelAdmin::author(),
        ModelAdmin::book(),
        ModelAdmin::book_instance(),
        ModelAdmin::genre(),
        ModelAdmin::language(),
    ]
}
