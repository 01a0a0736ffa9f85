//! API handlers and router for the catalog server

pub mod admin;
pub mod catalog;
pub mod extract;
pub mod health;
pub mod openapi;

use axum::{routing::get, Router};
use serde::Deserialize;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::IntoParams;

use crate::{error::AppResult, pagination::PageNumber, AppState};

/// `page` query parameter shared by paginated lists
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number (default: 1) or `last`
    pub page: Option<String>,
}

impl PageQuery {
    pub fn page_number(&self) -> AppResult<PageNumber> {
        PageNumber::parse(self.page.as_deref())
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Catalog
        .route("/catalog", get(catalog::home))
        .route("/catalog/", get(catalog::home))
        .route("/catalog/books", get(catalog::list_books))
        .route("/catalog/book/:id", get(catalog::get_book))
        .route("/catalog/authors", get(catalog::list_authors))
        .route("/catalog/author/:id", get(catalog::get_author))
        .route("/catalog/genre/:id", get(catalog::get_genre))
        .route("/catalog/language/:id", get(catalog::get_language))
        // Admin
        .route("/admin", get(admin::index))
        .route("/admin/genres", get(admin::list_genres).post(admin::create_genre))
        .route(
            "/admin/genres/:id",
            get(admin::get_genre).put(admin::update_genre).delete(admin::delete_genre),
        )
        .route("/admin/languages", get(admin::list_languages).post(admin::create_language))
        .route(
            "/admin/languages/:id",
            get(admin::get_language)
                .put(admin::update_language)
                .delete(admin::delete_language),
        )
        .route("/admin/authors", get(admin::list_authors).post(admin::create_author))
        .route(
            "/admin/authors/:id",
            get(admin::get_author).put(admin::update_author).delete(admin::delete_author),
        )
        .route(
            "/admin/authors/:id/books",
            get(admin::list_author_books).post(admin::create_author_book),
        )
        .route("/admin/books", get(admin::list_books).post(admin::create_book))
        .route(
            "/admin/books/:id",
            get(admin::get_book).put(admin::update_book).delete(admin::delete_book),
        )
        .route(
            "/admin/books/:id/instances",
            get(admin::list_book_instances).post(admin::create_book_instance),
        )
        .route("/admin/instances", get(admin::list_instances).post(admin::create_instance))
        .route(
            "/admin/instances/:id",
            get(admin::get_instance)
                .put(admin::update_instance)
                .delete(admin::delete_instance),
        )
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
