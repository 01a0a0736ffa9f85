//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{admin, catalog, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Local Library Catalog API",
        version = "1.0.0",
        description = "Catalog pages and admin CRUD for a local library",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Catalog
        catalog::home,
        catalog::list_books,
        catalog::get_book,
        catalog::list_authors,
        catalog::get_author,
        catalog::get_genre,
        catalog::get_language,
        // Admin
        admin::index,
        admin::list_genres,
        admin::get_genre,
        admin::create_genre,
        admin::update_genre,
        admin::delete_genre,
        admin::list_languages,
        admin::get_language,
        admin::create_language,
        admin::update_language,
        admin::delete_language,
        admin::list_authors,
        admin::get_author,
        admin::create_author,
        admin::update_author,
        admin::delete_author,
        admin::list_author_books,
        admin::create_author_book,
        admin::list_books,
        admin::get_book,
        admin::create_book,
        admin::update_book,
        admin::delete_book,
        admin::list_book_instances,
        admin::create_book_instance,
        admin::list_instances,
        admin::get_instance,
        admin::create_instance,
        admin::update_instance,
        admin::delete_instance,
    ),
    components(
        schemas(
            // Entities
            crate::models::Genre,
            crate::models::GenreInput,
            crate::models::Language,
            crate::models::LanguageInput,
            crate::models::Author,
            crate::models::AuthorInput,
            crate::models::Book,
            crate::models::BookInput,
            crate::models::book::InlineBook,
            crate::models::BookInstance,
            crate::models::BookInstanceInput,
            crate::models::book_instance::InlineBookInstance,
            crate::models::LoanStatus,
            crate::models::DueBackFilter,
            // Catalog
            crate::services::catalog::HomeSummary,
            crate::services::catalog::BookListEntry,
            crate::services::catalog::BookListPage,
            crate::services::catalog::AuthorListEntry,
            crate::services::catalog::InstanceEntry,
            crate::services::catalog::BookDetail,
            crate::services::catalog::AuthorDetail,
            // Admin
            crate::admin::ModelAdmin,
            crate::admin::ListFilter,
            crate::admin::FilterChoice,
            crate::admin::Fieldset,
            crate::admin::Inline,
            crate::services::admin::BookAdminRow,
            crate::services::admin::InstanceAdminRow,
            crate::services::admin::AuthorAdminDetail,
            crate::services::admin::BookAdminDetail,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "catalog", description = "Public catalog pages"),
        (name = "admin", description = "Administrative CRUD")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
