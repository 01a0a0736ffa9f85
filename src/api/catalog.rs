//! Public catalog endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::time::Duration;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Genre, Language},
    pagination::Page,
    services::catalog::{AuthorDetail, AuthorListEntry, BookDetail, BookListPage, HomeSummary},
    session,
    AppState,
};

use super::{extract::AppQuery, PageQuery};

/// Home page counts; counts a visit for the calling session
#[utoipa::path(
    get,
    path = "/catalog/",
    tag = "catalog",
    responses(
        (status = 200, description = "Catalog summary, sets the session cookie", body = HomeSummary)
    )
)]
pub async fn home(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<HomeSummary>)> {
    let settings = &state.config.session;
    let session_id = jar
        .get(&settings.cookie_name)
        .and_then(|c| Uuid::parse_str(c.value()).ok());

    let ttl = Duration::from_secs(settings.ttl_seconds);
    let mut session = session::open(state.services.sessions.as_ref(), session_id).await?;
    let summary = state.services.catalog.home_summary(&mut session).await?;
    state
        .services
        .sessions
        .save(session.id, &session.data, ttl)
        .await?;

    // The cookie lives as long as the stored session
    let cookie = Cookie::build((settings.cookie_name.clone(), session.id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::try_from(ttl).unwrap_or(time::Duration::MAX));

    Ok((jar.add(cookie), Json(summary)))
}

/// Paginated book list
#[utoipa::path(
    get,
    path = "/catalog/books",
    tag = "catalog",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of books", body = BookListPage),
        (status = 404, description = "Invalid page")
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PageQuery>,
) -> AppResult<Json<BookListPage>> {
    let page = state.services.catalog.list_books(query.page_number()?).await?;
    Ok(Json(page))
}

/// Book detail with author, language, genres and copies
#[utoipa::path(
    get,
    path = "/catalog/book/{id}",
    tag = "catalog",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookDetail),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookDetail>> {
    Ok(Json(state.services.catalog.get_book(id).await?))
}

/// Paginated author list
#[utoipa::path(
    get,
    path = "/catalog/authors",
    tag = "catalog",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of authors", body = Page<AuthorListEntry>),
        (status = 404, description = "Invalid page")
    )
)]
pub async fn list_authors(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PageQuery>,
) -> AppResult<Json<Page<AuthorListEntry>>> {
    let page = state.services.catalog.list_authors(query.page_number()?).await?;
    Ok(Json(page))
}

/// Author detail with their books
#[utoipa::path(
    get,
    path = "/catalog/author/{id}",
    tag = "catalog",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = AuthorDetail),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<AuthorDetail>> {
    Ok(Json(state.services.catalog.get_author(id).await?))
}

#[utoipa::path(
    get,
    path = "/catalog/genre/{id}",
    tag = "catalog",
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Genre", body = Genre),
        (status = 404, description = "Genre not found")
    )
)]
pub async fn get_genre(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Json<Genre>> {
    Ok(Json(state.services.catalog.get_genre(id).await?))
}

#[utoipa::path(
    get,
    path = "/catalog/language/{id}",
    tag = "catalog",
    params(("id" = i32, Path, description = "Language ID")),
    responses(
        (status = 200, description = "Language", body = Language),
        (status = 404, description = "Language not found")
    )
)]
pub async fn get_language(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Language>> {
    Ok(Json(state.services.catalog.get_language(id).await?))
}
