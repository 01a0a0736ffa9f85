//! Admin CRUD endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    admin::{registry, ModelAdmin},
    error::AppResult,
    models::{
        book::InlineBook,
        book_instance::{InlineBookInstance, InstanceListQuery},
        Author, AuthorInput, Book, BookInput, BookInstance, BookInstanceInput, Genre, GenreInput,
        Language, LanguageInput,
    },
    pagination::{Page, PageNumber},
    services::admin::{AuthorAdminDetail, BookAdminDetail, BookAdminRow, InstanceAdminRow},
    AppState,
};

use super::{
    extract::{AppJson, AppQuery},
    PageQuery,
};

/// Registered models and their admin settings
#[utoipa::path(
    get,
    path = "/admin",
    tag = "admin",
    responses(
        (status = 200, description = "Admin registry", body = Vec<ModelAdmin>)
    )
)]
pub async fn index() -> Json<Vec<ModelAdmin>> {
    Json(registry())
}

// ----- Genres -----

#[utoipa::path(
    get,
    path = "/admin/genres",
    tag = "admin",
    params(PageQuery),
    responses(
        (status = 200, description = "Genre change list", body = Page<Genre>),
        (status = 404, description = "Invalid page")
    )
)]
pub async fn list_genres(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PageQuery>,
) -> AppResult<Json<Page<Genre>>> {
    Ok(Json(state.services.admin.list_genres(query.page_number()?).await?))
}

#[utoipa::path(
    get,
    path = "/admin/genres/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Genre", body = Genre),
        (status = 404, description = "Genre not found")
    )
)]
pub async fn get_genre(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Json<Genre>> {
    Ok(Json(state.services.admin.get_genre(id).await?))
}

#[utoipa::path(
    post,
    path = "/admin/genres",
    tag = "admin",
    request_body = GenreInput,
    responses(
        (status = 201, description = "Genre created", body = Genre),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Name already used")
    )
)]
pub async fn create_genre(
    State(state): State<AppState>,
    AppJson(data): AppJson<GenreInput>,
) -> AppResult<(StatusCode, Json<Genre>)> {
    let created = state.services.admin.create_genre(data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/admin/genres/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "Genre ID")),
    request_body = GenreInput,
    responses(
        (status = 200, description = "Genre updated", body = Genre),
        (status = 404, description = "Genre not found"),
        (status = 409, description = "Name already used")
    )
)]
pub async fn update_genre(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(data): AppJson<GenreInput>,
) -> AppResult<Json<Genre>> {
    Ok(Json(state.services.admin.update_genre(id, data).await?))
}

#[utoipa::path(
    delete,
    path = "/admin/genres/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 204, description = "Genre deleted"),
        (status = 404, description = "Genre not found")
    )
)]
pub async fn delete_genre(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    state.services.admin.delete_genre(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ----- Languages -----

#[utoipa::path(
    get,
    path = "/admin/languages",
    tag = "admin",
    params(PageQuery),
    responses(
        (status = 200, description = "Language change list", body = Page<Language>),
        (status = 404, description = "Invalid page")
    )
)]
pub async fn list_languages(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PageQuery>,
) -> AppResult<Json<Page<Language>>> {
    Ok(Json(state.services.admin.list_languages(query.page_number()?).await?))
}

#[utoipa::path(
    get,
    path = "/admin/languages/{id}",
    tag = "admin",
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
    Ok(Json(state.services.admin.get_language(id).await?))
}

#[utoipa::path(
    post,
    path = "/admin/languages",
    tag = "admin",
    request_body = LanguageInput,
    responses(
        (status = 201, description = "Language created", body = Language),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Name already used")
    )
)]
pub async fn create_language(
    State(state): State<AppState>,
    AppJson(data): AppJson<LanguageInput>,
) -> AppResult<(StatusCode, Json<Language>)> {
    let created = state.services.admin.create_language(data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/admin/languages/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "Language ID")),
    request_body = LanguageInput,
    responses(
        (status = 200, description = "Language updated", body = Language),
        (status = 404, description = "Language not found"),
        (status = 409, description = "Name already used")
    )
)]
pub async fn update_language(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(data): AppJson<LanguageInput>,
) -> AppResult<Json<Language>> {
    Ok(Json(state.services.admin.update_language(id, data).await?))
}

#[utoipa::path(
    delete,
    path = "/admin/languages/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "Language ID")),
    responses(
        (status = 204, description = "Language deleted"),
        (status = 404, description = "Language not found"),
        (status = 409, description = "Language still used by books")
    )
)]
pub async fn delete_language(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.admin.delete_language(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ----- Authors -----

#[utoipa::path(
    get,
    path = "/admin/authors",
    tag = "admin",
    params(PageQuery),
    responses(
        (status = 200, description = "Author change list", body = Page<Author>),
        (status = 404, description = "Invalid page")
    )
)]
pub async fn list_authors(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PageQuery>,
) -> AppResult<Json<Page<Author>>> {
    Ok(Json(state.services.admin.list_authors(query.page_number()?).await?))
}

#[utoipa::path(
    get,
    path = "/admin/authors/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author with inline books", body = AuthorAdminDetail),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<AuthorAdminDetail>> {
    Ok(Json(state.services.admin.get_author(id).await?))
}

#[utoipa::path(
    post,
    path = "/admin/authors",
    tag = "admin",
    request_body = AuthorInput,
    responses(
        (status = 201, description = "Author created", body = Author),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    AppJson(data): AppJson<AuthorInput>,
) -> AppResult<(StatusCode, Json<Author>)> {
    let created = state.services.admin.create_author(data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/admin/authors/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "Author ID")),
    request_body = AuthorInput,
    responses(
        (status = 200, description = "Author updated", body = Author),
        (status = 404, description = "Author not found")
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(data): AppJson<AuthorInput>,
) -> AppResult<Json<Author>> {
    Ok(Json(state.services.admin.update_author(id, data).await?))
}

#[utoipa::path(
    delete,
    path = "/admin/authors/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 404, description = "Author not found"),
        (status = 409, description = "Author still has books")
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.admin.delete_author(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/admin/authors/{id}/books",
    tag = "admin",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Books by the author", body = Vec<Book>),
        (status = 404, description = "Author not found")
    )
)]
pub async fn list_author_books(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<Book>>> {
    Ok(Json(state.services.admin.author_books(id).await?))
}

#[utoipa::path(
    post,
    path = "/admin/authors/{id}/books",
    tag = "admin",
    params(("id" = i32, Path, description = "Author ID")),
    request_body = InlineBook,
    responses(
        (status = 201, description = "Book created for the author", body = Book),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn create_author_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(data): AppJson<InlineBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let created = state.services.admin.add_author_book(id, data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

// ----- Books -----

#[utoipa::path(
    get,
    path = "/admin/books",
    tag = "admin",
    params(PageQuery),
    responses(
        (status = 200, description = "Book change list", body = Page<BookAdminRow>),
        (status = 404, description = "Invalid page")
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PageQuery>,
) -> AppResult<Json<Page<BookAdminRow>>> {
    Ok(Json(state.services.admin.list_books(query.page_number()?).await?))
}

#[utoipa::path(
    get,
    path = "/admin/books/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book with inline copies", body = BookAdminDetail),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookAdminDetail>> {
    Ok(Json(state.services.admin.get_book(id).await?))
}

#[utoipa::path(
    post,
    path = "/admin/books",
    tag = "admin",
    request_body = BookInput,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Unknown author, language or genre")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    AppJson(data): AppJson<BookInput>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let created = state.services.admin.create_book(data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/admin/books/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "Book ID")),
    request_body = BookInput,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(data): AppJson<BookInput>,
) -> AppResult<Json<Book>> {
    Ok(Json(state.services.admin.update_book(id, data).await?))
}

#[utoipa::path(
    delete,
    path = "/admin/books/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Book still has copies")
    )
)]
pub async fn delete_book(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    state.services.admin.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/admin/books/{id}/instances",
    tag = "admin",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Copies of the book", body = Vec<BookInstance>),
        (status = 404, description = "Book not found")
    )
)]
pub async fn list_book_instances(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<BookInstance>>> {
    Ok(Json(state.services.admin.book_instances(id).await?))
}

#[utoipa::path(
    post,
    path = "/admin/books/{id}/instances",
    tag = "admin",
    params(("id" = i32, Path, description = "Book ID")),
    request_body = InlineBookInstance,
    responses(
        (status = 201, description = "Copy created", body = BookInstance),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn create_book_instance(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(data): AppJson<InlineBookInstance>,
) -> AppResult<(StatusCode, Json<BookInstance>)> {
    let created = state.services.admin.add_book_instance(id, data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

// ----- Book instances -----

#[utoipa::path(
    get,
    path = "/admin/instances",
    tag = "admin",
    params(InstanceListQuery),
    responses(
        (status = 200, description = "Book instance change list", body = Page<InstanceAdminRow>),
        (status = 404, description = "Invalid page")
    )
)]
pub async fn list_instances(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<InstanceListQuery>,
) -> AppResult<Json<Page<InstanceAdminRow>>> {
    let page = PageNumber::parse(query.page.as_deref())?;
    let today = chrono::Local::now().date_naive();
    let rows = state
        .services
        .admin
        .list_instances(query.status, query.due_back, today, page)
        .await?;
    Ok(Json(rows))
}

#[utoipa::path(
    get,
    path = "/admin/instances/{id}",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Book instance ID")),
    responses(
        (status = 200, description = "Book instance", body = BookInstance),
        (status = 404, description = "Book instance not found")
    )
)]
pub async fn get_instance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BookInstance>> {
    Ok(Json(state.services.admin.get_instance(id).await?))
}

#[utoipa::path(
    post,
    path = "/admin/instances",
    tag = "admin",
    request_body = BookInstanceInput,
    responses(
        (status = 201, description = "Book instance created", body = BookInstance),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Unknown book")
    )
)]
pub async fn create_instance(
    State(state): State<AppState>,
    AppJson(data): AppJson<BookInstanceInput>,
) -> AppResult<(StatusCode, Json<BookInstance>)> {
    let created = state.services.admin.create_instance(data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/admin/instances/{id}",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Book instance ID")),
    request_body = BookInstanceInput,
    responses(
        (status = 200, description = "Book instance updated", body = BookInstance),
        (status = 404, description = "Book instance not found")
    )
)]
pub async fn update_instance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(data): AppJson<BookInstanceInput>,
) -> AppResult<Json<BookInstance>> {
    Ok(Json(state.services.admin.update_instance(id, data).await?))
}

#[utoipa::path(
    delete,
    path = "/admin/instances/{id}",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Book instance ID")),
    responses(
        (status = 204, description = "Book instance deleted"),
        (status = 404, description = "Book instance not found")
    )
)]
pub async fn delete_instance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.admin.delete_instance(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
