//! Author API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::JsonBody,
    error::{AppResult, ErrorResponse},
    models::{
        author::{AuthorDeletePreview, AuthorDetail, AuthorPayload, AuthorUpdateForm},
        Author, EntityKind,
    },
    AppState,
};

/// List authors by family name
#[utoipa::path(
    get,
    path = "/catalog/authors",
    tag = "authors",
    responses(
        (status = 200, description = "All authors", body = Vec<Author>)
    )
)]
pub async fn list_authors(State(state): State<AppState>) -> AppResult<Json<Vec<Author>>> {
    let authors = state.services.authors.list().await?;
    Ok(Json(authors))
}

/// Get an author and their books
#[utoipa::path(
    get,
    path = "/catalog/author/{id}",
    tag = "authors",
    params(("id" = String, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = AuthorDetail),
        (status = 400, description = "Malformed identifier", body = ErrorResponse),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn get_author(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Json<AuthorDetail>> {
    let id = EntityKind::Author.parse_id(&id)?;
    let detail = state.services.authors.detail(id).await?;
    Ok(Json(detail))
}

/// Create an author
#[utoipa::path(
    post,
    path = "/catalog/author/create",
    tag = "authors",
    request_body = AuthorPayload,
    responses(
        (status = 201, description = "Author created", body = Author),
        (status = 400, description = "Invalid input", body = ErrorResponse)
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    JsonBody(data): JsonBody<AuthorPayload>,
) -> AppResult<(StatusCode, Json<Author>)> {
    let author = state.services.authors.create(data).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

/// Preview an author delete
#[utoipa::path(
    get,
    path = "/catalog/author/{id}/delete",
    tag = "authors",
    params(("id" = String, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author and the books referencing it", body = AuthorDeletePreview),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn delete_author_preview(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<AuthorDeletePreview>> {
    let id = EntityKind::Author.parse_id(&id)?;
    let preview = state.services.authors.delete_preview(id).await?;
    Ok(Json(preview))
}

/// Delete an author that no book references
#[utoipa::path(
    post,
    path = "/catalog/author/{id}/delete",
    tag = "authors",
    params(("id" = String, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Deleted author", body = Author),
        (status = 404, description = "Author not found", body = ErrorResponse),
        (status = 409, description = "Books still reference this author", body = ErrorResponse)
    )
)]
pub async fn delete_author(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Json<Author>> {
    let id = EntityKind::Author.parse_id(&id)?;
    let author = state.services.authors.delete(id).await?;
    Ok(Json(author))
}

/// Load an author for editing
#[utoipa::path(
    get,
    path = "/catalog/author/{id}/update",
    tag = "authors",
    params(("id" = String, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author to edit", body = AuthorUpdateForm),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn update_author_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<AuthorUpdateForm>> {
    let id = EntityKind::Author.parse_id(&id)?;
    let form = state.services.authors.update_form(id).await?;
    Ok(Json(form))
}

/// Replace an author
#[utoipa::path(
    post,
    path = "/catalog/author/{id}/update",
    tag = "authors",
    params(("id" = String, Path, description = "Author ID")),
    request_body = AuthorPayload,
    responses(
        (status = 200, description = "Author updated", body = Author),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(data): JsonBody<AuthorPayload>,
) -> AppResult<Json<Author>> {
    let id = EntityKind::Author.parse_id(&id)?;
    let author = state.services.authors.update(id, data).await?;
    Ok(Json(author))
}
