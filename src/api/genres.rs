//! Genre API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::JsonBody,
    error::{AppResult, ErrorResponse},
    models::{
        genre::{GenreDeletePreview, GenreDetail, GenrePayload, GenreUpdateForm},
        EntityKind, Genre,
    },
    AppState,
};

/// List genres by name
#[utoipa::path(
    get,
    path = "/catalog/genres",
    tag = "genres",
    responses(
        (status = 200, description = "All genres", body = Vec<Genre>)
    )
)]
pub async fn list_genres(State(state): State<AppState>) -> AppResult<Json<Vec<Genre>>> {
    let genres = state.services.genres.list().await?;
    Ok(Json(genres))
}

/// Get a genre and its books
#[utoipa::path(
    get,
    path = "/catalog/genre/{id}",
    tag = "genres",
    params(("id" = String, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Genre details", body = GenreDetail),
        (status = 404, description = "Genre not found", body = ErrorResponse)
    )
)]
pub async fn get_genre(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Json<GenreDetail>> {
    let id = EntityKind::Genre.parse_id(&id)?;
    Ok(Json(state.services.genres.detail(id).await?))
}

/// Create a genre
#[utoipa::path(
    post,
    path = "/catalog/genre/create",
    tag = "genres",
    request_body = GenrePayload,
    responses(
        (status = 201, description = "Genre created", body = Genre),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "A genre with this name exists", body = ErrorResponse)
    )
)]
pub async fn create_genre(
    State(state): State<AppState>,
    JsonBody(data): JsonBody<GenrePayload>,
) -> AppResult<(StatusCode, Json<Genre>)> {
    let genre = state.services.genres.create(data).await?;
    Ok((StatusCode::CREATED, Json(genre)))
}

/// Preview a genre delete
#[utoipa::path(
    get,
    path = "/catalog/genre/{id}/delete",
    tag = "genres",
    params(("id" = String, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Genre and the books filed under it", body = GenreDeletePreview),
        (status = 404, description = "Genre not found", body = ErrorResponse)
    )
)]
pub async fn delete_genre_preview(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<GenreDeletePreview>> {
    let id = EntityKind::Genre.parse_id(&id)?;
    Ok(Json(state.services.genres.delete_preview(id).await?))
}

/// Delete a genre no book is filed under
#[utoipa::path(
    post,
    path = "/catalog/genre/{id}/delete",
    tag = "genres",
    params(("id" = String, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Deleted genre", body = Genre),
        (status = 404, description = "Genre not found", body = ErrorResponse),
        (status = 409, description = "Books still reference this genre", body = ErrorResponse)
    )
)]
pub async fn delete_genre(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Json<Genre>> {
    let id = EntityKind::Genre.parse_id(&id)?;
    Ok(Json(state.services.genres.delete(id).await?))
}

#[utoipa::path(
    get,
    path = "/catalog/genre/{id}/update",
    tag = "genres",
    params(("id" = String, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Genre to edit", body = GenreUpdateForm),
        (status = 404, description = "Genre not found", body = ErrorResponse)
    )
)]
pub async fn update_genre_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<GenreUpdateForm>> {
    let id = EntityKind::Genre.parse_id(&id)?;
    Ok(Json(state.services.genres.update_form(id).await?))
}

/// Rename a genre
#[utoipa::path(
    post,
    path = "/catalog/genre/{id}/update",
    tag = "genres",
    params(("id" = String, Path, description = "Genre ID")),
    request_body = GenrePayload,
    responses(
        (status = 200, description = "Genre updated", body = Genre),
        (status = 404, description = "Genre not found", body = ErrorResponse),
        (status = 409, description = "Another genre has this name", body = ErrorResponse)
    )
)]
pub async fn update_genre(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(data): JsonBody<GenrePayload>,
) -> AppResult<Json<Genre>> {
    let id = EntityKind::Genre.parse_id(&id)?;
    Ok(Json(state.services.genres.update(id, data).await?))
}
