//! Book instance API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::JsonBody,
    error::{AppResult, ErrorResponse},
    models::{
        book_instance::{
            BookInstanceDeletePreview, BookInstanceDetail, BookInstanceForm, BookInstancePayload,
            BookInstanceUpdateForm,
        },
        BookInstance, EntityKind,
    },
    AppState,
};

/// List copies, books populated
#[utoipa::path(
    get,
    path = "/catalog/bookinstances",
    tag = "bookinstances",
    responses(
        (status = 200, description = "All copies", body = Vec<BookInstanceDetail>)
    )
)]
pub async fn list_book_instances(State(state): State<AppState>) -> AppResult<Json<Vec<BookInstanceDetail>>> {
    let instances = state.services.book_instances.list().await?;
    Ok(Json(instances))
}

#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}",
    tag = "bookinstances",
    params(("id" = String, Path, description = "Book instance ID")),
    responses(
        (status = 200, description = "Copy details", body = BookInstanceDetail),
        (status = 404, description = "Copy not found", body = ErrorResponse)
    )
)]
pub async fn get_book_instance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<BookInstanceDetail>> {
    let id = EntityKind::BookInstance.parse_id(&id)?;
    Ok(Json(state.services.book_instances.detail(id).await?))
}

/// Book titles to choose from when adding a copy
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/create",
    tag = "bookinstances",
    responses(
        (status = 200, description = "Form options", body = BookInstanceForm)
    )
)]
pub async fn create_book_instance_form(State(state): State<AppState>) -> AppResult<Json<BookInstanceForm>> {
    Ok(Json(state.services.book_instances.create_form().await?))
}

/// Add a copy
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/create",
    tag = "bookinstances",
    request_body = BookInstancePayload,
    responses(
        (status = 201, description = "Copy created", body = BookInstance),
        (status = 400, description = "Invalid input, with form options", body = ErrorResponse)
    )
)]
pub async fn create_book_instance(
    State(state): State<AppState>,
    JsonBody(data): JsonBody<BookInstancePayload>,
) -> AppResult<(StatusCode, Json<BookInstance>)> {
    let instance = state.services.book_instances.create(data).await?;
    Ok((StatusCode::CREATED, Json(instance)))
}

#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}/delete",
    tag = "bookinstances",
    params(("id" = String, Path, description = "Book instance ID")),
    responses(
        (status = 200, description = "Copy to delete", body = BookInstanceDeletePreview),
        (status = 404, description = "Copy not found", body = ErrorResponse)
    )
)]
pub async fn delete_book_instance_preview(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<BookInstanceDeletePreview>> {
    let id = EntityKind::BookInstance.parse_id(&id)?;
    Ok(Json(state.services.book_instances.delete_preview(id).await?))
}

/// Delete a copy
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/{id}/delete",
    tag = "bookinstances",
    params(("id" = String, Path, description = "Book instance ID")),
    responses(
        (status = 200, description = "Deleted copy", body = BookInstance),
        (status = 404, description = "Copy not found", body = ErrorResponse)
    )
)]
pub async fn delete_book_instance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<BookInstance>> {
    let id = EntityKind::BookInstance.parse_id(&id)?;
    Ok(Json(state.services.book_instances.delete(id).await?))
}

#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}/update",
    tag = "bookinstances",
    params(("id" = String, Path, description = "Book instance ID")),
    responses(
        (status = 200, description = "Copy and form options", body = BookInstanceUpdateForm),
        (status = 404, description = "Copy not found", body = ErrorResponse)
    )
)]
pub async fn update_book_instance_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<BookInstanceUpdateForm>> {
    let id = EntityKind::BookInstance.parse_id(&id)?;
    Ok(Json(state.services.book_instances.update_form(id).await?))
}

/// Replace a copy
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/{id}/update",
    tag = "bookinstances",
    params(("id" = String, Path, description = "Book instance ID")),
    request_body = BookInstancePayload,
    responses(
        (status = 200, description = "Copy updated", body = BookInstance),
        (status = 400, description = "Invalid input, with form options", body = ErrorResponse),
        (status = 404, description = "Copy not found", body = ErrorResponse)
    )
)]
pub async fn update_book_instance(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(data): JsonBody<BookInstancePayload>,
) -> AppResult<Json<BookInstance>> {
    let id = EntityKind::BookInstance.parse_id(&id)?;
    Ok(Json(state.services.book_instances.update(id, data).await?))
}
