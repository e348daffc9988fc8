//! Book API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::JsonBody,
    error::{AppResult, ErrorResponse},
    models::{
        book::{BookDeletePreview, BookDetail, BookForm, BookListEntry, BookPayload, BookUpdateForm},
        Book, EntityKind,
    },
    AppState,
};

/// List books by title, authors populated
#[utoipa::path(
    get,
    path = "/catalog/books",
    tag = "books",
    responses(
        (status = 200, description = "All books", body = Vec<BookListEntry>)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<BookListEntry>>> {
    let books = state.services.books.list().await?;
    Ok(Json(books))
}

/// Get a book with its author, genres and copies
#[utoipa::path(
    get,
    path = "/catalog/book/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookDetail),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn get_book(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Json<BookDetail>> {
    let id = EntityKind::Book.parse_id(&id)?;
    let detail = state.services.books.detail(id).await?;
    Ok(Json(detail))
}

/// Authors and genres to choose from when creating a book
#[utoipa::path(
    get,
    path = "/catalog/book/create",
    tag = "books",
    responses(
        (status = 200, description = "Form options", body = BookForm)
    )
)]
pub async fn create_book_form(State(state): State<AppState>) -> AppResult<Json<BookForm>> {
    let form = state.services.books.create_form().await?;
    Ok(Json(form))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/catalog/book/create",
    tag = "books",
    request_body = BookPayload,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input, with form options", body = ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    JsonBody(data): JsonBody<BookPayload>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let book = state.services.books.create(data).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Preview a book delete
#[utoipa::path(
    get,
    path = "/catalog/book/{id}/delete",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book and its copies", body = BookDeletePreview),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn delete_book_preview(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<BookDeletePreview>> {
    let id = EntityKind::Book.parse_id(&id)?;
    let preview = state.services.books.delete_preview(id).await?;
    Ok(Json(preview))
}

/// Delete a book without copies
#[utoipa::path(
    post,
    path = "/catalog/book/{id}/delete",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Deleted book", body = Book),
        (status = 404, description = "Book not found", body = ErrorResponse),
        (status = 409, description = "Copies still reference this book", body = ErrorResponse)
    )
)]
pub async fn delete_book(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Json<Book>> {
    let id = EntityKind::Book.parse_id(&id)?;
    let book = state.services.books.delete(id).await?;
    Ok(Json(book))
}

/// Load a book for editing, its genres checked
#[utoipa::path(
    get,
    path = "/catalog/book/{id}/update",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book and form options", body = BookUpdateForm),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn update_book_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<BookUpdateForm>> {
    let id = EntityKind::Book.parse_id(&id)?;
    let form = state.services.books.update_form(id).await?;
    Ok(Json(form))
}

/// Replace a book
#[utoipa::path(
    post,
    path = "/catalog/book/{id}/update",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    request_body = BookPayload,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid input, with form options", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(data): JsonBody<BookPayload>,
) -> AppResult<Json<Book>> {
    let id = EntityKind::Book.parse_id(&id)?;
    let book = state.services.books.update(id, data).await?;
    Ok(Json(book))
}
