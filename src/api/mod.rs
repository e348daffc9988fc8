//! API handlers for the catalog REST endpoints

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod catalog;
pub mod genres;
pub mod health;
pub mod openapi;

use axum::{
    extract::FromRequest,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, AppState};

/// JSON request body whose rejections use the common error body
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Home page
        .route("/catalog", get(catalog::get_dashboard))
        // Authors
        .route("/catalog/authors", get(authors::list_authors))
        .route("/catalog/author/create", post(authors::create_author))
        .route("/catalog/author/:id", get(authors::get_author))
        .route(
            "/catalog/author/:id/delete",
            get(authors::delete_author_preview).post(authors::delete_author),
        )
        .route(
            "/catalog/author/:id/update",
            get(authors::update_author_form).post(authors::update_author),
        )
        // Genres
        .route("/catalog/genres", get(genres::list_genres))
        .route("/catalog/genre/create", post(genres::create_genre))
        .route("/catalog/genre/:id", get(genres::get_genre))
        .route(
            "/catalog/genre/:id/delete",
            get(genres::delete_genre_preview).post(genres::delete_genre),
        )
        .route(
            "/catalog/genre/:id/update",
            get(genres::update_genre_form).post(genres::update_genre),
        )
        // Books
        .route("/catalog/books", get(books::list_books))
        .route(
            "/catalog/book/create",
            get(books::create_book_form).post(books::create_book),
        )
        .route("/catalog/book/:id", get(books::get_book))
        .route(
            "/catalog/book/:id/delete",
            get(books::delete_book_preview).post(books::delete_book),
        )
        .route(
            "/catalog/book/:id/update",
            get(books::update_book_form).post(books::update_book),
        )
        // Book instances
        .route("/catalog/bookinstances", get(book_instances::list_book_instances))
        .route(
            "/catalog/bookinstance/create",
            get(book_instances::create_book_instance_form).post(book_instances::create_book_instance),
        )
        .route("/catalog/bookinstance/:id", get(book_instances::get_book_instance))
        .route(
            "/catalog/bookinstance/:id/delete",
            get(book_instances::delete_book_instance_preview).post(book_instances::delete_book_instance),
        )
        .route(
            "/catalog/bookinstance/:id/update",
            get(book_instances::update_book_instance_form).post(book_instances::update_book_instance),
        )
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
