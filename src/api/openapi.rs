//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, book_instances, books, catalog, genres, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Lending library catalog REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Home page
        catalog::get_dashboard,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author,
        authors::delete_author_preview,
        authors::delete_author,
        authors::update_author_form,
        authors::update_author,
        // Genres
        genres::list_genres,
        genres::get_genre,
        genres::create_genre,
        genres::delete_genre_preview,
        genres::delete_genre,
        genres::update_genre_form,
        genres::update_genre,
        // Books
        books::list_books,
        books::get_book,
        books::create_book_form,
        books::create_book,
        books::delete_book_preview,
        books::delete_book,
        books::update_book_form,
        books::update_book,
        // Book instances
        book_instances::list_book_instances,
        book_instances::get_book_instance,
        book_instances::create_book_instance_form,
        book_instances::create_book_instance,
        book_instances::delete_book_instance_preview,
        book_instances::delete_book_instance,
        book_instances::update_book_instance_form,
        book_instances::update_book_instance,
    ),
    components(
        schemas(
            crate::models::CatalogCounts,
            crate::models::EntityKind,
            // Authors
            crate::models::author::Author,
            crate::models::author::AuthorPayload,
            crate::models::author::AuthorDetail,
            crate::models::author::AuthorDeletePreview,
            crate::models::author::AuthorUpdateForm,
            // Genres
            crate::models::genre::Genre,
            crate::models::genre::GenreOption,
            crate::models::genre::GenrePayload,
            crate::models::genre::GenreDetail,
            crate::models::genre::GenreDeletePreview,
            crate::models::genre::GenreUpdateForm,
            // Books
            crate::models::book::Book,
            crate::models::book::BookSummary,
            crate::models::book::BookTitle,
            crate::models::book::BookListEntry,
            crate::models::book::BookPayload,
            crate::models::book::BookDetail,
            crate::models::book::BookDeletePreview,
            crate::models::book::BookForm,
            crate::models::book::BookUpdateForm,
            // Book instances
            crate::models::book_instance::BookInstance,
            crate::models::book_instance::BookInstanceStatus,
            crate::models::book_instance::BookInstanceDetail,
            crate::models::book_instance::BookInstancePayload,
            crate::models::book_instance::BookInstanceDeletePreview,
            crate::models::book_instance::BookInstanceForm,
            crate::models::book_instance::BookInstanceUpdateForm,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
            crate::error::FieldError,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "catalog", description = "Catalog home page"),
        (name = "authors", description = "Author management"),
        (name = "genres", description = "Genre management"),
        (name = "books", description = "Book management"),
        (name = "bookinstances", description = "Book copy management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
