//! Data models for the catalog

pub mod author;
pub mod book;
pub mod book_instance;
pub mod entity;
pub mod genre;

use serde::Serialize;
use utoipa::ToSchema;

// Re-export commonly used types
pub use author::Author;
pub use book::{Book, BookTitle};
pub use book_instance::{BookInstance, BookInstanceStatus};
pub use entity::{CatalogEntity, Entity, EntityKind};
pub use genre::{Genre, GenreOption};

/// Document counts shown on the catalog home page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct CatalogCounts {
    pub book_count: i64,
    pub book_instance_count: i64,
    pub book_instance_available_count: i64,
    pub author_count: i64,
    pub genre_count: i64,
}
