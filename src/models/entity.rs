//! Entity kinds and the type-erased entity used at the store boundary

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{author::Author, book::Book, book_instance::BookInstance, genre::Genre};
use crate::error::{AppError, AppResult};

/// The four catalog collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Author,
    Genre,
    Book,
    BookInstance,
}

impl EntityKind {
    /// Capitalized label used in messages
    pub fn title(&self) -> &'static str {
        match self {
            EntityKind::Author => "Author",
            EntityKind::Genre => "Genre",
            EntityKind::Book => "Book",
            EntityKind::BookInstance => "Book instance",
        }
    }

    pub fn label(&self, count: usize) -> &'static str {
        match (self, count) {
            (EntityKind::Author, 1) => "author",
            (EntityKind::Author, _) => "authors",
            (EntityKind::Genre, 1) => "genre",
            (EntityKind::Genre, _) => "genres",
            (EntityKind::Book, 1) => "book",
            (EntityKind::Book, _) => "books",
            (EntityKind::BookInstance, 1) => "book instance",
            (EntityKind::BookInstance, _) => "book instances",
        }
    }

    /// Collection holding the entities that reference this kind.
    /// Author and Genre are referenced by Book, Book by BookInstance.
    pub fn dependent(&self) -> Option<EntityKind> {
        match self {
            EntityKind::Author | EntityKind::Genre => Some(EntityKind::Book),
            EntityKind::Book => Some(EntityKind::BookInstance),
            EntityKind::BookInstance => None,
        }
    }

    /// Parse a raw path identifier into a store key
    pub fn parse_id(&self, raw: &str) -> AppResult<Uuid> {
        Uuid::parse_str(raw.trim()).map_err(|_| {
            AppError::InvalidIdentifier(format!("'{}' is not a valid {} identifier", raw, self.label(1)))
        })
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label(1))
    }
}

/// Any catalog entity, as exchanged with the store
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entity {
    Author(Author),
    Genre(Genre),
    Book(Book),
    BookInstance(BookInstance),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Author(_) => EntityKind::Author,
            Entity::Genre(_) => EntityKind::Genre,
            Entity::Book(_) => EntityKind::Book,
            Entity::BookInstance(_) => EntityKind::BookInstance,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Entity::Author(a) => a.id,
            Entity::Genre(g) => g.id,
            Entity::Book(b) => b.id,
            Entity::BookInstance(i) => i.id,
        }
    }
}

/// Typed view over one variant of [`Entity`]
pub trait CatalogEntity: Sized + Into<Entity> + Send + 'static {
    const KIND: EntityKind;

    fn from_entity(entity: Entity) -> Option<Self>;
}

macro_rules! catalog_entity {
    ($ty:ident) => {
        impl From<$ty> for Entity {
            fn from(value: $ty) -> Self {
                Entity::$ty(value)
            }
        }

        impl CatalogEntity for $ty {
            const KIND: EntityKind = EntityKind::$ty;

            fn from_entity(entity: Entity) -> Option<Self> {
                match entity {
                    Entity::$ty(value) => Some(value),
                    _ => None,
                }
            }
        }
    };
}

catalog_entity!(Author);
catalog_entity!(Genre);
catalog_entity!(Book);
catalog_entity!(BookInstance);
