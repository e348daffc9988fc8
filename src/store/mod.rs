//! Entity store: durable state for the four catalog collections
//!
//! The store is the only owner of catalog data. It is built once in `main`,
//! shared as `Arc<dyn EntityStore>` and closed on shutdown.
//!
//! Integrity guards live here rather than in the services: `delete` removes
//! a row only if nothing references it at that moment, and genre names are
//! unique per backend (unique index in Postgres, checked under the write lock
//! in memory). Services still look before they act so they can report what
//! blocks an operation, but correctness does not depend on that look.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{BookInstanceStatus, Entity, EntityKind};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Row selection supported by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Books whose author is the given id
    Author(Uuid),
    /// Books filed under the given genre
    Genre(Uuid),
    /// Copies of the given book
    Book(Uuid),
    /// Copies in the given state
    Status(BookInstanceStatus),
    /// Genres with exactly this name
    Name(String),
    /// Any entity whose id is in the set
    Ids(Vec<Uuid>),
}

impl Filter {
    /// Dependent collection and the filter selecting rows that reference `(kind, id)`
    pub fn referencing(kind: EntityKind, id: Uuid) -> Option<(EntityKind, Filter)> {
        let dependent = kind.dependent()?;
        let filter = match kind {
            EntityKind::Author => Filter::Author(id),
            EntityKind::Genre => Filter::Genre(id),
            EntityKind::Book => Filter::Book(id),
            EntityKind::BookInstance => return None,
        };
        Some((dependent, filter))
    }
}

/// Ascending sort keys for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    FamilyName,
    Name,
    Title,
}

/// Result of a conditional delete
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    /// Removed; carries the row as it was
    Deleted(Entity),
    /// Still referenced, nothing removed
    Referenced,
    Missing,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("{kind} with {field} '{value}' already exists")]
    UniqueViolation {
        kind: EntityKind,
        field: &'static str,
        value: String,
    },

    #[error("{0} {1} already exists")]
    DuplicateId(EntityKind, Uuid),

    #[error("replacement for {expected} carries id {found}")]
    IdMismatch { expected: Uuid, found: Uuid },

    #[error("filter {filter:?} does not apply to {kind}")]
    UnsupportedFilter { kind: EntityKind, filter: Filter },

    #[error("sort {sort:?} does not apply to {kind}")]
    UnsupportedSort { kind: EntityKind, sort: SortKey },

    #[error("store returned {found} where {expected} was expected")]
    KindMismatch { expected: EntityKind, found: EntityKind },

    #[error("malformed row: {0}")]
    MalformedRow(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn find_by_id(&self, kind: EntityKind, id: Uuid) -> StoreResult<Option<Entity>>;

    async fn find_all(
        &self,
        kind: EntityKind,
        filter: Option<Filter>,
        sort: Option<SortKey>,
    ) -> StoreResult<Vec<Entity>>;

    async fn count(&self, kind: EntityKind, filter: Option<Filter>) -> StoreResult<i64>;

    async fn insert(&self, entity: Entity) -> StoreResult<Entity>;

    /// Full replacement of the row with id `id`; `entity` must carry that id.
    /// Returns None when no such row exists.
    async fn replace(&self, id: Uuid, entity: Entity) -> StoreResult<Option<Entity>>;

    /// Remove the row unless a dependent row references it
    async fn delete(&self, kind: EntityKind, id: Uuid) -> StoreResult<DeleteOutcome>;

    async fn ping(&self) -> StoreResult<()>;

    async fn close(&self);
}
