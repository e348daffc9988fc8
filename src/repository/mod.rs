//! Repository layer: typed access to the entity store

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;

use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{CatalogEntity, Entity, EntityKind},
    store::{DeleteOutcome, EntityStore, Filter, SortKey, StoreError},
};

/// Main repository struct holding the store handle
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn EntityStore>,
}

impl Repository {
    /// Create a new repository over the given store
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    pub async fn get<T: CatalogEntity>(&self, id: Uuid) -> AppResult<Option<T>> {
        match self.store.find_by_id(T::KIND, id).await? {
            Some(entity) => Ok(Some(narrow(entity)?)),
            None => Ok(None),
        }
    }

    pub async fn list<T: CatalogEntity>(
        &self,
        filter: Option<Filter>,
        sort: Option<SortKey>,
    ) -> AppResult<Vec<T>> {
        self.store
            .find_all(T::KIND, filter, sort)
            .await?
            .into_iter()
            .map(narrow)
            .collect()
    }

    /// Untyped lookup, for callers that work across kinds
    pub async fn find_entity(&self, kind: EntityKind, id: Uuid) -> AppResult<Option<Entity>> {
        Ok(self.store.find_by_id(kind, id).await?)
    }

    pub async fn find_entities(&self, kind: EntityKind, filter: Option<Filter>) -> AppResult<Vec<Entity>> {
        Ok(self.store.find_all(kind, filter, None).await?)
    }

    pub async fn count(&self, kind: EntityKind, filter: Option<Filter>) -> AppResult<i64> {
        Ok(self.store.count(kind, filter).await?)
    }

    pub async fn insert<T: CatalogEntity>(&self, value: T) -> AppResult<T> {
        narrow(self.store.insert(value.into()).await?)
    }

    /// Full replacement; the id is carried explicitly so it cannot drift
    pub async fn replace<T: CatalogEntity>(&self, id: Uuid, value: T) -> AppResult<Option<T>> {
        match self.store.replace(id, value.into()).await? {
            Some(entity) => Ok(Some(narrow(entity)?)),
            None => Ok(None),
        }
    }

    pub async fn delete(&self, kind: EntityKind, id: Uuid) -> AppResult<DeleteOutcome> {
        Ok(self.store.delete(kind, id).await?)
    }

    pub async fn ping(&self) -> AppResult<()> {
        Ok(self.store.ping().await?)
    }
}

/// Downcast a type-erased entity, failing when the store returned another kind
pub(crate) fn narrow<T: CatalogEntity>(entity: Entity) -> AppResult<T> {
    let found = entity.kind();
    T::from_entity(entity).ok_or_else(|| {
        StoreError::KindMismatch {
            expected: T::KIND,
            found,
        }
        .into()
    })
}
