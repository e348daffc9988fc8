//! In-process store for development and tests
//!
//! Tables keep insertion order. Every mutation runs under one write lock,
//! so the reference check in `delete` and the genre name check in
//! `insert`/`replace` are atomic with the write they protect.

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{DeleteOutcome, EntityStore, Filter, SortKey, StoreError, StoreResult};
use crate::models::{Entity, EntityKind};

#[derive(Default)]
struct Tables {
    authors: IndexMap<Uuid, Entity>,
    genres: IndexMap<Uuid, Entity>,
    books: IndexMap<Uuid, Entity>,
    book_instances: IndexMap<Uuid, Entity>,
}

impl Tables {
    fn table(&self, kind: EntityKind) -> &IndexMap<Uuid, Entity> {
        match kind {
            EntityKind::Author => &self.authors,
            EntityKind::Genre => &self.genres,
            EntityKind::Book => &self.books,
            EntityKind::BookInstance => &self.book_instances,
        }
    }

    fn table_mut(&mut self, kind: EntityKind) -> &mut IndexMap<Uuid, Entity> {
        match kind {
            EntityKind::Author => &mut self.authors,
            EntityKind::Genre => &mut self.genres,
            EntityKind::Book => &mut self.books,
            EntityKind::BookInstance => &mut self.book_instances,
        }
    }

    fn select(&self, kind: EntityKind, filter: Option<&Filter>) -> StoreResult<Vec<&Entity>> {
        let mut rows = Vec::new();
        for entity in self.table(kind).values() {
            let keep = match filter {
                None => true,
                Some(filter) => matches(entity, filter)
                    .ok_or_else(|| StoreError::UnsupportedFilter { kind, filter: filter.clone() })?,
            };
            if keep {
                rows.push(entity);
            }
        }
        Ok(rows)
    }

    /// Another genre already holding `entity`'s name
    fn name_taken(&self, entity: &Entity) -> Option<StoreError> {
        let Entity::Genre(genre) = entity else {
            return None;
        };
        self.genres
            .values()
            .any(|other| matches!(other, Entity::Genre(g) if g.id != genre.id && g.name == genre.name))
            .then(|| StoreError::UniqueViolation {
                kind: EntityKind::Genre,
                field: "name",
                value: genre.name.clone(),
            })
    }
}

/// None when the filter does not apply to this entity's kind
fn matches(entity: &Entity, filter: &Filter) -> Option<bool> {
    match (entity, filter) {
        (_, Filter::Ids(ids)) => Some(ids.contains(&entity.id())),
        (Entity::Book(b), Filter::Author(id)) => Some(b.author == *id),
        (Entity::Book(b), Filter::Genre(id)) => Some(b.genre.contains(id)),
        (Entity::BookInstance(i), Filter::Book(id)) => Some(i.book == *id),
        (Entity::BookInstance(i), Filter::Status(status)) => Some(i.status == *status),
        (Entity::Genre(g), Filter::Name(name)) => Some(g.name == *name),
        _ => None,
    }
}

fn sort_value(entity: &Entity, sort: SortKey) -> Option<&str> {
    match (entity, sort) {
        (Entity::Author(a), SortKey::FamilyName) => Some(&a.family_name),
        (Entity::Genre(g), SortKey::Name) => Some(&g.name),
        (Entity::Book(b), SortKey::Title) => Some(&b.title),
        _ => None,
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn find_by_id(&self, kind: EntityKind, id: Uuid) -> StoreResult<Option<Entity>> {
        let tables = self.tables.read().await;
        Ok(tables.table(kind).get(&id).cloned())
    }

    async fn find_all(
        &self,
        kind: EntityKind,
        filter: Option<Filter>,
        sort: Option<SortKey>,
    ) -> StoreResult<Vec<Entity>> {
        let tables = self.tables.read().await;
        let mut rows = tables.select(kind, filter.as_ref())?;

        if let Some(sort) = sort {
            let mut keyed = Vec::with_capacity(rows.len());
            for entity in rows {
                let key = sort_value(entity, sort).ok_or(StoreError::UnsupportedSort { kind, sort })?;
                keyed.push((key, entity));
            }
            // Stable: equal keys keep insertion order
            keyed.sort_by(|a, b| a.0.cmp(b.0));
            rows = keyed.into_iter().map(|(_, entity)| entity).collect();
        }

        Ok(rows.into_iter().cloned().collect())
    }

    async fn count(&self, kind: EntityKind, filter: Option<Filter>) -> StoreResult<i64> {
        let tables = self.tables.read().await;
        Ok(tables.select(kind, filter.as_ref())?.len() as i64)
    }

    async fn insert(&self, entity: Entity) -> StoreResult<Entity> {
        let mut tables = self.tables.write().await;
        let (kind, id) = (entity.kind(), entity.id());
        if tables.table(kind).contains_key(&id) {
            return Err(StoreError::DuplicateId(kind, id));
        }
        if let Some(err) = tables.name_taken(&entity) {
            return Err(err);
        }
        tables.table_mut(kind).insert(id, entity.clone());
        Ok(entity)
    }

    async fn replace(&self, id: Uuid, entity: Entity) -> StoreResult<Option<Entity>> {
        if entity.id() != id {
            return Err(StoreError::IdMismatch {
                expected: id,
                found: entity.id(),
            });
        }
        let mut tables = self.tables.write().await;
        if !tables.table(entity.kind()).contains_key(&id) {
            return Ok(None);
        }
        if let Some(err) = tables.name_taken(&entity) {
            return Err(err);
        }
        if let Some(slot) = tables.table_mut(entity.kind()).get_mut(&id) {
            *slot = entity.clone();
        }
        Ok(Some(entity))
    }

    async fn delete(&self, kind: EntityKind, id: Uuid) -> StoreResult<DeleteOutcome> {
        let mut tables = self.tables.write().await;
        if !tables.table(kind).contains_key(&id) {
            return Ok(DeleteOutcome::Missing);
        }
        if let Some((dependent, filter)) = Filter::referencing(kind, id) {
            if !tables.select(dependent, Some(&filter))?.is_empty() {
                return Ok(DeleteOutcome::Referenced);
            }
        }
        Ok(match tables.table_mut(kind).shift_remove(&id) {
            Some(prior) => DeleteOutcome::Deleted(prior),
            None => DeleteOutcome::Missing,
        })
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn close(&self) {
        tracing::debug!("Memory store closed");
    }
}
