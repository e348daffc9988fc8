//! Reference index: who still points at an entity

use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{CatalogEntity, Entity, EntityKind},
    repository::Repository,
    store::Filter,
};

/// Entities referencing one target, all of a single kind
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dependents {
    pub kind: Option<EntityKind>,
    pub entities: Vec<Entity>,
}

impl Dependents {
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// e.g. "2 books still reference this genre"
    pub fn summary(&self, target: EntityKind) -> String {
        let n = self.len();
        let label = self.kind.map(|k| k.label(n)).unwrap_or("entities");
        let verb = if n == 1 { "references" } else { "reference" };
        format!("{} {} still {} this {}", n, label, verb, target.label(1))
    }

    /// Keep the dependents of type `T`
    pub fn typed<T: CatalogEntity>(self) -> Vec<T> {
        self.entities.into_iter().filter_map(T::from_entity).collect()
    }
}

#[derive(Clone)]
pub struct ReferenceIndex {
    repository: Repository,
}

impl ReferenceIndex {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// One filtered scan of the dependent collection
    pub async fn dependents_of(&self, kind: EntityKind, id: Uuid) -> AppResult<Dependents> {
        let Some((dependent, filter)) = Filter::referencing(kind, id) else {
            return Ok(Dependents::default());
        };
        let entities = self.repository.find_entities(dependent, Some(filter)).await?;
        Ok(Dependents {
            kind: Some(dependent),
            entities,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{Book, BookInstance, BookInstanceStatus},
        store::{EntityStore, MemoryStore},
    };
    use std::sync::Arc;

    fn book(author: Uuid, genre: Vec<Uuid>) -> Book {
        Book {
            id: Uuid::new_v4(),
            title: "Persuasion".into(),
            summary: String::new(),
            isbn: String::new(),
            author,
            genre,
        }
    }

    async fn index_with(entities: Vec<Entity>) -> ReferenceIndex {
        let store = Arc::new(MemoryStore::new());
        for entity in entities {
            store.insert(entity).await.unwrap();
        }
        ReferenceIndex::new(Repository::new(store))
    }

    #[tokio::test]
    async fn test_books_reference_author_and_genre() {
        let (author, g1, g2) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let index = index_with(vec![
            book(author, vec![g1]).into(),
            book(author, vec![g1, g2]).into(),
            book(Uuid::new_v4(), vec![]).into(),
        ])
        .await;

        let by_author = index.dependents_of(EntityKind::Author, author).await.unwrap();
        assert_eq!(by_author.kind, Some(EntityKind::Book));
        assert_eq!(by_author.len(), 2);

        assert_eq!(index.dependents_of(EntityKind::Genre, g1).await.unwrap().len(), 2);
        assert_eq!(index.dependents_of(EntityKind::Genre, g2).await.unwrap().len(), 1);
        assert!(index.dependents_of(EntityKind::Genre, Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_copies_reference_book() {
        let b = book(Uuid::new_v4(), vec![]);
        let copy = BookInstance {
            id: Uuid::new_v4(),
            book: b.id,
            imprint: "x".into(),
            status: BookInstanceStatus::Reserved,
            due_back: None,
        };
        let index = index_with(vec![b.clone().into(), copy.clone().into()]).await;

        let dependents = index.dependents_of(EntityKind::Book, b.id).await.unwrap();
        assert_eq!(dependents.typed::<BookInstance>(), vec![copy.clone()]);

        let none = index.dependents_of(EntityKind::BookInstance, copy.id).await.unwrap();
        assert_eq!(none, Dependents::default());
    }

    #[test]
    fn test_summary() {
        let dependents = Dependents {
            kind: Some(EntityKind::Book),
            entities: vec![book(Uuid::nil(), vec![]).into(); 3],
        };
        assert_eq!(dependents.summary(EntityKind::Genre), "3 books still reference this genre");

        let one = Dependents {
            kind: Some(EntityKind::BookInstance),
            entities: vec![book(Uuid::nil(), vec![]).into()],
        };
        assert_eq!(one.summary(EntityKind::Book), "1 book instance still references this book");
    }
}
