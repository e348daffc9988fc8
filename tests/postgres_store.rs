//! PostgreSQL store tests against a live database named by DATABASE_URL.
//! Run with: DATABASE_URL=postgres://... cargo test --test postgres_store -- --ignored

use chrono::NaiveDate;
use uuid::Uuid;

use catalog_server::{
    config::DatabaseConfig,
    models::{Author, Book, BookInstance, BookInstanceStatus, Entity, EntityKind, Genre},
    store::{DeleteOutcome, EntityStore, PgStore, StoreError},
};

async fn store() -> Option<PgStore> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping");
        return None;
    };
    let config = DatabaseConfig {
        url,
        max_connections: 2,
        min_connections: 1,
    };
    Some(PgStore::connect(&config).await.unwrap())
}

fn author() -> Author {
    Author {
        id: Uuid::new_v4(),
        first_name: "Jane".into(),
        family_name: "Austen".into(),
        date_of_birth: NaiveDate::from_ymd_opt(1775, 12, 16),
        date_of_death: None,
    }
}

fn genre() -> Genre {
    Genre {
        id: Uuid::new_v4(),
        name: format!("Romance {}", Uuid::new_v4()),
    }
}

fn book(author: Uuid, genre: Vec<Uuid>) -> Book {
    Book {
        id: Uuid::new_v4(),
        title: "Emma".into(),
        summary: "Matchmaking.".into(),
        isbn: "9780141439587".into(),
        author,
        genre,
    }
}

fn copy_of(book: Uuid) -> BookInstance {
    BookInstance {
        id: Uuid::new_v4(),
        book,
        imprint: "Penguin".into(),
        status: BookInstanceStatus::Loaned,
        due_back: NaiveDate::from_ymd_opt(2024, 6, 1),
    }
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_referenced_rows_are_kept() {
    let Some(store) = store().await else { return };
    let a = author();
    let g = genre();
    let b = book(a.id, vec![g.id]);
    let c = copy_of(b.id);
    let rows: [Entity; 4] = [a.clone().into(), g.clone().into(), b.clone().into(), c.clone().into()];
    for entity in rows {
        store.insert(entity).await.unwrap();
    }

    assert_eq!(store.delete(EntityKind::Author, a.id).await.unwrap(), DeleteOutcome::Referenced);
    assert_eq!(store.delete(EntityKind::Genre, g.id).await.unwrap(), DeleteOutcome::Referenced);
    assert_eq!(store.delete(EntityKind::Book, b.id).await.unwrap(), DeleteOutcome::Referenced);
    assert_eq!(
        store.find_by_id(EntityKind::Author, a.id).await.unwrap(),
        Some(Entity::Author(a.clone()))
    );
    assert!(store.find_by_id(EntityKind::Genre, g.id).await.unwrap().is_some());

    // Unwinding in dependency order releases each row in turn
    assert_eq!(
        store.delete(EntityKind::BookInstance, c.id).await.unwrap(),
        DeleteOutcome::Deleted(Entity::BookInstance(c))
    );
    assert_eq!(
        store.delete(EntityKind::Book, b.id).await.unwrap(),
        DeleteOutcome::Deleted(Entity::Book(b))
    );
    assert!(matches!(store.delete(EntityKind::Author, a.id).await.unwrap(), DeleteOutcome::Deleted(_)));
    assert!(matches!(store.delete(EntityKind::Genre, g.id).await.unwrap(), DeleteOutcome::Deleted(_)));
    store.close().await;
}

#[tokio::test]
#[ignore]
async fn test_unreferenced_delete_returns_prior_row() {
    let Some(store) = store().await else { return };
    let a = author();
    store.insert(a.clone().into()).await.unwrap();

    let outcome = store.delete(EntityKind::Author, a.id).await.unwrap();
    assert_eq!(outcome, DeleteOutcome::Deleted(Entity::Author(a.clone())));
    assert!(store.find_by_id(EntityKind::Author, a.id).await.unwrap().is_none());
    store.close().await;
}

#[tokio::test]
#[ignore]
async fn test_delete_of_absent_row_is_missing() {
    let Some(store) = store().await else { return };
    for kind in [
        EntityKind::Author,
        EntityKind::Genre,
        EntityKind::Book,
        EntityKind::BookInstance,
    ] {
        assert_eq!(store.delete(kind, Uuid::new_v4()).await.unwrap(), DeleteOutcome::Missing, "{}", kind);
    }
    store.close().await;
}

#[tokio::test]
#[ignore]
async fn test_duplicate_genre_name_is_unique_violation() {
    let Some(store) = store().await else { return };
    let g = genre();
    store.insert(g.clone().into()).await.unwrap();

    let twin = Genre {
        id: Uuid::new_v4(),
        name: g.name.clone(),
    };
    match store.insert(twin.into()).await {
        Err(StoreError::UniqueViolation { kind, field, value }) => {
            assert_eq!(kind, EntityKind::Genre);
            assert_eq!(field, "name");
            assert_eq!(value, g.name);
        }
        other => panic!("expected unique violation, got {:?}", other),
    }

    // Reusing a primary key is a different failure
    let a = author();
    store.insert(a.clone().into()).await.unwrap();
    match store.insert(a.clone().into()).await {
        Err(StoreError::DuplicateId(EntityKind::Author, id)) => assert_eq!(id, a.id),
        other => panic!("expected duplicate id, got {:?}", other),
    }

    store.delete(EntityKind::Genre, g.id).await.unwrap();
    store.delete(EntityKind::Author, a.id).await.unwrap();
    store.close().await;
}

#[tokio::test]
#[ignore]
async fn test_replace_absent_row_is_none() {
    let Some(store) = store().await else { return };
    let ghost = author();
    assert_eq!(store.replace(ghost.id, ghost.clone().into()).await.unwrap(), None);
    assert!(store.find_by_id(EntityKind::Author, ghost.id).await.unwrap().is_none());

    let a = author();
    store.insert(a.clone().into()).await.unwrap();
    let renamed = Author {
        family_name: "Austen-Leigh".into(),
        ..a.clone()
    };
    assert_eq!(
        store.replace(a.id, renamed.clone().into()).await.unwrap(),
        Some(Entity::Author(renamed))
    );

    store.delete(EntityKind::Author, a.id).await.unwrap();
    store.close().await;
}
