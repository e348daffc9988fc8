//! Genre pages and mutations
//!
//! Genre names are unique. Create and rename look the name up first and
//! answer with the existing genre; the unique index in the store catches
//! whatever slips between lookup and write.

use uuid::Uuid;

use super::{delete_guard::DeleteGuard, views::require};
use crate::{
    error::{AppError, AppResult},
    models::{
        genre::{GenreDeletePreview, GenreDetail, GenrePayload, GenreUpdateForm},
        Book, EntityKind, Genre,
    },
    repository::Repository,
    store::StoreError,
};

#[derive(Clone)]
pub struct GenresService {
    repository: Repository,
    guard: DeleteGuard,
}

impl GenresService {
    pub fn new(repository: Repository, guard: DeleteGuard) -> Self {
        Self { repository, guard }
    }

    pub async fn list(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres_list().await
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<GenreDetail> {
        let (genre, books) = tokio::try_join!(
            self.repository.genres_get(id),
            self.repository.books_by_genre(id),
        )?;
        Ok(GenreDetail {
            genre: require(genre, EntityKind::Genre, id)?,
            books,
        })
    }

    pub async fn delete_preview(&self, id: Uuid) -> AppResult<GenreDeletePreview> {
        let (genre, dependents) = self.guard.preview::<Genre>(id).await?;
        let books = dependents.typed::<Book>();
        Ok(GenreDeletePreview {
            genre,
            blocked: !books.is_empty(),
            books,
        })
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<Genre> {
        self.guard.delete_as(id).await
    }

    pub async fn update_form(&self, id: Uuid) -> AppResult<GenreUpdateForm> {
        let genre = require(self.repository.genres_get(id).await?, EntityKind::Genre, id)?;
        Ok(GenreUpdateForm { genre })
    }

    pub async fn create(&self, payload: GenrePayload) -> AppResult<Genre> {
        let draft = payload.validated().map_err(AppError::validation)?;
        if let Some(existing) = self.repository.genres_find_by_name(&draft.name).await? {
            return Err(AppError::DuplicateGenre(Box::new(existing)));
        }

        let name = draft.name.clone();
        let genre = match self.repository.insert(draft.into_genre(Uuid::new_v4())).await {
            Ok(genre) => genre,
            Err(err) => return Err(self.duplicate_or(err, &name, None).await),
        };
        tracing::info!("Created genre {} ({})", genre.id, genre.name);
        Ok(genre)
    }

    /// Renaming onto another genre's name is a duplicate; keeping the
    /// current name is not
    pub async fn update(&self, id: Uuid, payload: GenrePayload) -> AppResult<Genre> {
        let draft = payload.validated().map_err(AppError::validation)?;
        if let Some(existing) = self.repository.genres_find_by_name(&draft.name).await? {
            if existing.id != id {
                return Err(AppError::DuplicateGenre(Box::new(existing)));
            }
        }

        let name = draft.name.clone();
        let updated = match self.repository.replace(id, draft.into_genre(id)).await {
            Ok(updated) => updated,
            Err(err) => return Err(self.duplicate_or(err, &name, Some(id)).await),
        };
        let genre = require(updated, EntityKind::Genre, id)?;
        tracing::info!("Updated genre {}", id);
        Ok(genre)
    }

    /// A unique violation means the name was taken concurrently; report the
    /// genre that won. Anything else passes through.
    async fn duplicate_or(&self, err: AppError, name: &str, own: Option<Uuid>) -> AppError {
        if !matches!(err, AppError::Store(StoreError::UniqueViolation { .. })) {
            return err;
        }
        match self.repository.genres_find_by_name(name).await {
            Ok(Some(existing)) if Some(existing.id) != own => {
                tracing::warn!("Genre '{}' was created concurrently", name);
                AppError::DuplicateGenre(Box::new(existing))
            }
            Ok(_) => err,
            Err(lookup) => lookup,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::Entity,
        services::{references::ReferenceIndex, testing},
        store::{DeleteOutcome, MockEntityStore},
    };
    use std::sync::Arc;

    fn service(repository: Repository) -> GenresService {
        let guard = DeleteGuard::new(repository.clone(), ReferenceIndex::new(repository.clone()));
        GenresService::new(repository, guard)
    }

    fn named(name: &str) -> GenrePayload {
        GenrePayload { name: name.into() }
    }

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let genres = service(testing::memory_repository());
        for name in ["Romance", "Action", "Biography"] {
            genres.create(named(name)).await.unwrap();
        }
        let names: Vec<_> = genres.list().await.unwrap().into_iter().map(|g| g.name).collect();
        assert_eq!(names, vec!["Action", "Biography", "Romance"]);
    }

    #[tokio::test]
    async fn test_duplicate_name_returns_existing() {
        let genres = service(testing::memory_repository());
        let first = genres.create(named("Poetry")).await.unwrap();

        match genres.create(named("  Poetry ")).await {
            Err(AppError::DuplicateGenre(existing)) => assert_eq!(*existing, first),
            other => panic!("expected duplicate, got {:?}", other),
        }
        assert_eq!(genres.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rename_rules() {
        let genres = service(testing::memory_repository());
        let poetry = genres.create(named("Poetry")).await.unwrap();
        let drama = genres.create(named("Drama")).await.unwrap();

        // Same name on itself is allowed
        assert_eq!(genres.update(poetry.id, named("Poetry")).await.unwrap(), poetry);
        assert!(matches!(
            genres.update(drama.id, named("Poetry")).await,
            Err(AppError::DuplicateGenre(_))
        ));
        let renamed = genres.update(drama.id, named("Theatre")).await.unwrap();
        assert_eq!(renamed.id, drama.id);
        assert_eq!(genres.detail(drama.id).await.unwrap().genre.name, "Theatre");
    }

    #[tokio::test]
    async fn test_concurrent_insert_reports_winner() {
        let winner = Genre {
            id: Uuid::new_v4(),
            name: "Poetry".into(),
        };
        let mut store = MockEntityStore::new();
        let mut lookups = 0;
        let found = winner.clone();
        store.expect_find_all().returning(move |_, _, _| {
            lookups += 1;
            Ok(if lookups == 1 { vec![] } else { vec![found.clone().into()] })
        });
        store.expect_insert().times(1).returning(|_| {
            Err(StoreError::UniqueViolation {
                kind: EntityKind::Genre,
                field: "name",
                value: "Poetry".into(),
            })
        });

        let genres = service(Repository::new(Arc::new(store)));
        match genres.create(named("Poetry")).await {
            Err(AppError::DuplicateGenre(existing)) => assert_eq!(*existing, winner),
            other => panic!("expected duplicate, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_unreferenced_genre() {
        let genres = service(testing::memory_repository());
        let genre = genres.create(named("Satire")).await.unwrap();

        let preview = genres.delete_preview(genre.id).await.unwrap();
        assert!(!preview.blocked);
        assert_eq!(genres.delete(genre.id).await.unwrap(), genre);
        assert!(matches!(genres.detail(genre.id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_store_failure_on_delete() {
        let genre = Genre {
            id: Uuid::new_v4(),
            name: "Satire".into(),
        };
        let entity = Entity::Genre(genre.clone());
        let mut store = MockEntityStore::new();
        store.expect_find_by_id().returning(move |_, _| Ok(Some(entity.clone())));
        store.expect_find_all().returning(|_, _, _| Ok(vec![]));
        store
            .expect_delete()
            .returning(|_, _| Err(StoreError::Unavailable("pool closed".into())));

        let genres = service(Repository::new(Arc::new(store)));
        assert!(matches!(genres.delete(genre.id).await, Err(AppError::Store(_))));

        let mut store = MockEntityStore::new();
        store.expect_find_by_id().returning(|_, _| Ok(None));
        store.expect_find_all().returning(|_, _, _| Ok(vec![]));
        store.expect_delete().never().returning(|_, _| Ok(DeleteOutcome::Missing));
        let genres = service(Repository::new(Arc::new(store)));
        assert!(matches!(genres.delete(genre.id).await, Err(AppError::NotFound(_))));
    }
}
