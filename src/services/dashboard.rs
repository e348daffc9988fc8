//! Catalog home page counts

use crate::{
    error::{AppError, AppResult},
    models::{BookInstanceStatus, CatalogCounts, EntityKind},
    repository::Repository,
};

use super::aggregate::Aggregate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CountKey {
    Books,
    BookInstances,
    AvailableBookInstances,
    Authors,
    Genres,
}

impl CountKey {
    const ALL: [CountKey; 5] = [
        CountKey::Books,
        CountKey::BookInstances,
        CountKey::AvailableBookInstances,
        CountKey::Authors,
        CountKey::Genres,
    ];

    async fn count(self, repository: Repository) -> AppResult<i64> {
        match self {
            CountKey::Books => repository.count(EntityKind::Book, None).await,
            CountKey::BookInstances => repository.count(EntityKind::BookInstance, None).await,
            CountKey::AvailableBookInstances => {
                repository
                    .book_instances_count_with_status(BookInstanceStatus::Available)
                    .await
            }
            CountKey::Authors => repository.count(EntityKind::Author, None).await,
            CountKey::Genres => repository.count(EntityKind::Genre, None).await,
        }
    }
}

#[derive(Clone)]
pub struct DashboardService {
    repository: Repository,
}

impl DashboardService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// The five counts, fetched concurrently. One failed count fails the page.
    pub async fn counts(&self) -> AppResult<CatalogCounts> {
        let mut aggregate = Aggregate::new();
        for key in CountKey::ALL {
            let repository = self.repository.clone();
            aggregate = aggregate.lookup(key, move || key.count(repository));
        }
        let mut counts = aggregate.join().await?;

        let mut take = |key: CountKey| {
            counts
                .remove(&key)
                .ok_or_else(|| AppError::Internal(format!("count {:?} missing", key)))
        };
        Ok(CatalogCounts {
            book_count: take(CountKey::Books)?,
            book_instance_count: take(CountKey::BookInstances)?,
            book_instance_available_count: take(CountKey::AvailableBookInstances)?,
            author_count: take(CountKey::Authors)?,
            genre_count: take(CountKey::Genres)?,
        })
    }
}
