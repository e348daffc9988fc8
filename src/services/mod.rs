//! Business logic services

pub mod aggregate;
pub mod authors;
pub mod book_instances;
pub mod books;
pub mod dashboard;
pub mod delete_guard;
pub mod genres;
pub mod references;
pub mod views;

#[cfg(test)]
pub(crate) mod testing;

use crate::{error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub authors: authors::AuthorsService,
    pub genres: genres::GenresService,
    pub books: books::BooksService,
    pub book_instances: book_instances::BookInstancesService,
    pub dashboard: dashboard::DashboardService,
    repository: Repository,
}

impl Services {
    /// Create all services over the given repository
    pub fn new(repository: Repository) -> Self {
        let references = references::ReferenceIndex::new(repository.clone());
        let guard = delete_guard::DeleteGuard::new(repository.clone(), references);

        Self {
            authors: authors::AuthorsService::new(repository.clone(), guard.clone()),
            genres: genres::GenresService::new(repository.clone(), guard.clone()),
            books: books::BooksService::new(repository.clone(), guard.clone()),
            book_instances: book_instances::BookInstancesService::new(repository.clone(), guard),
            dashboard: dashboard::DashboardService::new(repository.clone()),
            repository,
        }
    }

    /// Round-trip to the store, for readiness probes
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
