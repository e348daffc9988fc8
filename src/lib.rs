//! Catalog Server
//!
//! REST JSON API for a lending library catalog: authors, genres, books and
//! the physical copies of those books. Deletes are refused while other
//! entities still reference the target.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod store;
pub mod validation;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Wire the services over an opened store
    pub fn new(config: AppConfig, store: Arc<dyn store::EntityStore>) -> Self {
        let repository = repository::Repository::new(store);
        Self {
            config: Arc::new(config),
            services: Arc::new(services::Services::new(repository)),
        }
    }
}
