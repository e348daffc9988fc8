//! Author queries

use uuid::Uuid;

use super::Repository;
use crate::{error::AppResult, models::Author, store::SortKey};

impl Repository {
    /// All authors, by family name
    pub async fn authors_list(&self) -> AppResult<Vec<Author>> {
        self.list(None, Some(SortKey::FamilyName)).await
    }

    pub async fn authors_get(&self, id: Uuid) -> AppResult<Option<Author>> {
        self.get(id).await
    }
}
