//! Genre queries

use uuid::Uuid;

use super::Repository;
use crate::{
    error::AppResult,
    models::Genre,
    store::{Filter, SortKey},
};

impl Repository {
    /// All genres, by name
    pub async fn genres_list(&self) -> AppResult<Vec<Genre>> {
        self.list(None, Some(SortKey::Name)).await
    }

    pub async fn genres_get(&self, id: Uuid) -> AppResult<Option<Genre>> {
        self.get(id).await
    }

    pub async fn genres_find_by_name(&self, name: &str) -> AppResult<Option<Genre>> {
        let found: Vec<Genre> = self.list(Some(Filter::Name(name.to_string())), None).await?;
        Ok(found.into_iter().next())
    }

    /// Genres whose id is in `ids`, by name
    pub async fn genres_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Genre>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.list(Some(Filter::Ids(ids.to_vec())), Some(SortKey::Name)).await
    }
}
