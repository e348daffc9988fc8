//! Book queries

use uuid::Uuid;

use super::Repository;
use crate::{
    error::AppResult,
    models::Book,
    store::{Filter, SortKey},
};

impl Repository {
    /// All books, by title
    pub async fn books_list(&self) -> AppResult<Vec<Book>> {
        self.list(None, Some(SortKey::Title)).await
    }

    pub async fn books_get(&self, id: Uuid) -> AppResult<Option<Book>> {
        self.get(id).await
    }

    pub async fn books_by_author(&self, author_id: Uuid) -> AppResult<Vec<Book>> {
        self.list(Some(Filter::Author(author_id)), Some(SortKey::Title)).await
    }

    pub async fn books_by_genre(&self, genre_id: Uuid) -> AppResult<Vec<Book>> {
        self.list(Some(Filter::Genre(genre_id)), Some(SortKey::Title)).await
    }
}
