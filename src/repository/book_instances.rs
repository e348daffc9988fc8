//! Book instance queries

use uuid::Uuid;

use super::Repository;
use crate::{
    error::AppResult,
    models::{BookInstance, BookInstanceStatus, EntityKind},
    store::Filter,
};

impl Repository {
    pub async fn book_instances_list(&self) -> AppResult<Vec<BookInstance>> {
        self.list(None, None).await
    }

    pub async fn book_instances_get(&self, id: Uuid) -> AppResult<Option<BookInstance>> {
        self.get(id).await
    }

    pub async fn book_instances_of_book(&self, book_id: Uuid) -> AppResult<Vec<BookInstance>> {
        self.list(Some(Filter::Book(book_id)), None).await
    }

    pub async fn book_instances_count_with_status(&self, status: BookInstanceStatus) -> AppResult<i64> {
        self.count(EntityKind::BookInstance, Some(Filter::Status(status))).await
    }
}
