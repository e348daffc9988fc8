//! Book instance (copy) pages and mutations

use std::collections::HashMap;

use uuid::Uuid;

use super::{delete_guard::DeleteGuard, views::require};
use crate::{
    error::{AppError, AppResult, FormContext},
    models::{
        book_instance::{
            BookInstanceDeletePreview, BookInstanceDetail, BookInstanceForm, BookInstancePayload,
            BookInstanceUpdateForm,
        },
        BookInstance, EntityKind,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BookInstancesService {
    repository: Repository,
    guard: DeleteGuard,
}

impl BookInstancesService {
    pub fn new(repository: Repository, guard: DeleteGuard) -> Self {
        Self { repository, guard }
    }

    /// Every copy with its book populated
    pub async fn list(&self) -> AppResult<Vec<BookInstanceDetail>> {
        let (instances, books) = tokio::try_join!(
            self.repository.book_instances_list(),
            self.repository.books_list(),
        )?;
        let books: HashMap<_, _> = books.into_iter().map(|b| (b.id, b)).collect();

        Ok(instances
            .into_iter()
            .map(|instance| BookInstanceDetail {
                book: books.get(&instance.book).cloned(),
                instance,
            })
            .collect())
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<BookInstanceDetail> {
        let instance = require(
            self.repository.book_instances_get(id).await?,
            EntityKind::BookInstance,
            id,
        )?;
        let book = self.repository.books_get(instance.book).await?;
        Ok(BookInstanceDetail { instance, book })
    }

    pub async fn delete_preview(&self, id: Uuid) -> AppResult<BookInstanceDeletePreview> {
        let (instance, dependents) = self.guard.preview::<BookInstance>(id).await?;
        Ok(BookInstanceDeletePreview {
            instance,
            blocked: !dependents.is_empty(),
        })
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<BookInstance> {
        self.guard.delete_as(id).await
    }

    pub async fn create_form(&self) -> AppResult<BookInstanceForm> {
        self.form().await
    }

    pub async fn update_form(&self, id: Uuid) -> AppResult<BookInstanceUpdateForm> {
        let (instance, form) = tokio::try_join!(self.repository.book_instances_get(id), self.form())?;
        Ok(BookInstanceUpdateForm {
            instance: require(instance, EntityKind::BookInstance, id)?,
            books: form.books,
        })
    }

    pub async fn create(&self, payload: BookInstancePayload) -> AppResult<BookInstance> {
        let draft = match payload.validated() {
            Ok(draft) => draft,
            Err(errors) => return Err(self.rejected(errors).await),
        };
        let instance = self.repository.insert(draft.into_instance(Uuid::new_v4())).await?;
        tracing::info!("Created book instance {} of book {}", instance.id, instance.book);
        Ok(instance)
    }

    pub async fn update(&self, id: Uuid, payload: BookInstancePayload) -> AppResult<BookInstance> {
        let draft = match payload.validated() {
            Ok(draft) => draft,
            Err(errors) => return Err(self.rejected(errors).await),
        };
        let updated = self.repository.replace(id, draft.into_instance(id)).await?;
        let instance = require(updated, EntityKind::BookInstance, id)?;
        tracing::info!("Updated book instance {}", id);
        Ok(instance)
    }

    async fn form(&self) -> AppResult<BookInstanceForm> {
        let books = self.repository.books_list().await?;
        Ok(BookInstanceForm {
            books: books.into_iter().map(Into::into).collect(),
        })
    }

    async fn rejected(&self, errors: Vec<crate::error::FieldError>) -> AppError {
        match self.form().await {
            Ok(form) => AppError::validation_with_form(errors, FormContext::BookInstance(form)),
            Err(err) => err,
        }
    }
}
