//! Author pages and mutations

use uuid::Uuid;

use super::{delete_guard::DeleteGuard, views::require};
use crate::{
    error::{AppError, AppResult},
    models::{
        author::{AuthorDeletePreview, AuthorDetail, AuthorPayload, AuthorUpdateForm},
        Author, Book, EntityKind,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
    guard: DeleteGuard,
}

impl AuthorsService {
    pub fn new(repository: Repository, guard: DeleteGuard) -> Self {
        Self { repository, guard }
    }

    pub async fn list(&self) -> AppResult<Vec<Author>> {
        self.repository.authors_list().await
    }

    /// The author with the books they wrote
    pub async fn detail(&self, id: Uuid) -> AppResult<AuthorDetail> {
        let (author, books) = tokio::try_join!(
            self.repository.authors_get(id),
            self.repository.books_by_author(id),
        )?;
        let author = require(author, EntityKind::Author, id)?;

        Ok(AuthorDetail {
            name: author.name(),
            lifespan: author.lifespan(),
            author,
            books: books.into_iter().map(Into::into).collect(),
        })
    }

    pub async fn delete_preview(&self, id: Uuid) -> AppResult<AuthorDeletePreview> {
        let (author, dependents) = self.guard.preview::<Author>(id).await?;
        let books = dependents.typed::<Book>();
        Ok(AuthorDeletePreview {
            author,
            blocked: !books.is_empty(),
            books,
        })
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<Author> {
        self.guard.delete_as(id).await
    }

    pub async fn update_form(&self, id: Uuid) -> AppResult<AuthorUpdateForm> {
        let author = require(self.repository.authors_get(id).await?, EntityKind::Author, id)?;
        Ok(AuthorUpdateForm { author })
    }

    pub async fn create(&self, payload: AuthorPayload) -> AppResult<Author> {
        let draft = payload.validated().map_err(AppError::validation)?;
        let author = self.repository.insert(draft.into_author(Uuid::new_v4())).await?;
        tracing::info!("Created author {} ({})", author.id, author.name());
        Ok(author)
    }

    pub async fn update(&self, id: Uuid, payload: AuthorPayload) -> AppResult<Author> {
        let draft = payload.validated().map_err(AppError::validation)?;
        let updated = self.repository.replace(id, draft.into_author(id)).await?;
        let author = require(updated, EntityKind::Author, id)?;
        tracing::info!("Updated author {}", id);
        Ok(author)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{references::ReferenceIndex, testing};

    fn service(repository: Repository) -> AuthorsService {
        let guard = DeleteGuard::new(repository.clone(), ReferenceIndex::new(repository.clone()));
        AuthorsService::new(repository, guard)
    }

    fn austen() -> AuthorPayload {
        AuthorPayload {
            first_name: "Jane".into(),
            family_name: "Austen".into(),
            date_of_birth: Some("1775-12-16".into()),
            date_of_death: None,
        }
    }

    #[tokio::test]
    async fn test_create_then_detail() {
        let authors = service(testing::memory_repository());
        let created = authors.create(austen()).await.unwrap();

        let detail = authors.detail(created.id).await.unwrap();
        assert_eq!(detail.author, created);
        assert_eq!(detail.name, "Austen, Jane");
        assert_eq!(detail.author.date_of_death, None);
        assert!(detail.books.is_empty());
    }

    #[tokio::test]
    async fn test_books_projection_on_detail() {
        let repository = testing::memory_repository();
        let authors = service(repository.clone());
        let author = authors.create(austen()).await.unwrap();
        let book = testing::book("Emma", author.id, vec![]);
        repository.insert(book.clone()).await.unwrap();

        let detail = authors.detail(author.id).await.unwrap();
        assert_eq!(detail.books.len(), 1);
        assert_eq!(detail.books[0].title, "Emma");
        assert_eq!(detail.books[0].id, book.id);
    }

    #[tokio::test]
    async fn test_invalid_payload_is_rejected() {
        let authors = service(testing::memory_repository());
        let err = authors
            .create(AuthorPayload {
                first_name: "  ".into(),
                ..austen()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationFailed(ref r) if r.errors[0].field == "first_name"));
        assert!(authors.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_keeps_identifier() {
        let authors = service(testing::memory_repository());
        let created = authors.create(austen()).await.unwrap();

        let updated = authors
            .update(
                created.id,
                AuthorPayload {
                    date_of_death: Some("1817-07-18".into()),
                    ..austen()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(authors.detail(created.id).await.unwrap().lifespan, "1775-12-16 - 1817-07-18");
    }

    #[tokio::test]
    async fn test_missing_author_is_not_found() {
        let authors = service(testing::memory_repository());
        let id = Uuid::new_v4();
        assert!(matches!(authors.detail(id).await, Err(AppError::NotFound(_))));
        assert!(matches!(authors.delete_preview(id).await, Err(AppError::NotFound(_))));
        assert!(matches!(authors.delete(id).await, Err(AppError::NotFound(_))));
        assert!(matches!(authors.update_form(id).await, Err(AppError::NotFound(_))));
        assert!(matches!(authors.update(id, austen()).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_preview_lists_books() {
        let repository = testing::memory_repository();
        let authors = service(repository.clone());
        let author = authors.create(austen()).await.unwrap();
        repository.insert(testing::book("Emma", author.id, vec![])).await.unwrap();

        let preview = authors.delete_preview(author.id).await.unwrap();
        assert!(preview.blocked);
        assert_eq!(preview.books.len(), 1);
        assert!(matches!(authors.delete(author.id).await, Err(AppError::ReferentialConflict(_))));
    }
}
