//! Book pages and mutations

use std::collections::HashMap;

use uuid::Uuid;

use super::{
    delete_guard::DeleteGuard,
    views::{mark_selected, require},
};
use crate::{
    error::{AppError, AppResult, FormContext},
    models::{
        book::{BookDeletePreview, BookDetail, BookForm, BookListEntry, BookPayload, BookUpdateForm},
        Book, BookInstance, EntityKind,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
    guard: DeleteGuard,
}

impl BooksService {
    pub fn new(repository: Repository, guard: DeleteGuard) -> Self {
        Self { repository, guard }
    }

    /// Books by title, each with its author
    pub async fn list(&self) -> AppResult<Vec<BookListEntry>> {
        let (books, authors) = tokio::try_join!(
            self.repository.books_list(),
            self.repository.authors_list(),
        )?;
        let authors: HashMap<_, _> = authors.into_iter().map(|a| (a.id, a)).collect();

        Ok(books
            .into_iter()
            .map(|book| BookListEntry {
                author: authors.get(&book.author).cloned(),
                id: book.id,
                title: book.title,
            })
            .collect())
    }

    /// The book, its copies, its author and its genres
    pub async fn detail(&self, id: Uuid) -> AppResult<BookDetail> {
        let (book, instances) = tokio::try_join!(
            self.repository.books_get(id),
            self.repository.book_instances_of_book(id),
        )?;
        let book = require(book, EntityKind::Book, id)?;

        let (author, genres) = tokio::try_join!(
            self.repository.authors_get(book.author),
            self.repository.genres_by_ids(&book.genre),
        )?;
        Ok(BookDetail {
            book,
            author,
            genres,
            instances,
        })
    }

    pub async fn delete_preview(&self, id: Uuid) -> AppResult<BookDeletePreview> {
        let (book, dependents) = self.guard.preview::<Book>(id).await?;
        let instances = dependents.typed::<BookInstance>();
        Ok(BookDeletePreview {
            book,
            blocked: !instances.is_empty(),
            instances,
        })
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<Book> {
        self.guard.delete_as(id).await
    }

    /// All authors and genres, nothing checked
    pub async fn create_form(&self) -> AppResult<BookForm> {
        self.form(&[]).await
    }

    pub async fn update_form(&self, id: Uuid) -> AppResult<BookUpdateForm> {
        let (book, authors, genres) = tokio::try_join!(
            self.repository.books_get(id),
            self.repository.authors_list(),
            self.repository.genres_list(),
        )?;
        let book = require(book, EntityKind::Book, id)?;
        let genres = mark_selected(genres, &book.genre);

        Ok(BookUpdateForm {
            book,
            authors,
            genres,
        })
    }

    pub async fn create(&self, payload: BookPayload) -> AppResult<Book> {
        let draft = match payload.validated() {
            Ok(draft) => draft,
            Err(rejected) => {
                let form = self.form(&rejected.genre).await?;
                return Err(AppError::validation_with_form(rejected.errors, FormContext::Book(form)));
            }
        };
        let book = self.repository.insert(draft.into_book(Uuid::new_v4())).await?;
        tracing::info!("Created book {} ({})", book.id, book.title);
        Ok(book)
    }

    pub async fn update(&self, id: Uuid, payload: BookPayload) -> AppResult<Book> {
        let draft = match payload.validated() {
            Ok(draft) => draft,
            Err(rejected) => {
                let form = self.form(&rejected.genre).await?;
                return Err(AppError::validation_with_form(rejected.errors, FormContext::Book(form)));
            }
        };
        let updated = self.repository.replace(id, draft.into_book(id)).await?;
        let book = require(updated, EntityKind::Book, id)?;
        tracing::info!("Updated book {}", id);
        Ok(book)
    }

    async fn form(&self, selected: &[Uuid]) -> AppResult<BookForm> {
        let (authors, genres) = tokio::try_join!(
            self.repository.authors_list(),
            self.repository.genres_list(),
        )?;
        Ok(BookForm {
            authors,
            genres: mark_selected(genres, selected),
        })
    }
}
