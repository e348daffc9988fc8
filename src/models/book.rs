//! Book model and related types

use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{author::Author, book_instance::BookInstance, genre::{Genre, GenreOption}};
use crate::{error::FieldError, validation};

/// Full book model from the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub isbn: String,
    /// Author reference
    pub author: Uuid,
    /// Genre references
    pub genre: Vec<Uuid>,
}

/// Title and summary only, as listed on an author page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BookSummary {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
}

impl From<Book> for BookSummary {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            summary: book.summary,
        }
    }
}

/// Book choice on a copy form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BookTitle {
    pub id: Uuid,
    pub title: String,
}

impl From<Book> for BookTitle {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
        }
    }
}

/// Row of the book listing, author populated
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookListEntry {
    pub id: Uuid,
    pub title: String,
    /// None when the referenced author no longer exists
    pub author: Option<Author>,
}

/// Create / update book request.
/// `genre` accepts a single identifier or a list.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct BookPayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "Title must not be empty."))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Author must not be empty."))]
    pub author: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Summary must not be empty."))]
    pub summary: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "ISBN must not be empty"))]
    pub isbn: String,
    #[serde(default, deserialize_with = "one_or_many")]
    pub genre: Vec<String>,
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(value)) => vec![value],
        Some(OneOrMany::Many(values)) => values,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub author: Uuid,
    pub genre: Vec<Uuid>,
}

/// Rejected book input: the field errors and whatever genre selection
/// could still be read, so the form can be re-rendered with it
#[derive(Debug, Clone)]
pub struct RejectedBook {
    pub errors: Vec<FieldError>,
    pub genre: Vec<Uuid>,
}

impl BookPayload {
    pub fn validated(mut self) -> Result<BookDraft, RejectedBook> {
        validation::trim_in_place(&mut self.title);
        validation::trim_in_place(&mut self.author);
        validation::trim_in_place(&mut self.summary);
        validation::trim_in_place(&mut self.isbn);

        let mut errors = validation::field_errors(&self);
        let author = validation::identifier("author", &self.author, &mut errors);
        let genre: Vec<Uuid> = self
            .genre
            .iter()
            .filter(|g| !g.trim().is_empty())
            .filter_map(|g| validation::identifier("genre", g, &mut errors))
            .collect();

        match author {
            Some(author) if errors.is_empty() => Ok(BookDraft {
                title: self.title,
                summary: self.summary,
                isbn: self.isbn,
                author,
                genre,
            }),
            _ => Err(RejectedBook { errors, genre }),
        }
    }
}

impl BookDraft {
    pub fn into_book(self, id: Uuid) -> Book {
        Book {
            id,
            title: self.title,
            summary: self.summary,
            isbn: self.isbn,
            author: self.author,
            genre: self.genre,
        }
    }
}

/// Book detail page: the book with its author, genres and copies
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetail {
    pub book: Book,
    pub author: Option<Author>,
    pub genres: Vec<Genre>,
    pub instances: Vec<BookInstance>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDeletePreview {
    pub book: Book,
    pub instances: Vec<BookInstance>,
    pub blocked: bool,
}

/// Choices offered on the book create form
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookForm {
    pub authors: Vec<Author>,
    pub genres: Vec<GenreOption>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookUpdateForm {
    pub book: Book,
    pub authors: Vec<Author>,
    pub genres: Vec<GenreOption>,
}
