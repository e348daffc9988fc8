//! Genre model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::book::Book;
use crate::{error::FieldError, validation};

/// Genre (unique by name)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Genre {
    pub id: Uuid,
    pub name: String,
}

/// A genre as offered on a book form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct GenreOption {
    #[serde(flatten)]
    pub genre: Genre,
    /// Whether the book being edited already carries this genre
    pub checked: bool,
}

/// Create / update genre request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct GenrePayload {
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Genre name required"))]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreDraft {
    pub name: String,
}

impl GenrePayload {
    pub fn validated(mut self) -> Result<GenreDraft, Vec<FieldError>> {
        validation::trim_in_place(&mut self.name);
        let errors = validation::field_errors(&self);
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(GenreDraft { name: self.name })
    }
}

impl GenreDraft {
    pub fn into_genre(self, id: Uuid) -> Genre {
        Genre { id, name: self.name }
    }
}

/// Genre detail page: the genre and every book filed under it
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GenreDetail {
    pub genre: Genre,
    pub books: Vec<Book>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GenreDeletePreview {
    pub genre: Genre,
    pub books: Vec<Book>,
    pub blocked: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GenreUpdateForm {
    pub genre: Genre,
}
