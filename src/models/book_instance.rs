//! Book instance (physical copy) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::book::{Book, BookTitle};
use crate::{error::FieldError, validation};

/// Copy availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, Default)]
pub enum BookInstanceStatus {
    Available,
    #[default]
    Maintenance,
    Loaned,
    Reserved,
}

impl BookInstanceStatus {
    pub const ALL: [BookInstanceStatus; 4] = [
        BookInstanceStatus::Available,
        BookInstanceStatus::Maintenance,
        BookInstanceStatus::Loaned,
        BookInstanceStatus::Reserved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookInstanceStatus::Available => "Available",
            BookInstanceStatus::Maintenance => "Maintenance",
            BookInstanceStatus::Loaned => "Loaned",
            BookInstanceStatus::Reserved => "Reserved",
        }
    }
}

impl std::str::FromStr for BookInstanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown status '{}'", s))
    }
}

impl std::fmt::Display for BookInstanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A physical copy of a book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookInstance {
    pub id: Uuid,
    /// Book reference
    pub book: Uuid,
    pub imprint: String,
    pub status: BookInstanceStatus,
    pub due_back: Option<NaiveDate>,
}

/// A copy with its book populated
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookInstanceDetail {
    pub instance: BookInstance,
    /// None when the referenced book no longer exists
    pub book: Option<Book>,
}

/// Create / update copy request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct BookInstancePayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "Book must be specified"))]
    pub book: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Imprint must be specified"))]
    pub imprint: String,
    /// Defaults to Maintenance
    pub status: Option<String>,
    /// ISO-8601 date; empty means none
    pub due_back: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookInstanceDraft {
    pub book: Uuid,
    pub imprint: String,
    pub status: BookInstanceStatus,
    pub due_back: Option<NaiveDate>,
}

impl BookInstancePayload {
    pub fn validated(mut self) -> Result<BookInstanceDraft, Vec<FieldError>> {
        validation::trim_in_place(&mut self.book);
        validation::trim_in_place(&mut self.imprint);

        let mut errors = validation::field_errors(&self);
        let book = validation::identifier("book", &self.book, &mut errors);
        let status = match self.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            None => BookInstanceStatus::default(),
            Some(raw) => raw.parse().unwrap_or_else(|message: String| {
                errors.push(FieldError::new("status", message));
                BookInstanceStatus::default()
            }),
        };
        let due_back = validation::optional_date("due_back", self.due_back.as_deref(), "Invalid date", &mut errors);

        match book {
            Some(book) if errors.is_empty() => Ok(BookInstanceDraft {
                book,
                imprint: self.imprint,
                status,
                due_back,
            }),
            _ => Err(errors),
        }
    }
}

impl BookInstanceDraft {
    pub fn into_instance(self, id: Uuid) -> BookInstance {
        BookInstance {
            id,
            book: self.book,
            imprint: self.imprint,
            status: self.status,
            due_back: self.due_back,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookInstanceDeletePreview {
    pub instance: BookInstance,
    /// Copies have no dependents; always false
    pub blocked: bool,
}

/// Choices offered on the copy create form
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookInstanceForm {
    pub books: Vec<BookTitle>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookInstanceUpdateForm {
    pub instance: BookInstance,
    pub books: Vec<BookTitle>,
}
