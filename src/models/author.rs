//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::book::BookSummary;
use crate::{error::FieldError, validation};

/// Full author model from the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl Author {
    /// "Family, First", or whichever part is present
    pub fn name(&self) -> String {
        match (self.family_name.is_empty(), self.first_name.is_empty()) {
            (false, false) => format!("{}, {}", self.family_name, self.first_name),
            (false, true) => self.family_name.clone(),
            (true, _) => self.first_name.clone(),
        }
    }

    /// "birth - death" with unknown ends left blank
    pub fn lifespan(&self) -> String {
        let fmt = |d: Option<NaiveDate>| d.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default();
        format!("{} - {}", fmt(self.date_of_birth), fmt(self.date_of_death))
            .trim()
            .to_string()
    }
}

/// Create / update author request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct AuthorPayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "First name must be specified."))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Family name must be specified."))]
    pub family_name: String,
    /// ISO-8601 date; empty means unknown
    pub date_of_birth: Option<String>,
    /// ISO-8601 date; empty means unknown
    pub date_of_death: Option<String>,
}

/// Validated author fields, not yet bound to an identifier
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorDraft {
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl AuthorPayload {
    pub fn validated(mut self) -> Result<AuthorDraft, Vec<FieldError>> {
        validation::trim_in_place(&mut self.first_name);
        validation::trim_in_place(&mut self.family_name);

        let mut errors = validation::field_errors(&self);
        validation::alphanumeric(
            "first_name",
            &self.first_name,
            "First name has non-alphanumeric characters.",
            &mut errors,
        );
        validation::alphanumeric(
            "family_name",
            &self.family_name,
            "Family name has non-alphanumeric characters.",
            &mut errors,
        );
        let date_of_birth = validation::optional_date(
            "date_of_birth",
            self.date_of_birth.as_deref(),
            "Invalid date of birth",
            &mut errors,
        );
        let date_of_death = validation::optional_date(
            "date_of_death",
            self.date_of_death.as_deref(),
            "Invalid date of death",
            &mut errors,
        );

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(AuthorDraft {
            first_name: self.first_name,
            family_name: self.family_name,
            date_of_birth,
            date_of_death,
        })
    }
}

impl AuthorDraft {
    pub fn into_author(self, id: Uuid) -> Author {
        Author {
            id,
            first_name: self.first_name,
            family_name: self.family_name,
            date_of_birth: self.date_of_birth,
            date_of_death: self.date_of_death,
        }
    }
}

/// Author detail page: the author and the books they wrote
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorDetail {
    pub author: Author,
    pub name: String,
    pub lifespan: String,
    pub books: Vec<BookSummary>,
}

/// Delete confirmation preview
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorDeletePreview {
    pub author: Author,
    pub books: Vec<super::book::Book>,
    /// True when deleting now would be refused
    pub blocked: bool,
}

/// Data needed to pre-fill the author edit form
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorUpdateForm {
    pub author: Author,
}
