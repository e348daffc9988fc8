//! Error types for the catalog server

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::{
    models::{
        book::BookForm,
        book_instance::BookInstanceForm,
        entity::{Entity, EntityKind},
        genre::Genre,
    },
    store::StoreError,
};

/// Numeric error codes carried in every error body.
/// Clients match on these, so existing values never change; new codes are appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    StoreFailure = 2,
    NoSuchEntity = 3,
    Duplicate = 4,
    BadValue = 5,
    InvalidIdentifier = 6,
    EntityReferenced = 7,
}

/// One rejected input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Options a client needs to re-render a rejected form
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum FormContext {
    Book(BookForm),
    BookInstance(BookInstanceForm),
}

/// Field errors plus optional form options, returned with 400
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<FieldError>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub form: Option<FormContext>,
}

/// Delete refused because other entities still reference the target
#[derive(Debug, Clone, Serialize)]
pub struct ConflictReport {
    pub entity: Entity,
    pub dependent_kind: Option<EntityKind>,
    pub dependents: Vec<Entity>,
    pub message: String,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {} field error(s)", .0.errors.len())]
    ValidationFailed(Box<ValidationReport>),

    #[error("Referential conflict: {}", .0.message)]
    ReferentialConflict(Box<ConflictReport>),

    #[error("Genre '{}' already exists", .0.name)]
    DuplicateGenre(Box<Genre>),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(kind: EntityKind, id: impl std::fmt::Display) -> Self {
        AppError::NotFound(format!("{} {} not found", kind.title(), id))
    }

    pub fn validation(errors: Vec<FieldError>) -> Self {
        AppError::ValidationFailed(Box::new(ValidationReport { errors, form: None }))
    }

    pub fn validation_with_form(errors: Vec<FieldError>, form: FormContext) -> Self {
        AppError::ValidationFailed(Box::new(ValidationReport {
            errors,
            form: Some(form),
        }))
    }
}

/// A body that is not JSON, or does not fit the payload, is a validation failure
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::validation(vec![FieldError::new("body", rejection.body_text())])
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
    /// Structured detail for validation and conflict errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchEntity, msg.clone(), None),
            AppError::ValidationFailed(report) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::BadValue,
                "Invalid input".to_string(),
                serde_json::to_value(report).ok(),
            ),
            AppError::ReferentialConflict(report) => (
                StatusCode::CONFLICT,
                ErrorCode::EntityReferenced,
                report.message.clone(),
                serde_json::to_value(report).ok(),
            ),
            AppError::DuplicateGenre(existing) => (
                StatusCode::CONFLICT,
                ErrorCode::Duplicate,
                self.to_string(),
                serde_json::to_value(existing).ok(),
            ),
            AppError::InvalidIdentifier(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::InvalidIdentifier, msg.clone(), None)
            }
            AppError::Store(StoreError::UniqueViolation { .. }) => {
                (StatusCode::CONFLICT, ErrorCode::Duplicate, self.to_string(), None)
            }
            AppError::Store(e) => {
                tracing::error!("Store error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::StoreFailure,
                    "Store error".to_string(),
                    None,
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
