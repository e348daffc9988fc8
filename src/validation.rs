//! Sanitization helpers shared by the request payloads
//!
//! Payloads are trimmed first, then checked by their derived `Validate`
//! rules, then by the manual checks below. Everything ends up in one
//! `Vec<FieldError>` so a client can re-render the whole form at once.

use chrono::{DateTime, NaiveDate};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::error::FieldError;

/// Run the derived validators and flatten the result into field errors
pub fn field_errors<T: Validate>(payload: &T) -> Vec<FieldError> {
    match payload.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => flatten(&errors),
    }
}

fn flatten(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                FieldError::new(field.to_string(), message)
            })
        })
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

pub fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

/// Empty or missing values are absent; anything else must be an ISO-8601 date
pub fn optional_date(
    field: &str,
    value: Option<&str>,
    message: &str,
    errors: &mut Vec<FieldError>,
) -> Option<NaiveDate> {
    let raw = value.map(str::trim).filter(|v| !v.is_empty())?;
    let parsed = parse_iso_date(raw);
    if parsed.is_none() {
        errors.push(FieldError::new(field, message));
    }
    parsed
}

/// Accepts a calendar date or a full RFC 3339 timestamp
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

pub fn alphanumeric(field: &str, value: &str, message: &str, errors: &mut Vec<FieldError>) {
    if !value.is_empty() && !value.chars().all(char::is_alphanumeric) {
        errors.push(FieldError::new(field, message));
    }
}

/// A reference field must hold a well-formed store key
pub fn identifier(field: &str, raw: &str, errors: &mut Vec<FieldError>) -> Option<Uuid> {
    let raw = raw.trim();
    if raw.is_empty() {
        // Emptiness is reported by the derived length rule
        return None;
    }
    match Uuid::parse_str(raw) {
        Ok(id) => Some(id),
        Err(_) => {
            errors.push(FieldError::new(field, format!("'{}' is not a valid identifier", raw)));
            None
        }
    }
}
