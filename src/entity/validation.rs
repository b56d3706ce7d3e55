//! Field constraints for journal entries.

use thiserror::Error;

pub const MAX_TITLE_LENGTH: usize = 50;
pub const MAX_BODY_LENGTH: usize = 5000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Validation failed: {field} is required")]
    Required { field: &'static str },

    #[error("Validation failed: {field} too long: {actual} characters (max {max})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Required { field } | ValidationError::TooLong { field, .. } => *field,
        }
    }
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    validate_text("title", title, MAX_TITLE_LENGTH)
}

pub fn validate_body(body: &str) -> Result<(), ValidationError> {
    validate_text("body", body, MAX_BODY_LENGTH)
}

/// Required, non-empty, at most `max` characters.
fn validate_text(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Required { field });
    }
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong { field, max, actual });
    }
    Ok(())
}

/// Unwrap an optional input field, treating absence as a missing value.
pub fn require(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    value.ok_or(ValidationError::Required { field })
}
