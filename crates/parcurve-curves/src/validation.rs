//! Field-level validation for convention and solver settings.
//!
//! Types implementing [`Validate`] report every problem they find rather than
//! stopping at the first, so a malformed convention record can be fixed in one
//! pass.

use std::fmt;

use crate::error::{CurveError, CurveResult};

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Field that failed validation.
    pub field: String,
    /// Validation error message.
    pub message: String,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Trait for validatable settings.
pub trait Validate {
    /// Returns every validation error, or an empty vector if valid.
    fn validate(&self) -> Vec<ValidationError>;

    /// Returns true if there are no validation errors.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Folds all validation errors into one [`CurveError::Configuration`].
    fn validate_or_error(&self) -> CurveResult<()> {
        let errors = self.validate();
        if errors.is_empty() {
            return Ok(());
        }
        let reason = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Err(CurveError::configuration(reason))
    }
}
