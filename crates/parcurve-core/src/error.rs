//! Error types for the core date and convention layer.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while building dates, tenors, and market conventions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Error in date calculations or invalid date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// A tenor string could not be parsed.
    #[error("Invalid tenor '{input}': {reason}")]
    InvalidTenor {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A convention key does not map to any known variant.
    #[error("Unknown {kind} '{key}'")]
    UnknownConvention {
        /// Which enumeration was being parsed (e.g. "day count").
        kind: &'static str,
        /// The rejected key.
        key: String,
    },

    /// Calendar or business day error.
    #[error("Calendar error: {reason}")]
    CalendarError {
        /// Description of the error.
        reason: String,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid tenor error.
    #[must_use]
    pub fn invalid_tenor(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTenor {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Creates an unknown convention error.
    #[must_use]
    pub fn unknown_convention(kind: &'static str, key: impl Into<String>) -> Self {
        Self::UnknownConvention {
            kind,
            key: key.into(),
        }
    }

    /// Creates a calendar error.
    #[must_use]
    pub fn calendar_error(reason: impl Into<String>) -> Self {
        Self::CalendarError {
            reason: reason.into(),
        }
    }
}
