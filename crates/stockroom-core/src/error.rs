//! # Error Types
//!
//! Domain-specific error types for stockroom-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockroom-core errors (this file)                                     │
//! │  ├── ValidationError   - One bad field                                 │
//! │  ├── ValidationErrors  - Every bad field of one payload                │
//! │  └── MoneyParseError   - Price text that is not a decimal              │
//! │                                                                         │
//! │  stockroom-db errors (separate crate)                                  │
//! │  └── DbError           - Database operation failures                   │
//! │                                                                         │
//! │  stockroom-server errors                                               │
//! │  └── ApiError          - What the HTTP client sees (status + message)  │
//! │                                                                         │
//! │  Flow: ValidationErrors ──► ApiError(400)                              │
//! │        DbError::NotFound ─► ApiError(404)                              │
//! │        DbError::* ────────► ApiError(500)                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing, null, or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Field was expected to be text.
    #[error("{field} must be text")]
    NotText { field: String },

    /// Field does not parse as a number.
    #[error("{field} must be a number")]
    NotANumber { field: String },

    /// Field parses as a number but has a fractional part.
    #[error("{field} must be a whole number")]
    NotAnInteger { field: String },

    /// Numeric field is below zero.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Numeric field is above its ceiling.
    #[error("{field} must be at most {max}")]
    TooLarge { field: String, max: String },

    /// The request body is not a JSON object.
    #[error("request body must be a JSON object")]
    NotAnObject,
}

impl ValidationError {
    /// Returns the offending field name (`"body"` for a non-object payload).
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::NotText { field }
            | ValidationError::NotANumber { field }
            | ValidationError::NotAnInteger { field }
            | ValidationError::Negative { field }
            | ValidationError::TooLarge { field, .. } => field,
            ValidationError::NotAnObject => "body",
        }
    }
}

/// Every field problem found in one payload.
///
/// Validation does not stop at the first bad field: the form shows all of
/// them at once.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Names of the offending fields, in the order they were checked.
    pub fn fields(&self) -> Vec<&str> {
        self.errors.iter().map(ValidationError::field).collect()
    }

    /// Returns `Ok(value)` when nothing was pushed.
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        ValidationErrors {
            errors: vec![error],
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Missing or invalid fields: ")?;
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

// =============================================================================
// Money Parse Error
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyParseError {
    #[error("amount is empty")]
    Empty,

    #[error("'{0}' is not a decimal amount")]
    Invalid(String),

    #[error("amount is too large")]
    Overflow,
}

// =============================================================================
// Unit Tests
// =============================================================================
