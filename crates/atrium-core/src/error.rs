//! # Error Types
//!
//! Validation error types for atrium-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  atrium-core errors (this file)                                        │
//! │  ├── ValidationError   - One field-level violation                     │
//! │  └── ValidationErrors  - Every violation found in a payload            │
//! │                                                                         │
//! │  atrium-store errors (separate crate)                                  │
//! │  └── StoreError        - Persistence failures                          │
//! │                                                                         │
//! │  atrium-service errors                                                 │
//! │  └── ServiceError      - What the transport layer sees                 │
//! │                                                                         │
//! │  Flow: ValidationErrors → ServiceError → ErrorPayload → HTTP 400       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The checksum functions and the query engine never fail; only payload
//! validation produces errors here.

use std::fmt;

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// A single input validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Digit count does not match any accepted length.
    #[error("{field} must have {expected} digits, got {actual}")]
    InvalidLength {
        field: String,
        expected: String,
        actual: usize,
    },

    /// CPF/CNPJ check digits do not match.
    #[error("{field} is not a valid {kind}")]
    InvalidChecksum { field: String, kind: String },
}

impl ValidationError {
    /// Creates a Required error.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Creates an InvalidFormat error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::InvalidLength { field, .. }
            | ValidationError::InvalidChecksum { field, .. } => field,
        }
    }
}

// =============================================================================
// Validation Errors (collected)
// =============================================================================

/// Every violation found while validating one payload.
///
/// Validation does not stop at the first problem: a caller resubmitting a
/// form wants all of them at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed: {}", self.messages().join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl ValidationErrors {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one violation.
    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Records the error side of a field check, if any.
    pub fn check(&mut self, result: ValidationResult<()>) {
        if let Err(e) = result {
            self.push(e);
        }
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of recorded violations.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// The recorded violations.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Human-readable messages, one per violation.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
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

// =============================================================================
// Result Type Alias
// =============================================================================

/// Result type for single-field validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================
