//! # Service Error Types
//!
//! The four outcomes a caller must tell apart, plus the payload a
//! transport layer sends back.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Atrium                                 │
//! │                                                                         │
//! │  Transport (HTTP route, CLI, job)                                      │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  CustomerService::create(payload)                                │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Field rules fail? ── ValidationErrors ──► Validation   (400)    │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Email/id taken?  ───────────────────────► Conflict     (409)    │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Unknown id?      ───────────────────────► NotFound     (404)    │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Save failed?     ── StoreError ─────────► Persistence  (500)    │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ErrorPayload { code: "CONFLICT", message: "...", errors: [] }         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every failed operation leaves the collection exactly as it was.

use atrium_core::ValidationErrors;
use atrium_store::StoreError;
use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;

// =============================================================================
// Service Error
// =============================================================================

/// Errors returned by [`crate::CustomerService`].
#[derive(Debug, Error)]
pub enum ServiceError {
    /// One or more field rules failed. Carries every violation.
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// Email or client-supplied id already belongs to another record.
    #[error("A customer with {field} '{value}' already exists")]
    Conflict { field: String, value: String },

    /// No customer has this id.
    #[error("Customer not found: {0}")]
    NotFound(String),

    /// The durable write failed. Not retried.
    #[error("Persistence failure: {0}")]
    Persistence(#[from] StoreError),

    /// The operation could not finish for a reason outside the four
    /// categories above (a panicked store task, an exhausted id generator).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Creates a Conflict error.
    pub fn conflict(field: impl Into<String>, value: impl Into<String>) -> Self {
        ServiceError::Conflict {
            field: field.into(),
            value: value.into(),
        }
    }

    /// HTTP status a transport layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 400,
            ServiceError::Conflict { .. } => 409,
            ServiceError::NotFound(_) => 404,
            ServiceError::Persistence(_) | ServiceError::Internal(_) => 500,
        }
    }

    /// Machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ServiceError::Validation(_) => ErrorCode::ValidationError,
            ServiceError::Conflict { .. } => ErrorCode::Conflict,
            ServiceError::NotFound(_) => ErrorCode::NotFound,
            ServiceError::Persistence(_) => ErrorCode::PersistenceError,
            ServiceError::Internal(_) => ErrorCode::Internal,
        }
    }

    /// Returns true for faults the caller cannot fix by changing input.
    pub fn is_server_fault(&self) -> bool {
        self.status_code() >= 500
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

// =============================================================================
// Error Payload
// =============================================================================

/// Error codes for API responses.
///
/// ## Usage in Frontend
/// ```typescript
/// switch (e.code) {
///   case 'VALIDATION_ERROR':
///     showFieldErrors(e.errors);
///     break;
///   case 'CONFLICT':
///     showNotification(e.message);
///     break;
///   default:
///     showError('An error occurred');
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed (400)
    ValidationError,

    /// Duplicate email or id (409)
    Conflict,

    /// Customer not found (404)
    NotFound,

    /// Saving the collection failed (500)
    PersistenceError,

    /// Anything else (500)
    Internal,
}

/// What the caller receives when an operation fails.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "Validation failed: email is required; taxId is not a valid CPF",
///   "errors": ["email is required", "taxId is not a valid CPF"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// One message per failed field rule (validation errors only).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl From<&ServiceError> for ErrorPayload {
    fn from(err: &ServiceError) -> Self {
        let (message, errors) = match err {
            ServiceError::Validation(e) => (e.to_string(), e.messages()),
            // Store details (paths, OS errors) stay in the logs
            ServiceError::Persistence(_) => ("Failed to save customer data".to_string(), Vec::new()),
            ServiceError::Internal(_) => ("An internal error occurred".to_string(), Vec::new()),
            other => (other.to_string(), Vec::new()),
        };

        ErrorPayload {
            code: err.code(),
            message,
            errors,
        }
    }
}

impl From<ServiceError> for ErrorPayload {
    fn from(err: ServiceError) -> Self {
        ErrorPayload::from(&err)
    }
}

impl std::fmt::Display for ErrorPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

// =============================================================================
// Config Error
// =============================================================================

/// Errors while loading [`crate::ServiceConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema.
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is present but unusable.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use atrium_core::ValidationError;
    use std::path::Path;

    fn validation_error() -> ServiceError {
        let mut errors = ValidationErrors::new();
        errors.push(ValidationError::required("email"));
        errors.push(ValidationError::InvalidChecksum {
            field: "taxId".to_string(),
            kind: "CPF".to_string(),
        });
        ServiceError::Validation(errors)
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(validation_error().status_code(), 400);
        assert_eq!(ServiceError::conflict("email", "a@b.com").status_code(), 409);
        assert_eq!(ServiceError::NotFound("CLT1".into()).status_code(), 404);

        let store = StoreError::corrupt(Path::new("/data/customers.json"), "bad");
        assert_eq!(ServiceError::from(store).status_code(), 500);
        assert!(ServiceError::Internal("x".into()).is_server_fault());
    }

    #[test]
    fn test_validation_payload_lists_every_message() {
        let payload = ErrorPayload::from(validation_error());

        assert_eq!(payload.code, ErrorCode::ValidationError);
        assert_eq!(payload.errors, vec!["email is required", "taxId is not a valid CPF"]);

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["errors"][1], "taxId is not a valid CPF");
    }

    #[test]
    fn test_persistence_payload_hides_details() {
        let err = ServiceError::from(StoreError::io(
            Path::new("/secret/customers.json"),
            std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        ));
        let payload = ErrorPayload::from(&err);

        assert_eq!(payload.code, ErrorCode::PersistenceError);
        assert!(!payload.message.contains("/secret"));

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["code"], "PERSISTENCE_ERROR");
        assert!(json.get("errors").is_none());
    }

    #[test]
    fn test_conflict_message() {
        let err = ServiceError::conflict("email", "maria@example.com");
        assert_eq!(
            ErrorPayload::from(err).message,
            "A customer with email 'maria@example.com' already exists"
        );
    }
}
