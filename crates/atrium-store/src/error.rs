//! # Store Error Types
//!
//! Error types for record store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error / serde_json::Error                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds the file path and categorization      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ServiceError::Persistence (atrium-service) ← logged, HTTP 500         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store never reports validation, conflict or not-found conditions:
//! those are decided by the closure passed to `RecordStore::with_lock`.

use std::path::Path;

use thiserror::Error;

/// Record store errors. All of them are persistence faults.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A filesystem operation failed.
    ///
    /// ## When This Occurs
    /// - Disk full or read-only filesystem during save
    /// - Data directory cannot be created
    /// - Permission denied on the data file
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The collection could not be serialized.
    #[error("Failed to serialize collection: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The data file exists but is not a JSON array of customers.
    ///
    /// The file is left untouched so an operator can inspect it.
    #[error("Data file {path} is corrupt: {reason}")]
    Corrupt { path: String, reason: String },

    /// Another process holds the writer lock for this data file.
    ///
    /// ## When This Occurs
    /// - A second service instance points at the same data file
    #[error("Data file {path} is locked by another process")]
    Locked { path: String },
}

impl StoreError {
    /// Creates an Io error for `path`.
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    /// Creates a Corrupt error for `path`.
    pub fn corrupt(path: &Path, reason: impl Into<String>) -> Self {
        StoreError::Corrupt {
            path: path.display().to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StoreError::corrupt(Path::new("/data/customers.json"), "expected `[`");
        assert_eq!(
            err.to_string(),
            "Data file /data/customers.json is corrupt: expected `[`"
        );

        let err = StoreError::io(
            Path::new("/data/customers.json"),
            std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        );
        assert_eq!(err.to_string(), "I/O error on /data/customers.json: disk full");
    }
}
