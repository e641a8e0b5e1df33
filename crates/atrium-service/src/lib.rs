//! # atrium-service: Customer Service for Atrium
//!
//! The operation surface a transport layer calls, plus the ambient
//! pieces a binary needs to run it: configuration and logging.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Atrium Service                                   │
//! │                                                                         │
//! │  HTTP route / CLI / job                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 atrium-service (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   service.rs ──► CustomerService: list/get/create/update/delete │   │
//! │  │   error.rs ────► ServiceError, ErrorPayload, status codes       │   │
//! │  │   config.rs ───► ServiceConfig (TOML + ATRIUM_* env)            │   │
//! │  │   telemetry.rs ► tracing subscriber for binaries                │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │          ┌─────────────────────┴──────────────────────┐                │
//! │          ▼                                            ▼                │
//! │  atrium-core (rules, ids, queries)      atrium-store (customers.json)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use atrium_core::{CustomerPayload, ListQuery};
//! use atrium_service::{telemetry, CustomerService, ServiceConfig};
//!
//! let config = ServiceConfig::load(None)?;
//! telemetry::init(&config.logging.filter);
//!
//! let service = CustomerService::open(&config)?;
//! let maria = service
//!     .create(CustomerPayload::new("Maria Silva", "maria@example.com"))
//!     .await?;
//! let page = service.list(ListQuery::new().search("maria")).await?;
//! service.delete(&maria.id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod service;
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{LoggingSettings, ServiceConfig, StorageSettings};
pub use error::{ConfigError, ErrorCode, ErrorPayload, ServiceError, ServiceResult};
pub use service::CustomerService;
