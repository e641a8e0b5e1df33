//! # atrium-core: Pure Business Logic for Atrium
//!
//! This crate holds every rule of the customer-record service as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Atrium Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              HTTP layer (routing, CORS, auth)                   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          atrium-service (CustomerService, config)               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ atrium-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌───────────┐ ┌─────────┐ ┌─────────┐ ┌────────┐ │   │
//! │  │   │  types  │ │validation │ │  taxid  │ │  ident  │ │ query  │ │   │
//! │  │   │Customer │ │  rules    │ │CPF/CNPJ │ │ CLT ids │ │ filter │ │   │
//! │  │   └─────────┘ └───────────┘ └─────────┘ └─────────┘ └────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FILES • NO NETWORK • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │           atrium-store (durable JSON collection)                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Customer record and create/update payload
//! - [`taxid`] - CPF and CNPJ check-digit algorithms
//! - [`validation`] - Field rules (name, email, phone, tax id)
//! - [`ident`] - `CLT...` identifier generation
//! - [`query`] - Status filter, search and pagination
//! - [`config`] - Defaults for optional attributes
//! - [`error`] - Validation error types
//!
//! ## Example Usage
//!
//! ```rust
//! use atrium_core::taxid::{validate_cnpj, validate_cpf};
//! use atrium_core::query::ListQuery;
//!
//! assert!(validate_cpf("11144477735"));
//! assert!(validate_cnpj("11222333000181"));
//!
//! let page = ListQuery::new().search("acme").limit(10).run(&[]);
//! assert_eq!(page.total, 0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod ident;
pub mod query;
pub mod taxid;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use config::CustomerDefaults;
pub use error::{ValidationError, ValidationErrors};
pub use ident::{ClockIdGenerator, IdGenerator};
pub use query::{ListQuery, Page};
pub use types::{Customer, CustomerPayload};
