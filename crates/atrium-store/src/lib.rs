//! # atrium-store: Record Store for Atrium
//!
//! This crate owns the durable customer collection: one JSON file on disk
//! mirrored by an in-memory snapshot.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Atrium Data Flow                                 │
//! │                                                                         │
//! │  CustomerService::create / update / delete                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   atrium-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  RecordStore  │    │    persist    │    │    error     │  │   │
//! │  │   │  (store.rs)   │    │ (persist.rs)  │    │  (error.rs)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ snapshot()    │───►│ load          │    │ StoreError   │  │   │
//! │  │   │ with_lock()   │    │ save_atomic   │    │              │  │   │
//! │  │   │ open / close  │    │ lock file     │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     customers.json                              │   │
//! │  │   pretty-printed UTF-8 array, replaced atomically on each write │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - `RecordStore`, its configuration and the critical section
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use atrium_store::{Mutation, RecordStore, StoreConfig, StoreError};
//!
//! let store = RecordStore::open(StoreConfig::new("./data/customers.json"))?;
//!
//! // Reads never block on disk I/O
//! let everyone = store.snapshot();
//!
//! // Writes go through the critical section
//! store.with_lock(|current| {
//!     let next: Vec<_> = current.iter().filter(|c| c.status == "active").cloned().collect();
//!     Ok::<_, StoreError>(Mutation::Commit(next, ()))
//! })?;
//!
//! store.close();
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
mod persist;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use store::{Mutation, RecordStore, StoreConfig};
