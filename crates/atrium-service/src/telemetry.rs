//! # Logging Setup
//!
//! Installs the global `tracing` subscriber for binaries.
//!
//! ## Log Levels
//! - `RUST_LOG=debug` - Show debug messages
//! - `RUST_LOG=atrium_store=trace` - Show trace for the store only
//! - Otherwise the configured filter (`logging.filter`, `ATRIUM_LOG`)

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` wins over `filter` when set. Calling this more than once is
/// harmless: later calls keep the first subscriber.
pub fn init(filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
