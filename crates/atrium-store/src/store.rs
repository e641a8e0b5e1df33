//! # Record Store
//!
//! Owns the customer collection: snapshot reads and serialized,
//! crash-safe read-modify-write.
//!
//! ## Concurrency Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      RecordStore Internals                              │
//! │                                                                         │
//! │   readers                             writers                           │
//! │   ───────                             ───────                           │
//! │   snapshot()                          with_lock(f)                      │
//! │      │                                   │                              │
//! │      │ read-lock, clone Arc, unlock      │ writer Mutex (one at a time) │
//! │      ▼                                   ▼                              │
//! │   ┌──────────────────────────┐      f(&current) → Mutation             │
//! │   │ RwLock<Arc<Vec<Customer>>│◄──┐      │                              │
//! │   └──────────────────────────┘   │      ├─ Unchanged(v) → return v     │
//! │                                  │      │                              │
//! │                                  │      └─ Commit(next, v)             │
//! │                                  │           │ save_atomic(next)       │
//! │                                  └───────────┘ swap Arc (write-lock)   │
//! │                                                                         │
//! │  • Readers never wait on disk I/O, only on the pointer swap            │
//! │  • Readers see the old or the new collection, never a mix              │
//! │  • A failed save publishes nothing: memory and disk stay as they were  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Process Model
//! One process owns a data file. `open` takes an exclusive advisory lock on
//! `<file>.lock` and fails with [`StoreError::Locked`] if another instance
//! holds it. The lock is held by an open handle, so it ends with the store or
//! with the process; a lock file left by a crash is simply reused.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use atrium_core::Customer;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::persist;

// =============================================================================
// Configuration
// =============================================================================

/// Record store configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = StoreConfig::new("./data/customers.json").pretty(true);
/// let store = RecordStore::open(config)?;
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the JSON collection file. Created if it doesn't exist.
    pub data_path: PathBuf,

    /// Pretty-print the file (human-readable, diff-friendly).
    /// Default: true
    pub pretty: bool,
}

impl StoreConfig {
    /// Creates a configuration for the given data file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            data_path: path.into(),
            pretty: true,
        }
    }

    /// Sets whether the file is pretty-printed.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

// =============================================================================
// Mutation
// =============================================================================

/// What a `with_lock` closure decided.
#[derive(Debug)]
pub enum Mutation<T> {
    /// Persist this collection, then return the value.
    Commit(Vec<Customer>, T),
    /// Nothing to write; return the value.
    Unchanged(T),
}

// =============================================================================
// Record Store
// =============================================================================

/// The single owner of the customer collection.
#[derive(Debug)]
pub struct RecordStore {
    config: StoreConfig,
    current: RwLock<Arc<Vec<Customer>>>,
    writer: Mutex<()>,
    // Holds the advisory lock until dropped
    _lock: File,
}

impl RecordStore {
    /// Opens the store.
    ///
    /// ## What This Does
    /// 1. Creates the data directory if needed
    /// 2. Takes the single-writer lock on `<file>.lock`
    /// 3. Removes a temp file left by an interrupted save
    /// 4. Creates `[]` if the data file doesn't exist
    /// 5. Loads the collection into memory
    ///
    /// ## Returns
    /// * `Ok(RecordStore)` - Ready-to-use store
    /// * `Err(StoreError::Locked)` - Another process owns the file
    /// * `Err(StoreError::Corrupt)` - Data file is not a customer array
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        info!(path = %config.data_path.display(), "Opening record store");

        persist::ensure_parent(&config.data_path)?;
        let lock = persist::acquire_lock(&config.data_path)?;
        let customers = Self::load_locked(&config)?;

        info!(records = customers.len(), "Record store ready");

        Ok(RecordStore {
            config,
            current: RwLock::new(Arc::new(customers)),
            writer: Mutex::new(()),
            _lock: lock,
        })
    }

    /// Steps of `open` that run while holding the lock file.
    fn load_locked(config: &StoreConfig) -> StoreResult<Vec<Customer>> {
        persist::remove_stale_tmp(&config.data_path);

        if persist::bootstrap(&config.data_path, config.pretty)? {
            info!(path = %config.data_path.display(), "Initialized empty collection");
        }

        persist::load(&config.data_path)
    }

    /// Returns the current collection.
    ///
    /// The returned `Arc` is immutable; later writes publish a new
    /// collection and leave this one as it is.
    pub fn snapshot(&self) -> Arc<Vec<Customer>> {
        // Only whole-Arc swaps happen under this lock, so a poisoned lock
        // still holds a complete collection.
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Runs a read-modify-write step with exclusive access.
    ///
    /// `f` sees the current collection and returns either
    /// `Mutation::Commit(next, value)` or `Mutation::Unchanged(value)`.
    /// On commit, `next` is saved atomically and then published to readers.
    /// An error from `f` or from the save leaves the collection untouched.
    pub fn with_lock<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&[Customer]) -> Result<Mutation<T>, E>,
        E: From<StoreError>,
    {
        // The guarded value is (), and nothing is published until the save
        // succeeds, so a writer that panicked left no partial state behind.
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let current = self.snapshot();

        match f(&current)? {
            Mutation::Unchanged(value) => Ok(value),
            Mutation::Commit(next, value) => {
                persist::save_atomic(&self.config.data_path, &next, self.config.pretty)?;
                debug!(records = next.len(), "Published new collection");

                *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(next);
                Ok(value)
            }
        }
    }

    /// Number of customers in the current collection.
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    /// Returns true if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Path of the data file.
    pub fn path(&self) -> &Path {
        &self.config.data_path
    }

    /// Checks that the data file is still readable and parseable.
    pub fn health_check(&self) -> bool {
        persist::load(&self.config.data_path).is_ok()
    }

    /// Closes the store and releases the writer lock.
    ///
    /// Every committed write is already on disk; closing only logs and
    /// drops the lock handle.
    pub fn close(self) {
        info!(
            path = %self.config.data_path.display(),
            records = self.len(),
            "Closing record store"
        );
        // Dropping the handle releases the lock.
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use atrium_core::{CustomerDefaults, CustomerPayload};
    use chrono::Utc;
    use std::fs;

    fn customer(id: &str, email: &str) -> Customer {
        Customer::from_payload(
            id,
            CustomerPayload::new("Test Customer", email),
            &CustomerDefaults::default(),
            Utc::now(),
        )
    }

    fn push(store: &RecordStore, c: Customer) -> StoreResult<()> {
        store.with_lock(|current| {
            let mut next = current.to_vec();
            next.push(c);
            Ok::<_, StoreError>(Mutation::Commit(next, ()))
        })
    }

    #[test]
    fn test_open_bootstraps_empty_collection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customers.json");

        let store = RecordStore::open(StoreConfig::new(&path)).unwrap();

        assert!(store.is_empty());
        assert!(store.health_check());
        assert_eq!(fs::read_to_string(&path).unwrap().trim(), "[]");
    }

    #[test]
    fn test_commit_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customers.json");

        let store = RecordStore::open(StoreConfig::new(&path)).unwrap();
        push(&store, customer("C1", "a@example.com")).unwrap();
        push(&store, customer("C2", "b@example.com")).unwrap();
        store.close();

        let store = RecordStore::open(StoreConfig::new(&path)).unwrap();
        let ids: Vec<String> = store.snapshot().iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids, vec!["C1", "C2"]);
    }

    #[test]
    fn test_snapshot_is_unaffected_by_later_writes() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::open(StoreConfig::new(dir.path().join("c.json"))).unwrap();

        let before = store.snapshot();
        push(&store, customer("C1", "a@example.com")).unwrap();

        assert!(before.is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_unchanged_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customers.json");
        let store = RecordStore::open(StoreConfig::new(&path)).unwrap();
        fs::remove_file(&path).unwrap();

        let value = store
            .with_lock(|current| Ok::<_, StoreError>(Mutation::Unchanged(current.len())))
            .unwrap();

        assert_eq!(value, 0);
        assert!(!path.exists());
    }

    #[test]
    fn test_closure_error_leaves_collection_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::open(StoreConfig::new(dir.path().join("c.json"))).unwrap();

        let result: Result<(), StoreError> =
            store.with_lock(|_| Err(StoreError::corrupt(Path::new("x"), "rejected")));

        assert!(result.is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_failed_save_publishes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customers.json");
        let store = RecordStore::open(StoreConfig::new(&path)).unwrap();

        // A directory where the temp file should go makes the save fail.
        fs::create_dir(persist::tmp_path(&path)).unwrap();

        let result = push(&store, customer("C1", "a@example.com"));

        assert!(matches!(result, Err(StoreError::Io { .. })));
        assert!(store.is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap().trim(), "[]");
    }

    #[test]
    fn test_corrupt_file_fails_open_and_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customers.json");
        fs::write(&path, "garbage").unwrap();

        let result = RecordStore::open(StoreConfig::new(&path));

        assert!(matches!(result, Err(StoreError::Corrupt { .. })));
        assert_eq!(fs::read_to_string(&path).unwrap(), "garbage");

        // The failed open released its lock
        fs::write(&path, "[]").unwrap();
        assert!(RecordStore::open(StoreConfig::new(&path)).is_ok());
    }

    #[test]
    fn test_second_open_is_locked_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customers.json");

        let first = RecordStore::open(StoreConfig::new(&path)).unwrap();
        assert!(matches!(
            RecordStore::open(StoreConfig::new(&path)),
            Err(StoreError::Locked { .. })
        ));

        drop(first);
        assert!(RecordStore::open(StoreConfig::new(&path)).is_ok());
    }

    #[test]
    fn test_open_after_crash_ignores_leftover_lock_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customers.json");

        let store = RecordStore::open(StoreConfig::new(&path)).unwrap();
        push(&store, customer("C1", "a@example.com")).unwrap();
        drop(store);

        // A crashed writer leaves its lock file behind with a dead pid
        fs::write(persist::lock_path(&path), "999999\n").unwrap();

        let reopened = RecordStore::open(StoreConfig::new(&path)).unwrap();
        assert_eq!(reopened.len(), 1);
        assert!(matches!(
            RecordStore::open(StoreConfig::new(&path)),
            Err(StoreError::Locked { .. })
        ));
    }

    #[test]
    fn test_concurrent_writers_lose_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customers.json");
        let store = RecordStore::open(StoreConfig::new(&path)).unwrap();

        std::thread::scope(|s| {
            for i in 0..16 {
                let store = &store;
                s.spawn(move || {
                    push(store, customer(&format!("C{i}"), &format!("c{i}@example.com"))).unwrap();
                });
            }
        });

        assert_eq!(store.len(), 16);
        store.close();

        let reopened = RecordStore::open(StoreConfig::new(&path)).unwrap();
        assert_eq!(reopened.len(), 16);
    }
}
