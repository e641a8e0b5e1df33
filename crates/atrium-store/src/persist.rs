//! # Collection File I/O
//!
//! Loading and crash-safe saving of the customer collection.
//!
//! ## Atomic Save
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Save Sequence                                        │
//! │                                                                         │
//! │  1. serialize collection → bytes (pretty JSON, UTF-8 unescaped)        │
//! │  2. write bytes to  customers.json.tmp                                 │
//! │  3. fsync the temp file                                                │
//! │  4. rename customers.json.tmp → customers.json   (atomic replace)      │
//! │  5. fsync the parent directory (the rename itself is durable)          │
//! │                                                                         │
//! │  Crash before 4: old file intact, stale .tmp removed on next open      │
//! │  Crash after 4:  new file complete                                     │
//! │  Step 5 failing: the save still counts, the new file is in place       │
//! │  A reader never sees a half-written customers.json.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fs::{self, File, OpenOptions, TryLockError};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use atrium_core::Customer;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};

/// Path of the temporary file used while saving `path`.
pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    with_suffix(path, "tmp")
}

/// Path of the writer lock file for `path`.
pub(crate) fn lock_path(path: &Path) -> PathBuf {
    with_suffix(path, "lock")
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

/// Reads and parses the collection file.
pub(crate) fn load(path: &Path) -> StoreResult<Vec<Customer>> {
    let bytes = fs::read(path).map_err(|e| StoreError::io(path, e))?;
    serde_json::from_slice(&bytes).map_err(|e| StoreError::corrupt(path, e.to_string()))
}

/// Creates the directory that will hold `path`.
pub(crate) fn ensure_parent(path: &Path) -> StoreResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }
    Ok(())
}

/// Creates an empty collection file if none exists.
///
/// Returns true if the file was created.
pub(crate) fn bootstrap(path: &Path, pretty: bool) -> StoreResult<bool> {
    if path.exists() {
        return Ok(false);
    }

    save_atomic(path, &[], pretty)?;
    Ok(true)
}

/// Removes a temp file left by an interrupted save.
pub(crate) fn remove_stale_tmp(path: &Path) {
    let tmp = tmp_path(path);
    match fs::remove_file(&tmp) {
        Ok(()) => warn!(path = %tmp.display(), "Removed stale temp file from interrupted save"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!(path = %tmp.display(), error = %e, "Could not remove stale temp file"),
    }
}

/// Serializes the collection.
pub(crate) fn encode(customers: &[Customer], pretty: bool) -> StoreResult<Vec<u8>> {
    let mut bytes = if pretty {
        serde_json::to_vec_pretty(customers)?
    } else {
        serde_json::to_vec(customers)?
    };
    bytes.push(b'\n');
    Ok(bytes)
}

/// Writes the collection with temp-file + fsync + rename.
///
/// Once the rename succeeds the new collection is the data file, so a
/// failed directory fsync is logged and the save still returns `Ok`.
pub(crate) fn save_atomic(path: &Path, customers: &[Customer], pretty: bool) -> StoreResult<()> {
    save_with(path, customers, pretty, sync_dir)
}

fn save_with(
    path: &Path,
    customers: &[Customer],
    pretty: bool,
    sync_parent: fn(&Path) -> StoreResult<()>,
) -> StoreResult<()> {
    let bytes = encode(customers, pretty)?;
    let tmp = tmp_path(path);

    write_and_sync(&tmp, &bytes)?;
    fs::rename(&tmp, path).map_err(|e| StoreError::io(path, e))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = sync_parent(parent) {
            warn!(
                path = %path.display(),
                error = %e,
                "Collection replaced but directory fsync failed"
            );
        }
    }

    debug!(
        path = %path.display(),
        records = customers.len(),
        bytes = bytes.len(),
        "Collection saved"
    );
    Ok(())
}

fn write_and_sync(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let mut file = File::create(path).map_err(|e| StoreError::io(path, e))?;
    file.write_all(bytes).map_err(|e| StoreError::io(path, e))?;
    file.sync_all().map_err(|e| StoreError::io(path, e))
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> StoreResult<()> {
    let f = File::open(dir).map_err(|e| StoreError::io(dir, e))?;
    f.sync_all().map_err(|e| StoreError::io(dir, e))
}

// Directories cannot be opened for fsync on Windows; rename durability is
// left to the filesystem there.
#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> StoreResult<()> {
    Ok(())
}

/// Takes the single-writer lock: an exclusive advisory lock on `<path>.lock`.
///
/// The lock lives as long as the returned `File`. The OS drops it when the
/// process exits, so a lock file left behind by a crash does not block the
/// next `open`.
pub(crate) fn acquire_lock(path: &Path) -> StoreResult<File> {
    let lock = lock_path(path);
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&lock)
        .map_err(|e| StoreError::io(&lock, e))?;

    match file.try_lock() {
        Ok(()) => {}
        Err(TryLockError::WouldBlock) => {
            return Err(StoreError::Locked {
                path: path.display().to_string(),
            })
        }
        Err(TryLockError::Error(e)) => return Err(StoreError::io(&lock, e)),
    }

    // The pid is informational, for whoever inspects the lock file.
    file.set_len(0).map_err(|e| StoreError::io(&lock, e))?;
    writeln!(file, "{}", std::process::id()).map_err(|e| StoreError::io(&lock, e))?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use atrium_core::{CustomerDefaults, CustomerPayload};
    use chrono::Utc;

    fn customer(name: &str, email: &str) -> Customer {
        Customer::from_payload(
            "CLT1",
            CustomerPayload::new(name, email),
            &CustomerDefaults::default(),
            Utc::now(),
        )
    }

    #[test]
    fn test_sibling_paths() {
        let path = Path::new("/data/customers.json");
        assert_eq!(tmp_path(path), PathBuf::from("/data/customers.json.tmp"));
        assert_eq!(lock_path(path), PathBuf::from("/data/customers.json.lock"));
    }

    #[test]
    fn test_bootstrap_creates_empty_array_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("customers.json");

        ensure_parent(&path).unwrap();
        assert!(bootstrap(&path, true).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap().trim(), "[]");
        assert!(!bootstrap(&path, true).unwrap());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customers.json");
        let records = vec![customer("José Araújo", "jose@example.com")];

        save_atomic(&path, &records, true).unwrap();

        assert_eq!(load(&path).unwrap(), records);
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn test_pretty_output_keeps_non_ascii_unescaped() {
        let bytes = encode(&[customer("José Araújo", "jose@example.com")], true).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.contains("José Araújo"));
        assert!(text.contains("\n  {"));
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customers.json");
        fs::write(&path, "{ not an array").unwrap();

        assert!(matches!(load(&path), Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn test_remove_stale_tmp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customers.json");
        fs::write(tmp_path(&path), "[{\"trunc").unwrap();

        remove_stale_tmp(&path);
        assert!(!tmp_path(&path).exists());

        // Nothing to remove is fine too
        remove_stale_tmp(&path);
    }

    #[test]
    fn test_save_survives_failed_directory_sync() {
        fn failing_sync(dir: &Path) -> StoreResult<()> {
            Err(StoreError::io(dir, std::io::Error::from_raw_os_error(5)))
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customers.json");
        let records = vec![customer("Ana Lima", "ana@example.com")];

        save_with(&path, &records, true, failing_sync).unwrap();

        assert_eq!(load(&path).unwrap(), records);
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn test_lock_is_exclusive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customers.json");

        let lock = acquire_lock(&path).unwrap();
        assert!(matches!(acquire_lock(&path), Err(StoreError::Locked { .. })));

        drop(lock);
        assert!(acquire_lock(&path).is_ok());
    }

    #[test]
    fn test_leftover_lock_file_does_not_block() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customers.json");

        // What a crashed writer leaves behind: the file, but no OS lock
        fs::write(lock_path(&path), "999999\n").unwrap();

        let lock = acquire_lock(&path).unwrap();
        drop(lock);
        assert_eq!(
            fs::read_to_string(lock_path(&path)).unwrap().trim(),
            std::process::id().to_string()
        );
    }
}
