//! Durable key-value storage for widget-board
//!
//! Every piece of dashboard state lives under its own namespace key as a
//! single JSON value. This crate provides the [`KeyValueStore`] abstraction,
//! two backends, and the backup file format used to move all namespaces
//! between machines.
//!
//! # Backends
//!
//! - [`MemoryStore`]: process-local map, used by tests and ephemeral boards
//! - [`FileStore`]: one `<key>.json` file per namespace in a data directory,
//!   written with temp-file-then-rename so a crash never leaves a torn value
//!
//! # Examples
//!
//! ```
//! use board_storage::{KeyValueStore, MemoryStore};
//! use serde_json::json;
//!
//! let store = MemoryStore::new();
//! store.set("theme", &json!({"accent": "teal"}))?;
//! assert_eq!(store.get("theme")?, Some(json!({"accent": "teal"})));
//! # Ok::<(), board_storage::Error>(())
//! ```

#![warn(missing_docs)]

mod backup;
mod error;
mod file;
mod memory;

pub use backup::{BackupFile, BackupMeta};
pub use error::{BackupError, Error, Result, StorageError};
pub use file::{default_data_dir, FileStore};
pub use memory::MemoryStore;

use serde_json::Value;

/// A synchronous, namespaced JSON value store.
///
/// Implementations must be usable behind `Arc<dyn KeyValueStore>`; writes are
/// blocking and complete before the call returns.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if the key was never written.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Replaces the value stored under `key`.
    fn set(&self, key: &str, value: &Value) -> Result<()>;

    /// Removes `key`, returning `true` if it existed.
    fn remove(&self, key: &str) -> Result<bool>;

    /// Lists every stored key in ascending order.
    fn keys(&self) -> Result<Vec<String>>;
}

/// Checks that `key` is usable as a namespace in every backend.
///
/// Keys must be non-empty, must not start with `.`, and may only contain
/// ASCII letters, digits, `-`, `_` and `.`.
///
/// # Errors
///
/// Returns `StorageError::InvalidKey` when the key is rejected.
pub fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key_accepts_namespace_names() {
        for key in ["dashboard-layout", "box-contents", "user_profile", "v2.theme"] {
            assert!(validate_key(key).is_ok(), "{key} should be valid");
        }
    }

    #[test]
    fn test_validate_key_rejects_paths_and_empty() {
        for key in ["", ".hidden", "../escape", "a/b", "with space", "ünïcode"] {
            let err = validate_key(key).expect_err("key should be rejected");
            assert!(matches!(err, Error::Storage(StorageError::InvalidKey(_))));
        }
    }
}
