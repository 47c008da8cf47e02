//! Backup file format
//!
//! A backup is a single JSON document:
//!
//! ```json
//! {
//!   "meta": { "app": "widget-board", "version": "0.1.0", "date": "2026-10-18T09:30:00+00:00" },
//!   "data": { "dashboard-layout": { ... }, "box-contents": { ... } }
//! }
//! ```
//!
//! Restoring validates the whole file before writing anything, so a rejected
//! backup never leaves storage half-restored.

use crate::error::{BackupError, Result};
use crate::{validate_key, KeyValueStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Identifies the application and moment a backup was taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupMeta {
    /// Application name; restore rejects files from other applications.
    pub app: String,
    /// Version of the application that wrote the backup.
    pub version: String,
    /// RFC 3339 timestamp of the export.
    pub date: String,
}

/// A full snapshot of storage namespaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupFile {
    /// Provenance information.
    pub meta: BackupMeta,
    /// Stored value per namespace key.
    pub data: BTreeMap<String, Value>,
}

impl BackupFile {
    /// Exports every key present in `store`.
    pub fn export(store: &dyn KeyValueStore, app: &str, version: &str) -> Result<Self> {
        let keys = store.keys()?;
        Self::export_keys(store, keys.iter().map(String::as_str), app, version)
    }

    /// Exports the given keys; keys that were never written are skipped.
    pub fn export_keys<'a, I>(
        store: &dyn KeyValueStore,
        keys: I,
        app: &str,
        version: &str,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut data = BTreeMap::new();
        for key in keys {
            if let Some(value) = store.get(key)? {
                data.insert(key.to_string(), value);
            }
        }
        log::info!("Exported {} storage keys", data.len());
        Ok(Self {
            meta: BackupMeta {
                app: app.to_string(),
                version: version.to_string(),
                date: Utc::now().to_rfc3339(),
            },
            data,
        })
    }

    /// Parses a backup document.
    ///
    /// # Errors
    ///
    /// Returns `BackupError::Malformed` if the text is not JSON or lacks the
    /// `meta`/`data` shape.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| BackupError::Malformed(e.to_string()).into())
    }

    /// Serializes the backup as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| BackupError::Malformed(e.to_string()).into())
    }

    /// Checks that the backup can be restored by `expected_app`.
    ///
    /// # Errors
    ///
    /// - `BackupError::AppMismatch` if `meta.app` differs
    /// - `BackupError::Malformed` if the date is not RFC 3339 or a key is invalid
    pub fn validate(&self, expected_app: &str) -> Result<()> {
        if self.meta.app != expected_app {
            return Err(BackupError::AppMismatch {
                expected: expected_app.to_string(),
                found: self.meta.app.clone(),
            }
            .into());
        }
        DateTime::parse_from_rfc3339(&self.meta.date)
            .map_err(|e| BackupError::Malformed(format!("invalid date '{}': {}", self.meta.date, e)))?;
        for key in self.data.keys() {
            validate_key(key)
                .map_err(|_| BackupError::Malformed(format!("invalid storage key '{key}'")))?;
        }
        Ok(())
    }

    /// Validates, then overwrites every key in `data` inside `store`.
    ///
    /// Keys not mentioned in the backup are left untouched. Returns the
    /// count of keys written.
    pub fn restore(&self, store: &dyn KeyValueStore, expected_app: &str) -> Result<usize> {
        self.validate(expected_app)?;
        for (key, value) in &self.data {
            store.set(key, value)?;
        }
        log::info!(
            "Restored {} storage keys from backup dated {}",
            self.data.len(),
            self.meta.date
        );
        Ok(self.data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, MemoryStore};
    use serde_json::json;

    fn sample_store() -> MemoryStore {
        MemoryStore::with_values([
            ("dashboard-layout".to_string(), json!({"widgetIds": [], "layouts": {}})),
            ("box-contents".to_string(), json!({"notes-1a2b3c4": {"text": "hi"}})),
        ])
    }

    #[test]
    fn test_export_collects_all_keys() {
        let store = sample_store();
        let backup = BackupFile::export(&store, "widget-board", "0.1.0").expect("export failed");
        assert_eq!(backup.meta.app, "widget-board");
        assert_eq!(backup.meta.version, "0.1.0");
        assert_eq!(backup.data.len(), 2);
        assert!(DateTime::parse_from_rfc3339(&backup.meta.date).is_ok());
    }

    #[test]
    fn test_export_keys_skips_unwritten() {
        let store = sample_store();
        let backup = BackupFile::export_keys(&store, ["box-contents", "tasks"], "widget-board", "0.1.0")
            .expect("export failed");
        assert_eq!(backup.data.keys().collect::<Vec<_>>(), vec!["box-contents"]);
    }

    #[test]
    fn test_validate_rejects_other_app() {
        let store = sample_store();
        let mut backup = BackupFile::export(&store, "widget-board", "0.1.0").expect("export failed");
        backup.meta.app = "someone-else".to_string();
        let err = backup.validate("widget-board").expect_err("should reject");
        assert!(matches!(err, Error::Backup(BackupError::AppMismatch { .. })));
    }

    #[test]
    fn test_validate_rejects_bad_date() {
        let store = sample_store();
        let mut backup = BackupFile::export(&store, "widget-board", "0.1.0").expect("export failed");
        backup.meta.date = "yesterday".to_string();
        let err = backup.validate("widget-board").expect_err("should reject");
        assert!(matches!(err, Error::Backup(BackupError::Malformed(_))));
    }

    #[test]
    fn test_restore_with_invalid_key_writes_nothing() {
        let target = MemoryStore::new();
        let mut backup =
            BackupFile::export(&sample_store(), "widget-board", "0.1.0").expect("export failed");
        backup.data.insert("../escape".to_string(), json!(1));
        assert!(backup.restore(&target, "widget-board").is_err());
        assert!(target.keys().expect("keys failed").is_empty());
    }

    #[test]
    fn test_from_json_missing_meta_is_malformed() {
        let err = BackupFile::from_json(r#"{"data": {}}"#).expect_err("should reject");
        match err {
            Error::Backup(BackupError::Malformed(message)) => assert!(message.contains("meta")),
            other => panic!("expected Malformed, got: {other:?}"),
        }
    }
}
