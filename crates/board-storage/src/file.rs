//! File-backed storage with atomic writes
//!
//! Each namespace key maps to `<dir>/<key>.json`. Writes follow the
//! temp-file-then-rename pattern:
//! 1. Write to `<key>.json.tmp.<timestamp>`
//! 2. Fsync to disk
//! 3. Rename over `<key>.json` (atomic on the same filesystem)
//!
//! On failure before the rename the temp file is preserved as a safety copy.

use crate::error::{Result, StorageError};
use crate::{validate_key, KeyValueStore};
use chrono::Local;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

const FILE_SUFFIX: &str = ".json";

/// Returns the default data directory for widget-board
///
/// Uses XDG data directory conventions:
/// - macOS: `~/Library/Application Support/widget-board`
/// - Linux: `~/.local/share/widget-board` (or `$XDG_DATA_HOME/widget-board`)
///
/// Returns `None` if no data directory can be determined for the platform.
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("widget-board"))
}

/// Store that keeps one JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens (creating if missing) a store rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(StorageError::Io)?;
        log::debug!("Opened file store at {}", dir.display());
        Ok(Self { dir })
    }

    /// Returns the directory holding the value files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file path used for `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}{FILE_SUFFIX}"))
    }

    fn write_atomic(&self, key: &str, value: &Value) -> Result<()> {
        let path = self.path_for(key);
        let timestamp = Local::now().format("%Y%m%d-%H%M%S%.6f").to_string();
        let temp_path = path.with_file_name(format!("{key}{FILE_SUFFIX}.tmp.{timestamp}"));

        let json = serde_json::to_string_pretty(value)
            .map_err(|e| StorageError::Serialize(e.to_string()))?;

        fs::write(&temp_path, json).map_err(StorageError::Io)?;

        let file = fs::File::open(&temp_path).map_err(StorageError::Io)?;
        file.sync_all().map_err(StorageError::Io)?;

        fs::rename(&temp_path, &path).map_err(|e| {
            log::warn!(
                "Rename of {} to {} failed: {}",
                temp_path.display(),
                path.display(),
                e
            );
            StorageError::WriteAtomic {
                path: path.clone(),
                temp_path: temp_path.clone(),
            }
        })?;

        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        validate_key(key)?;
        let path = self.path_for(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::Io(e).into()),
        };
        let value = serde_json::from_str(&content).map_err(|e| StorageError::Parse {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(Some(value))
    }

    fn set(&self, key: &str, value: &Value) -> Result<()> {
        validate_key(key)?;
        self.write_atomic(key, value)?;
        log::trace!("Wrote {}", key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::Io(e).into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(StorageError::Io)? {
            let entry = entry.map_err(StorageError::Io)?;
            if !entry.file_type().map_err(StorageError::Io)?.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some(key) = name.to_str().and_then(|n| n.strip_suffix(FILE_SUFFIX)) else {
                continue;
            };
            // Stray files that do not round-trip as keys are not ours
            if validate_key(key).is_ok() {
                keys.push(key.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}
