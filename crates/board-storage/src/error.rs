//! Error types for board-storage
//!
//! This module defines the error hierarchy using thiserror for structured
//! error handling across storage backends and backup files.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type
#[derive(Debug, Error)]
pub enum Error {
    /// Storage backend error
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Backup file error
    #[error(transparent)]
    Backup(#[from] BackupError),
}

/// Storage backend errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error reading or writing the storage directory
    #[error("Failed to access storage: {0}")]
    Io(#[source] std::io::Error),

    /// Stored value is not valid JSON
    #[error("Failed to parse stored value for '{key}': {message}")]
    Parse {
        /// Key whose value could not be parsed
        key: String,
        /// Parser message
        message: String,
    },

    /// Value could not be serialized
    #[error("Failed to serialize value: {0}")]
    Serialize(String),

    /// Failed to write a value atomically
    #[error("Failed to write value atomically: {path} - Safety copy at: {temp_path}")]
    WriteAtomic {
        /// Path to the value file
        path: PathBuf,
        /// Path to the temporary safety copy
        temp_path: PathBuf,
    },

    /// Key cannot be used as a storage namespace
    #[error("Invalid storage key: '{0}'")]
    InvalidKey(String),
}

/// Backup file errors
#[derive(Debug, Error)]
pub enum BackupError {
    /// Backup was produced by a different application
    #[error("Backup belongs to '{found}', expected '{expected}'")]
    AppMismatch {
        /// Application name this build accepts
        expected: String,
        /// Application name found in the file
        found: String,
    },

    /// Backup does not have the expected shape
    #[error("Malformed backup file: {0}")]
    Malformed(String),
}

/// Result type alias for board-storage operations
pub type Result<T> = std::result::Result<T, Error>;
