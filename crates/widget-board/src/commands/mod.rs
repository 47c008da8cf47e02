//! Command implementations for the `wbd` CLI.
//!
//! Handlers are grouped by domain:
//! - `widget` - add, remove, undo, list, drop, layouts
//! - `content` - per-widget content records
//! - `template` - built-in and saved layout templates
//! - `backup` - export and import of every namespace
//! - `custom` - user-authored custom widgets
//! - `pomodoro` - countdown control and the polling driver
//! - `config` - configuration file management

pub(crate) mod backup;
pub(crate) mod config;
pub(crate) mod content;
pub(crate) mod custom;
pub(crate) mod pomodoro;
pub(crate) mod template;
pub(crate) mod widget;

pub(crate) use backup::*;
pub(crate) use config::*;
pub(crate) use content::*;
pub(crate) use custom::*;
pub(crate) use pomodoro::*;
pub(crate) use template::*;
pub(crate) use widget::*;

use std::path::PathBuf;
use widget_board::config::ConfigError;
use widget_board::BoardError;

/// Errors surfaced by command handlers.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to start async runtime: {0}")]
    Runtime(std::io::Error),

    /// A destructive command was run without `--yes`.
    #[error("Refusing to {0} without --yes")]
    NotConfirmed(&'static str),

    #[error("{0}")]
    Usage(String),
}

/// Fails with `NotConfirmed` unless the user passed `--yes`.
pub(crate) fn require_confirmation(yes: bool, action: &'static str) -> Result<(), CliError> {
    if yes {
        Ok(())
    } else {
        Err(CliError::NotConfirmed(action))
    }
}

/// Prints `value` as indented JSON.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
