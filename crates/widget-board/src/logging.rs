//! Logging initialization for the `wbd` binary.
//!
//! Configures the `tracing` subscriber with level filtering via the `WBD_LOG`
//! environment variable. Falls back to the `[log] level` from the config file
//! when the variable is unset or invalid.
//!
//! # Usage
//!
//! ```bash
//! # Configured level (warn by default)
//! wbd list
//!
//! # Debug level
//! WBD_LOG=debug wbd add tasks
//!
//! # Module-specific filtering
//! WBD_LOG=widget_board::engine=trace,warn wbd undo
//! ```

use crate::config::schema::LogConfig;
use crate::config::xdg;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding filter directives.
pub const LOG_ENV_VAR: &str = "WBD_LOG";

/// Filter from `WBD_LOG`, or from the configured level.
pub fn filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(config.level.as_filter()))
}

/// Initialize the tracing subscriber.
///
/// Output goes to stderr, or is appended to `[log] file` when set. Events
/// from the storage crate's `log` facade are captured as well. Calling this
/// twice keeps the first subscriber.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init(config: &LogConfig) -> std::io::Result<()> {
    let filter = filter(config);
    let builder = fmt().with_env_filter(filter).with_target(false);

    let result = if config.file.trim().is_empty() {
        builder.with_writer(std::io::stderr).try_init()
    } else {
        let path = xdg::expand_tilde(config.file.trim());
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
    };

    if result.is_err() {
        tracing::debug!("Tracing subscriber already initialized");
    }
    Ok(())
}
