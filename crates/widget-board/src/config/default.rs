//! Default configuration template and file creation utilities.
//!
//! Provides a commented TOML template that matches `Config::default()` and
//! a function to write it to the XDG config path.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::error::ConfigError;
use crate::config::xdg;

/// A commented TOML template with all default values.
///
/// Every value here must match `Config::default()` from `schema.rs`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Widget Board Configuration
#
# All values shown below are the built-in defaults.
# Location: $XDG_CONFIG_HOME/widget-board/config.toml

# ==============================================================================
# Board
# ==============================================================================

[board]

# Breakpoint whose geometry is restored exactly by undo.
# Options: "lg", "md", "sm"
reference_breakpoint = "lg"

# Row span for widget types the catalogue does not know.
fallback_height = 2.0

# Per-type row spans, overriding the built-in catalogue:
#   tasks 4, pomodoro 3, habits 3, notes 3, embed 4, goals 3, clock 2, custom 3
[board.heights]
# weather = 2.5

# ==============================================================================
# Storage
# ==============================================================================

[storage]

# Directory holding one JSON file per namespace.
# Empty means $XDG_DATA_HOME/widget-board. Tilde (~) is expanded.
data_dir = ""

# ==============================================================================
# Trash
# ==============================================================================

[trash]

# Drop target in viewport pixels. A widget dropped so that its box overlaps
# this region (touching edges do not count) is removed.
x = 0.0
y = 0.0
width = 120.0
height = 120.0

# ==============================================================================
# Timer
# ==============================================================================

[timer]

# How often a running pomodoro re-checks its target time.
# Examples: "250ms", "1s"
tick_interval = "1s"

# Phase lengths.
work = "25m"
short_break = "5m"

# ==============================================================================
# Logging
# ==============================================================================

[log]

# Verbosity when WBD_LOG is not set.
# Options: "error", "warn", "info", "debug", "trace"
level = "warn"

# Path to log file. Empty string means stderr.
file = ""
"#;

/// Writes the default config to `path`, or to the XDG location when `None`.
///
/// - If the file exists and `force` is `false`, returns `ConfigError::AlreadyExists`.
/// - If the file exists and `force` is `true`, backs it up to `.toml.backup` first.
/// - Returns the path where the config was written.
pub fn create_default_config(path: Option<&Path>, force: bool) -> Result<PathBuf, ConfigError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => xdg::config_path()?,
    };

    if path.exists() {
        if !force {
            return Err(ConfigError::AlreadyExists { path });
        }
        let backup_path = path.with_extension("toml.backup");
        fs::rename(&path, &backup_path).map_err(|e| ConfigError::WriteError {
            path: backup_path.clone(),
            source: e,
        })?;
        tracing::info!("Backed up existing config to {}", backup_path.display());
    }

    write_default_config(&path)?;
    tracing::info!("Created default configuration at {}", path.display());
    Ok(path)
}

/// Writes the default template to `path`, creating parent dirs and setting 0600 permissions.
fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let write_error = |source| ConfigError::WriteError {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        xdg::ensure_dir(parent).map_err(write_error)?;
    }
    fs::write(path, DEFAULT_CONFIG_TEMPLATE).map_err(write_error)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(write_error)?;
    }

    Ok(())
}
