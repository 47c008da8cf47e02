//! Platform-aware path resolution for widget-board.
//!
//! On **Linux**, follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/widget-board` or `~/.config/widget-board`
//! - Data: `$XDG_DATA_HOME/widget-board` or `~/.local/share/widget-board`
//!
//! On **macOS**, uses Apple conventions with XDG env var overrides:
//! - Config: `$XDG_CONFIG_HOME/widget-board` or `~/Library/Application Support/widget-board`
//! - Data: `$XDG_DATA_HOME/widget-board` or `~/Library/Application Support/widget-board`

use crate::config::error::ConfigError;
use crate::APP_NAME;
use std::fs;
use std::path::{Path, PathBuf};

/// Returns the configuration directory for widget-board.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/widget-board` (if env var set, any platform)
/// 2. Platform default:
///    - Linux: `~/.config/widget-board`
///    - macOS: `~/Library/Application Support/widget-board`
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg).join(APP_NAME));
    }
    platform_config_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or(ConfigError::NoDirectory {
            what: "config",
            env_var: "XDG_CONFIG_HOME",
        })
}

/// Platform-native config base directory (without XDG override).
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        dirs::config_dir()
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::home_dir().map(|home| home.join(".config"))
    }
}

/// Returns the path to the main configuration file: `config_dir()/config.toml`.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Returns the directory holding the persisted namespaces.
///
/// `$XDG_DATA_HOME/widget-board` when the variable is set, otherwise the
/// platform data directory.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        return Ok(PathBuf::from(xdg).join(APP_NAME));
    }
    board_storage::default_data_dir().ok_or(ConfigError::NoDirectory {
        what: "data",
        env_var: "XDG_DATA_HOME",
    })
}

/// Expands a leading `~` in a path string to the user's home directory.
///
/// If the path does not start with `~`, or no home directory is known, it is
/// returned as-is.
pub fn expand_tilde(path: &str) -> PathBuf {
    let home = dirs::home_dir();
    match (path.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => home.join(rest),
        (None, Some(home)) if path == "~" => home,
        _ => PathBuf::from(path),
    }
}

/// Creates a directory and all parent directories with mode 0700.
///
/// Equivalent to `mkdir -p` with restricted permissions.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    fs::create_dir_all(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o700))?;
    }
    Ok(())
}
