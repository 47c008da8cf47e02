//! TOML configuration schema types for widget-board.
//!
//! All structs derive `Deserialize` and `Serialize` with defaults via
//! `#[serde(default)]`, so a partial or empty file is valid.
//!
//! Duration fields use human-readable strings (e.g. `"25m"`, `"1s"`)
//! parsed by the `humantime` crate at the call site.

use crate::config::error::ConfigError;
use crate::config::xdg;
use crate::drag::Rect;
use crate::engine::EngineOptions;
use crate::widgets::{WidgetCatalog, FALLBACK_HEIGHT};
use crate::{BoardError, Breakpoint};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root configuration encompassing all sections.
///
/// ```toml
/// [board]
/// [storage]
/// [trash]
/// [timer]
/// [log]
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Layout engine settings.
    pub board: BoardConfig,
    /// Where persisted namespaces live.
    pub storage: StorageConfig,
    /// Trash drop target.
    pub trash: TrashConfig,
    /// Pomodoro timing.
    pub timer: TimerConfig,
    /// Logging.
    pub log: LogConfig,
}

impl Config {
    /// Checks every value that only fails when used (durations, sizes).
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.board.validate()?;
        self.trash.validate()?;
        self.timer.tick_interval()?;
        self.timer.work()?;
        self.timer.short_break()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// Layout engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct BoardConfig {
    /// Breakpoint whose geometry is kept for undo.
    pub reference_breakpoint: Breakpoint,
    /// Height of widgets whose type has no entry in the catalogue.
    pub fallback_height: f64,
    /// Per-type default heights overriding or extending the catalogue.
    pub heights: BTreeMap<String, f64>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            reference_breakpoint: Breakpoint::Lg,
            fallback_height: FALLBACK_HEIGHT,
            heights: BTreeMap::new(),
        }
    }
}

impl BoardConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let bad = std::iter::once(("board.fallback_height".to_string(), self.fallback_height))
            .chain(
                self.heights
                    .iter()
                    .map(|(tag, h)| (format!("board.heights.{tag}"), *h)),
            )
            .find(|(_, h)| !h.is_finite() || *h <= 0.0);
        match bad {
            Some((field, h)) => Err(ConfigError::InvalidValue {
                field,
                message: format!("height must be a positive number, got {h}"),
            }),
            None => Ok(()),
        }
    }

    /// Catalogue with this section's fallback and overrides applied.
    pub fn catalog(&self) -> Result<WidgetCatalog, BoardError> {
        let mut catalog = WidgetCatalog::new().with_fallback(self.fallback_height)?;
        for (tag, height) in &self.heights {
            catalog.register(tag.clone(), *height)?;
        }
        Ok(catalog)
    }

    /// Options for opening a [`crate::engine::LayoutEngine`].
    pub fn engine_options(&self) -> Result<EngineOptions, BoardError> {
        Ok(EngineOptions {
            reference: self.reference_breakpoint,
            catalog: self.catalog()?,
        })
    }
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// Storage location.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one JSON file per namespace. Empty means the XDG
    /// data directory. `~` is expanded.
    pub data_dir: String,
}

impl StorageConfig {
    /// Resolves the data directory.
    pub fn resolve_data_dir(&self) -> Result<PathBuf, ConfigError> {
        if self.data_dir.trim().is_empty() {
            xdg::data_dir()
        } else {
            Ok(xdg::expand_tilde(self.data_dir.trim()))
        }
    }
}

// ---------------------------------------------------------------------------
// Trash
// ---------------------------------------------------------------------------

/// Trash drop target in viewport pixels.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TrashConfig {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Must be positive.
    pub width: f64,
    /// Must be positive.
    pub height: f64,
}

impl Default for TrashConfig {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 120.0,
            height: 120.0,
        }
    }
}

impl TrashConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.width > 0.0 && self.height > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidValue {
                field: "trash".to_string(),
                message: "width and height must be positive".to_string(),
            })
        }
    }

    /// Drop target for a [`crate::drag::DragTracker`].
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

// ---------------------------------------------------------------------------
// Timer
// ---------------------------------------------------------------------------

/// Pomodoro timing as human-readable durations.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimerConfig {
    /// How often a running countdown is re-checked.
    pub tick_interval: String,
    /// Length of a work phase.
    pub work: String,
    /// Length of a short break.
    pub short_break: String,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            tick_interval: "1s".to_string(),
            work: "25m".to_string(),
            short_break: "5m".to_string(),
        }
    }
}

impl TimerConfig {
    /// Polling period of `wbd pomodoro wait`.
    pub fn tick_interval(&self) -> Result<Duration, ConfigError> {
        parse_duration("timer.tick_interval", &self.tick_interval)
    }

    /// Work phase length.
    pub fn work(&self) -> Result<Duration, ConfigError> {
        parse_duration("timer.work", &self.work)
    }

    /// Short break length.
    pub fn short_break(&self) -> Result<Duration, ConfigError> {
        parse_duration("timer.short_break", &self.short_break)
    }
}

fn parse_duration(field: &str, value: &str) -> Result<Duration, ConfigError> {
    let duration = humantime::parse_duration(value).map_err(|e| ConfigError::InvalidValue {
        field: field.to_string(),
        message: format!("'{value}': {e}"),
    })?;
    if duration.is_zero() {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: "duration must be greater than zero".to_string(),
        });
    }
    Ok(duration)
}

// ---------------------------------------------------------------------------
// Log
// ---------------------------------------------------------------------------

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// Verbosity when `WBD_LOG` is not set.
    pub level: LogLevel,
    /// Path to log file. Empty string means stderr.
    pub file: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            file: String::new(),
        }
    }
}

/// Log verbosity levels (kebab-case in TOML).
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LogLevel {
    /// Only errors.
    Error,
    /// Errors and warnings (default).
    Warn,
    /// Informational messages.
    Info,
    /// Debug-level detail.
    Debug,
    /// Full trace output.
    Trace,
}

impl LogLevel {
    /// Directive string for `tracing_subscriber::EnvFilter`.
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
