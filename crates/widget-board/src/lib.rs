//! Widget Board library
//!
//! This crate provides the core of a personal productivity dashboard: a grid
//! of widgets (tasks, pomodoro timer, habit trackers, notes, embeds) whose
//! placement is edited by drag and drop and persisted locally.
//!
//! # Components
//!
//! - [`engine::LayoutEngine`]: which widgets exist and where, per breakpoint,
//!   including drag-to-trash removal with one-level undo
//! - [`drag::DragTracker`]: the drag/drop interaction state machine and the
//!   trash hit-test
//! - [`content::ContentStore`]: per-widget JSON records with shallow-merge writes
//! - [`board::Board`]: one storage backend wired to both stores, plus
//!   templates, backups and the auxiliary namespaces
//!
//! The layout engine and the content store are independent; they are
//! correlated only by the convention that a widget's content key is its id.

#![warn(missing_docs)]

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Board service combining storage, layout and content.
pub mod board;

/// Configuration loading, schema and XDG path resolution.
pub mod config;

/// Per-widget content records.
pub mod content;

/// Drag/drop interaction state machine and trash hit-testing.
pub mod drag;

/// Layout engine: widget set, per-breakpoint geometry, trash/undo.
pub mod engine;

/// Built-in and user-saved layout templates.
pub mod layout;

/// Logging initialization.
pub mod logging;

/// Pomodoro countdown and polling ticker.
pub mod timer;

/// Widget catalogue and user-authored custom widgets.
pub mod widgets;

/// Storage namespace keys.
mod keys;
pub use keys::StorageKey;

/// Application name written into and required from backup files.
pub const APP_NAME: &str = "widget-board";

/// Opaque identifier of one widget instance, e.g. `pomodoro-ab12cd3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(String);

impl WidgetId {
    /// Wraps an existing identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the widget-type tag the id was generated from.
    ///
    /// Ids are `<type-tag>-<suffix>`; ids without a `-` are returned whole.
    pub fn type_tag(&self) -> &str {
        self.0.rsplit_once('-').map_or(&self.0, |(tag, _)| tag)
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WidgetId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for WidgetId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for WidgetId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for WidgetId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Responsive viewport-width tier with its own widget geometry.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    /// Wide screens; the reference breakpoint by default.
    #[default]
    Lg,
    /// Medium screens.
    Md,
    /// Narrow screens.
    Sm,
}

impl Breakpoint {
    /// Every breakpoint, widest first.
    pub const ALL: [Breakpoint; 3] = [Breakpoint::Lg, Breakpoint::Md, Breakpoint::Sm];

    /// Number of grid columns available at this breakpoint.
    pub fn columns(self) -> u32 {
        match self {
            Breakpoint::Lg => 3,
            Breakpoint::Md => 2,
            Breakpoint::Sm => 1,
        }
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Breakpoint::Lg => "lg",
            Breakpoint::Md => "md",
            Breakpoint::Sm => "sm",
        };
        write!(f, "{}", s)
    }
}

/// Error type for parsing Breakpoint from string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseBreakpointError(pub String);

impl fmt::Display for ParseBreakpointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid breakpoint: {} (expected lg, md or sm)", self.0)
    }
}

impl std::error::Error for ParseBreakpointError {}

impl FromStr for Breakpoint {
    type Err = ParseBreakpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lg" => Ok(Breakpoint::Lg),
            "md" => Ok(Breakpoint::Md),
            "sm" => Ok(Breakpoint::Sm),
            _ => Err(ParseBreakpointError(s.to_string())),
        }
    }
}

/// One widget's position and size on a single breakpoint's grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutEntry {
    /// Widget this geometry belongs to.
    pub id: WidgetId,
    /// Column of the left edge.
    pub x: u32,
    /// Row of the top edge.
    pub y: u32,
    /// Column span.
    pub w: u32,
    /// Row span; may be fractional.
    pub h: f64,
}

impl LayoutEntry {
    /// Creates an entry at `(x, y)` spanning `w` columns and `h` rows.
    pub fn new(id: impl Into<WidgetId>, x: u32, y: u32, w: u32, h: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            w,
            h,
        }
    }

    /// First row below this entry (`ceil(y + h)`).
    pub fn bottom(&self) -> u32 {
        let extent = f64::from(self.y) + self.h.max(0.0);
        extent.ceil() as u32
    }
}

/// Per-breakpoint geometry. Entry order carries no meaning.
pub type Layouts = BTreeMap<Breakpoint, Vec<LayoutEntry>>;

/// Returns the first free row of `entries`, or 0 when empty.
pub fn bottom_row(entries: &[LayoutEntry]) -> u32 {
    entries.iter().map(LayoutEntry::bottom).max().unwrap_or(0)
}

/// Which widgets exist and where they sit on every breakpoint.
///
/// Serialized as `{ "widgetIds": [...], "layouts": { "lg": [...], ... } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    /// Active widget ids in insertion order.
    #[serde(default)]
    pub widget_ids: IndexSet<WidgetId>,
    /// Geometry per breakpoint.
    #[serde(default)]
    pub layouts: Layouts,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            widget_ids: IndexSet::new(),
            layouts: Breakpoint::ALL.iter().map(|bp| (*bp, Vec::new())).collect(),
        }
    }
}

impl DashboardState {
    /// Verifies that every present breakpoint holds exactly one entry per widget id.
    ///
    /// # Errors
    ///
    /// Returns `BoardError::Inconsistent` for the first breakpoint whose ids
    /// differ from `widget_ids` or contain duplicates.
    pub fn check_consistency(&self) -> Result<(), BoardError> {
        let expected: BTreeSet<&WidgetId> = self.widget_ids.iter().collect();
        for (breakpoint, entries) in &self.layouts {
            let mut seen = BTreeSet::new();
            let mut duplicates = Vec::new();
            for entry in entries {
                if !seen.insert(&entry.id) {
                    duplicates.push(entry.id.clone());
                }
            }
            let missing: Vec<WidgetId> = expected.difference(&seen).map(|id| (*id).clone()).collect();
            let extra: Vec<WidgetId> = seen.difference(&expected).map(|id| (*id).clone()).collect();
            if !missing.is_empty() || !extra.is_empty() || !duplicates.is_empty() {
                return Err(BoardError::Inconsistent {
                    breakpoint: *breakpoint,
                    missing,
                    extra,
                    duplicates,
                });
            }
        }
        Ok(())
    }

    /// Returns `true` if [`check_consistency`](Self::check_consistency) passes.
    pub fn is_consistent(&self) -> bool {
        self.check_consistency().is_ok()
    }
}

/// The most recent undoable removal.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRemoval {
    /// Removed widget.
    pub id: WidgetId,
    /// Breakpoint the snapshot was taken from; normally the reference one.
    pub breakpoint: Breakpoint,
    /// Geometry captured just before removal.
    pub snapshot: LayoutEntry,
}

/// Change notification broadcast by the stores.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardUpdate {
    /// A widget was added to every breakpoint.
    WidgetAdded(WidgetId),
    /// A widget was removed and is pending undo.
    WidgetRemoved(WidgetId),
    /// The pending removal was undone.
    RemovalUndone(WidgetId),
    /// Geometry was replaced by the grid.
    LayoutsChanged,
    /// Widget set and geometry were replaced wholesale.
    StateReplaced,
    /// A content record was patched.
    ContentChanged(String),
    /// Every content record was replaced.
    ContentReplaced,
}

/// Errors from the dashboard core.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// `add_widget` was called with an empty type tag.
    #[error("Widget type tag must not be empty")]
    EmptyTypeTag,

    /// A default widget height was not a positive finite number.
    #[error("Default height for '{tag}' must be a positive number, got {height}")]
    InvalidHeight {
        /// Type tag, or `*` for the fallback height.
        tag: String,
        /// Rejected height.
        height: f64,
    },

    /// Storage backend failure.
    #[error(transparent)]
    Storage(#[from] board_storage::Error),

    /// Configuration could not be resolved.
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    /// A stored namespace does not have the expected shape.
    #[error("Stored value for '{key}' is corrupt: {message}")]
    Corrupt {
        /// Namespace key.
        key: String,
        /// Description of the problem.
        message: String,
    },

    /// Layout ids diverge from the widget set.
    #[error("Layout for {breakpoint} is inconsistent (missing: {missing:?}, extra: {extra:?}, duplicates: {duplicates:?})")]
    Inconsistent {
        /// Breakpoint that failed the check.
        breakpoint: Breakpoint,
        /// Widget ids with no entry.
        missing: Vec<WidgetId>,
        /// Entry ids that are not active widgets.
        extra: Vec<WidgetId>,
        /// Entry ids that appear more than once.
        duplicates: Vec<WidgetId>,
    },

    /// A content patch or namespace patch was not a JSON object.
    #[error("Expected a JSON object, got: {0}")]
    NotAnObject(String),

    /// No built-in or saved template has this name.
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// A saved template may not reuse a built-in template's name.
    #[error("Template name is reserved for a built-in template: {0}")]
    ReservedTemplateName(String),

    /// A custom widget definition failed validation.
    #[error("Invalid custom widget: {0}")]
    InvalidCustomWidget(String),

    /// No custom widget has this id.
    #[error("Custom widget not found: {0}")]
    CustomWidgetNotFound(String),
}

#[cfg(test)]
mod tests;
