//! Widget catalogue for the dashboard.
//!
//! The layout engine only needs one fact about a widget type when it is
//! added: how tall its grid cell starts out. The [`WidgetCatalog`] maps
//! widget-type tags to those default heights, falling back to a constant for
//! tags it does not know. Rendering widgets is left to the front end.
//!
//! User-authored widgets live in [`custom`].
//!
//! # Example
//!
//! ```
//! use widget_board::widgets::WidgetCatalog;
//!
//! let catalog = WidgetCatalog::new();
//! assert_eq!(catalog.default_height("tasks"), 4.0);
//! assert_eq!(catalog.default_height("never-heard-of-it"), 2.0);
//! ```

/// User-authored HTML widgets.
pub mod custom;

use crate::BoardError;
use std::collections::HashMap;

/// Height used for widget types that are not in the catalogue.
pub const FALLBACK_HEIGHT: f64 = 2.0;

/// Built-in widget types and their default row spans.
const BUILTIN_HEIGHTS: &[(&str, f64)] = &[
    ("tasks", 4.0),
    ("pomodoro", 3.0),
    ("habits", 3.0),
    ("notes", 3.0),
    ("embed", 4.0),
    ("goals", 3.0),
    ("clock", 2.0),
    ("custom", 3.0),
];

/// Registry mapping widget-type tags to default heights.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetCatalog {
    heights: HashMap<String, f64>,
    fallback: f64,
}

impl WidgetCatalog {
    /// Creates a catalogue with the built-in widget types.
    ///
    /// The following type tags are registered by default:
    /// `tasks`, `pomodoro`, `habits`, `notes`, `embed`, `goals`, `clock`, `custom`.
    pub fn new() -> Self {
        Self {
            heights: BUILTIN_HEIGHTS
                .iter()
                .map(|(tag, h)| (tag.to_string(), *h))
                .collect(),
            fallback: FALLBACK_HEIGHT,
        }
    }

    /// Replaces the fallback height for unknown types.
    ///
    /// Fails with [`BoardError::InvalidHeight`] unless `fallback` is finite
    /// and positive.
    pub fn with_fallback(mut self, fallback: f64) -> Result<Self, BoardError> {
        check_height("*", fallback)?;
        self.fallback = fallback;
        Ok(self)
    }

    /// Register a default height for the given type tag.
    ///
    /// Overwrites any existing height for the same tag. Non-finite and
    /// non-positive heights are rejected and leave the catalogue unchanged.
    pub fn register(&mut self, tag: impl Into<String>, height: f64) -> Result<(), BoardError> {
        let tag = tag.into();
        check_height(&tag, height)?;
        self.heights.insert(tag, height);
        Ok(())
    }

    /// Default height for `tag`, or the fallback when the tag is unknown.
    pub fn default_height(&self, tag: &str) -> f64 {
        self.heights.get(tag).copied().unwrap_or(self.fallback)
    }

    /// Returns `true` if `tag` has a registered height.
    pub fn is_known(&self, tag: &str) -> bool {
        self.heights.contains_key(tag)
    }

    /// List all registered type tags in alphabetical order.
    pub fn known_types(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.heights.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}

fn check_height(tag: &str, height: f64) -> Result<(), BoardError> {
    if height.is_finite() && height > 0.0 {
        Ok(())
    } else {
        Err(BoardError::InvalidHeight {
            tag: tag.to_string(),
            height,
        })
    }
}

impl Default for WidgetCatalog {
    fn default() -> Self {
        Self::new()
    }
}
