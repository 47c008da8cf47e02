//! User-authored custom widgets.
//!
//! A custom widget is a small HTML/CSS/JS bundle. It is rendered as a single
//! standalone document and shown inside a sandboxed frame that may run
//! scripts but cannot navigate the top-level page or share storage.
//!
//! Definitions are persisted in the `custom-widgets` namespace as a JSON
//! array, managed through [`CustomWidgetLibrary`].

use crate::{BoardError, StorageKey};
use board_storage::KeyValueStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// `sandbox` attribute for the embedding frame: scripts only.
pub const SANDBOX_POLICY: &str = "allow-scripts";

/// A user-authored widget definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomWidget {
    /// Stable identifier.
    pub id: String,
    /// Display name; must not be blank.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Body markup.
    #[serde(default)]
    pub html: String,
    /// Stylesheet inlined into a `<style>` element.
    #[serde(default)]
    pub css: String,
    /// Script inlined into a `<script>` element.
    #[serde(default)]
    pub js: String,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl CustomWidget {
    /// Creates a definition stamped with the current time.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            html: String::new(),
            css: String::new(),
            js: String::new(),
            updated_at: Utc::now(),
        }
    }

    /// Checks the fields a definition needs before it is stored.
    pub fn validate(&self) -> Result<(), BoardError> {
        if self.id.trim().is_empty() {
            return Err(BoardError::InvalidCustomWidget("id must not be empty".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(BoardError::InvalidCustomWidget(
                "name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Renders the widget as one standalone HTML document.
    ///
    /// CSS goes into a `<style>` element in the head and JS into a
    /// `<script>` element at the end of the body. Closing tags inside the
    /// user's CSS or JS are escaped so they cannot terminate the element early.
    pub fn render_document(&self) -> String {
        let css = escape_closing_tag(&self.css, "style");
        let js = escape_closing_tag(&self.js, "script");
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>\n{css}\n</style>\n</head>\n<body>\n{html}\n<script>\n{js}\n</script>\n</body>\n</html>\n",
            html = self.html,
        )
    }

    /// Renders a sandboxed `<iframe>` whose `srcdoc` is the widget document.
    pub fn render_frame(&self) -> String {
        format!(
            "<iframe title=\"{}\" sandbox=\"{}\" srcdoc=\"{}\"></iframe>",
            escape_attribute(&self.name),
            SANDBOX_POLICY,
            escape_attribute(&self.render_document())
        )
    }
}

fn escape_closing_tag(source: &str, tag: &str) -> String {
    let needle = format!("</{tag}");
    let lower = source.to_ascii_lowercase();
    let mut out = String::with_capacity(source.len());
    let mut last = 0;
    for (idx, _) in lower.match_indices(&needle) {
        out.push_str(&source[last..idx]);
        out.push_str("<\\/");
        last = idx + 2;
    }
    out.push_str(&source[last..]);
    out
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Persisted collection of custom widget definitions.
pub struct CustomWidgetLibrary {
    storage: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for CustomWidgetLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomWidgetLibrary").finish_non_exhaustive()
    }
}

impl CustomWidgetLibrary {
    /// Creates a library backed by `storage`.
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Returns every definition in stored order.
    pub fn list(&self) -> Result<Vec<CustomWidget>, BoardError> {
        let key = StorageKey::CustomWidgets.as_str();
        match self.storage.get(key)? {
            None => Ok(Vec::new()),
            Some(value) => serde_json::from_value(value).map_err(|e| BoardError::Corrupt {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// Looks up one definition by id.
    pub fn get(&self, id: &str) -> Result<Option<CustomWidget>, BoardError> {
        Ok(self.list()?.into_iter().find(|w| w.id == id))
    }

    /// Inserts or replaces the definition with the same id.
    ///
    /// `updated_at` is stamped with the current time. Returns the stored definition.
    pub fn upsert(&self, mut widget: CustomWidget) -> Result<CustomWidget, BoardError> {
        widget.validate()?;
        widget.updated_at = Utc::now();
        let mut widgets = self.list()?;
        match widgets.iter_mut().find(|w| w.id == widget.id) {
            Some(existing) => *existing = widget.clone(),
            None => widgets.push(widget.clone()),
        }
        self.save(&widgets)?;
        tracing::debug!("Stored custom widget {}", widget.id);
        Ok(widget)
    }

    /// Removes a definition.
    ///
    /// # Errors
    ///
    /// Returns `BoardError::CustomWidgetNotFound` if no definition has this id.
    pub fn remove(&self, id: &str) -> Result<CustomWidget, BoardError> {
        let mut widgets = self.list()?;
        let pos = widgets
            .iter()
            .position(|w| w.id == id)
            .ok_or_else(|| BoardError::CustomWidgetNotFound(id.to_string()))?;
        let removed = widgets.remove(pos);
        self.save(&widgets)?;
        Ok(removed)
    }

    fn save(&self, widgets: &[CustomWidget]) -> Result<(), BoardError> {
        let value = serde_json::to_value(widgets).map_err(|e| BoardError::Corrupt {
            key: StorageKey::CustomWidgets.as_str().to_string(),
            message: e.to_string(),
        })?;
        self.storage.set(StorageKey::CustomWidgets.as_str(), &value)?;
        Ok(())
    }
}
