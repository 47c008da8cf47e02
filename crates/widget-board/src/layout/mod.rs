//! Layout templates for the dashboard.
//!
//! A template is a complete dashboard: widget ids, their geometry on every
//! breakpoint and optionally seed content for those widgets. Built-in
//! templates live in [`presets`]; user-saved templates are persisted in the
//! `layout-templates` namespace and managed by [`TemplateManager`].

/// Built-in templates.
pub mod presets;

use crate::content::ContentRecord;
use crate::{BoardError, DashboardState, Layouts, StorageKey, WidgetId};
use board_storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

pub use presets::{BUILTIN_TEMPLATES, DEFAULT_TEMPLATE};

/// A named dashboard that can be applied wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutTemplate {
    /// Template name, unique across built-in and saved templates.
    pub name: String,
    /// Widget ids in display order.
    pub widget_ids: Vec<WidgetId>,
    /// Geometry per breakpoint.
    pub layouts: Layouts,
    /// Content records to load alongside the layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<BTreeMap<String, ContentRecord>>,
}

impl LayoutTemplate {
    /// Creates a template without seed contents.
    pub fn new(name: impl Into<String>, layouts: Layouts, widget_ids: Vec<WidgetId>) -> Self {
        Self {
            name: name.into(),
            widget_ids,
            layouts,
            contents: None,
        }
    }

    /// Attaches seed contents.
    pub fn with_contents(mut self, contents: BTreeMap<String, ContentRecord>) -> Self {
        self.contents = Some(contents);
        self
    }

    /// The dashboard state this template produces.
    pub fn to_state(&self) -> DashboardState {
        DashboardState {
            widget_ids: self.widget_ids.iter().cloned().collect(),
            layouts: self.layouts.clone(),
        }
    }
}

/// Built-in templates plus the user's saved ones.
pub struct TemplateManager {
    storage: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for TemplateManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateManager").finish_non_exhaustive()
    }
}

impl TemplateManager {
    /// Manager for the templates saved in `storage`.
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// User-saved templates in the order they were first saved.
    pub fn saved(&self) -> Result<Vec<LayoutTemplate>, BoardError> {
        let key = StorageKey::LayoutTemplates.as_str();
        match self.storage.get(key)? {
            None => Ok(Vec::new()),
            Some(value) => serde_json::from_value(value).map_err(|e| BoardError::Corrupt {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// Names of every template: built-ins first, then saved ones.
    pub fn names(&self) -> Result<Vec<String>, BoardError> {
        let mut names: Vec<String> = BUILTIN_TEMPLATES.iter().map(|n| n.to_string()).collect();
        names.extend(self.saved()?.into_iter().map(|t| t.name));
        Ok(names)
    }

    /// Looks up a template by name.
    ///
    /// # Errors
    ///
    /// Returns `BoardError::TemplateNotFound` if no built-in or saved
    /// template has this name.
    pub fn get(&self, name: &str) -> Result<LayoutTemplate, BoardError> {
        if let Some(template) = presets::builtin(name) {
            return Ok(template);
        }
        self.saved()?
            .into_iter()
            .find(|t| t.name == name)
            .ok_or_else(|| BoardError::TemplateNotFound(name.to_string()))
    }

    /// Stores `template`, replacing a saved template with the same name.
    pub fn save(&self, template: LayoutTemplate) -> Result<(), BoardError> {
        if presets::builtin(&template.name).is_some() {
            return Err(BoardError::ReservedTemplateName(template.name));
        }
        let mut saved = self.saved()?;
        match saved.iter_mut().find(|t| t.name == template.name) {
            Some(existing) => *existing = template,
            None => saved.push(template),
        }
        self.write(&saved)
    }

    /// Deletes a saved template. Built-ins cannot be deleted.
    pub fn delete(&self, name: &str) -> Result<(), BoardError> {
        if presets::builtin(name).is_some() {
            return Err(BoardError::ReservedTemplateName(name.to_string()));
        }
        let mut saved = self.saved()?;
        let before = saved.len();
        saved.retain(|t| t.name != name);
        if saved.len() == before {
            return Err(BoardError::TemplateNotFound(name.to_string()));
        }
        self.write(&saved)
    }

    fn write(&self, saved: &[LayoutTemplate]) -> Result<(), BoardError> {
        let key = StorageKey::LayoutTemplates.as_str();
        let value = serde_json::to_value(saved).map_err(|e| BoardError::Corrupt {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.storage.set(key, &value)?;
        tracing::debug!("Stored {} saved templates", saved.len());
        Ok(())
    }
}
