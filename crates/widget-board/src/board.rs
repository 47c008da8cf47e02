//! The board service.
//!
//! [`Board`] wires one storage backend to a [`LayoutEngine`] and a
//! [`ContentStore`] and hosts the flows that span both: templates, reset,
//! backup import/export and raw access to the auxiliary namespaces.

use crate::config::Config;
use crate::content::{parse_records, ContentRecord, ContentStore};
use crate::engine::{EngineOptions, LayoutEngine};
use crate::layout::{LayoutTemplate, TemplateManager, DEFAULT_TEMPLATE};
use crate::timer::{Countdown, PomodoroCounters, CONTENT_FIELD};
use crate::widgets::custom::CustomWidgetLibrary;
use crate::{BoardError, DashboardState, StorageKey, APP_NAME};
use board_storage::{BackupError, BackupFile, FileStore, KeyValueStore};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

/// Version written into exported backups.
pub const BACKUP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Layout engine and content store sharing one storage backend.
pub struct Board {
    storage: Arc<dyn KeyValueStore>,
    layout: LayoutEngine,
    content: ContentStore,
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("layout", &self.layout)
            .field("content", &self.content)
            .finish()
    }
}

impl Board {
    /// Opens both stores on `storage`.
    pub fn open(storage: Arc<dyn KeyValueStore>, options: EngineOptions) -> Result<Self, BoardError> {
        let layout = LayoutEngine::open(storage.clone(), options)?;
        let content = ContentStore::open(storage.clone())?;
        Ok(Self {
            storage,
            layout,
            content,
        })
    }

    /// Opens a board persisted as JSON files under `dir`.
    pub fn open_dir(dir: &Path, options: EngineOptions) -> Result<Self, BoardError> {
        let store = FileStore::open(dir)?;
        Self::open(Arc::new(store), options)
    }

    /// Opens the board at the configured data directory.
    pub fn from_config(config: &Config) -> Result<Self, BoardError> {
        let dir = config.storage.resolve_data_dir()?;
        tracing::debug!("Opening board at {}", dir.display());
        Self::open_dir(&dir, config.board.engine_options()?)
    }

    /// Widget set and geometry.
    pub fn layout(&self) -> &LayoutEngine {
        &self.layout
    }

    /// Mutable widget set and geometry.
    pub fn layout_mut(&mut self) -> &mut LayoutEngine {
        &mut self.layout
    }

    /// Per-widget content records.
    pub fn content(&self) -> &ContentStore {
        &self.content
    }

    /// Mutable per-widget content records.
    pub fn content_mut(&mut self) -> &mut ContentStore {
        &mut self.content
    }

    /// Backend every namespace is written to.
    pub fn storage(&self) -> &Arc<dyn KeyValueStore> {
        &self.storage
    }

    // -- Namespaces ---------------------------------------------------------

    /// Raw value of a namespace.
    pub fn namespace_get(&self, key: StorageKey) -> Result<Option<Value>, BoardError> {
        Ok(self.storage.get(key.as_str())?)
    }

    /// Overwrites a namespace. Writing the layout or content namespace
    /// reloads the corresponding store.
    pub fn namespace_put(&mut self, key: StorageKey, value: &Value) -> Result<(), BoardError> {
        self.check_shape(key, value)?;
        self.storage.set(key.as_str(), value)?;
        self.reload_if_owned(key)
    }

    /// Shallow-merges `patch` into an object-shaped namespace, creating it
    /// when absent. Returns the merged value.
    pub fn namespace_patch(&mut self, key: StorageKey, patch: ContentRecord) -> Result<Value, BoardError> {
        let mut base = match self.storage.get(key.as_str())? {
            None => ContentRecord::new(),
            Some(Value::Object(map)) => map,
            Some(other) => return Err(BoardError::NotAnObject(other.to_string())),
        };
        crate::content::shallow_merge(&mut base, patch);
        let merged = Value::Object(base);
        self.namespace_put(key, &merged)?;
        Ok(merged)
    }

    fn check_shape(&self, key: StorageKey, value: &Value) -> Result<(), BoardError> {
        let corrupt = |message: String| BoardError::Corrupt {
            key: key.as_str().to_string(),
            message,
        };
        match key {
            StorageKey::DashboardLayout => serde_json::from_value::<DashboardState>(value.clone())
                .map(|_| ())
                .map_err(|e| corrupt(e.to_string())),
            StorageKey::BoxContents => parse_records(value.clone()).map(|_| ()).map_err(corrupt),
            _ => Ok(()),
        }
    }

    fn reload_if_owned(&mut self, key: StorageKey) -> Result<(), BoardError> {
        match key {
            StorageKey::DashboardLayout => self.layout.reload(),
            StorageKey::BoxContents => self.content.reload(),
            _ => Ok(()),
        }
    }

    // -- Backup -------------------------------------------------------------

    /// Snapshots every namespace present in storage.
    pub fn export_backup(&self) -> Result<BackupFile, BoardError> {
        Ok(BackupFile::export(
            self.storage.as_ref(),
            APP_NAME,
            BACKUP_VERSION,
        )?)
    }

    /// Restores `backup` and reloads both stores from storage.
    ///
    /// The file is checked completely first: wrong application, malformed
    /// metadata, or a layout/content namespace of the wrong shape rejects it
    /// before any key is written. Namespaces absent from the backup are left
    /// as they are. Returns the number of namespaces written.
    pub fn import_backup(&mut self, backup: &BackupFile) -> Result<usize, BoardError> {
        backup.validate(APP_NAME)?;
        for (key, value) in &backup.data {
            if let Ok(known) = key.parse::<StorageKey>() {
                self.check_shape(known, value).map_err(|e| {
                    board_storage::Error::from(BackupError::Malformed(e.to_string()))
                })?;
            }
        }
        let written = backup.restore(self.storage.as_ref(), APP_NAME)?;
        self.layout.reload()?;
        self.content.reload()?;
        tracing::info!("Imported backup from {} ({} namespaces)", backup.meta.date, written);
        Ok(written)
    }

    // -- Templates ----------------------------------------------------------

    /// Built-in and saved layout templates.
    pub fn templates(&self) -> TemplateManager {
        TemplateManager::new(self.storage.clone())
    }

    /// Replaces the dashboard with the template called `name`.
    ///
    /// Seed contents, when the template has them, replace every content
    /// record. Without them existing records are kept.
    pub fn apply_template(&mut self, name: &str) -> Result<LayoutTemplate, BoardError> {
        let template = self.templates().get(name)?;
        self.layout
            .load_dashboard_state(template.widget_ids.iter().cloned(), template.layouts.clone());
        if let Some(contents) = &template.contents {
            self.content.load_all_contents(contents.clone());
        }
        tracing::info!("Applied template '{}'", template.name);
        Ok(template)
    }

    /// Applies the built-in default template.
    pub fn reset_to_default(&mut self) -> Result<(), BoardError> {
        self.apply_template(DEFAULT_TEMPLATE).map(|_| ())
    }

    /// Saves the current dashboard, with its widgets' content, under `name`.
    pub fn save_template(&self, name: &str) -> Result<LayoutTemplate, BoardError> {
        let state = self.layout.state();
        let contents = state
            .widget_ids
            .iter()
            .filter(|id| self.content.contains(id.as_str()))
            .map(|id| (id.to_string(), self.content.get_box_content(id.as_str())))
            .collect();
        let template = LayoutTemplate::new(
            name.trim(),
            state.layouts.clone(),
            state.widget_ids.iter().cloned().collect(),
        )
        .with_contents(contents);
        self.templates().save(template.clone())?;
        Ok(template)
    }

    // -- Widgets ------------------------------------------------------------

    /// User-authored widgets saved on this board.
    pub fn custom_widgets(&self) -> CustomWidgetLibrary {
        CustomWidgetLibrary::new(self.storage.clone())
    }

    /// Completed work phases per pomodoro widget.
    pub fn pomodoro_counters(&self) -> PomodoroCounters {
        PomodoroCounters::new(self.storage.clone())
    }

    /// Countdown stored in the content record of widget `id`; idle if none.
    pub fn countdown(&self, id: &str) -> Result<Countdown, BoardError> {
        match self.content.get_box_content(id).remove(CONTENT_FIELD) {
            None => Ok(Countdown::new()),
            Some(value) => serde_json::from_value(value).map_err(|e| BoardError::Corrupt {
                key: format!("{}.{}", id, CONTENT_FIELD),
                message: e.to_string(),
            }),
        }
    }

    /// Writes `countdown` into the content record of widget `id`.
    pub fn save_countdown(&mut self, id: &str, countdown: &Countdown) -> Result<(), BoardError> {
        let value = serde_json::to_value(countdown).map_err(|e| BoardError::Corrupt {
            key: format!("{}.{}", id, CONTENT_FIELD),
            message: e.to_string(),
        })?;
        let mut patch = ContentRecord::new();
        patch.insert(CONTENT_FIELD.to_string(), value);
        self.content.set_box_content(id, patch);
        Ok(())
    }
}
