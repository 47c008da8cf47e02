//! Layout engine for the dashboard.
//!
//! The engine owns the set of active widget ids and, for every responsive
//! breakpoint, the geometry of each widget. It is the single source of truth
//! for "which widgets exist and where". Every mutation persists the whole
//! [`DashboardState`] synchronously and broadcasts a [`BoardUpdate`].
//!
//! After each mutating operation the set of entry ids on every present
//! breakpoint equals the widget-id set: no orphaned geometry and no widget
//! without geometry. The one exception is [`LayoutEngine::set_layouts`],
//! which trusts the grid and only logs a mismatch.

use crate::widgets::WidgetCatalog;
use crate::{
    BoardError, BoardUpdate, Breakpoint, DashboardState, LayoutEntry, Layouts, PendingRemoval,
    StorageKey, WidgetId,
};
use board_storage::{KeyValueStore, MemoryStore};
use indexmap::IndexSet;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::broadcast;

#[cfg(test)]
mod tests;

mod bulk;
mod lifecycle;
mod undo;

/// Default capacity for the subscriber notification channel.
const DEFAULT_SUBSCRIBER_CHANNEL_CAPACITY: usize = 256;

/// Tunables for a [`LayoutEngine`].
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    /// Breakpoint whose geometry is captured for undo.
    pub reference: Breakpoint,
    /// Default heights per widget type.
    pub catalog: WidgetCatalog,
}

/// Widget set and per-breakpoint geometry with trash/undo.
///
/// # Example
///
/// ```
/// use widget_board::engine::LayoutEngine;
///
/// let mut engine = LayoutEngine::in_memory();
/// let id = engine.add_widget("tasks").expect("non-empty tag");
/// engine.remove_widget(id.as_str());
/// assert!(!engine.contains(id.as_str()));
/// engine.undo_last_removal();
/// assert!(engine.contains(id.as_str()));
/// ```
pub struct LayoutEngine {
    /// Backend receiving the serialized state after every mutation.
    storage: Arc<dyn KeyValueStore>,
    /// Current widget set and geometry.
    state: DashboardState,
    /// Most recent undoable removal.
    pending: Option<PendingRemoval>,
    /// Every id handed out or loaded this session; never reissued.
    issued: HashSet<WidgetId>,
    /// Breakpoint whose geometry is captured for undo.
    reference: Breakpoint,
    /// Default heights per widget type.
    catalog: WidgetCatalog,
    /// Broadcast channel sender for subscriber notifications.
    update_tx: broadcast::Sender<BoardUpdate>,
}

impl std::fmt::Debug for LayoutEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutEngine")
            .field("state", &self.state)
            .field("pending", &self.pending)
            .field("reference", &self.reference)
            .field("subscriber_count", &self.update_tx.receiver_count())
            .finish()
    }
}

impl LayoutEngine {
    /// Opens the engine, loading any state previously persisted in `storage`.
    ///
    /// # Errors
    ///
    /// Returns `BoardError::Corrupt` if the stored layout cannot be decoded,
    /// or a storage error if it cannot be read.
    pub fn open(storage: Arc<dyn KeyValueStore>, options: EngineOptions) -> Result<Self, BoardError> {
        let (update_tx, _rx) = broadcast::channel(DEFAULT_SUBSCRIBER_CHANNEL_CAPACITY);
        let mut engine = Self {
            storage,
            state: DashboardState::default(),
            pending: None,
            issued: HashSet::new(),
            reference: options.reference,
            catalog: options.catalog,
            update_tx,
        };
        engine.reload()?;
        Ok(engine)
    }

    /// Creates an empty engine backed by a fresh [`MemoryStore`].
    pub fn in_memory() -> Self {
        let (update_tx, _rx) = broadcast::channel(DEFAULT_SUBSCRIBER_CHANNEL_CAPACITY);
        Self {
            storage: Arc::new(MemoryStore::new()),
            state: DashboardState::default(),
            pending: None,
            issued: HashSet::new(),
            reference: Breakpoint::default(),
            catalog: WidgetCatalog::default(),
            update_tx,
        }
    }

    /// Re-reads the persisted state, discarding in-memory state and any pending undo.
    pub fn reload(&mut self) -> Result<(), BoardError> {
        let key = StorageKey::DashboardLayout.as_str();
        self.state = match self.storage.get(key)? {
            None => DashboardState::default(),
            Some(value) => serde_json::from_value(value).map_err(|e| BoardError::Corrupt {
                key: key.to_string(),
                message: e.to_string(),
            })?,
        };
        self.pending = None;
        self.issued.extend(self.state.widget_ids.iter().cloned());
        if let Err(e) = self.state.check_consistency() {
            tracing::warn!("Persisted layout is inconsistent: {}", e);
        }
        tracing::debug!("Loaded dashboard with {} widgets", self.state.widget_ids.len());
        Ok(())
    }

    /// Returns the full state.
    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Active widget ids in insertion order.
    pub fn widget_ids(&self) -> &IndexSet<WidgetId> {
        &self.state.widget_ids
    }

    /// Geometry for every breakpoint.
    pub fn layouts(&self) -> &Layouts {
        &self.state.layouts
    }

    /// Geometry of `id` on `breakpoint`, if any.
    pub fn entry(&self, breakpoint: Breakpoint, id: &str) -> Option<&LayoutEntry> {
        self.state
            .layouts
            .get(&breakpoint)?
            .iter()
            .find(|entry| entry.id.as_str() == id)
    }

    /// Returns `true` if `id` is an active widget.
    pub fn contains(&self, id: &str) -> bool {
        self.state.widget_ids.contains(id)
    }

    /// Breakpoint whose geometry is captured for undo.
    pub fn reference(&self) -> Breakpoint {
        self.reference
    }

    /// Default heights used by [`add_widget`](Self::add_widget).
    pub fn catalog(&self) -> &WidgetCatalog {
        &self.catalog
    }

    /// Verifies the layout invariant for every present breakpoint.
    pub fn check_consistency(&self) -> Result<(), BoardError> {
        self.state.check_consistency()
    }

    /// Subscribes to layout change notifications.
    ///
    /// Multiple subscribers can exist simultaneously; all receive the same
    /// updates in mutation order.
    pub fn subscribe(&self) -> broadcast::Receiver<BoardUpdate> {
        self.update_tx.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.update_tx.receiver_count()
    }

    /// Breakpoints a new widget must be placed on.
    ///
    /// Every breakpoint already present in the layouts; all of them when
    /// none is present yet.
    pub(super) fn target_breakpoints(&self) -> Vec<Breakpoint> {
        if self.state.layouts.is_empty() {
            Breakpoint::ALL.to_vec()
        } else {
            self.state.layouts.keys().copied().collect()
        }
    }

    /// Writes the state to storage. Failures are logged, not propagated.
    pub(super) fn persist(&self) {
        let key = StorageKey::DashboardLayout.as_str();
        let result = serde_json::to_value(&self.state)
            .map_err(|e| e.to_string())
            .and_then(|value| self.storage.set(key, &value).map_err(|e| e.to_string()));
        if let Err(e) = result {
            tracing::warn!("Failed to persist dashboard layout: {}", e);
        }
    }

    /// Broadcasts a change notification to all subscribers.
    pub(super) fn notify(&self, update: BoardUpdate) {
        match self.update_tx.send(update) {
            Ok(count) => {
                tracing::trace!("Broadcast update sent to {} subscribers", count);
            }
            Err(_) => {
                tracing::debug!("No subscribers for layout update broadcast");
            }
        }
    }
}
