//! Widget add and remove operations for the LayoutEngine.

use super::LayoutEngine;
use crate::{
    bottom_row, BoardError, BoardUpdate, Breakpoint, LayoutEntry, PendingRemoval, WidgetId,
};
use rand::distributions::Alphanumeric;
use rand::Rng;

/// Length of the random suffix appended to the type tag.
const ID_SUFFIX_LEN: usize = 7;

impl LayoutEngine {
    /// Adds a new widget of type `type_tag` to every breakpoint.
    ///
    /// The widget gets a fresh id (`<type_tag>-<suffix>`), its height comes
    /// from the widget catalogue, and on each breakpoint it is placed at
    /// column 0 below everything already there, one column wide.
    ///
    /// # Errors
    ///
    /// Returns `BoardError::EmptyTypeTag` if `type_tag` is blank.
    ///
    /// # Example
    ///
    /// ```
    /// use widget_board::engine::LayoutEngine;
    /// use widget_board::Breakpoint;
    ///
    /// let mut engine = LayoutEngine::in_memory();
    /// let id = engine.add_widget("pomodoro").expect("valid tag");
    /// assert!(id.as_str().starts_with("pomodoro-"));
    /// let entry = engine.entry(Breakpoint::Lg, id.as_str()).expect("placed on lg");
    /// assert_eq!((entry.x, entry.y, entry.w, entry.h), (0, 0, 1, 3.0));
    /// assert!(engine.add_widget("  ").is_err());
    /// ```
    pub fn add_widget(&mut self, type_tag: &str) -> Result<WidgetId, BoardError> {
        let type_tag = type_tag.trim();
        if type_tag.is_empty() {
            return Err(BoardError::EmptyTypeTag);
        }

        let id = self.generate_id(type_tag);
        let height = self.catalog.default_height(type_tag);

        for breakpoint in self.target_breakpoints() {
            let entries = self.state.layouts.entry(breakpoint).or_default();
            let y = bottom_row(entries);
            entries.push(LayoutEntry::new(id.clone(), 0, y, 1, height));
        }
        self.state.widget_ids.insert(id.clone());

        tracing::debug!("Added widget {} (h = {})", id, height);
        self.persist();
        self.notify(BoardUpdate::WidgetAdded(id.clone()));
        Ok(id)
    }

    /// Removes `id` from the widget set and from every breakpoint.
    ///
    /// The reference-breakpoint geometry is captured as the pending removal,
    /// replacing any earlier one. Unknown ids are ignored.
    ///
    /// Returns `true` if a widget was removed.
    pub fn remove_widget(&mut self, id: &str) -> bool {
        let Some(removed) = self.state.widget_ids.shift_take(id) else {
            tracing::trace!("Ignoring removal of unknown widget {}", id);
            return false;
        };

        let (breakpoint, snapshot) = self.snapshot_for_undo(&removed);
        for entries in self.state.layouts.values_mut() {
            entries.retain(|entry| entry.id != removed);
        }

        if let Some(previous) = self.pending.replace(PendingRemoval {
            id: removed.clone(),
            breakpoint,
            snapshot,
        }) {
            tracing::debug!("Pending removal of {} superseded", previous.id);
        }

        tracing::debug!("Removed widget {}", removed);
        self.persist();
        self.notify(BoardUpdate::WidgetRemoved(removed));
        true
    }

    /// Geometry to keep for undo and the breakpoint it came from: the
    /// reference breakpoint's entry, else the first breakpoint holding one,
    /// else a default-sized entry at the origin of the reference breakpoint.
    fn snapshot_for_undo(&self, id: &WidgetId) -> (Breakpoint, LayoutEntry) {
        let find = |(breakpoint, entries): (&Breakpoint, &Vec<LayoutEntry>)| {
            entries
                .iter()
                .find(|e| &e.id == id)
                .map(|e| (*breakpoint, e.clone()))
        };
        self.state
            .layouts
            .get_key_value(&self.reference)
            .and_then(find)
            .or_else(|| self.state.layouts.iter().find_map(find))
            .unwrap_or_else(|| {
                let height = self.catalog.default_height(id.type_tag());
                (self.reference, LayoutEntry::new(id.clone(), 0, 0, 1, height))
            })
    }

    fn generate_id(&mut self, type_tag: &str) -> WidgetId {
        let mut rng = rand::thread_rng();
        loop {
            let suffix: String = (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(ID_SUFFIX_LEN)
                .map(|b| char::from(b).to_ascii_lowercase())
                .collect();
            let id = WidgetId::new(format!("{type_tag}-{suffix}"));
            if self.issued.insert(id.clone()) {
                return id;
            }
        }
    }
}
