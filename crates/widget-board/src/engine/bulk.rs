//! Wholesale replacement of layouts and state.

use super::LayoutEngine;
use crate::{BoardUpdate, DashboardState, Layouts, WidgetId};
use indexmap::IndexSet;

impl LayoutEngine {
    /// Replaces the geometry with what the grid reports after a drag or resize.
    ///
    /// The widget set is left alone. Layouts whose ids do not match it are
    /// accepted and logged.
    pub fn set_layouts(&mut self, layouts: Layouts) {
        self.state.layouts = layouts;
        if let Err(e) = self.state.check_consistency() {
            tracing::warn!("Accepted layouts that diverge from the widget set: {}", e);
        }
        self.persist();
        self.notify(BoardUpdate::LayoutsChanged);
    }

    /// Replaces the widget set and geometry in one step.
    ///
    /// Used by template apply, reset and restore. Any pending removal is
    /// discarded. Content records of widgets that disappear are left in place.
    pub fn load_dashboard_state(
        &mut self,
        widget_ids: impl IntoIterator<Item = WidgetId>,
        layouts: Layouts,
    ) {
        let widget_ids: IndexSet<WidgetId> = widget_ids.into_iter().collect();
        self.issued.extend(widget_ids.iter().cloned());
        self.state = DashboardState { widget_ids, layouts };
        self.pending = None;
        if let Err(e) = self.state.check_consistency() {
            tracing::warn!("Loaded dashboard state is inconsistent: {}", e);
        }
        tracing::debug!("Replaced dashboard with {} widgets", self.state.widget_ids.len());
        self.persist();
        self.notify(BoardUpdate::StateReplaced);
    }
}
