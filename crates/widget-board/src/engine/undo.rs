//! Single-level undo of the most recent removal.

use super::LayoutEngine;
use crate::{bottom_row, BoardUpdate, LayoutEntry, PendingRemoval, WidgetId};

impl LayoutEngine {
    /// Restores the most recently removed widget.
    ///
    /// The breakpoint the snapshot was taken from (the reference breakpoint
    /// unless it had no entry for the widget) gets back the exact geometry
    /// the widget had when it was removed. Every other breakpoint receives a
    /// fresh entry appended below its content, one column wide and as tall
    /// as the snapshot.
    ///
    /// Does nothing if there is no pending removal, or if its id is active
    /// again (e.g. re-added by a bulk replace). Returns the restored id.
    pub fn undo_last_removal(&mut self) -> Option<WidgetId> {
        let pending = self.pending.take()?;
        if self.state.widget_ids.contains(&pending.id) {
            tracing::debug!("Undo skipped: {} is already active", pending.id);
            return None;
        }

        let PendingRemoval {
            id,
            breakpoint: source,
            snapshot,
        } = pending;
        for breakpoint in self.target_breakpoints() {
            let entries = self.state.layouts.entry(breakpoint).or_default();
            entries.retain(|entry| entry.id != id);
            if breakpoint == source {
                entries.push(snapshot.clone());
            } else {
                let y = bottom_row(entries);
                entries.push(LayoutEntry::new(id.clone(), 0, y, 1, snapshot.h));
            }
        }
        self.state.widget_ids.insert(id.clone());

        tracing::debug!("Restored widget {}", id);
        self.persist();
        self.notify(BoardUpdate::RemovalUndone(id.clone()));
        Some(id)
    }

    /// The removal that [`undo_last_removal`](Self::undo_last_removal) would revert.
    pub fn pending_removal(&self) -> Option<&PendingRemoval> {
        self.pending.as_ref()
    }

    /// Returns `true` while an undo would restore a widget.
    ///
    /// The drag UI shows its undo affordance exactly while this holds.
    pub fn undo_available(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|p| !self.state.widget_ids.contains(&p.id))
    }
}
