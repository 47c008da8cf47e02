//! Drag/drop interaction and the trash hit-test.
//!
//! A drag starts when the grid reports a pointer-down on a widget and ends
//! with the widget's final bounding box. If that box overlaps the trash
//! region the widget is removed through the layout engine, which keeps the
//! removal undoable. Otherwise nothing changes here; the grid reports the new
//! geometry separately through [`LayoutEngine::set_layouts`].

use crate::engine::LayoutEngine;
use crate::WidgetId;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in viewport coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Rect {
    /// Box with its top-left corner at `(x, y)`.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Same as `x`.
    pub fn left(&self) -> f64 {
        self.x
    }

    /// `x + width`.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Same as `y`.
    pub fn top(&self) -> f64 {
        self.y
    }

    /// `y + height`.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Strict overlap test. Rectangles that only share an edge or a corner
    /// do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.right() > other.left()
            && self.left() < other.right()
            && self.bottom() > other.top()
            && self.top() < other.bottom()
    }
}

/// Where the interaction currently is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    /// No widget is being dragged.
    #[default]
    Idle,
    /// The given widget is being dragged.
    Dragging(WidgetId),
}

/// Result of ending a drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// No drag was active.
    Ignored,
    /// Dropped outside the trash; layout untouched.
    Released(WidgetId),
    /// Dropped on the trash and removed. Undo is available.
    Trashed(WidgetId),
}

/// Tracks one drag at a time and applies trash drops to the engine.
#[derive(Debug, Clone)]
pub struct DragTracker {
    trash: Rect,
    state: DragState,
}

impl DragTracker {
    /// Idle tracker dropping onto `trash`.
    pub fn new(trash: Rect) -> Self {
        Self {
            trash,
            state: DragState::Idle,
        }
    }

    /// Current drag, if any.
    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Bounding box of the trash drop target.
    pub fn trash(&self) -> Rect {
        self.trash
    }

    /// Starts dragging `id`. A drag already in progress is replaced.
    pub fn begin_drag(&mut self, id: impl Into<WidgetId>) {
        let id = id.into();
        if let DragState::Dragging(previous) = &self.state {
            tracing::debug!("Drag of {} replaced by {}", previous, id);
        }
        self.state = DragState::Dragging(id);
    }

    /// Abandons the current drag without touching the layout.
    pub fn cancel_drag(&mut self) {
        self.state = DragState::Idle;
    }

    /// Ends the current drag with the widget's final bounding box.
    ///
    /// Overlap with the trash removes the widget from `engine`. Always
    /// returns to [`DragState::Idle`].
    pub fn finish(&mut self, bounds: Rect, engine: &mut LayoutEngine) -> DropOutcome {
        let DragState::Dragging(id) = std::mem::take(&mut self.state) else {
            tracing::trace!("Drop without an active drag ignored");
            return DropOutcome::Ignored;
        };

        if bounds.intersects(&self.trash) {
            engine.remove_widget(id.as_str());
            tracing::debug!("Widget {} dropped on trash", id);
            DropOutcome::Trashed(id)
        } else {
            DropOutcome::Released(id)
        }
    }
}
