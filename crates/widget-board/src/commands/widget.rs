//! Widget lifecycle and geometry commands.

use super::{print_json, CliError};
use widget_board::board::Board;
use widget_board::drag::{DragTracker, DropOutcome, Rect};
use widget_board::Breakpoint;

/// Adds a widget of `type_tag` and prints its id.
pub(crate) fn run_add_command(board: &mut Board, type_tag: &str) -> Result<(), CliError> {
    let id = board.layout_mut().add_widget(type_tag)?;
    println!("{}", id);
    Ok(())
}

/// Removes a widget. Unknown ids are reported but are not an error.
pub(crate) fn run_remove_command(board: &mut Board, id: &str) -> Result<(), CliError> {
    if board.layout_mut().remove_widget(id) {
        println!("Removed {}", id);
    } else {
        println!("No widget {}", id);
    }
    Ok(())
}

/// Restores the most recent removal made through this board.
pub(crate) fn run_undo_command(board: &mut Board) -> Result<(), CliError> {
    match board.layout_mut().undo_last_removal() {
        Some(id) => println!("Restored {}", id),
        None => println!("Nothing to undo"),
    }
    Ok(())
}

/// Lists active widgets with their geometry on `breakpoint`.
pub(crate) fn run_list_command(board: &Board, breakpoint: Breakpoint) -> Result<(), CliError> {
    let layout = board.layout();
    if layout.widget_ids().is_empty() {
        println!("No widgets");
        return Ok(());
    }
    for id in layout.widget_ids() {
        match layout.entry(breakpoint, id.as_str()) {
            Some(e) => println!("{}\t{}\tx={} y={} w={} h={}", id, id.type_tag(), e.x, e.y, e.w, e.h),
            None => println!("{}\t{}\t(no {} entry)", id, id.type_tag(), breakpoint),
        }
    }
    Ok(())
}

/// Simulates dragging `id` and releasing it at `bounds`.
///
/// A release overlapping the trash region removes the widget.
pub(crate) fn run_drop_command(board: &mut Board, trash: Rect, id: &str, bounds: Rect) -> Result<(), CliError> {
    let mut tracker = DragTracker::new(trash);
    tracker.begin_drag(id);
    match tracker.finish(bounds, board.layout_mut()) {
        DropOutcome::Trashed(id) => println!("Trashed {} (undo available)", id),
        DropOutcome::Released(id) => println!("Released {}", id),
        DropOutcome::Ignored => println!("Nothing was being dragged"),
    }
    Ok(())
}

/// Prints the dashboard state as JSON.
pub(crate) fn run_layouts_command(board: &Board) -> Result<(), CliError> {
    print_json(board.layout().state())
}
