//! Custom widget commands.

use super::{print_json, CliError};
use std::fs;
use std::path::{Path, PathBuf};
use widget_board::board::Board;
use widget_board::widgets::custom::CustomWidget;

/// Source files and metadata for `custom add`.
#[derive(Debug, Default)]
pub(crate) struct CustomWidgetSources {
    pub name: String,
    pub description: String,
    pub html: Option<PathBuf>,
    pub css: Option<PathBuf>,
    pub js: Option<PathBuf>,
}

fn read_source(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        None => Ok(String::new()),
        Some(path) => fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Creates or replaces the custom widget `id`.
pub(crate) fn run_custom_add_command(board: &Board, id: &str, sources: CustomWidgetSources) -> Result<(), CliError> {
    let mut widget = CustomWidget::new(id, sources.name);
    widget.description = sources.description;
    widget.html = read_source(sources.html.as_deref())?;
    widget.css = read_source(sources.css.as_deref())?;
    widget.js = read_source(sources.js.as_deref())?;
    let stored = board.custom_widgets().upsert(widget)?;
    println!("Stored custom widget {} ({})", stored.id, stored.name);
    Ok(())
}

pub(crate) fn run_custom_list_command(board: &Board, json: bool) -> Result<(), CliError> {
    let widgets = board.custom_widgets().list()?;
    if json {
        return print_json(&widgets);
    }
    if widgets.is_empty() {
        println!("No custom widgets");
    }
    for widget in widgets {
        println!(
            "{}\t{}\t{}",
            widget.id,
            widget.name,
            widget.updated_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

pub(crate) fn run_custom_remove_command(board: &Board, id: &str) -> Result<(), CliError> {
    let removed = board.custom_widgets().remove(id)?;
    println!("Removed custom widget {}", removed.id);
    Ok(())
}

/// Prints the rendered document, or the sandboxed frame embedding it.
pub(crate) fn run_custom_render_command(board: &Board, id: &str, frame: bool) -> Result<(), CliError> {
    let widget = board
        .custom_widgets()
        .get(id)?
        .ok_or_else(|| widget_board::BoardError::CustomWidgetNotFound(id.to_string()))?;
    if frame {
        println!("{}", widget.render_frame());
    } else {
        print!("{}", widget.render_document());
    }
    Ok(())
}
