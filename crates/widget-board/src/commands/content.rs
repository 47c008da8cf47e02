//! Content record commands.

use super::{print_json, CliError};
use widget_board::board::Board;
use widget_board::content::record_from_value;

/// Prints the content record stored under `key` (`{}` when absent).
pub(crate) fn run_content_get_command(board: &Board, key: &str) -> Result<(), CliError> {
    print_json(&board.content().get_box_content(key))
}

/// Shallow-merges the JSON object `patch` into the record under `key`.
pub(crate) fn run_content_set_command(board: &mut Board, key: &str, patch: &str) -> Result<(), CliError> {
    let value: serde_json::Value = serde_json::from_str(patch)?;
    let patch = record_from_value(value)?;
    board.content_mut().set_box_content(key, patch);
    print_json(&board.content().get_box_content(key))
}

/// Lists content keys, optionally only those starting with `prefix`.
pub(crate) fn run_content_keys_command(board: &Board, prefix: Option<&str>) -> Result<(), CliError> {
    let content = board.content();
    let keys: Vec<&str> = match prefix {
        Some(prefix) => content.keys_with_prefix(prefix).collect(),
        None => content.keys().collect(),
    };
    for key in keys {
        let marker = if board.layout().contains(key) { "" } else { "\t(orphaned)" };
        println!("{}{}", key, marker);
    }
    Ok(())
}
