//! Backup export and import commands.

use super::{require_confirmation, CliError};
use std::fs;
use std::path::Path;
use widget_board::board::Board;
use board_storage::BackupFile;

/// Writes a backup of every namespace to `output`, or to stdout.
pub(crate) fn run_backup_export_command(board: &Board, output: Option<&Path>) -> Result<(), CliError> {
    let backup = board.export_backup()?;
    let json = backup
        .to_json_pretty()
        .map_err(widget_board::BoardError::from)?;
    match output {
        None => println!("{}", json),
        Some(path) => {
            fs::write(path, json + "\n").map_err(|source| CliError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            println!(
                "Exported {} namespaces to {}",
                backup.data.len(),
                path.display()
            );
        }
    }
    Ok(())
}

/// Restores a backup file. Nothing is written if the file is rejected.
pub(crate) fn run_backup_import_command(board: &mut Board, input: &Path, yes: bool) -> Result<(), CliError> {
    require_confirmation(yes, "overwrite stored data")?;
    let text = fs::read_to_string(input).map_err(|source| CliError::Io {
        path: input.to_path_buf(),
        source,
    })?;
    let backup = BackupFile::from_json(&text).map_err(widget_board::BoardError::from)?;
    let written = board.import_backup(&backup)?;
    println!("Imported {} namespaces from {}", written, input.display());
    Ok(())
}
