//! Layout template commands.

use super::{require_confirmation, CliError};
use widget_board::board::Board;
use widget_board::layout::BUILTIN_TEMPLATES;

pub(crate) fn run_template_list_command(board: &Board) -> Result<(), CliError> {
    for name in board.templates().names()? {
        let kind = if BUILTIN_TEMPLATES.contains(&name.as_str()) {
            "built-in"
        } else {
            "saved"
        };
        println!("{}\t{}", name, kind);
    }
    Ok(())
}

/// Replaces the whole dashboard with template `name`.
pub(crate) fn run_template_apply_command(board: &mut Board, name: &str, yes: bool) -> Result<(), CliError> {
    require_confirmation(yes, "replace the dashboard")?;
    let template = board.apply_template(name)?;
    println!(
        "Applied template '{}' ({} widgets)",
        template.name,
        template.widget_ids.len()
    );
    Ok(())
}

pub(crate) fn run_template_save_command(board: &Board, name: &str) -> Result<(), CliError> {
    if name.trim().is_empty() {
        return Err(CliError::Usage("Template name must not be empty".to_string()));
    }
    let template = board.save_template(name)?;
    println!("Saved template '{}'", template.name);
    Ok(())
}

pub(crate) fn run_template_delete_command(board: &Board, name: &str) -> Result<(), CliError> {
    board.templates().delete(name)?;
    println!("Deleted template '{}'", name);
    Ok(())
}

/// Applies the built-in default template.
pub(crate) fn run_reset_command(board: &mut Board, yes: bool) -> Result<(), CliError> {
    require_confirmation(yes, "reset the dashboard")?;
    board.reset_to_default()?;
    println!("Dashboard reset to the default layout");
    Ok(())
}
