//! Configuration file commands. These never open the board.

use super::CliError;
use std::path::Path;
use widget_board::config::{default, xdg, ConfigLoader};

/// Writes the commented default configuration.
pub(crate) fn run_config_init_command(path: Option<&Path>, force: bool) -> Result<(), CliError> {
    let path = default::create_default_config(path, force)?;
    println!("Created configuration at {}", path.display());
    Ok(())
}

pub(crate) fn run_config_path_command(path: Option<&Path>) -> Result<(), CliError> {
    match path {
        Some(path) => println!("{}", path.display()),
        None => println!("{}", xdg::config_path()?.display()),
    }
    Ok(())
}

/// Loads and validates the configuration, then prints it.
pub(crate) fn run_config_validate_command(path: Option<&Path>) -> Result<(), CliError> {
    let config = ConfigLoader::load(path)?;
    println!("Configuration is valid");
    println!("{config:#?}");
    Ok(())
}
