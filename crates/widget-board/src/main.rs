//! Widget Board - CLI entry point
//!
//! `wbd` drives the dashboard core from the command line: widgets are added,
//! dragged to the trash and restored, content records are patched, templates
//! applied and backups exported, all against the board stored in the
//! configured data directory.

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use commands::*;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use widget_board::board::Board;
use widget_board::config::{Config, ConfigLoader};
use widget_board::drag::Rect;
use widget_board::timer::Phase;
use widget_board::{logging, Breakpoint};

/// Widget Board dashboard
#[derive(Parser)]
#[command(name = "wbd")]
#[command(version, about = "Widget grid dashboard: layout, trash/undo and content")]
struct Cli {
    /// Configuration file (default: $XDG_CONFIG_HOME/widget-board/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the wbd CLI
#[derive(Subcommand)]
enum Commands {
    /// Add a widget of the given type and print its id
    Add {
        /// Widget type tag (tasks, pomodoro, habits, notes, embed, goals, clock, custom, ...)
        type_tag: String,
    },

    /// Remove a widget (undoable within a shell session)
    Remove {
        /// Widget id
        id: String,
    },

    /// Restore the most recently removed widget
    Undo,

    /// List widgets with their geometry
    List {
        /// Breakpoint whose geometry is shown
        #[arg(long, default_value = "lg")]
        breakpoint: Breakpoint,
    },

    /// Drop a dragged widget at the given bounding box; overlapping the
    /// trash removes it
    Drop {
        /// Widget id
        id: String,
        #[arg(long, allow_negative_numbers = true)]
        x: f64,
        #[arg(long, allow_negative_numbers = true)]
        y: f64,
        #[arg(long)]
        width: f64,
        #[arg(long)]
        height: f64,
    },

    /// Print widget ids and layouts as JSON
    Layouts,

    /// Read and patch per-widget content
    Content {
        #[command(subcommand)]
        action: ContentAction,
    },

    /// Manage layout templates
    Template {
        #[command(subcommand)]
        action: TemplateAction,
    },

    /// Export or import a backup of every namespace
    Backup {
        #[command(subcommand)]
        action: BackupAction,
    },

    /// Manage user-authored custom widgets
    Custom {
        #[command(subcommand)]
        action: CustomAction,
    },

    /// Control a pomodoro widget's countdown
    Pomodoro {
        #[command(subcommand)]
        action: PomodoroAction,
    },

    /// Manage configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Read commands from stdin, one per line, against a single board.
    /// Arguments are split on whitespace, so JSON patches must not contain spaces
    Shell,
}

/// Actions for the `content` subcommand.
#[derive(Subcommand)]
enum ContentAction {
    /// Print a widget's content record
    Get {
        /// Content key (usually a widget id)
        key: String,
    },
    /// Shallow-merge a JSON object into a widget's content record
    Set {
        /// Content key (usually a widget id)
        key: String,
        /// JSON object, e.g. '{"text":"hello"}'
        patch: String,
    },
    /// List content keys
    Keys {
        /// Only keys starting with this prefix
        #[arg(long)]
        prefix: Option<String>,
    },
}

/// Actions for the `template` subcommand.
#[derive(Subcommand)]
enum TemplateAction {
    /// List built-in and saved templates
    List,
    /// Replace the dashboard with a template
    Apply {
        name: String,
        /// Confirm replacing the current dashboard
        #[arg(long)]
        yes: bool,
    },
    /// Save the current dashboard as a template
    Save { name: String },
    /// Delete a saved template
    Delete { name: String },
    /// Replace the dashboard with the default template
    Reset {
        /// Confirm replacing the current dashboard
        #[arg(long)]
        yes: bool,
    },
}

/// Actions for the `backup` subcommand.
#[derive(Subcommand)]
enum BackupAction {
    /// Write a backup file (stdout when no path is given)
    Export {
        /// Output file
        output: Option<PathBuf>,
    },
    /// Restore a backup file
    Import {
        /// Backup file
        input: PathBuf,
        /// Confirm overwriting stored data
        #[arg(long)]
        yes: bool,
    },
}

/// Actions for the `custom` subcommand.
#[derive(Subcommand)]
enum CustomAction {
    /// Create or replace a custom widget
    Add {
        /// Custom widget id
        id: String,
        /// Display name
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// HTML body file
        #[arg(long)]
        html: Option<PathBuf>,
        /// Stylesheet file
        #[arg(long)]
        css: Option<PathBuf>,
        /// Script file
        #[arg(long)]
        js: Option<PathBuf>,
    },
    /// List custom widgets
    List {
        /// Print definitions as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a custom widget
    Remove { id: String },
    /// Print the rendered HTML document
    Render {
        id: String,
        /// Print the sandboxed iframe instead of the bare document
        #[arg(long)]
        frame: bool,
    },
}

/// Pomodoro phase as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PhaseArg {
    Work,
    ShortBreak,
}

impl From<PhaseArg> for Phase {
    fn from(arg: PhaseArg) -> Self {
        match arg {
            PhaseArg::Work => Phase::Work,
            PhaseArg::ShortBreak => Phase::ShortBreak,
        }
    }
}

/// Actions for the `pomodoro` subcommand.
#[derive(Subcommand)]
enum PomodoroAction {
    /// Start a phase, replacing whatever was running
    Start {
        /// Pomodoro widget id
        id: String,
        #[arg(long, value_enum, default_value = "work")]
        phase: PhaseArg,
    },
    /// Pause a running countdown
    Pause { id: String },
    /// Resume a paused countdown
    Resume { id: String },
    /// Stop without finishing
    Reset { id: String },
    /// Show the countdown
    Status { id: String },
    /// Block until the running phase ends
    Wait { id: String },
}

/// Actions for the `config` subcommand.
#[derive(Subcommand)]
enum ConfigAction {
    /// Create default configuration file
    Init {
        /// Overwrite existing configuration (creates backup)
        #[arg(long)]
        force: bool,
    },
    /// Show configuration file path
    Path,
    /// Validate configuration file
    Validate,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Commands::Config { action } = &cli.command {
        return exit_code(run_config_action(action, cli.config.as_deref()));
    }

    let config = match ConfigLoader::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = logging::init(&config.log) {
        eprintln!("Warning: failed to open log file: {e}");
    }

    let mut board = match Board::from_config(&config) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("Error: failed to open board: {e}");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Shell => exit_code(run_shell(&mut board, &config, std::io::stdin().lock())),
        command => exit_code(execute(&mut board, &config, command)),
    }
}

fn exit_code(result: Result<(), CliError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_config_action(action: &ConfigAction, path: Option<&Path>) -> Result<(), CliError> {
    match action {
        ConfigAction::Init { force } => run_config_init_command(path, *force),
        ConfigAction::Path => run_config_path_command(path),
        ConfigAction::Validate => run_config_validate_command(path),
    }
}

/// Runs one board command.
fn execute(board: &mut Board, config: &Config, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Add { type_tag } => run_add_command(board, &type_tag),
        Commands::Remove { id } => run_remove_command(board, &id),
        Commands::Undo => run_undo_command(board),
        Commands::List { breakpoint } => run_list_command(board, breakpoint),
        Commands::Drop {
            id,
            x,
            y,
            width,
            height,
        } => run_drop_command(
            board,
            config.trash.rect(),
            &id,
            Rect::new(x, y, width, height),
        ),
        Commands::Layouts => run_layouts_command(board),
        Commands::Content { action } => match action {
            ContentAction::Get { key } => run_content_get_command(board, &key),
            ContentAction::Set { key, patch } => run_content_set_command(board, &key, &patch),
            ContentAction::Keys { prefix } => run_content_keys_command(board, prefix.as_deref()),
        },
        Commands::Template { action } => match action {
            TemplateAction::List => run_template_list_command(board),
            TemplateAction::Apply { name, yes } => run_template_apply_command(board, &name, yes),
            TemplateAction::Save { name } => run_template_save_command(board, &name),
            TemplateAction::Delete { name } => run_template_delete_command(board, &name),
            TemplateAction::Reset { yes } => run_reset_command(board, yes),
        },
        Commands::Backup { action } => match action {
            BackupAction::Export { output } => run_backup_export_command(board, output.as_deref()),
            BackupAction::Import { input, yes } => run_backup_import_command(board, &input, yes),
        },
        Commands::Custom { action } => match action {
            CustomAction::Add {
                id,
                name,
                description,
                html,
                css,
                js,
            } => run_custom_add_command(
                board,
                &id,
                CustomWidgetSources {
                    name,
                    description,
                    html,
                    css,
                    js,
                },
            ),
            CustomAction::List { json } => run_custom_list_command(board, json),
            CustomAction::Remove { id } => run_custom_remove_command(board, &id),
            CustomAction::Render { id, frame } => run_custom_render_command(board, &id, frame),
        },
        Commands::Pomodoro { action } => match action {
            PomodoroAction::Start { id, phase } => {
                run_pomodoro_start_command(board, &config.timer, &id, phase.into())
            }
            PomodoroAction::Pause { id } => run_pomodoro_pause_command(board, &id),
            PomodoroAction::Resume { id } => run_pomodoro_resume_command(board, &id),
            PomodoroAction::Reset { id } => run_pomodoro_reset_command(board, &id),
            PomodoroAction::Status { id } => run_pomodoro_status_command(board, &id),
            PomodoroAction::Wait { id } => run_pomodoro_wait_command(board, &config.timer, &id),
        },
        Commands::Config { .. } | Commands::Shell => Err(CliError::Usage(
            "config and shell commands are not available inside a shell".to_string(),
        )),
    }
}

/// Executes commands read line by line from `input` on one board.
///
/// Undo history lives as long as the board does, so removals made here can
/// be undone by a later line. Blank lines and `#` comments are skipped; a
/// failing line is reported and the shell carries on. Arguments are split on
/// whitespace, so JSON patches must not contain spaces.
fn run_shell(board: &mut Board, config: &Config, input: impl BufRead) -> Result<(), CliError> {
    let mut failures = 0usize;
    for line in input.lines() {
        let line = line.map_err(|source| CliError::Io {
            path: PathBuf::from("<stdin>"),
            source,
        })?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }

        let args = std::iter::once("wbd").chain(line.split_whitespace());
        let result = match Cli::try_parse_from(args) {
            Ok(cli) => execute(board, config, cli.command),
            Err(e) => Err(CliError::Usage(e.render().to_string().trim_end().to_string())),
        };
        if let Err(e) = result {
            eprintln!("Error: {e}");
            failures += 1;
        }
    }

    if failures > 0 {
        tracing::debug!("Shell finished with {} failed commands", failures);
        return Err(CliError::Usage(format!("{} command(s) failed", failures)));
    }
    Ok(())
}

#[cfg(test)]
mod cli_tests;
