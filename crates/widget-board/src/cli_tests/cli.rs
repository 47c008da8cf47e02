//! CLI argument parsing tests.

use crate::{
    BackupAction, Cli, Commands, ConfigAction, ContentAction, PhaseArg, PomodoroAction,
    TemplateAction,
};
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use widget_board::timer::Phase;
use widget_board::Breakpoint;

#[test]
fn verify_cli() {
    Cli::command().debug_assert();
}

#[test]
fn test_add_requires_type() {
    assert!(Cli::try_parse_from(["wbd", "add"]).is_err());
}

#[test]
fn test_add_parses_type() {
    let cli = Cli::try_parse_from(["wbd", "add", "tasks"]).unwrap();
    match cli.command {
        Commands::Add { type_tag } => assert_eq!(type_tag, "tasks"),
        _ => panic!("unexpected command variant"),
    }
}

#[test]
fn test_list_default_breakpoint_is_lg() {
    let cli = Cli::try_parse_from(["wbd", "list"]).unwrap();
    match cli.command {
        Commands::List { breakpoint } => assert_eq!(breakpoint, Breakpoint::Lg),
        _ => panic!("unexpected command variant"),
    }
}

#[test]
fn test_list_custom_breakpoint() {
    let cli = Cli::try_parse_from(["wbd", "list", "--breakpoint", "sm"]).unwrap();
    match cli.command {
        Commands::List { breakpoint } => assert_eq!(breakpoint, Breakpoint::Sm),
        _ => panic!("unexpected command variant"),
    }
    assert!(Cli::try_parse_from(["wbd", "list", "--breakpoint", "xl"]).is_err());
}

#[test]
fn test_drop_accepts_negative_coordinates() {
    let cli = Cli::try_parse_from([
        "wbd", "drop", "tasks-abc1234", "--x", "-10", "--y", "-5.5", "--width", "40",
        "--height", "30",
    ])
    .unwrap();
    match cli.command {
        Commands::Drop {
            id,
            x,
            y,
            width,
            height,
        } => {
            assert_eq!(id, "tasks-abc1234");
            assert_eq!((x, y, width, height), (-10.0, -5.5, 40.0, 30.0));
        }
        _ => panic!("unexpected command variant"),
    }
}

#[test]
fn test_drop_requires_geometry() {
    assert!(Cli::try_parse_from(["wbd", "drop", "tasks-abc1234", "--x", "1"]).is_err());
}

#[test]
fn test_content_set_parses_patch() {
    let cli = Cli::try_parse_from(["wbd", "content", "set", "notes-1", r#"{"text":"hi"}"#]).unwrap();
    match cli.command {
        Commands::Content {
            action: ContentAction::Set { key, patch },
        } => {
            assert_eq!(key, "notes-1");
            assert_eq!(patch, r#"{"text":"hi"}"#);
        }
        _ => panic!("unexpected command variant"),
    }
}

#[test]
fn test_template_apply_yes_defaults_false() {
    let cli = Cli::try_parse_from(["wbd", "template", "apply", "focus"]).unwrap();
    match cli.command {
        Commands::Template {
            action: TemplateAction::Apply { name, yes },
        } => {
            assert_eq!(name, "focus");
            assert!(!yes);
        }
        _ => panic!("unexpected command variant"),
    }
}

#[test]
fn test_template_reset_yes() {
    let cli = Cli::try_parse_from(["wbd", "template", "reset", "--yes"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Template {
            action: TemplateAction::Reset { yes: true }
        }
    ));
}

#[test]
fn test_backup_export_output_optional() {
    let cli = Cli::try_parse_from(["wbd", "backup", "export"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Backup {
            action: BackupAction::Export { output: None }
        }
    ));

    let cli = Cli::try_parse_from(["wbd", "backup", "export", "/tmp/b.json"]).unwrap();
    match cli.command {
        Commands::Backup {
            action: BackupAction::Export { output },
        } => assert_eq!(output, Some(PathBuf::from("/tmp/b.json"))),
        _ => panic!("unexpected command variant"),
    }
}

#[test]
fn test_pomodoro_phase_default_and_short_break() {
    let cli = Cli::try_parse_from(["wbd", "pomodoro", "start", "pomodoro-1"]).unwrap();
    match cli.command {
        Commands::Pomodoro {
            action: PomodoroAction::Start { phase, .. },
        } => assert_eq!(phase, PhaseArg::Work),
        _ => panic!("unexpected command variant"),
    }

    let cli = Cli::try_parse_from([
        "wbd",
        "pomodoro",
        "start",
        "pomodoro-1",
        "--phase",
        "short-break",
    ])
    .unwrap();
    match cli.command {
        Commands::Pomodoro {
            action: PomodoroAction::Start { phase, .. },
        } => assert_eq!(Phase::from(phase), Phase::ShortBreak),
        _ => panic!("unexpected command variant"),
    }
}

#[test]
fn test_global_config_flag_after_subcommand() {
    let cli = Cli::try_parse_from(["wbd", "list", "--config", "/tmp/wbd.toml"]).unwrap();
    assert_eq!(cli.config, Some(PathBuf::from("/tmp/wbd.toml")));
}

#[test]
fn test_config_init_force_flag() {
    let cli = Cli::try_parse_from(["wbd", "config", "init", "--force"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Config {
            action: ConfigAction::Init { force: true }
        }
    ));
}

#[test]
fn test_config_without_subcommand_fails() {
    assert!(Cli::try_parse_from(["wbd", "config"]).is_err());
}

#[test]
fn test_shell_help_mentions_whitespace_splitting() {
    let cli = Cli::command();
    let shell = cli.find_subcommand("shell").expect("shell subcommand");
    let about = shell.get_about().expect("shell has help text").to_string();
    assert!(about.contains("split on whitespace"), "{about}");
}

#[test]
fn test_shell_parses_without_arguments() {
    let cli = Cli::try_parse_from(["wbd", "shell"]).unwrap();
    assert!(matches!(cli.command, Commands::Shell));
}
