//! Shell session tests: several commands against one board.

use crate::run_shell;
use board_storage::MemoryStore;
use std::io::Cursor;
use std::sync::Arc;
use widget_board::board::Board;
use widget_board::config::Config;
use widget_board::engine::EngineOptions;

fn board() -> Board {
    Board::open(Arc::new(MemoryStore::new()), EngineOptions::default()).unwrap()
}

fn run(board: &mut Board, script: &str) -> bool {
    run_shell(board, &Config::default(), Cursor::new(script.to_string())).is_ok()
}

#[test]
fn test_shell_remove_then_undo_restores_widget() {
    let mut board = board();
    let id = board.layout_mut().add_widget("tasks").unwrap();

    assert!(run(&mut board, &format!("remove {id}\nundo\n")));
    assert!(board.layout().contains(id.as_str()));
    assert!(board.layout().check_consistency().is_ok());
}

#[test]
fn test_shell_drop_on_trash_then_undo() {
    let mut board = board();
    let id = board.layout_mut().add_widget("notes").unwrap();

    assert!(run(
        &mut board,
        &format!("drop {id} --x 10 --y 10 --width 50 --height 50\n")
    ));
    assert!(!board.layout().contains(id.as_str()));

    assert!(run(&mut board, "undo\n"));
    assert!(board.layout().contains(id.as_str()));
}

#[test]
fn test_shell_drop_outside_trash_keeps_widget() {
    let mut board = board();
    let id = board.layout_mut().add_widget("notes").unwrap();

    assert!(run(
        &mut board,
        &format!("drop {id} --x 500 --y 500 --width 50 --height 50\n")
    ));
    assert!(board.layout().contains(id.as_str()));
}

#[test]
fn test_shell_skips_comments_and_blank_lines() {
    let mut board = board();
    assert!(run(&mut board, "# setup\n\nadd tasks\n   \nadd clock\n"));
    assert_eq!(board.layout().widget_ids().len(), 2);
}

#[test]
fn test_shell_continues_after_failure_and_reports_it() {
    let mut board = board();
    assert!(!run(&mut board, "bogus\nadd tasks\n"));
    assert_eq!(board.layout().widget_ids().len(), 1);
}

#[test]
fn test_shell_exit_stops_reading() {
    let mut board = board();
    assert!(run(&mut board, "add tasks\nexit\nadd clock\n"));
    assert_eq!(board.layout().widget_ids().len(), 1);
}

#[test]
fn test_shell_rejects_nested_shell_and_config() {
    let mut board = board();
    assert!(!run(&mut board, "shell\n"));
    assert!(!run(&mut board, "config path\n"));
}

#[test]
fn test_shell_template_apply_needs_yes() {
    let mut board = board();
    let id = board.layout_mut().add_widget("tasks").unwrap();

    assert!(!run(&mut board, "template apply focus\n"));
    assert!(board.layout().contains(id.as_str()));

    assert!(run(&mut board, "template apply focus --yes\n"));
    assert!(!board.layout().contains(id.as_str()));
    assert!(board.content().contains("notes-focused"));
}

#[test]
fn test_shell_content_set_merges() {
    let mut board = board();
    assert!(run(
        &mut board,
        "content set notes-1 {\"text\":\"a\",\"pinned\":true}\ncontent set notes-1 {\"text\":\"b\"}\n"
    ));
    let record = board.content().get_box_content("notes-1");
    assert_eq!(record["text"], "b");
    assert_eq!(record["pinned"], true);
}

#[test]
fn test_shell_content_set_rejects_non_object() {
    let mut board = board();
    assert!(!run(&mut board, "content set notes-1 [1,2]\n"));
    assert!(!board.content().contains("notes-1"));
}

#[test]
fn test_shell_pomodoro_start_requires_widget() {
    let mut board = board();
    assert!(!run(&mut board, "pomodoro start pomodoro-missing\n"));

    let id = board.layout_mut().add_widget("pomodoro").unwrap();
    assert!(run(&mut board, &format!("pomodoro start {id}\npomodoro pause {id}\n")));
    assert!(board.countdown(id.as_str()).unwrap().is_paused());
}
