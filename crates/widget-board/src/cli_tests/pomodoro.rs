//! Pomodoro commands against a countdown shared by two boards.

use crate::commands::{
    poll_countdown, run_pomodoro_pause_command, run_pomodoro_reset_command,
    run_pomodoro_wait_command,
};
use board_storage::MemoryStore;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use widget_board::board::Board;
use widget_board::config::schema::TimerConfig;
use widget_board::engine::EngineOptions;
use widget_board::timer::{Phase, TickOutcome};

/// Two boards over one store, like two `wbd` processes on one data dir.
fn boards() -> (Board, Board, String) {
    let storage = Arc::new(MemoryStore::new());
    let mut first = Board::open(storage.clone(), EngineOptions::default()).unwrap();
    let id = first.layout_mut().add_widget("pomodoro").unwrap().to_string();
    let second = Board::open(storage, EngineOptions::default()).unwrap();
    (first, second, id)
}

fn start_work(board: &mut Board, id: &str, length: Duration, started: chrono::DateTime<Utc>) {
    let mut countdown = board.countdown(id).unwrap();
    countdown.start(Phase::Work, length, started);
    board.save_countdown(id, &countdown).unwrap();
}

#[test]
fn test_poll_sees_pause_made_by_another_board() {
    let (mut waiter, mut other, id) = boards();
    start_work(&mut waiter, &id, Duration::from_secs(3600), Utc::now());

    other.content_mut().reload().unwrap();
    run_pomodoro_pause_command(&mut other, &id).unwrap();

    let (countdown, outcome) = poll_countdown(&mut waiter, &id, Utc::now()).unwrap();
    assert!(matches!(outcome, TickOutcome::Paused { .. }));
    assert!(countdown.is_paused());
}

#[test]
fn test_wait_returns_without_counting_after_outside_pause() {
    let (mut waiter, mut other, id) = boards();
    start_work(&mut waiter, &id, Duration::from_secs(3600), Utc::now());
    other.content_mut().reload().unwrap();
    run_pomodoro_pause_command(&mut other, &id).unwrap();

    run_pomodoro_wait_command(&mut waiter, &TimerConfig::default(), &id).unwrap();

    assert_eq!(waiter.pomodoro_counters().get(&id).unwrap(), 0);
    other.content_mut().reload().unwrap();
    assert!(other.countdown(&id).unwrap().is_paused());
}

#[test]
fn test_wait_leaves_outside_reset_alone() {
    let (mut waiter, mut other, id) = boards();
    start_work(&mut waiter, &id, Duration::from_secs(3600), Utc::now());
    other.content_mut().reload().unwrap();
    run_pomodoro_reset_command(&mut other, &id).unwrap();

    run_pomodoro_wait_command(&mut waiter, &TimerConfig::default(), &id).unwrap();

    assert_eq!(waiter.pomodoro_counters().get(&id).unwrap(), 0);
    assert!(!waiter.countdown(&id).unwrap().is_running());
}

#[test]
fn test_wait_counts_phase_started_by_another_board() {
    let (mut waiter, mut other, id) = boards();
    let long_ago = Utc::now() - chrono::Duration::hours(1);
    start_work(&mut other, &id, Duration::from_secs(1), long_ago);

    run_pomodoro_wait_command(&mut waiter, &TimerConfig::default(), &id).unwrap();

    assert_eq!(waiter.pomodoro_counters().get(&id).unwrap(), 1);
    other.content_mut().reload().unwrap();
    assert!(!other.countdown(&id).unwrap().is_running());
}
