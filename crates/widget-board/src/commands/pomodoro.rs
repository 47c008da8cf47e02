//! Pomodoro countdown commands.
//!
//! The countdown lives in the widget's content record, so `start` in one
//! invocation and `wait` or `status` in another observe the same timer.

use super::CliError;
use chrono::{DateTime, Utc};
use std::ops::ControlFlow;
use std::time::Duration;
use widget_board::board::Board;
use widget_board::config::schema::TimerConfig;
use widget_board::timer::{run_ticker, Countdown, Phase, PhaseLengths, TickOutcome};

fn lengths(config: &TimerConfig) -> Result<PhaseLengths, CliError> {
    Ok(PhaseLengths {
        work: config.work()?,
        short_break: config.short_break()?,
    })
}

/// Whole seconds, for display.
fn whole_seconds(remaining: Duration) -> humantime::FormattedDuration {
    humantime::format_duration(Duration::from_secs(remaining.as_secs()))
}

fn require_widget(board: &Board, id: &str) -> Result<(), CliError> {
    if board.layout().contains(id) {
        Ok(())
    } else {
        Err(CliError::Usage(format!("No widget {}", id)))
    }
}

pub(crate) fn run_pomodoro_start_command(
    board: &mut Board,
    config: &TimerConfig,
    id: &str,
    phase: Phase,
) -> Result<(), CliError> {
    require_widget(board, id)?;
    let length = lengths(config)?.of(phase);
    let mut countdown = board.countdown(id)?;
    countdown.start(phase, length, Utc::now());
    board.save_countdown(id, &countdown)?;
    println!("Started {} ({}) on {}", phase, whole_seconds(length), id);
    Ok(())
}

pub(crate) fn run_pomodoro_pause_command(board: &mut Board, id: &str) -> Result<(), CliError> {
    let mut countdown = board.countdown(id)?;
    if !countdown.pause(Utc::now()) {
        println!("{} is not running", id);
        return Ok(());
    }
    board.save_countdown(id, &countdown)?;
    print_status(board, id, &countdown)
}

pub(crate) fn run_pomodoro_resume_command(board: &mut Board, id: &str) -> Result<(), CliError> {
    let mut countdown = board.countdown(id)?;
    if !countdown.resume(Utc::now()) {
        println!("{} is not paused", id);
        return Ok(());
    }
    board.save_countdown(id, &countdown)?;
    print_status(board, id, &countdown)
}

pub(crate) fn run_pomodoro_reset_command(board: &mut Board, id: &str) -> Result<(), CliError> {
    let mut countdown = board.countdown(id)?;
    countdown.reset();
    board.save_countdown(id, &countdown)?;
    println!("Reset {}", id);
    Ok(())
}

/// Prints the countdown once, settling it first if it already ended.
pub(crate) fn run_pomodoro_status_command(board: &mut Board, id: &str) -> Result<(), CliError> {
    let mut countdown = board.countdown(id)?;
    if let TickOutcome::Finished(phase) = countdown.tick(Utc::now()) {
        finish(board, id, &countdown, phase)?;
    }
    print_status(board, id, &countdown)
}

/// Re-reads the stored countdown and ticks the fresh copy.
///
/// Another invocation may have changed the timer since this board was
/// opened, so the in-memory content is not trusted.
pub(crate) fn poll_countdown(
    board: &mut Board,
    id: &str,
    now: DateTime<Utc>,
) -> Result<(Countdown, TickOutcome), CliError> {
    board.content_mut().reload()?;
    let mut countdown = board.countdown(id)?;
    let outcome = countdown.tick(now);
    Ok((countdown, outcome))
}

/// Polls the stored countdown until it finishes, then records the completion.
///
/// Returns without recording anything when the countdown stops running for
/// any other reason.
pub(crate) fn run_pomodoro_wait_command(
    board: &mut Board,
    config: &TimerConfig,
    id: &str,
) -> Result<(), CliError> {
    let period = config.tick_interval()?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .map_err(CliError::Runtime)?;

    let mut last = None;
    let mut failure = None;
    runtime.block_on(run_ticker(period, |now| match poll_countdown(board, id, now) {
        Ok((_, TickOutcome::Running { remaining })) => {
            tracing::trace!("{} remaining on {}", whole_seconds(remaining), id);
            ControlFlow::Continue(())
        }
        Ok((countdown, outcome)) => {
            last = Some((countdown, outcome));
            ControlFlow::Break(())
        }
        Err(e) => {
            failure = Some(e);
            ControlFlow::Break(())
        }
    }));

    if let Some(e) = failure {
        return Err(e);
    }
    match last {
        Some((countdown, TickOutcome::Finished(phase))) => finish(board, id, &countdown, phase),
        Some((countdown, _)) => print_status(board, id, &countdown),
        None => Ok(()),
    }
}

fn finish(board: &mut Board, id: &str, countdown: &Countdown, phase: Phase) -> Result<(), CliError> {
    board.save_countdown(id, countdown)?;
    if phase == Phase::Work {
        let count = board.pomodoro_counters().increment(id)?;
        println!("Work phase finished on {} ({} completed)", id, count);
    } else {
        println!("Short break finished on {}", id);
    }
    Ok(())
}

fn print_status(board: &Board, id: &str, countdown: &Countdown) -> Result<(), CliError> {
    let now = Utc::now();
    let state = if countdown.is_running() {
        "running"
    } else if countdown.is_paused() {
        "paused"
    } else {
        "idle"
    };
    println!("Pomodoro {}", id);
    println!("  Phase:     {}", countdown.phase());
    println!("  State:     {}", state);
    if let Some(remaining) = countdown.remaining(now) {
        println!("  Remaining: {}", whole_seconds(remaining));
    }
    println!("  Completed: {}", board.pomodoro_counters().get(id)?);
    Ok(())
}
