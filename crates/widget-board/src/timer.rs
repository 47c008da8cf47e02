//! Pomodoro countdown and the polling ticker that drives it.
//!
//! A running countdown stores the wall-clock instant it ends, never a
//! decrementing counter, so it survives restarts and missed ticks: every tick
//! just compares "now" against the stored target. The countdown serializes
//! into the pomodoro widget's content record.

use crate::{BoardError, StorageKey};
use board_storage::KeyValueStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Default length of a work phase.
pub const DEFAULT_WORK: Duration = Duration::from_secs(25 * 60);

/// Default length of a short break.
pub const DEFAULT_SHORT_BREAK: Duration = Duration::from_secs(5 * 60);

/// Field of the widget's content record holding the countdown.
pub const CONTENT_FIELD: &str = "countdown";

/// Pomodoro phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    /// Focused work.
    #[default]
    Work,
    /// Rest between work phases.
    ShortBreak,
}

impl Phase {
    /// The phase that usually follows this one.
    pub fn next(self) -> Phase {
        match self {
            Phase::Work => Phase::ShortBreak,
            Phase::ShortBreak => Phase::Work,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Work => write!(f, "work"),
            Phase::ShortBreak => write!(f, "short break"),
        }
    }
}

/// Phase lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseLengths {
    /// Length of a work phase.
    pub work: Duration,
    /// Length of a short break.
    pub short_break: Duration,
}

impl Default for PhaseLengths {
    fn default() -> Self {
        Self {
            work: DEFAULT_WORK,
            short_break: DEFAULT_SHORT_BREAK,
        }
    }
}

impl PhaseLengths {
    /// Length of `phase`.
    pub fn of(&self, phase: Phase) -> Duration {
        match phase {
            Phase::Work => self.work,
            Phase::ShortBreak => self.short_break,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
enum CountdownState {
    #[default]
    Idle,
    Running {
        target: DateTime<Utc>,
    },
    Paused {
        #[serde(rename = "remainingMs")]
        remaining_ms: u64,
    },
}

/// What a tick observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing was started.
    Idle,
    /// Still counting down.
    Running {
        /// Time left until the target.
        remaining: Duration,
    },
    /// Frozen by a pause.
    Paused {
        /// Time left when paused.
        remaining: Duration,
    },
    /// The phase ended at or before this tick. Reported once.
    Finished(Phase),
}

/// A single pomodoro countdown.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Countdown {
    phase: Phase,
    #[serde(flatten)]
    state: CountdownState,
}

impl Countdown {
    /// Idle countdown on the work phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Phase last started.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Counting down towards a target.
    pub fn is_running(&self) -> bool {
        matches!(self.state, CountdownState::Running { .. })
    }

    /// Frozen with time left.
    pub fn is_paused(&self) -> bool {
        matches!(self.state, CountdownState::Paused { .. })
    }

    /// Wall-clock end of the running phase.
    pub fn target(&self) -> Option<DateTime<Utc>> {
        match self.state {
            CountdownState::Running { target } => Some(target),
            _ => None,
        }
    }

    /// Starts `phase` now, replacing whatever was running.
    pub fn start(&mut self, phase: Phase, length: Duration, now: DateTime<Utc>) {
        self.phase = phase;
        self.state = CountdownState::Running {
            target: after(now, length),
        };
    }

    /// Freezes the remaining time. Returns `false` unless running.
    pub fn pause(&mut self, now: DateTime<Utc>) -> bool {
        let CountdownState::Running { target } = self.state else {
            return false;
        };
        self.state = CountdownState::Paused {
            remaining_ms: until(target, now).as_millis() as u64,
        };
        true
    }

    /// Continues a paused countdown with a target recomputed from `now`.
    /// Returns `false` unless paused.
    pub fn resume(&mut self, now: DateTime<Utc>) -> bool {
        let CountdownState::Paused { remaining_ms } = self.state else {
            return false;
        };
        self.state = CountdownState::Running {
            target: after(now, Duration::from_millis(remaining_ms)),
        };
        true
    }

    /// Stops without finishing.
    pub fn reset(&mut self) {
        self.state = CountdownState::Idle;
    }

    /// Time left as of `now`, if running or paused.
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        match self.state {
            CountdownState::Idle => None,
            CountdownState::Running { target } => Some(until(target, now)),
            CountdownState::Paused { remaining_ms } => Some(Duration::from_millis(remaining_ms)),
        }
    }

    /// Compares `now` against the target. A finished countdown becomes idle.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        match self.state {
            CountdownState::Idle => TickOutcome::Idle,
            CountdownState::Paused { remaining_ms } => TickOutcome::Paused {
                remaining: Duration::from_millis(remaining_ms),
            },
            CountdownState::Running { target } if now >= target => {
                self.state = CountdownState::Idle;
                TickOutcome::Finished(self.phase)
            }
            CountdownState::Running { target } => TickOutcome::Running {
                remaining: until(target, now),
            },
        }
    }
}

fn after(now: DateTime<Utc>, length: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(length)
        .ok()
        .and_then(|d| now.checked_add_signed(d))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

fn until(target: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    (target - now).to_std().unwrap_or(Duration::ZERO)
}

/// Calls `on_tick` with the current time every `period` until it breaks.
///
/// The first call happens immediately. Ticks missed while the runtime was
/// busy are skipped rather than replayed.
pub async fn run_ticker<F>(period: Duration, mut on_tick: F)
where
    F: FnMut(DateTime<Utc>) -> ControlFlow<()>,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        ticker.tick().await;
        if on_tick(Utc::now()).is_break() {
            break;
        }
    }
}

/// Completed work phases per pomodoro widget, in `pomodoro-counters`.
pub struct PomodoroCounters {
    storage: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for PomodoroCounters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PomodoroCounters").finish_non_exhaustive()
    }
}

impl PomodoroCounters {
    /// Counters kept in `storage`.
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Every widget's count.
    pub fn all(&self) -> Result<BTreeMap<String, u64>, BoardError> {
        let key = StorageKey::PomodoroCounters.as_str();
        match self.storage.get(key)? {
            None => Ok(BTreeMap::new()),
            Some(value) => serde_json::from_value(value).map_err(|e| BoardError::Corrupt {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// Completed work phases of `widget`; 0 if none.
    pub fn get(&self, widget: &str) -> Result<u64, BoardError> {
        Ok(self.all()?.get(widget).copied().unwrap_or(0))
    }

    /// Adds one completed work phase for `widget`. Returns the new count.
    pub fn increment(&self, widget: &str) -> Result<u64, BoardError> {
        let mut counters = self.all()?;
        let count = counters.entry(widget.to_string()).or_insert(0);
        *count += 1;
        let count = *count;
        let value = serde_json::to_value(&counters).map_err(|e| BoardError::Corrupt {
            key: StorageKey::PomodoroCounters.as_str().to_string(),
            message: e.to_string(),
        })?;
        self.storage
            .set(StorageKey::PomodoroCounters.as_str(), &value)?;
        tracing::debug!("Pomodoro {} completed {} work phases", widget, count);
        Ok(count)
    }
}
