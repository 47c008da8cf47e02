//! Tests for the wbd CLI binary.
//!
//! - `cli` - argument parsing
//! - `pomodoro` - countdown commands across boards sharing a store
//! - `shell` - line-oriented command sessions

mod cli;
mod pomodoro;
mod shell;
