//! Tests for the LayoutEngine module.
//!
//! Tests are organized into categories:
//! - `basic`: construction and read accessors
//! - `add`: add_widget placement and id generation
//! - `remove`: remove_widget and its idempotence
//! - `undo`: undo_last_removal and supersession
//! - `bulk`: set_layouts and load_dashboard_state
//! - `persistence`: state written to and reloaded from storage
//! - `sequence`: randomized operation sequences (proptest)
//! - `subscriber`: broadcast channel and notifications

mod bulk;

use super::{EngineOptions, LayoutEngine};
use crate::{Breakpoint, LayoutEntry};
use board_storage::MemoryStore;
use std::sync::Arc;

/// Engine backed by a shared memory store the test can inspect.
pub(super) fn engine_with_storage() -> (Arc<MemoryStore>, LayoutEngine) {
    let storage = Arc::new(MemoryStore::new());
    let engine = LayoutEngine::open(storage.clone(), EngineOptions::default()).unwrap();
    (storage, engine)
}

/// Entry ids on `breakpoint`, sorted.
pub(super) fn entry_ids(engine: &LayoutEngine, breakpoint: Breakpoint) -> Vec<String> {
    let mut ids: Vec<String> = engine
        .layouts()
        .get(&breakpoint)
        .map(|entries| entries.iter().map(|e| e.id.to_string()).collect())
        .unwrap_or_default();
    ids.sort();
    ids
}

/// Asserts the strong layout invariant on every breakpoint.
pub(super) fn assert_consistent(engine: &LayoutEngine) {
    if let Err(e) = engine.check_consistency() {
        panic!("layout invariant violated: {e}");
    }
}

pub(super) fn entry(id: &str, x: u32, y: u32, w: u32, h: f64) -> LayoutEntry {
    LayoutEntry::new(id, x, y, w, h)
}
