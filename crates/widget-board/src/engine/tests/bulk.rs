//! set_layouts and load_dashboard_state tests for LayoutEngine.

use super::{assert_consistent, entry, entry_ids};
use crate::content::{record_from_value, ContentStore};
use crate::engine::LayoutEngine;
use crate::{Breakpoint, Layouts, WidgetId};
use board_storage::MemoryStore;
use serde_json::json;
use std::sync::Arc;

fn layouts_for(ids: &[&str]) -> Layouts {
    Breakpoint::ALL
        .iter()
        .map(|bp| {
            let entries = ids
                .iter()
                .enumerate()
                .map(|(i, id)| entry(id, 0, i as u32 * 2, 1, 2.0))
                .collect();
            (*bp, entries)
        })
        .collect()
}

#[test]
fn test_set_layouts_replaces_geometry_only() {
    let mut engine = LayoutEngine::in_memory();
    let id = engine.add_widget("tasks").unwrap();
    let mut layouts = engine.layouts().clone();
    layouts.get_mut(&Breakpoint::Sm).unwrap()[0].h = 9.0;

    engine.set_layouts(layouts.clone());

    assert_eq!(engine.layouts(), &layouts);
    assert!(engine.contains(id.as_str()));
    assert_consistent(&engine);
}

#[test]
fn test_set_layouts_accepts_mismatch() {
    let mut engine = LayoutEngine::in_memory();
    engine.add_widget("tasks").unwrap();

    engine.set_layouts(layouts_for(&["ghost-1"]));

    assert!(engine.check_consistency().is_err());
    assert_eq!(entry_ids(&engine, Breakpoint::Lg), vec!["ghost-1"]);
}

#[test]
fn test_set_layouts_keeps_pending_removal() {
    let mut engine = LayoutEngine::in_memory();
    let id = engine.add_widget("tasks").unwrap();
    engine.remove_widget(id.as_str());
    engine.set_layouts(engine.layouts().clone());
    assert!(engine.undo_available());
}

#[test]
fn test_load_state_replaces_both_fields() {
    let mut engine = LayoutEngine::in_memory();
    engine.add_widget("tasks").unwrap();

    let ids = vec![WidgetId::from("notes-aaaaaaa"), WidgetId::from("clock-bbbbbbb")];
    engine.load_dashboard_state(ids.clone(), layouts_for(&["notes-aaaaaaa", "clock-bbbbbbb"]));

    assert!(engine.widget_ids().iter().eq(ids.iter()));
    assert_consistent(&engine);
}

#[test]
fn test_load_state_clears_pending_removal() {
    let mut engine = LayoutEngine::in_memory();
    let id = engine.add_widget("tasks").unwrap();
    engine.remove_widget(id.as_str());
    engine.load_dashboard_state(vec![WidgetId::from("notes-aaaaaaa")], layouts_for(&["notes-aaaaaaa"]));
    assert!(engine.pending_removal().is_none());
}

#[test]
fn test_load_state_collapses_duplicate_ids() {
    let mut engine = LayoutEngine::in_memory();
    let ids = vec![WidgetId::from("notes-aaaaaaa"), WidgetId::from("notes-aaaaaaa")];
    engine.load_dashboard_state(ids, layouts_for(&["notes-aaaaaaa"]));
    assert_eq!(engine.widget_ids().len(), 1);
    assert_consistent(&engine);
}

#[test]
fn test_bulk_replace_leaves_orphaned_content() {
    let storage = Arc::new(MemoryStore::new());
    let mut engine = LayoutEngine::open(storage.clone(), Default::default()).unwrap();
    let mut content = ContentStore::open(storage).unwrap();
    let id = engine.add_widget("notes").unwrap();
    content.set_box_content(id.as_str(), record_from_value(json!({"text": "hi"})).unwrap());

    engine.load_dashboard_state(Vec::new(), Layouts::new());

    assert!(!engine.contains(id.as_str()));
    assert_eq!(content.get_box_content(id.as_str())["text"], json!("hi"));
}

#[test]
fn test_removal_keeps_content() {
    let storage = Arc::new(MemoryStore::new());
    let mut engine = LayoutEngine::open(storage.clone(), Default::default()).unwrap();
    let mut content = ContentStore::open(storage).unwrap();
    let id = engine.add_widget("tasks").unwrap();
    content.set_box_content(id.as_str(), record_from_value(json!({"items": [1]})).unwrap());

    engine.remove_widget(id.as_str());
    assert_eq!(content.get_box_content(id.as_str())["items"], json!([1]));

    engine.undo_last_removal();
    assert_eq!(content.get_box_content(id.as_str())["items"], json!([1]));
}

#[test]
fn test_loaded_ids_are_never_reissued() {
    let mut engine = LayoutEngine::in_memory();
    engine.load_dashboard_state(vec![WidgetId::from("tasks-aaaaaaa")], layouts_for(&["tasks-aaaaaaa"]));
    engine.load_dashboard_state(Vec::new(), Layouts::new());
    for _ in 0..50 {
        assert_ne!(engine.add_widget("tasks").unwrap().as_str(), "tasks-aaaaaaa");
    }
}
