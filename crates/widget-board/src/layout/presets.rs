//! Built-in layout templates.
//!
//! Three templates ship with the board:
//! - **default**: tasks, pomodoro, notes and habits
//! - **focus**: a pomodoro next to the task list, with a notes scratchpad
//! - **planner**: goals, tasks, habits and a clock
//!
//! Widget ids are fixed so that applying a template twice lands on the same
//! content records.

use super::LayoutTemplate;
use crate::content::ContentRecord;
use crate::widgets::WidgetCatalog;
use crate::{bottom_row, Breakpoint, LayoutEntry, Layouts, WidgetId};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Name of the template restored by a reset.
pub const DEFAULT_TEMPLATE: &str = "default";

/// Names of the built-in templates, in display order.
pub const BUILTIN_TEMPLATES: [&str; 3] = [DEFAULT_TEMPLATE, "focus", "planner"];

/// Returns the built-in template called `name`.
pub fn builtin(name: &str) -> Option<LayoutTemplate> {
    match name {
        DEFAULT_TEMPLATE => Some(default_template()),
        "focus" => Some(focus_template()),
        "planner" => Some(planner_template()),
        _ => None,
    }
}

/// Every built-in template, in display order.
pub fn builtins() -> Vec<LayoutTemplate> {
    BUILTIN_TEMPLATES.iter().filter_map(|name| builtin(name)).collect()
}

fn default_template() -> LayoutTemplate {
    let ids = ids(&["tasks-default", "pomodoro-default", "notes-default", "habits-default"]);
    LayoutTemplate::new(DEFAULT_TEMPLATE, arrange(&ids), ids)
}

fn focus_template() -> LayoutTemplate {
    let ids = ids(&["pomodoro-focused", "tasks-focused", "notes-focused"]);
    let contents = seed(&[(
        "notes-focused",
        json!({ "text": "One thing at a time." }),
    )]);
    LayoutTemplate::new("focus", arrange(&ids), ids).with_contents(contents)
}

fn planner_template() -> LayoutTemplate {
    let ids = ids(&["goals-planner", "tasks-planner", "habits-planner", "clock-planner"]);
    let contents = seed(&[
        ("goals-planner", json!({ "items": [] })),
        ("habits-planner", json!({ "habits": [] })),
    ]);
    LayoutTemplate::new("planner", arrange(&ids), ids).with_contents(contents)
}

fn ids(raw: &[&str]) -> Vec<WidgetId> {
    raw.iter().map(|id| WidgetId::from(*id)).collect()
}

fn seed(records: &[(&str, Value)]) -> BTreeMap<String, ContentRecord> {
    records
        .iter()
        .filter_map(|(key, value)| match value {
            Value::Object(map) => Some((key.to_string(), map.clone())),
            _ => None,
        })
        .collect()
}

/// Packs `ids` into every breakpoint's columns, round-robin, each widget
/// below the previous one in its column.
pub fn arrange(ids: &[WidgetId]) -> Layouts {
    let catalog = WidgetCatalog::new();
    Breakpoint::ALL
        .iter()
        .map(|&breakpoint| {
            let columns = breakpoint.columns();
            let mut entries: Vec<LayoutEntry> = Vec::with_capacity(ids.len());
            for (i, id) in ids.iter().enumerate() {
                let x = i as u32 % columns;
                let column: Vec<LayoutEntry> =
                    entries.iter().filter(|e| e.x == x).cloned().collect();
                let y = bottom_row(&column);
                let h = catalog.default_height(id.type_tag());
                entries.push(LayoutEntry::new(id.clone(), x, y, 1, h));
            }
            (breakpoint, entries)
        })
        .collect()
}
