//! Tests for the core types defined in the crate root.

use crate::{bottom_row, BoardError, Breakpoint, DashboardState, LayoutEntry, WidgetId};
use indexmap::IndexSet;
use serde_json::json;
use std::collections::BTreeMap;

fn state(ids: &[&str], layouts: &[(Breakpoint, Vec<LayoutEntry>)]) -> DashboardState {
    DashboardState {
        widget_ids: ids.iter().map(|id| WidgetId::from(*id)).collect::<IndexSet<_>>(),
        layouts: layouts.iter().cloned().collect::<BTreeMap<_, _>>(),
    }
}

// -- WidgetId ---------------------------------------------------------------

#[test]
fn test_widget_id_type_tag() {
    assert_eq!(WidgetId::from("pomodoro-ab12cd3").type_tag(), "pomodoro");
    assert_eq!(WidgetId::from("my-habit-x1y2z3a").type_tag(), "my-habit");
    assert_eq!(WidgetId::from("legacy").type_tag(), "legacy");
}

#[test]
fn test_widget_id_serializes_as_plain_string() {
    let id = WidgetId::from("tasks-0000000");
    assert_eq!(serde_json::to_value(&id).unwrap(), json!("tasks-0000000"));
    assert_eq!(id.to_string(), "tasks-0000000");
}

// -- Breakpoint -------------------------------------------------------------

#[test]
fn test_breakpoint_parse_is_case_insensitive() {
    assert_eq!("LG".parse::<Breakpoint>().unwrap(), Breakpoint::Lg);
    assert_eq!("md".parse::<Breakpoint>().unwrap(), Breakpoint::Md);
    assert_eq!("Sm".parse::<Breakpoint>().unwrap(), Breakpoint::Sm);
}

#[test]
fn test_breakpoint_parse_rejects_unknown() {
    let err = "xl".parse::<Breakpoint>().unwrap_err();
    assert!(err.to_string().contains("xl"));
}

#[test]
fn test_breakpoint_display_matches_serde() {
    for bp in Breakpoint::ALL {
        assert_eq!(serde_json::to_value(bp).unwrap(), json!(bp.to_string()));
    }
}

#[test]
fn test_breakpoint_columns_narrow_with_width() {
    assert!(Breakpoint::Lg.columns() > Breakpoint::Md.columns());
    assert!(Breakpoint::Md.columns() > Breakpoint::Sm.columns());
    assert_eq!(Breakpoint::Sm.columns(), 1);
}

// -- LayoutEntry ------------------------------------------------------------

#[test]
fn test_entry_bottom_rounds_fractional_height_up() {
    assert_eq!(LayoutEntry::new("a", 0, 0, 1, 3.0).bottom(), 3);
    assert_eq!(LayoutEntry::new("a", 0, 2, 1, 1.5).bottom(), 4);
    assert_eq!(LayoutEntry::new("a", 0, 5, 1, 0.0).bottom(), 5);
}

#[test]
fn test_bottom_row_empty_is_zero() {
    assert_eq!(bottom_row(&[]), 0);
}

#[test]
fn test_bottom_row_uses_lowest_entry() {
    let entries = vec![
        LayoutEntry::new("a", 0, 0, 1, 4.0),
        LayoutEntry::new("b", 1, 2, 1, 2.5),
        LayoutEntry::new("c", 2, 1, 1, 1.0),
    ];
    assert_eq!(bottom_row(&entries), 5);
}

// -- DashboardState ---------------------------------------------------------

#[test]
fn test_default_state_has_every_breakpoint_empty() {
    let state = DashboardState::default();
    assert!(state.widget_ids.is_empty());
    assert_eq!(state.layouts.len(), Breakpoint::ALL.len());
    assert!(state.layouts.values().all(Vec::is_empty));
    assert!(state.is_consistent());
}

#[test]
fn test_state_json_shape() {
    let s = state(
        &["tasks-1"],
        &[(Breakpoint::Lg, vec![LayoutEntry::new("tasks-1", 0, 0, 1, 4.0)])],
    );
    let value = serde_json::to_value(&s).unwrap();
    assert_eq!(
        value,
        json!({
            "widgetIds": ["tasks-1"],
            "layouts": { "lg": [{ "id": "tasks-1", "x": 0, "y": 0, "w": 1, "h": 4.0 }] }
        })
    );
    let back: DashboardState = serde_json::from_value(value).unwrap();
    assert_eq!(back, s);
}

#[test]
fn test_state_missing_fields_default() {
    let s: DashboardState = serde_json::from_value(json!({})).unwrap();
    assert!(s.widget_ids.is_empty());
    assert!(s.layouts.is_empty());
}

#[test]
fn test_consistency_reports_missing_entry() {
    let s = state(
        &["a", "b"],
        &[(Breakpoint::Lg, vec![LayoutEntry::new("a", 0, 0, 1, 1.0)])],
    );
    match s.check_consistency() {
        Err(BoardError::Inconsistent {
            breakpoint,
            missing,
            extra,
            duplicates,
        }) => {
            assert_eq!(breakpoint, Breakpoint::Lg);
            assert_eq!(missing, vec![WidgetId::from("b")]);
            assert!(extra.is_empty());
            assert!(duplicates.is_empty());
        }
        other => panic!("expected Inconsistent, got {other:?}"),
    }
}

#[test]
fn test_consistency_reports_extra_and_duplicate_entries() {
    let s = state(
        &["a"],
        &[(
            Breakpoint::Md,
            vec![
                LayoutEntry::new("a", 0, 0, 1, 1.0),
                LayoutEntry::new("a", 1, 0, 1, 1.0),
                LayoutEntry::new("ghost", 0, 1, 1, 1.0),
            ],
        )],
    );
    match s.check_consistency() {
        Err(BoardError::Inconsistent {
            extra, duplicates, ..
        }) => {
            assert_eq!(extra, vec![WidgetId::from("ghost")]);
            assert_eq!(duplicates, vec![WidgetId::from("a")]);
        }
        other => panic!("expected Inconsistent, got {other:?}"),
    }
}

#[test]
fn test_consistency_checks_every_present_breakpoint() {
    let s = state(
        &["a"],
        &[
            (Breakpoint::Lg, vec![LayoutEntry::new("a", 0, 0, 1, 1.0)]),
            (Breakpoint::Sm, vec![]),
        ],
    );
    assert!(matches!(
        s.check_consistency(),
        Err(BoardError::Inconsistent {
            breakpoint: Breakpoint::Sm,
            ..
        })
    ));
}
