//! Edge case tests
//!
//! Tests corrupt files, invalid keys, unusual values
//! Validates error handling without side effects

use board_storage::{
    default_data_dir, BackupError, BackupFile, Error, FileStore, KeyValueStore, MemoryStore,
    StorageError,
};
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_path_traversal_keys_are_rejected() {
    let dir = tempdir().expect("Failed to create temp directory");
    let store = FileStore::open(dir.path().join("data")).expect("Open should succeed");

    let err = store
        .set("../outside", &serde_json::json!(1))
        .expect_err("Traversal key should fail");
    assert!(matches!(err, Error::Storage(StorageError::InvalidKey(_))));
    assert!(!dir.path().join("outside.json").exists());
}

#[test]
fn test_corrupt_file_does_not_affect_other_keys() {
    let dir = tempdir().expect("Failed to create temp directory");
    let store = FileStore::open(dir.path()).expect("Open should succeed");

    store
        .set("goals", &serde_json::json!(["ship v1"]))
        .expect("Set should succeed");
    fs::write(store.path_for("tags"), "").expect("Write failed");

    assert!(store.get("tags").is_err());
    assert_eq!(
        store.get("goals").expect("Get should succeed"),
        Some(serde_json::json!(["ship v1"]))
    );
    assert_eq!(store.keys().expect("Keys should succeed"), vec!["goals", "tags"]);
}

#[test]
fn test_scalar_and_unicode_values_roundtrip() {
    let dir = tempdir().expect("Failed to create temp directory");
    let store = FileStore::open(dir.path()).expect("Open should succeed");

    let values = [
        ("a", serde_json::json!(null)),
        ("b", serde_json::json!(0.1)),
        ("c", serde_json::json!("émoji ✓ 漢字")),
        ("d", serde_json::json!(-9_007_199_254_740_991_i64)),
    ];
    for (key, value) in &values {
        store.set(key, value).expect("Set should succeed");
    }
    for (key, value) in &values {
        assert_eq!(store.get(key).expect("Get should succeed").as_ref(), Some(value));
    }
}

#[test]
fn test_restore_from_foreign_app_leaves_store_untouched() {
    let store = MemoryStore::new();
    store
        .set("dashboard-layout", &serde_json::json!({"widgetIds": ["keep-me"]}))
        .expect("Set should succeed");

    let text = r#"{
        "meta": {"app": "another-dashboard", "version": "9.9.9", "date": "2026-01-01T00:00:00Z"},
        "data": {"dashboard-layout": {"widgetIds": []}}
    }"#;
    let backup = BackupFile::from_json(text).expect("Shape is valid");
    let err = backup
        .restore(&store, "widget-board")
        .expect_err("Restore should be rejected");
    assert!(matches!(err, Error::Backup(BackupError::AppMismatch { .. })));
    assert_eq!(
        store.get("dashboard-layout").expect("Get should succeed"),
        Some(serde_json::json!({"widgetIds": ["keep-me"]}))
    );
}

#[test]
fn test_backup_missing_data_field_is_malformed() {
    let text = r#"{"meta": {"app": "widget-board", "version": "0.1.0", "date": "2026-01-01T00:00:00Z"}}"#;
    let err = BackupFile::from_json(text).expect_err("Missing data should fail");
    assert!(matches!(err, Error::Backup(BackupError::Malformed(_))));
}

#[test]
#[serial(env)]
fn test_default_data_dir_honors_xdg_data_home() {
    let dir = tempdir().expect("Failed to create temp directory");
    let original = env::var("XDG_DATA_HOME").ok();
    env::set_var("XDG_DATA_HOME", dir.path());

    let resolved = default_data_dir();

    match original {
        Some(v) => env::set_var("XDG_DATA_HOME", v),
        None => env::remove_var("XDG_DATA_HOME"),
    }

    let resolved = resolved.expect("Data dir should resolve");
    assert!(resolved.ends_with("widget-board"));
    if cfg!(target_os = "linux") {
        assert_eq!(resolved, dir.path().join("widget-board"));
    }
}
