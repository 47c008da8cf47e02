//! Per-widget content records.
//!
//! Every widget persists its own internal state (text, counters, lists) as a
//! JSON object keyed by its widget id. Writes are *patches*: the fields of the
//! patch are merged into the existing record at the top level, so a widget can
//! update one field without clobbering siblings it wrote earlier.
//!
//! Records are created lazily on first write and are never deleted when the
//! widget leaves the layout. Widgets may read a sibling's record by id, or
//! find siblings of a type through [`ContentStore::keys_with_prefix`].

use crate::{BoardError, BoardUpdate, StorageKey};
use board_storage::KeyValueStore;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Capacity of the content change notification channel.
const DEFAULT_SUBSCRIBER_CHANNEL_CAPACITY: usize = 256;

/// A widget's persisted JSON object.
pub type ContentRecord = Map<String, Value>;

/// Merges `patch` into `base` field by field at the top level.
///
/// Fields present only in `base` are kept; fields present in `patch` win.
/// Nested objects are replaced, not merged.
pub fn shallow_merge(base: &mut ContentRecord, patch: ContentRecord) {
    for (field, value) in patch {
        base.insert(field, value);
    }
}

/// Converts a JSON value into a record, rejecting non-objects.
pub fn record_from_value(value: Value) -> Result<ContentRecord, BoardError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(BoardError::NotAnObject(other.to_string())),
    }
}

/// Keyed store of [`ContentRecord`]s persisted under `box-contents`.
pub struct ContentStore {
    storage: Arc<dyn KeyValueStore>,
    records: BTreeMap<String, ContentRecord>,
    update_tx: broadcast::Sender<BoardUpdate>,
}

impl std::fmt::Debug for ContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentStore")
            .field("records", &self.records.len())
            .field("subscriber_count", &self.update_tx.receiver_count())
            .finish()
    }
}

impl ContentStore {
    /// Opens the store, loading existing records from `storage`.
    ///
    /// # Errors
    ///
    /// Returns `BoardError::Corrupt` if the stored namespace is not an object
    /// of objects, or a storage error if it cannot be read.
    pub fn open(storage: Arc<dyn KeyValueStore>) -> Result<Self, BoardError> {
        let (update_tx, _rx) = broadcast::channel(DEFAULT_SUBSCRIBER_CHANNEL_CAPACITY);
        let mut store = Self {
            storage,
            records: BTreeMap::new(),
            update_tx,
        };
        store.reload()?;
        Ok(store)
    }

    /// Re-reads every record from storage, discarding in-memory state.
    pub fn reload(&mut self) -> Result<(), BoardError> {
        let key = StorageKey::BoxContents.as_str();
        self.records = match self.storage.get(key)? {
            None => BTreeMap::new(),
            Some(value) => parse_records(value).map_err(|message| BoardError::Corrupt {
                key: key.to_string(),
                message,
            })?,
        };
        tracing::debug!("Loaded {} content records", self.records.len());
        Ok(())
    }

    /// Returns the record at `key`, or an empty object if none was written.
    pub fn get_box_content(&self, key: &str) -> ContentRecord {
        self.records.get(key).cloned().unwrap_or_default()
    }

    /// Shallow-merges `patch` into the record at `key`, creating it if absent.
    pub fn set_box_content(&mut self, key: &str, patch: ContentRecord) {
        let record = self.records.entry(key.to_string()).or_default();
        shallow_merge(record, patch);
        self.persist();
        self.notify(BoardUpdate::ContentChanged(key.to_string()));
    }

    /// Replaces every record. Nothing from the previous contents survives.
    pub fn load_all_contents(&mut self, contents: BTreeMap<String, ContentRecord>) {
        self.records = contents;
        self.persist();
        self.notify(BoardUpdate::ContentReplaced);
    }

    /// Returns `true` if a record was ever written for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    /// All record keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    /// Record keys starting with `prefix`, e.g. `"tasks-"` for every tasks widget.
    pub fn keys_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.records
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .map(|(key, _)| key.as_str())
            .take_while(move |key| key.starts_with(prefix))
    }

    /// Snapshot of every record.
    pub fn all(&self) -> &BTreeMap<String, ContentRecord> {
        &self.records
    }

    /// Subscribes to content change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<BoardUpdate> {
        self.update_tx.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.update_tx.receiver_count()
    }

    fn persist(&self) {
        let value = Value::Object(
            self.records
                .iter()
                .map(|(k, v)| (k.clone(), Value::Object(v.clone())))
                .collect(),
        );
        if let Err(e) = self.storage.set(StorageKey::BoxContents.as_str(), &value) {
            tracing::warn!("Failed to persist content records: {}", e);
        }
    }

    fn notify(&self, update: BoardUpdate) {
        match self.update_tx.send(update) {
            Ok(count) => tracing::trace!("Content update sent to {} subscribers", count),
            Err(_) => tracing::debug!("No subscribers for content update"),
        }
    }
}

pub(crate) fn parse_records(value: Value) -> Result<BTreeMap<String, ContentRecord>, String> {
    let Value::Object(map) = value else {
        return Err("expected an object of records".to_string());
    };
    map.into_iter()
        .map(|(key, record)| match record {
            Value::Object(fields) => Ok((key, fields)),
            _ => Err(format!("record '{key}' is not an object")),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_storage::MemoryStore;
    use serde_json::json;

    fn record(value: Value) -> ContentRecord {
        record_from_value(value).expect("test record must be an object")
    }

    fn open_store() -> (Arc<MemoryStore>, ContentStore) {
        let storage = Arc::new(MemoryStore::new());
        let store = ContentStore::open(storage.clone()).expect("open should succeed");
        (storage, store)
    }

    #[test]
    fn get_missing_returns_empty_object() {
        let (_, store) = open_store();
        assert!(store.get_box_content("w1").is_empty());
        assert!(!store.contains("w1"));
    }

    #[test]
    fn set_merges_instead_of_replacing() {
        let (_, mut store) = open_store();
        store.set_box_content("w1", record(json!({"a": 1})));
        store.set_box_content("w1", record(json!({"b": 2})));
        assert_eq!(
            Value::Object(store.get_box_content("w1")),
            json!({"a": 1, "b": 2})
        );
    }

    #[test]
    fn set_overwrites_fields_present_in_patch() {
        let (_, mut store) = open_store();
        store.set_box_content("w1", record(json!({"a": 1, "nested": {"x": 1, "y": 2}})));
        store.set_box_content("w1", record(json!({"a": 5, "nested": {"x": 9}})));
        assert_eq!(
            Value::Object(store.get_box_content("w1")),
            json!({"a": 5, "nested": {"x": 9}})
        );
    }

    #[test]
    fn records_are_isolated_per_key() {
        let (_, mut store) = open_store();
        store.set_box_content("notes-1", record(json!({"text": "one"})));
        store.set_box_content("notes-2", record(json!({"text": "two"})));
        assert_eq!(store.get_box_content("notes-1")["text"], json!("one"));
        assert_eq!(store.get_box_content("notes-2")["text"], json!("two"));
    }

    #[test]
    fn empty_patch_creates_record() {
        let (_, mut store) = open_store();
        store.set_box_content("w1", ContentRecord::new());
        assert!(store.contains("w1"));
    }

    #[test]
    fn load_all_replaces_wholesale() {
        let (_, mut store) = open_store();
        store.set_box_content("old", record(json!({"a": 1})));
        let mut fresh = BTreeMap::new();
        fresh.insert("new".to_string(), record(json!({"b": 2})));
        store.load_all_contents(fresh);
        assert!(!store.contains("old"));
        assert_eq!(store.keys().collect::<Vec<_>>(), vec!["new"]);
    }

    #[test]
    fn writes_persist_across_reopen() {
        let (storage, mut store) = open_store();
        store.set_box_content("tasks-abc", record(json!({"items": ["a"]})));
        let reopened = ContentStore::open(storage).expect("reopen should succeed");
        assert_eq!(reopened.get_box_content("tasks-abc")["items"], json!(["a"]));
    }

    #[test]
    fn keys_with_prefix_finds_siblings() {
        let (_, mut store) = open_store();
        for key in ["notes-1", "tasks-b", "tasks-a", "tasksx", "habits-1"] {
            store.set_box_content(key, record(json!({})));
        }
        assert_eq!(
            store.keys_with_prefix("tasks-").collect::<Vec<_>>(),
            vec!["tasks-a", "tasks-b"]
        );
        assert_eq!(store.keys_with_prefix("zzz").count(), 0);
    }

    #[test]
    fn open_rejects_non_object_records() {
        let storage = Arc::new(MemoryStore::with_values([(
            "box-contents".to_string(),
            json!({"w1": [1, 2, 3]}),
        )]));
        let err = ContentStore::open(storage).expect_err("should reject");
        assert!(matches!(err, BoardError::Corrupt { .. }));
    }

    #[test]
    fn record_from_value_rejects_scalars() {
        assert!(matches!(
            record_from_value(json!("text")),
            Err(BoardError::NotAnObject(_))
        ));
    }

    #[tokio::test]
    async fn subscribers_see_patches_and_replacements() {
        let (_, mut store) = open_store();
        let mut rx = store.subscribe();
        store.set_box_content("w1", record(json!({"a": 1})));
        store.load_all_contents(BTreeMap::new());
        assert_eq!(
            rx.recv().await.expect("first update"),
            BoardUpdate::ContentChanged("w1".to_string())
        );
        assert_eq!(
            rx.recv().await.expect("second update"),
            BoardUpdate::ContentReplaced
        );
    }
}
