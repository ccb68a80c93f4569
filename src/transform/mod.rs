//! Snapshot record normalization.
//!
//! Raw describe records are reshaped in two steps:
//! - tag list becomes a tag mapping (dropped entirely for shared snapshots)
//! - every attribute key is rewritten to snake case, except inside the tag mapping
//!
//! Order and count of records are preserved.

pub mod casing;
pub mod tags;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::client::RawSnapshot;
use crate::error::{Error, Result};

pub use casing::{camel_map_to_snake, camel_to_snake};
pub use tags::tag_list_to_map;

/// Top-level fields whose contents are never key-rewritten.
pub const EXEMPT_KEYS: &[&str] = &["Tags"];

// the describe APIs return tags under TagList, older callers used Tags
const TAG_SOURCE_KEYS: [&str; 2] = ["Tags", "TagList"];

/// A normalized snapshot, keyed in snake case.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SnapshotRecord(Map<String, Value>);

impl SnapshotRecord {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn tags(&self) -> Option<&Map<String, Value>> {
        self.0.get("tags").and_then(Value::as_object)
    }

    pub fn snapshot_type(&self) -> Option<&str> {
        self.str_field("snapshot_type")
    }

    /// Instance or cluster snapshot identifier, whichever this record has.
    pub fn identifier(&self) -> Option<&str> {
        self.str_field("db_snapshot_identifier")
            .or_else(|| self.str_field("db_cluster_snapshot_identifier"))
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

/// Normalize one batch of describe results.
pub fn normalize_batch(records: Vec<RawSnapshot>) -> Result<Vec<SnapshotRecord>> {
    records.into_iter().map(normalize_record).collect()
}

pub fn normalize_record(mut record: RawSnapshot) -> Result<SnapshotRecord> {
    let shared = lookup(&record, "SnapshotType").and_then(Value::as_str) == Some("shared");

    let tag_list: Vec<Value> = TAG_SOURCE_KEYS
        .iter()
        .filter_map(|key| record.shift_remove(*key))
        .next()
        .map(into_tag_list)
        .transpose()?
        .unwrap_or_default();

    // remove any leftover tag source so only one tags field survives
    for key in TAG_SOURCE_KEYS {
        record.shift_remove(key);
    }

    if shared {
        // tags of snapshots owned by another account are not visible to us
        record.shift_remove("tags");
    } else if !(tag_list.is_empty() && record.get("tags").is_some_and(Value::is_object)) {
        record.shift_remove("tags");
        record.insert("Tags".to_string(), Value::Object(tag_list_to_map(&tag_list)?));
    }

    Ok(SnapshotRecord(camel_map_to_snake(&record, EXEMPT_KEYS)))
}

// provider key first, then its normalized spelling
fn lookup<'a>(record: &'a RawSnapshot, provider_key: &str) -> Option<&'a Value> {
    record
        .get(provider_key)
        .or_else(|| record.get(&camel_to_snake(provider_key)))
}

fn into_tag_list(value: Value) -> Result<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        other => Err(Error::Transform(format!("tag list is not a list: {other}"))),
    }
}
