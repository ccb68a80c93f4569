//! Tag list to tag mapping.

use serde_json::{Map, Value};

use crate::error::{Error, Result};

// checked in order against the first entry of the list
const KEY_CANDIDATES: [(&str, &str); 2] = [("key", "value"), ("Key", "Value")];

/// Convert `[{"Key": k, "Value": v}, ...]` into `{k: v, ...}`.
///
/// Lower-case `key`/`value` entries are accepted too. Which pair is used is
/// decided by the first entry; an empty list gives an empty mapping.
pub fn tag_list_to_map(tags: &[Value]) -> Result<Map<String, Value>> {
    let Some(first) = tags.first() else {
        return Ok(Map::new());
    };

    let (key_name, value_name) = KEY_CANDIDATES
        .iter()
        .copied()
        .find(|(k, v)| first.get(k).is_some() && first.get(v).is_some())
        .ok_or_else(|| Error::Transform(format!("no tag key found in tag list entry {first}")))?;

    let mut map = Map::with_capacity(tags.len());
    for tag in tags {
        let key = match tag.get(key_name) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => return Err(Error::Transform(format!("tag entry missing {key_name}: {tag}"))),
        };
        let value = tag
            .get(value_name)
            .cloned()
            .ok_or_else(|| Error::Transform(format!("tag entry missing {value_name}: {tag}")))?;
        map.insert(key, value);
    }

    Ok(map)
}
