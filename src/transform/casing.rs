//! Provider key casing to pipeline key casing.
//!
//! The describe APIs return PascalCase keys with embedded acronyms
//! (`DBSnapshotIdentifier`, `IAMDatabaseAuthenticationEnabled`). The pipeline
//! wants lower snake case. Acronym runs stay together, and a pluralized acronym
//! at the end of a key (`TargetGroupARNs`) is kept as one word.

use serde_json::{Map, Value};

/// Convert a single compound-capitalized key to snake case.
pub fn camel_to_snake(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let chars = split_plural_acronym(&chars, name.starts_with('_'));
    let chars = split_capitalized_words(&chars);
    let chars = split_lower_upper(&chars);
    chars.into_iter().collect::<String>().to_ascii_lowercase()
}

// a trailing run of 3+ capitals followed by "s" becomes "_runs"
fn split_plural_acronym(chars: &[char], leading_underscore: bool) -> Vec<char> {
    let len = chars.len();
    if len < 4 || chars[len - 1] != 's' {
        return chars.to_vec();
    }

    let mut start = len - 1;
    while start > 0 && chars[start - 1].is_ascii_uppercase() {
        start -= 1;
    }
    if len - 1 - start < 3 {
        return chars.to_vec();
    }

    let mut out = Vec::with_capacity(len + 1);
    out.extend_from_slice(&chars[..start]);
    // nothing before the acronym means no separator
    if start > 0 || leading_underscore {
        out.push('_');
    }
    out.extend(chars[start..].iter().map(|c| c.to_ascii_lowercase()));
    out
}

// "xWord" becomes "x_Word" for any x followed by a capitalized word
fn split_capitalized_words(chars: &[char]) -> Vec<char> {
    let mut out = Vec::with_capacity(chars.len() + 4);
    let mut i = 0;

    while i < chars.len() {
        let starts_word = i + 2 < chars.len()
            && chars[i + 1].is_ascii_uppercase()
            && chars[i + 2].is_ascii_lowercase();

        out.push(chars[i]);
        if !starts_word {
            i += 1;
            continue;
        }

        out.push('_');
        out.push(chars[i + 1]);
        let mut j = i + 2;
        while j < chars.len() && chars[j].is_ascii_lowercase() {
            out.push(chars[j]);
            j += 1;
        }
        i = j;
    }

    out
}

// a lowercase letter or digit followed by a run of capitals gets a separator
fn split_lower_upper(chars: &[char]) -> Vec<char> {
    let mut out = Vec::with_capacity(chars.len() + 4);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        out.push(c);

        let boundary = (c.is_ascii_lowercase() || c.is_ascii_digit())
            && i + 1 < chars.len()
            && chars[i + 1].is_ascii_uppercase();
        if !boundary {
            i += 1;
            continue;
        }

        out.push('_');
        let mut j = i + 1;
        while j < chars.len() && chars[j].is_ascii_uppercase() {
            out.push(chars[j]);
            j += 1;
        }
        i = j;
    }

    out
}

/// Rewrite every key of `map` (recursively) to snake case.
///
/// Keys named in `exempt` are themselves rewritten, but their values are
/// copied through untouched. Exemptions match regardless of casing, so
/// `"Tags"` also protects an already-normalized `"tags"` field.
pub fn camel_map_to_snake(map: &Map<String, Value>, exempt: &[&str]) -> Map<String, Value> {
    let exempt: Vec<String> = exempt.iter().map(|k| camel_to_snake(k)).collect();
    let mut out = Map::with_capacity(map.len());

    for (key, value) in map {
        let snake_key = camel_to_snake(key);
        let converted = if exempt.contains(&snake_key) {
            value.clone()
        } else {
            convert_value(value)
        };
        out.insert(snake_key, converted);
    }

    out
}

// exemptions only apply at the top level
fn convert_value(value: &Value) -> Value {
    match value {
        Value::Object(inner) => Value::Object(camel_map_to_snake(inner, &[])),
        Value::Array(items) => Value::Array(items.iter().map(convert_value).collect()),
        other => other.clone(),
    }
}
