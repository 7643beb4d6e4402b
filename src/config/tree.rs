//! Helpers for walking and merging the JSON configuration tree
//!
//! Keys in the tree keep the spelling of whichever source introduced them.
//! Lookups are exact first, then ASCII case-insensitive.

use serde_json::{Map, Value};

/// Separator for hierarchical configuration keys (`"App:Database:Host"`)
pub const KEY_DELIMITER: char = ':';

/// Find a direct child of `value` by key segment.
///
/// Arrays are indexed by numeric segments.
pub(crate) fn child<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment).or_else(|| {
            map.iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(segment))
                .map(|(_, v)| v)
        }),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Resolve a colon-delimited path below `root`
pub(crate) fn lookup<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    key.split(KEY_DELIMITER)
        .try_fold(root, |node, segment| child(node, segment))
}

fn matching_key(map: &Map<String, Value>, segment: &str) -> Option<String> {
    if map.contains_key(segment) {
        return Some(segment.to_string());
    }
    map.keys().find(|k| k.eq_ignore_ascii_case(segment)).cloned()
}

/// Insert `value` at `segments`, creating intermediate objects.
///
/// Non-object nodes along the path are replaced.
pub(crate) fn insert_path(root: &mut Value, segments: &[&str], value: Value) {
    let Some((last, parents)) = segments.split_last() else {
        *root = value;
        return;
    };

    let mut node = root;
    for segment in parents {
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        let Value::Object(map) = node else { return };
        let key = matching_key(map, segment).unwrap_or_else(|| (*segment).to_string());
        node = map.entry(key).or_insert_with(|| Value::Object(Map::new()));
    }

    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    if let Value::Object(map) = node {
        let key = matching_key(map, last).unwrap_or_else(|| (*last).to_string());
        match map.get_mut(&key) {
            Some(existing) => merge_layer(existing, value),
            None => {
                map.insert(key, value);
            }
        }
    }
}

/// Layer `overlay` on top of `base`: objects merge recursively, everything
/// else is replaced.
pub(crate) fn merge_layer(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                let slot = match matching_key(base_map, &key) {
                    Some(existing) => base_map.get_mut(&existing),
                    None => None,
                };
                match slot {
                    Some(slot) => merge_layer(slot, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Normalize a field name for binding: `connection_string`,
/// `ConnectionString` and `connection-string` all compare equal.
pub(crate) fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_' && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Merge a configuration section over the serialized form of a settings
/// value, steering keys toward the target's field names.
///
/// Values land as written; conversion to the field types happens when the
/// merged tree is deserialized.
pub(crate) fn bind_merge(target: &mut Value, overlay: &Value) {
    // Explicit nulls keep the default
    if overlay.is_null() {
        return;
    }

    match (target, overlay) {
        (Value::Object(target_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                let normalized = normalize_key(key);
                let existing = target_map
                    .keys()
                    .find(|k| normalize_key(k) == normalized)
                    .cloned();
                match existing.and_then(|existing| target_map.get_mut(&existing)) {
                    Some(slot) => bind_merge(slot, value),
                    None => {
                        target_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (target, overlay) => *target = overlay.clone(),
    }
}
