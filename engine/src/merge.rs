//! Structural copy and merge of field maps.
//!
//! Lists and maps are copied element-wise; functions, instances and classes
//! are shared handles and are copied by reference. Merging recurses into
//! nested maps and replaces everything else.

use crate::{Fields, Value};

/// Copy a value so that nested lists and maps are not shared with the source.
pub fn deep_copy(value: &Value) -> Value {
    match value {
        Value::List(items) => Value::List(items.iter().map(deep_copy).collect()),
        Value::Map(map) => Value::Map(copy_fields(map)),
        other => other.clone(),
    }
}

/// Copy every entry of a field map.
pub fn copy_fields(fields: &Fields) -> Fields {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), deep_copy(v)))
        .collect()
}

/// Merge `source` into `target`.
///
/// When both sides hold a map under the same key the maps are merged
/// recursively; otherwise the source value replaces the target value.
pub fn merge_into(target: &mut Fields, source: &Fields) {
    for (key, value) in source {
        match (target.get_mut(key), value) {
            (Some(Value::Map(existing)), Value::Map(incoming)) => merge_into(existing, incoming),
            _ => {
                target.insert(key.clone(), deep_copy(value));
            }
        }
    }
}

/// Insert entries from `source` whose keys `target` does not have yet.
pub fn fill_missing(target: &mut Fields, source: &Fields) {
    for (key, value) in source {
        if !target.contains_key(key) {
            target.insert(key.clone(), deep_copy(value));
        }
    }
}
