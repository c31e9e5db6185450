//! Dotted-path access over JSON value trees.
//!
//! Get, set and merge primitives used by the webhook accessors and the
//! settings-form builder. All operations are total: missing paths read as
//! `None`, writes create what they need, and merge type mismatches resolve
//! by policy instead of erroring.

use serde_json::{Map, Value};

/// Navigate a JSON value by dot-notation path and return the leaf value.
pub fn get<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for part in path.split('.') {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// Like [`get`], returning `default` when the path does not resolve.
pub fn get_or(root: &Value, path: &str, default: Value) -> Value {
    get(root, path).cloned().unwrap_or(default)
}

/// Set a value at a dot-notation path, creating intermediate objects as
/// needed. A non-object intermediate (scalar or array) along the path is
/// overwritten with a fresh object.
pub fn set(root: &mut Value, path: &str, value: Value) {
    let mut segments: Vec<&str> = path.split('.').collect();
    let last = segments.pop().expect("split yields at least one segment");
    terminal_object(root, &segments).insert(last.to_string(), value);
}

/// Merge `value` into the slot at a dot-notation path, creating intermediate
/// objects as needed. The slot itself is combined with `value` under the
/// rules of [`merge_value`].
pub fn merge(root: &mut Value, path: &str, value: Value) {
    let mut segments: Vec<&str> = path.split('.').collect();
    let last = segments.pop().expect("split yields at least one segment");
    let slot = terminal_object(root, &segments)
        .entry(last.to_string())
        .or_insert(Value::Null);
    merge_value(slot, value);
}

/// Walk to the object owning the final path segment, coercing non-object
/// intermediates (scalars, arrays) to fresh objects along the way.
fn terminal_object<'a>(root: &'a mut Value, segments: &[&str]) -> &'a mut Map<String, Value> {
    let mut current = root;
    for part in segments {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        current = current
            .as_object_mut()
            .expect("coerced to object above")
            .entry(part.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    if !current.is_object() {
        *current = Value::Object(Map::new());
    }
    current.as_object_mut().expect("coerced to object above")
}

/// Combine a new value with the current one, in place.
///
/// Arrays never merge: if either side is an array the new value replaces the
/// old outright. Two objects shallow-merge — top-level keys of `value` win,
/// keys only present in `current` survive, and a nested object under an
/// overlapping key is replaced wholesale. Any other pairing replaces.
pub fn merge_value(current: &mut Value, value: Value) {
    if current.is_array() || value.is_array() {
        *current = value;
        return;
    }
    match value {
        Value::Object(incoming) if current.is_object() => {
            let existing = current.as_object_mut().expect("checked is_object above");
            for (key, val) in incoming {
                existing.insert(key, val);
            }
        }
        other => *current = other,
    }
}
