//! Deterministic flattening of nested JSON records into key-path/value pairs.

use serde_json::Value;

/// Separator inserted between parent and child keys in a flattened path.
const KEY_SEPARATOR: &str = " ";

/// Flattens a JSON value into ordered `(key-path, value)` pairs.
///
/// Objects recurse depth-first in key-insertion order. Arrays whose elements
/// are all objects recurse per element with an `[idx]` path suffix; any other
/// array collapses into a single space-joined leaf. Scalars render to their
/// canonical string form. Empty objects and arrays contribute no entries.
///
/// The output is byte-identical across repeated calls on the same value.
pub fn flatten(record: &Value) -> Vec<(String, String)> {
    let mut items = Vec::new();
    flatten_into(record, "", &mut items);
    items
}

fn flatten_into(value: &Value, parent_key: &str, items: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = join_key(parent_key, key);
                match child {
                    Value::Object(_) => flatten_into(child, &path, items),
                    Value::Array(elements) => flatten_array(elements, &path, items),
                    scalar => items.push((path, scalar_string(scalar))),
                }
            }
        }
        Value::Array(elements) => flatten_array(elements, parent_key, items),
        scalar => items.push((parent_key.to_string(), scalar_string(scalar))),
    }
}

fn flatten_array(elements: &[Value], path: &str, items: &mut Vec<(String, String)>) {
    if elements.is_empty() {
        return;
    }
    if elements.iter().all(Value::is_object) {
        for (idx, element) in elements.iter().enumerate() {
            flatten_into(element, &format!("{path}[{idx}]"), items);
        }
    } else {
        let joined = elements
            .iter()
            .map(element_string)
            .collect::<Vec<_>>()
            .join(" ");
        items.push((path.to_string(), joined));
    }
}

/// Canonical string form for a scalar leaf.
fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// String form for one element of a joined array leaf. Composite elements
/// render as compact JSON.
fn element_string(value: &Value) -> String {
    match value {
        Value::Object(_) | Value::Array(_) => value.to_string(),
        scalar => scalar_string(scalar),
    }
}

fn join_key(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}{KEY_SEPARATOR}{key}")
    }
}
