//! Structural path addressing over JSON values.
//!
//! Paths are `.`-separated; a segment that parses as an unsigned integer
//! indexes arrays, any other segment keys objects. Lookups return `None`
//! on a missing segment or a type mismatch, and mutation is a silent no-op
//! where the path cannot be realized. `set` creates intermediate
//! containers, choosing object vs array from the shape of the next
//! segment; out-of-range array writes pad with `Null`.

use serde_json::{Map, Value};

/// Get a reference to the value at `path`, or `None` if absent.
pub fn get<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.split('.') {
        current = match current {
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            Value::Object(map) => map.get(segment)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Get a mutable reference to the value at `path`, or `None` if absent.
pub fn get_mut<'a>(root: &'a mut Value, path: &str) -> Option<&'a mut Value> {
    let mut current = root;
    for segment in path.split('.') {
        current = match current {
            Value::Array(items) => items.get_mut(segment.parse::<usize>().ok()?)?,
            Value::Object(map) => map.get_mut(segment)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Set the value at `path`, creating intermediate containers as needed.
///
/// A scalar in the middle of the path is replaced by a fresh container.
/// A non-numeric segment against an array is a no-op.
pub fn set(root: &mut Value, path: &str, value: Value) {
    let segments: Vec<&str> = path.split('.').collect();
    let (last, parents) = match segments.split_last() {
        Some(split) => split,
        None => return,
    };

    let mut current = root;
    for (pos, segment) in parents.iter().enumerate() {
        let next = parents.get(pos + 1).copied().unwrap_or(*last);
        let next_is_index = next.parse::<usize>().is_ok();
        current = match current {
            Value::Array(items) => {
                let index = match segment.parse::<usize>() {
                    Ok(index) => index,
                    Err(_) => return,
                };
                if index >= items.len() {
                    items.resize(index + 1, Value::Null);
                }
                let slot = &mut items[index];
                ensure_container(slot, next_is_index);
                slot
            }
            Value::Object(map) => {
                let slot = map.entry((*segment).to_string()).or_insert(Value::Null);
                ensure_container(slot, next_is_index);
                slot
            }
            _ => return,
        };
    }

    match current {
        Value::Array(items) => {
            if let Ok(index) = last.parse::<usize>() {
                if index >= items.len() {
                    items.resize(index + 1, Value::Null);
                }
                items[index] = value;
            }
        }
        Value::Object(map) => {
            map.insert((*last).to_string(), value);
        }
        _ => {}
    }
}

/// Remove the value at `path` so it becomes absent, not null.
///
/// Object keys are dropped; array removal shifts later elements down.
/// Missing paths are a no-op.
pub fn remove(root: &mut Value, path: &str) {
    let segments: Vec<&str> = path.split('.').collect();
    let (last, parents) = match segments.split_last() {
        Some(split) => split,
        None => return,
    };

    let mut current = root;
    for segment in parents {
        current = match current {
            Value::Array(items) => match segment.parse::<usize>().ok().and_then(|i| items.get_mut(i)) {
                Some(slot) => slot,
                None => return,
            },
            Value::Object(map) => match map.get_mut(*segment) {
                Some(slot) => slot,
                None => return,
            },
            _ => return,
        };
    }

    match current {
        Value::Array(items) => {
            if let Ok(index) = last.parse::<usize>() {
                if index < items.len() {
                    items.remove(index);
                }
            }
        }
        Value::Object(map) => {
            map.remove(*last);
        }
        _ => {}
    }
}

/// ECMAScript truthiness: `null`, `false`, numeric zero and the empty
/// string are falsy; everything else, including empty containers, is
/// truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map_or(true, |n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn ensure_container(slot: &mut Value, next_is_index: bool) {
    if !slot.is_object() && !slot.is_array() {
        *slot = if next_is_index {
            Value::Array(Vec::new())
        } else {
            Value::Object(Map::new())
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_nested_key() {
        let doc = json!({"user": {"name": "Alice", "scores": [100, 95]}});
        assert_eq!(get(&doc, "user.name"), Some(&json!("Alice")));
        assert_eq!(get(&doc, "user.scores.1"), Some(&json!(95)));
    }

    #[test]
    fn get_missing_or_mismatched() {
        let doc = json!({"a": 1});
        assert_eq!(get(&doc, "b"), None);
        assert_eq!(get(&doc, "a.b"), None);
        assert_eq!(get(&json!([1, 2]), "x"), None);
    }

    #[test]
    fn get_mut_allows_in_place_edits() {
        let mut doc = json!({"user": {"scores": [100, 95]}});
        *get_mut(&mut doc, "user.scores.1").unwrap() = json!(99);
        assert_eq!(doc, json!({"user": {"scores": [100, 99]}}));
        assert!(get_mut(&mut doc, "user.name").is_none());
    }

    #[test]
    fn set_creates_intermediates() {
        let mut doc = json!({});
        set(&mut doc, "user.profile.name", json!("Alice"));
        assert_eq!(doc, json!({"user": {"profile": {"name": "Alice"}}}));
    }

    #[test]
    fn set_numeric_segment_creates_array() {
        let mut doc = json!({});
        set(&mut doc, "items.1", json!("b"));
        assert_eq!(doc, json!({"items": [null, "b"]}));
    }

    #[test]
    fn set_replaces_scalar_in_the_way() {
        let mut doc = json!({"a": 5});
        set(&mut doc, "a.b", json!(true));
        assert_eq!(doc, json!({"a": {"b": true}}));
    }

    #[test]
    fn set_non_numeric_segment_on_array_is_noop() {
        let mut doc = json!([1, 2]);
        set(&mut doc, "key", json!(3));
        assert_eq!(doc, json!([1, 2]));
    }

    #[test]
    fn remove_makes_key_absent() {
        let mut doc = json!({"secret": "x", "keep": 1});
        remove(&mut doc, "secret");
        assert_eq!(doc, json!({"keep": 1}));
        assert!(get(&doc, "secret").is_none());
    }

    #[test]
    fn remove_array_element_shifts() {
        let mut doc = json!({"list": [1, 2, 3]});
        remove(&mut doc, "list.1");
        assert_eq!(doc, json!({"list": [1, 3]}));
    }

    #[test]
    fn remove_missing_path_is_noop() {
        let mut doc = json!({"a": 1});
        remove(&mut doc, "b.c");
        assert_eq!(doc, json!({"a": 1}));
    }

    #[test]
    fn truthiness_follows_script_rules() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
    }
}
