//! Dot-separated path access into JSON values
//!
//! Paths such as `user.address.city` walk object fields; numeric segments
//! index into arrays (`items.0.name`). Writes never mutate their input: they
//! return a new value with the path assigned.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use super::coerce::is_truthy;
use super::types::TransformationError;
use serde_json::{Map, Value};

/// Resolve a dot-separated path; `None` means the path does not resolve
pub fn get_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|index| items.get(index)),
        _ => None,
    })
}

/// Return a copy of `value` with `new_value` assigned at `path`
///
/// A non-object root is replaced by an object (arrays keep their elements
/// under index keys). Missing or falsy intermediate segments become empty
/// objects; a truthy scalar in the way is a [`TransformationError::PathConflict`].
pub fn set_path(value: &Value, path: &str, new_value: Value) -> Result<Value, TransformationError> {
    let mut result = match value {
        Value::Object(_) => value.clone(),
        Value::Array(items) => Value::Object(
            items
                .iter()
                .enumerate()
                .map(|(index, item)| (index.to_string(), item.clone()))
                .collect(),
        ),
        _ => Value::Object(Map::new()),
    };

    let segments: Vec<&str> = path.split('.').collect();
    let last_index = segments.len() - 1;
    let mut current = &mut result;

    for (i, segment) in segments.iter().enumerate() {
        let is_last = i == last_index;

        if let Value::Array(items) = current {
            let index = segment
                .parse::<usize>()
                .ok()
                .filter(|index| *index < items.len())
                .ok_or_else(|| TransformationError::PathConflict {
                    path: path.to_string(),
                    message: format!("'{}' is not an index of the array", segment),
                })?;
            if is_last {
                items[index] = new_value;
                return Ok(result);
            }
            let next = &mut items[index];
            replace_falsy_scalar(next, path, segment)?;
            current = next;
        } else {
            let map = current.as_object_mut().ok_or_else(|| TransformationError::PathConflict {
                path: path.to_string(),
                message: "Expected object for path navigation".to_string(),
            })?;
            if is_last {
                map.insert(segment.to_string(), new_value);
                return Ok(result);
            }
            let next = map
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            replace_falsy_scalar(next, path, segment)?;
            current = next;
        }
    }

    Ok(result)
}

/// Turn a falsy scalar on the way to the target into an empty object
fn replace_falsy_scalar(
    next: &mut Value,
    path: &str,
    segment: &str,
) -> Result<(), TransformationError> {
    if next.is_object() || next.is_array() {
        return Ok(());
    }
    if is_truthy(next) {
        return Err(TransformationError::PathConflict {
            path: path.to_string(),
            message: format!("'{}' holds a scalar value", segment),
        });
    }
    *next = Value::Object(Map::new());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_nested_path() {
        let data = json!({"user": {"address": {"city": "Lisbon"}}});
        assert_eq!(get_path(&data, "user.address.city"), Some(&json!("Lisbon")));
        assert_eq!(get_path(&data, "user.address.zip"), None);
        assert_eq!(get_path(&data, "user.address.city.name"), None);
    }

    #[test]
    fn test_get_array_index() {
        let data = json!({"items": [{"name": "a"}, {"name": "b"}]});
        assert_eq!(get_path(&data, "items.1.name"), Some(&json!("b")));
        assert_eq!(get_path(&data, "items.2.name"), None);
        assert_eq!(get_path(&data, "items.x"), None);
    }

    #[test]
    fn test_get_explicit_null_resolves() {
        let data = json!({"a": null});
        assert_eq!(get_path(&data, "a"), Some(&Value::Null));
        assert_eq!(get_path(&data, "a.b"), None);
    }

    #[test]
    fn test_set_leaves_input_untouched() {
        let data = json!({"a": 1});
        let updated = set_path(&data, "b", json!(2)).unwrap();
        assert_eq!(data, json!({"a": 1}));
        assert_eq!(updated, json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_set_creates_intermediate_objects() {
        let updated = set_path(&json!({}), "a.b.c", json!(true)).unwrap();
        assert_eq!(updated, json!({"a": {"b": {"c": true}}}));

        let updated = set_path(&json!({"a": null}), "a.b", json!(1)).unwrap();
        assert_eq!(updated, json!({"a": {"b": 1}}));
    }

    #[test]
    fn test_set_on_scalar_root() {
        let updated = set_path(&json!(5), "x", json!(1)).unwrap();
        assert_eq!(updated, json!({"x": 1}));

        let updated = set_path(&json!(["p", "q"]), "x", json!(1)).unwrap();
        assert_eq!(updated, json!({"0": "p", "1": "q", "x": 1}));
    }

    #[test]
    fn test_set_into_array_element() {
        let data = json!({"items": [{"n": 1}, {"n": 2}]});
        let updated = set_path(&data, "items.1.n", json!(20)).unwrap();
        assert_eq!(updated, json!({"items": [{"n": 1}, {"n": 20}]}));

        assert!(set_path(&data, "items.5.n", json!(0)).is_err());
    }

    #[test]
    fn test_set_through_falsy_array_element() {
        let updated = set_path(&json!({"items": [null]}), "items.0.b", json!(1)).unwrap();
        assert_eq!(updated, json!({"items": [{"b": 1}]}));

        let updated = set_path(&json!({"items": [1, false, ""]}), "items.1.b", json!(2)).unwrap();
        assert_eq!(updated, json!({"items": [1, {"b": 2}, ""]}));

        let err = set_path(&json!({"items": ["x"]}), "items.0.b", json!(3)).unwrap_err();
        assert!(matches!(err, TransformationError::PathConflict { .. }));
    }

    #[test]
    fn test_set_through_scalar_conflicts() {
        let data = json!({"name": "ana"});
        let err = set_path(&data, "name.first", json!("x")).unwrap_err();
        assert!(matches!(err, TransformationError::PathConflict { .. }));
    }
}
