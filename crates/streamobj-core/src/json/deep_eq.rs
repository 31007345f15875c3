//! Structural equality for JSON values, used to decide whether a freshly
//! decoded partial snapshot actually changed (spec §4.3/"Deep equality on
//! partials").

use serde_json::Value;

/// Compares two JSON values structurally: arrays element-wise in order,
/// objects as unordered key-value sets, numbers by numeric value rather
/// than by their literal representation.
///
/// # Examples
///
/// ```
/// use streamobj_core::json::is_deep_equal;
/// use serde_json::json;
///
/// assert!(is_deep_equal(&json!({"a": 1, "b": 2}), &json!({"b": 2, "a": 1})));
/// assert!(!is_deep_equal(&json!([1, 2, 3]), &json!([3, 2, 1])));
/// ```
pub fn is_deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a_f), Some(b_f)) => (a_f.is_nan() && b_f.is_nan()) || a_f == b_f,
            _ => {
                if let (Some(a_i), Some(b_i)) = (a.as_i64(), b.as_i64()) {
                    a_i == b_i
                } else if let (Some(a_u), Some(b_u)) = (a.as_u64(), b.as_u64()) {
                    a_u == b_u
                } else {
                    false
                }
            }
        },
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| is_deep_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter().all(|(key, val_a)| {
                    b.get(key).map(|val_b| is_deep_equal(val_a, val_b)).unwrap_or(false)
                })
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_equality() {
        assert!(is_deep_equal(&json!(null), &json!(null)));
    }

    #[test]
    fn test_boolean_equality() {
        assert!(is_deep_equal(&json!(true), &json!(true)));
        assert!(!is_deep_equal(&json!(true), &json!(false)));
    }

    #[test]
    fn test_number_equality() {
        assert!(is_deep_equal(&json!(42), &json!(42)));
        assert!(is_deep_equal(&json!(3.15), &json!(3.15)));
        assert!(!is_deep_equal(&json!(1), &json!(2)));
    }

    #[test]
    fn test_string_equality() {
        assert!(is_deep_equal(&json!("hello"), &json!("hello")));
        assert!(!is_deep_equal(&json!("hello"), &json!("world")));
    }

    #[test]
    fn test_array_order_sensitive() {
        assert!(is_deep_equal(&json!([1, 2, 3]), &json!([1, 2, 3])));
        assert!(!is_deep_equal(&json!([1, 2, 3]), &json!([3, 2, 1])));
        assert!(!is_deep_equal(&json!([1, 2]), &json!([1, 2, 3])));
    }

    #[test]
    fn test_object_order_insensitive() {
        assert!(is_deep_equal(&json!({"a": 1, "b": 2}), &json!({"b": 2, "a": 1})));
        assert!(!is_deep_equal(&json!({"a": 1, "b": 2}), &json!({"a": 1, "b": 3})));
        assert!(!is_deep_equal(&json!({"a": 1}), &json!({"a": 1, "b": 2})));
    }

    #[test]
    fn test_nested_structures() {
        assert!(is_deep_equal(
            &json!({"nested": {"value": [1, 2, 3]}}),
            &json!({"nested": {"value": [1, 2, 3]}})
        ));
        assert!(!is_deep_equal(
            &json!({"nested": {"value": [1, 2, 3]}}),
            &json!({"nested": {"value": [1, 2, 4]}})
        ));
    }

    #[test]
    fn test_different_types() {
        assert!(!is_deep_equal(&json!(1), &json!("1")));
        assert!(!is_deep_equal(&json!([]), &json!({})));
    }

    #[test]
    fn test_growing_partial_snapshot_is_not_equal() {
        let a = json!({"content": "Hello, "});
        let b = json!({"content": "Hello, world"});
        assert!(!is_deep_equal(&a, &b));
    }
}
