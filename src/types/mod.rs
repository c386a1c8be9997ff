//! 类型映射模块：把服务端 JSON 宽松地映射为不可变的强类型结果。
//!
//! # Typed Envelope Mapper
//!
//! Every response type in this crate implements [`FromPayload`], a total
//! conversion from an arbitrary JSON value. Missing or wrongly shaped fields
//! fall back to neutral defaults (empty string, zero, empty list, or a
//! documented literal) instead of failing, so a single odd field never costs
//! the caller an otherwise valid result.
//!
//! The helpers below are the building blocks for those conversions:
//!
//! | Helper | Behaviour on missing / wrong type |
//! |--------|-----------------------------------|
//! | [`str_or`] | the given default |
//! | [`opt_str`] | `None` |
//! | [`i64_or`], [`u64_or`], [`f64_or`] | the default; numeric strings are accepted |
//! | [`bool_or`] | the default |
//! | [`object_or_empty`] | an empty map |
//! | [`list_of`] | empty `Vec`; non-object items are dropped |

use serde_json::{Map, Value};

/// Total conversion from a decoded JSON payload.
pub trait FromPayload: Sized {
    fn from_payload(value: &Value) -> Self;
}

impl FromPayload for Value {
    fn from_payload(value: &Value) -> Self {
        value.clone()
    }
}

pub fn str_or(value: &Value, key: &str, default: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

pub fn opt_str(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

pub fn i64_or(value: &Value, key: &str, default: i64) -> i64 {
    match value.get(key) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(default),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
        _ => default,
    }
}

pub fn u64_or(value: &Value, key: &str, default: u64) -> u64 {
    match value.get(key) {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(default),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
        _ => default,
    }
}

pub fn f64_or(value: &Value, key: &str, default: f64) -> f64 {
    match value.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(default),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
        _ => default,
    }
}

pub fn opt_i64(value: &Value, key: &str) -> Option<i64> {
    match value.get(key) {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn bool_or(value: &Value, key: &str, default: bool) -> bool {
    value.get(key).and_then(Value::as_bool).unwrap_or(default)
}

pub fn object_or_empty(value: &Value, key: &str) -> Map<String, Value> {
    value
        .get(key)
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}

/// Strings of a JSON array; non-string items are dropped.
pub fn string_list(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Map every object in the array at `key`; anything that is not an object is skipped.
pub fn list_of<T: FromPayload>(value: &Value, key: &str) -> Vec<T> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter(|v| v.is_object())
                .map(T::from_payload)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_helpers_accept_strings_and_fall_back() {
        let v = json!({"a": 3, "b": "7", "c": "x", "d": 1.5, "e": -2});
        assert_eq!(i64_or(&v, "a", 0), 3);
        assert_eq!(i64_or(&v, "b", 0), 7);
        assert_eq!(i64_or(&v, "c", 9), 9);
        assert_eq!(i64_or(&v, "missing", 4), 4);
        assert_eq!(u64_or(&v, "e", 11), 11);
        assert_eq!(f64_or(&v, "d", 0.0), 1.5);
        assert_eq!(f64_or(&v, "b", 0.0), 7.0);
        assert_eq!(opt_i64(&v, "b"), Some(7));
        assert_eq!(opt_i64(&v, "c"), None);
    }

    #[test]
    fn string_helpers() {
        let v = json!({"s": "x", "n": 1, "tags": ["a", 2, "b"]});
        assert_eq!(str_or(&v, "s", "d"), "x");
        assert_eq!(str_or(&v, "n", "d"), "d");
        assert_eq!(opt_str(&v, "n"), None);
        assert_eq!(string_list(&v, "tags"), vec!["a", "b"]);
        assert!(string_list(&v, "s").is_empty());
    }

    #[test]
    fn list_of_skips_non_objects() {
        let v = json!({"items": [{"k": 1}, "junk", null, {"k": 2}]});
        let items: Vec<Value> = list_of(&v, "items");
        assert_eq!(items, vec![json!({"k": 1}), json!({"k": 2})]);
        let none: Vec<Value> = list_of(&v, "absent");
        assert!(none.is_empty());
    }

    #[test]
    fn object_or_empty_on_wrong_shape() {
        let v = json!({"m": [1, 2], "o": {"x": 1}});
        assert!(object_or_empty(&v, "m").is_empty());
        assert_eq!(object_or_empty(&v, "o").len(), 1);
    }
}
