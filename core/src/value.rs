//! Untyped values on both sides of the codec.
//!
//! # Design
//! `WireValue` is plain `serde_json::Value`: snake_case keys, timestamps as
//! strings. `LocalValue` is the caller-side tree: camelCase keys and
//! timestamps as real instants. Objects keep insertion order on both sides so
//! encoding is deterministic.
//!
//! The `From<serde_json::Value>` / [`LocalValue::into_json`] pair moves a tree
//! across without renaming keys or sniffing timestamps. It is the bridge
//! between `LocalValue` and serde-typed structs; the codec is what translates
//! between the two conventions.

use chrono::{DateTime, FixedOffset, Utc};
use indexmap::IndexMap;
use serde_json::Number;

use crate::timestamp::format_timestamp;

/// A JSON value in wire form.
pub type WireValue = serde_json::Value;

/// Ordered map of local keys to values.
pub type LocalMap = IndexMap<String, LocalValue>;

/// A JSON-shaped value in local form.
#[derive(Debug, Clone, PartialEq)]
pub enum LocalValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    DateTime(DateTime<FixedOffset>),
    Array(Vec<LocalValue>),
    Object(LocalMap),
}

impl LocalValue {
    /// Build an object from `(key, value)` pairs, keeping their order.
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, LocalValue)>,
    {
        LocalValue::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Look up a key on an object; `None` for missing keys and non-objects.
    pub fn get(&self, key: &str) -> Option<&LocalValue> {
        match self {
            LocalValue::Object(map) => map.get(key),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, LocalValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            LocalValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            LocalValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            LocalValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            LocalValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            LocalValue::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[LocalValue]> {
        match self {
            LocalValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&LocalMap> {
        match self {
            LocalValue::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Convert to `serde_json::Value` without renaming keys. Instants are
    /// rendered with millisecond precision.
    pub fn into_json(self) -> serde_json::Value {
        match self {
            LocalValue::Null => serde_json::Value::Null,
            LocalValue::Bool(b) => serde_json::Value::Bool(b),
            LocalValue::Number(n) => serde_json::Value::Number(n),
            LocalValue::String(s) => serde_json::Value::String(s),
            LocalValue::DateTime(dt) => serde_json::Value::String(format_timestamp(&dt)),
            LocalValue::Array(items) => {
                serde_json::Value::Array(items.into_iter().map(LocalValue::into_json).collect())
            }
            LocalValue::Object(map) => serde_json::Value::Object(
                map.into_iter().map(|(k, v)| (k, v.into_json())).collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for LocalValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => LocalValue::Null,
            serde_json::Value::Bool(b) => LocalValue::Bool(b),
            serde_json::Value::Number(n) => LocalValue::Number(n),
            serde_json::Value::String(s) => LocalValue::String(s),
            serde_json::Value::Array(items) => {
                LocalValue::Array(items.into_iter().map(LocalValue::from).collect())
            }
            serde_json::Value::Object(map) => {
                LocalValue::Object(map.into_iter().map(|(k, v)| (k, LocalValue::from(v))).collect())
            }
        }
    }
}

impl From<bool> for LocalValue {
    fn from(b: bool) -> Self {
        LocalValue::Bool(b)
    }
}

impl From<i64> for LocalValue {
    fn from(n: i64) -> Self {
        LocalValue::Number(n.into())
    }
}

impl From<&str> for LocalValue {
    fn from(s: &str) -> Self {
        LocalValue::String(s.to_string())
    }
}

impl From<String> for LocalValue {
    fn from(s: String) -> Self {
        LocalValue::String(s)
    }
}

impl From<DateTime<FixedOffset>> for LocalValue {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        LocalValue::DateTime(dt)
    }
}

impl From<DateTime<Utc>> for LocalValue {
    fn from(dt: DateTime<Utc>) -> Self {
        LocalValue::DateTime(dt.fixed_offset())
    }
}

impl From<Vec<LocalValue>> for LocalValue {
    fn from(items: Vec<LocalValue>) -> Self {
        LocalValue::Array(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn object_keeps_insertion_order() {
        let value = LocalValue::object([("zeta", 1i64.into()), ("alpha", 2i64.into())]);
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha"]);
    }

    #[test]
    fn from_json_keeps_keys_and_strings() {
        let value = LocalValue::from(json!({"created_at": "2024-01-02T03:04:05Z", "n": [1, true, null]}));
        assert_eq!(value.get("created_at").unwrap().as_str(), Some("2024-01-02T03:04:05Z"));
        let n = value.get("n").unwrap().as_array().unwrap();
        assert_eq!(n[0].as_i64(), Some(1));
        assert_eq!(n[1].as_bool(), Some(true));
        assert!(n[2].is_null());
    }

    #[test]
    fn into_json_renders_instants_with_millis() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let value = LocalValue::object([("createdAt", dt.into())]);
        assert_eq!(value.into_json(), json!({"createdAt": "2024-01-02T03:04:05.000Z"}));
    }

    #[test]
    fn accessors_on_wrong_shape_return_none() {
        let value = LocalValue::from("text");
        assert!(value.get("x").is_none());
        assert!(value.as_i64().is_none());
        assert!(value.as_datetime().is_none());
        assert!(value.as_array().is_none());
    }
}
