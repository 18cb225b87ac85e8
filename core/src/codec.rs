//! Recursive translation between local and wire values.
//!
//! # Design
//! Both directions walk the whole tree with an exhaustive match. Object keys
//! go through [`crate::case`]; arrays keep their order; scalars pass through.
//! The only asymmetry is timestamps: encoding renders `LocalValue::DateTime`
//! as a wire string, decoding promotes any string that parses as a wire
//! timestamp back to an instant.
//!
//! [`localize_keys`] is the key-renaming half of decoding on its own. Typed
//! results go through it so that string fields reach serde exactly as sent
//! and timestamp fields keep their full precision.

use crate::case::{to_local, to_wire};
use crate::error::{Error, Result};
use crate::timestamp::{format_timestamp, parse_timestamp};
use crate::value::{LocalValue, WireValue};

/// Encode a local value into wire form.
pub fn encode(value: &LocalValue) -> WireValue {
    match value {
        LocalValue::Null => WireValue::Null,
        LocalValue::Bool(b) => WireValue::Bool(*b),
        LocalValue::Number(n) => WireValue::Number(n.clone()),
        LocalValue::String(s) => WireValue::String(s.clone()),
        LocalValue::DateTime(dt) => WireValue::String(format_timestamp(dt)),
        LocalValue::Array(items) => WireValue::Array(items.iter().map(encode).collect()),
        LocalValue::Object(map) => {
            WireValue::Object(map.iter().map(|(k, v)| (to_wire(k), encode(v))).collect())
        }
    }
}

/// Encode a local value straight to JSON text.
pub fn encode_to_string(value: &LocalValue) -> Result<String> {
    serde_json::to_string(&encode(value)).map_err(|e| Error::Encode(e.to_string()))
}

/// Decode a wire value into local form.
pub fn decode_value(value: WireValue) -> LocalValue {
    match value {
        WireValue::Null => LocalValue::Null,
        WireValue::Bool(b) => LocalValue::Bool(b),
        WireValue::Number(n) => LocalValue::Number(n),
        WireValue::String(s) => match parse_timestamp(&s) {
            Some(dt) => LocalValue::DateTime(dt),
            None => LocalValue::String(s),
        },
        WireValue::Array(items) => LocalValue::Array(items.into_iter().map(decode_value).collect()),
        WireValue::Object(map) => {
            LocalValue::Object(map.into_iter().map(|(k, v)| (to_local(&k), decode_value(v))).collect())
        }
    }
}

/// Rename every object key to local form, leaving all values untouched.
pub fn localize_keys(value: WireValue) -> WireValue {
    match value {
        WireValue::Array(items) => WireValue::Array(items.into_iter().map(localize_keys).collect()),
        WireValue::Object(map) => {
            WireValue::Object(map.into_iter().map(|(k, v)| (to_local(&k), localize_keys(v))).collect())
        }
        scalar => scalar,
    }
}

/// Parse a response body and rename its keys without interpreting any
/// values. An empty or whitespace-only body yields `None`.
pub fn decode_keys(text: &str) -> Result<Option<WireValue>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    let wire: WireValue =
        serde_json::from_str(text).map_err(|e| Error::Decode(e.to_string()))?;
    Ok(Some(localize_keys(wire)))
}

/// Parse and decode a response body. An empty or whitespace-only body
/// decodes to `None`.
pub fn decode(text: &str) -> Result<Option<LocalValue>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    let wire: WireValue =
        serde_json::from_str(text).map_err(|e| Error::Decode(e.to_string()))?;
    Ok(Some(decode_value(wire)))
}
