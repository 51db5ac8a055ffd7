//! This module defines `CaptureValue`, the JSON-safe form an argument takes
//! once it has been through the normalizer.
//!
//! The variant set is closed: every captured argument is exactly one of
//! these shapes, so consumers can match exhaustively and serialization can
//! never fail.
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// Fallback marker emitted for an `undefined` value.
pub const MARKER_UNDEFINED: &str = "[undefined]";
/// Fallback marker emitted when a container is revisited within one call.
pub const MARKER_CIRCULAR: &str = "[Circular]";
/// Fallback marker emitted once the depth guard trips.
pub const MARKER_MAX_DEPTH: &str = "[MaxDepth]";

/// A normalized, JSON-safe value.
///
/// `Marker` carries the textual fallbacks (`[undefined]`, `[Circular]`,
/// `[MaxDepth]`, `[Function name]`); it serializes as a plain JSON string
/// but stays distinguishable from host-provided text in memory.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    List(Vec<CaptureValue>),
    /// Key/value pairs in insertion order.
    Map(Vec<(String, CaptureValue)>),
    Marker(String),
}

impl CaptureValue {
    /// Builds the marker for a function-like value.
    pub fn function_marker(name: Option<&str>) -> Self {
        let name = match name {
            Some(name) if !name.is_empty() => name,
            _ => "anonymous",
        };
        CaptureValue::Marker(format!("[Function {name}]"))
    }

    /// Returns the textual form if this value is a string or a marker.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CaptureValue::Text(text) | CaptureValue::Marker(text) => Some(text),
            _ => None,
        }
    }

    /// Looks up a key if this value is a map.
    pub fn get(&self, key: &str) -> Option<&CaptureValue> {
        match self {
            CaptureValue::Map(pairs) => pairs
                .iter()
                .find(|(candidate, _)| candidate == key)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// Converts into a `serde_json::Value`, mainly for assertions in tests.
    pub fn to_json(&self) -> serde_json::Value {
        // CaptureValue is JSON-safe by construction.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl Serialize for CaptureValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            CaptureValue::Null => serializer.serialize_unit(),
            CaptureValue::Bool(value) => serializer.serialize_bool(*value),
            CaptureValue::Number(value) => value.serialize(serializer),
            CaptureValue::Text(value) | CaptureValue::Marker(value) => {
                serializer.serialize_str(value)
            }
            CaptureValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            CaptureValue::Map(pairs) => {
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for (key, value) in pairs {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_serializes_in_insertion_order() {
        let value = CaptureValue::Map(vec![
            ("z".to_string(), CaptureValue::Bool(true)),
            ("a".to_string(), CaptureValue::Null),
        ]);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"z":true,"a":null}"#);
    }

    #[test]
    fn marker_serializes_as_plain_string() {
        let value = CaptureValue::Marker(MARKER_CIRCULAR.to_string());
        assert_eq!(serde_json::to_string(&value).unwrap(), r#""[Circular]""#);
    }

    #[test]
    fn function_marker_falls_back_to_anonymous() {
        assert_eq!(
            CaptureValue::function_marker(None).as_str(),
            Some("[Function anonymous]")
        );
        assert_eq!(
            CaptureValue::function_marker(Some("fetchPage")).as_str(),
            Some("[Function fetchPage]")
        );
    }
}
