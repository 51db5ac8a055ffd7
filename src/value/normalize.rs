//! This module implements the safe serializer: it converts an arbitrary
//! `RawValue` graph into a JSON-safe `CaptureValue`, bounding depth and
//! collection sizes and replacing cycles with a textual marker.
use std::collections::HashSet;

use super::normalized::{CaptureValue, MARKER_CIRCULAR, MARKER_MAX_DEPTH, MARKER_UNDEFINED};
use super::raw::RawValue;

/// Maximum recursion depth before values collapse to `[MaxDepth]`.
pub const MAX_DEPTH: usize = 6;
/// Maximum number of list elements or map entries kept per container.
pub const MAX_COLLECTION: usize = 100;

/// Normalizes a value with the default depth and collection bounds.
///
/// Pure: the cycle-detection set is scoped to this single call, so repeated
/// normalization of the same graph always yields the same result.
pub fn normalize(value: &RawValue) -> CaptureValue {
    normalize_with(value, MAX_DEPTH, MAX_COLLECTION)
}

/// Normalizes a value with explicit bounds.
pub fn normalize_with(value: &RawValue, max_depth: usize, max_collection: usize) -> CaptureValue {
    let mut seen = HashSet::new();
    normalize_inner(value, &mut seen, 0, max_depth, max_collection)
}

fn normalize_inner(
    value: &RawValue,
    seen: &mut HashSet<usize>,
    depth: usize,
    max_depth: usize,
    max_collection: usize,
) -> CaptureValue {
    match value {
        RawValue::Null => CaptureValue::Null,
        RawValue::Bool(value) => CaptureValue::Bool(*value),
        RawValue::Number(value) => CaptureValue::Number(value.clone()),
        RawValue::Text(value) => CaptureValue::Text(value.clone()),
        RawValue::Undefined => CaptureValue::Marker(MARKER_UNDEFINED.to_string()),
        RawValue::BigInt(digits) => CaptureValue::Text(format!("{digits}n")),
        RawValue::Symbol(description) => CaptureValue::Text(description.clone()),
        RawValue::Function(name) => CaptureValue::function_marker(name.as_deref()),
        // Error shape resolves before the depth guard so a deeply nested
        // error still keeps its name/message/stack.
        RawValue::Error(error) => CaptureValue::Map(vec![
            ("name".to_string(), CaptureValue::Text(error.name.clone())),
            (
                "message".to_string(),
                CaptureValue::Text(error.message.clone()),
            ),
            (
                "stack".to_string(),
                match &error.stack {
                    Some(stack) => CaptureValue::Text(stack.clone()),
                    None => CaptureValue::Null,
                },
            ),
        ]),
        RawValue::List(items) => match container_guard(value, seen, depth, max_depth) {
            Some(marker) => marker,
            None => CaptureValue::List(
                items
                    .borrow()
                    .iter()
                    .take(max_collection)
                    .map(|item| normalize_inner(item, seen, depth + 1, max_depth, max_collection))
                    .collect(),
            ),
        },
        RawValue::Map(pairs) => match container_guard(value, seen, depth, max_depth) {
            Some(marker) => marker,
            None => CaptureValue::Map(
                pairs
                    .borrow()
                    .iter()
                    .take(max_collection)
                    .map(|(key, item)| {
                        (
                            key.clone(),
                            normalize_inner(item, seen, depth + 1, max_depth, max_collection),
                        )
                    })
                    .collect(),
            ),
        },
    }
}

/// Applies the depth and cycle guards to a container, returning the marker
/// that replaces it, or `None` if descent may proceed.
///
/// Identities are inserted and never removed within a call, so a shared
/// (diamond) container also collapses on second sight.
fn container_guard(
    value: &RawValue,
    seen: &mut HashSet<usize>,
    depth: usize,
    max_depth: usize,
) -> Option<CaptureValue> {
    if depth >= max_depth {
        return Some(CaptureValue::Marker(MARKER_MAX_DEPTH.to_string()));
    }
    if let Some(identity) = value.identity() {
        if !seen.insert(identity) {
            return Some(CaptureValue::Marker(MARKER_CIRCULAR.to_string()));
        }
    }
    None
}
