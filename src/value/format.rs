//! This module renders a single value as human-readable text for entry
//! summaries and details.
use super::normalize::normalize;
use super::raw::{ErrorValue, RawValue};

/// Output cap for compact rendering, used by single-line summaries.
pub const COMPACT_MAX_LEN: usize = 2_000;
/// Output cap for pretty rendering, used by multi-line details.
pub const PRETTY_MAX_LEN: usize = 20_000;

/// Renders one value as display text.
///
/// Strings pass through verbatim; errors render as their stack trace (or
/// `name: message` without one); primitives stringify; everything else goes
/// through a cycle-safe, size-capped JSON rendering.
pub fn format_value(value: &RawValue, pretty: bool) -> String {
    match value {
        RawValue::Text(text) => text.clone(),
        RawValue::Error(error) => format_error(error),
        RawValue::Null => "null".to_string(),
        RawValue::Undefined => "undefined".to_string(),
        RawValue::Bool(flag) => flag.to_string(),
        RawValue::Number(number) => number.to_string(),
        RawValue::BigInt(digits) => digits.clone(),
        _ => safe_json_stringify(value, pretty),
    }
}

fn format_error(error: &ErrorValue) -> String {
    match &error.stack {
        Some(stack) => stack.clone(),
        None => format!("{}: {}", error.name, error.message),
    }
}

/// Stringifies through the normalizer, so cycles and non-JSON primitives get
/// the same fallbacks the structured args do, then caps the output length.
fn safe_json_stringify(value: &RawValue, pretty: bool) -> String {
    let normalized = normalize(value);
    let rendered = if pretty {
        serde_json::to_string_pretty(&normalized)
    } else {
        serde_json::to_string(&normalized)
    };
    let out = match rendered {
        Ok(out) => out,
        // CaptureValue serialization is infallible in practice; degrade to
        // the debug form rather than dropping the argument.
        Err(_) => format!("{value:?}"),
    };
    let max_len = if pretty { PRETTY_MAX_LEN } else { COMPACT_MAX_LEN };
    truncate_with_ellipsis(out, max_len)
}

/// Truncates to at most `max_len` chars, appending `…` when anything was cut.
fn truncate_with_ellipsis(text: String, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text;
    }
    let mut truncated: String = text.chars().take(max_len).collect();
    truncated.push('…');
    truncated
}
