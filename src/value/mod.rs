//! This module contains the value model for captured arguments: the raw,
//! possibly-cyclic graph the host hands in, the JSON-safe normalized form it
//! becomes, and the safe serializer and display formatter between the two.
pub mod format;
pub mod normalize;
pub mod normalized;
pub mod raw;

pub use format::{format_value, COMPACT_MAX_LEN, PRETTY_MAX_LEN};
pub use normalize::{normalize, normalize_with, MAX_COLLECTION, MAX_DEPTH};
pub use normalized::{CaptureValue, MARKER_CIRCULAR, MARKER_MAX_DEPTH, MARKER_UNDEFINED};
pub use raw::{ErrorValue, RawValue};
