//! In-process log capture engine.
//!
//! `console-capture` observes a host's logging surface and keeps a bounded,
//! newest-first, queryable history of every call: a `tracing` layer (or the
//! direct [`CaptureStore::record`] sink) turns each logging call into an
//! immutable entry with a single-line summary, multi-line details, an
//! optional `[prefix]` tag, and JSON-safe normalized arguments. Pure query
//! functions filter, count, sample, and export that history.
//!
//! The engine's core promise is that observing logs never crashes the host:
//! cyclic or exotic argument values degrade to textual markers, storage
//! failures degrade to defaults, and no public operation returns an error.
pub mod entry;
pub mod error;
pub mod query;
pub mod store;
pub mod value;

pub use entry::{CaptureEntry, CaptureLevel, EntryBuilder};
pub use error::CaptureError;
pub use query::{
    count_by_prefix, download_filename, export_prefix_summary, export_single, export_visible,
    filter_by_prefix, filter_by_search, parse_bounded_int, sample_by_prefix, PrefixFilter,
};
pub use store::{
    CaptureLayer, CaptureStore, SettingsStore, SledSettingsStore, StoreEvent, Subscription,
    DEFAULT_MAX_ENTRIES, MAX_ENTRIES_CEILING,
};
pub use value::{format_value, normalize, CaptureValue, ErrorValue, RawValue};
