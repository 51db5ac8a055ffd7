//! This module defines the structure of a captured log entry and the builder
//! that turns one logging call into one entry.
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde::Serialize;

use crate::value::{format_value, normalize, CaptureValue, RawValue};

/// Substitute summary for a call with no renderable text.
pub const EMPTY_SUMMARY: &str = "(empty log)";
/// Substitute details for a call with no arguments.
pub const EMPTY_DETAILS: &str = "(no arguments)";

/// Which logging method produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureLevel {
    Log,
    Info,
    Warn,
    Error,
    Debug,
    Trace,
    Table,
}

impl CaptureLevel {
    /// Every supported level, in the order the host logging surface lists them.
    pub const ALL: [CaptureLevel; 7] = [
        CaptureLevel::Log,
        CaptureLevel::Info,
        CaptureLevel::Warn,
        CaptureLevel::Error,
        CaptureLevel::Debug,
        CaptureLevel::Trace,
        CaptureLevel::Table,
    ];

    /// The lowercase name used in exports and search text.
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureLevel::Log => "log",
            CaptureLevel::Info => "info",
            CaptureLevel::Warn => "warn",
            CaptureLevel::Error => "error",
            CaptureLevel::Debug => "debug",
            CaptureLevel::Trace => "trace",
            CaptureLevel::Table => "table",
        }
    }
}

/// One captured logging call, immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct CaptureEntry {
    /// Monotonically increasing, never reused within a process.
    pub id: u64,
    pub level: CaptureLevel,
    /// Capture time in epoch milliseconds, set once at call arrival.
    pub timestamp: i64,
    /// Lowercase tag from a leading `[...]` group in the first string
    /// argument, if any.
    pub prefix: Option<String>,
    /// Single-line, whitespace-collapsed rendering of all arguments.
    pub summary: String,
    /// Multi-line rendering, one block per argument.
    pub details: String,
    /// JSON-safe normalized copies of the original arguments.
    pub args: Vec<CaptureValue>,
}

/// Builds capture entries, owning the process-wide id counter.
pub struct EntryBuilder {
    next_id: AtomicU64,
}

impl Default for EntryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryBuilder {
    /// Creates a builder whose ids start at 1.
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
        }
    }

    /// Builds an entry for one logging call, stamped with the current time.
    ///
    /// Total for any input shape: serialization hazards degrade to fallback
    /// markers instead of failing the call being observed.
    pub fn build(&self, level: CaptureLevel, args: &[RawValue]) -> CaptureEntry {
        self.build_at(level, args, Utc::now().timestamp_millis())
    }

    /// Builds an entry with an explicit timestamp; used by tests that need
    /// deterministic time.
    pub fn build_at(&self, level: CaptureLevel, args: &[RawValue], timestamp: i64) -> CaptureEntry {
        CaptureEntry {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            level,
            timestamp,
            prefix: detect_prefix(args),
            summary: build_summary(args),
            details: build_details(args),
            args: args.iter().map(normalize).collect(),
        }
    }
}

/// Extracts the prefix from the first argument, if it is a string whose
/// first non-whitespace character opens a `[...]` group.
///
/// Only the leading bracket group counts; a later group in the same string
/// is not a prefix. Deterministic: the same first argument always yields the
/// same prefix.
pub fn detect_prefix(args: &[RawValue]) -> Option<String> {
    let first = match args.first() {
        Some(RawValue::Text(text)) => text,
        _ => return None,
    };
    let rest = first.trim_start().strip_prefix('[')?;
    let inner = &rest[..rest.find(']')?];
    let prefix = inner.trim().to_lowercase();
    if prefix.is_empty() {
        return None;
    }
    Some(prefix)
}

/// Renders the single-line summary: every argument in compact form, joined
/// by single spaces with whitespace runs collapsed.
pub fn build_summary(args: &[RawValue]) -> String {
    let text = args
        .iter()
        .map(|value| format_value(value, false))
        .collect::<Vec<_>>()
        .join(" ");
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return EMPTY_SUMMARY.to_string();
    }
    collapsed
}

/// Renders the multi-line details: one `[index]`-tagged pretty block per
/// argument, blocks separated by a blank line.
pub fn build_details(args: &[RawValue]) -> String {
    if args.is_empty() {
        return EMPTY_DETAILS.to_string();
    }
    args.iter()
        .enumerate()
        .map(|(index, value)| format!("[{index}] {}", format_value(value, true)))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warn_call_with_prefix_and_map_argument() {
        let builder = EntryBuilder::new();
        let args = vec![
            RawValue::from("[auth] token expiring"),
            RawValue::map(vec![
                ("userId", RawValue::from("u1")),
                ("inSeconds", RawValue::from(45_i64)),
            ]),
        ];
        let entry = builder.build(CaptureLevel::Warn, &args);

        assert_eq!(entry.level, CaptureLevel::Warn);
        assert_eq!(entry.prefix.as_deref(), Some("auth"));
        assert!(entry.summary.starts_with("[auth] token expiring"));
        assert_eq!(
            entry.args[1].to_json(),
            serde_json::json!({"userId": "u1", "inSeconds": 45})
        );
        assert!(entry.timestamp > 0);
    }

    #[test]
    fn ids_are_strictly_increasing() {
        let builder = EntryBuilder::new();
        let first = builder.build(CaptureLevel::Log, &[]);
        let second = builder.build(CaptureLevel::Log, &[]);
        let third = builder.build(CaptureLevel::Log, &[]);
        assert!(first.id < second.id);
        assert!(second.id < third.id);
    }

    #[test]
    fn prefix_detection_is_idempotent() {
        let args = vec![RawValue::from("  [API ] ready")];
        assert_eq!(detect_prefix(&args), Some("api".to_string()));
        assert_eq!(detect_prefix(&args), Some("api".to_string()));
    }

    #[test]
    fn prefix_requires_string_first_argument() {
        assert_eq!(detect_prefix(&[]), None);
        assert_eq!(detect_prefix(&[RawValue::from(7_i64)]), None);
        assert_eq!(
            detect_prefix(&[
                RawValue::from(7_i64),
                RawValue::from("[late] not a prefix")
            ]),
            None
        );
    }

    #[test]
    fn later_bracket_group_is_not_a_prefix() {
        assert_eq!(detect_prefix(&[RawValue::from("no tag [yet]")]), None);
    }

    #[test]
    fn unterminated_or_blank_groups_yield_no_prefix() {
        assert_eq!(detect_prefix(&[RawValue::from("[broken")]), None);
        assert_eq!(detect_prefix(&[RawValue::from("[] empty")]), None);
        assert_eq!(detect_prefix(&[RawValue::from("[   ] blank")]), None);
    }

    #[test]
    fn summary_collapses_whitespace_and_falls_back() {
        let args = vec![
            RawValue::from("  lots   of\n\n space "),
            RawValue::from("tail"),
        ];
        assert_eq!(build_summary(&args), "lots of space tail");
        assert_eq!(build_summary(&[]), EMPTY_SUMMARY);
        assert_eq!(build_summary(&[RawValue::from("   ")]), EMPTY_SUMMARY);
    }

    #[test]
    fn details_index_every_argument() {
        let args = vec![RawValue::from("first"), RawValue::Bool(true)];
        let details = build_details(&args);
        assert_eq!(details, "[0] first\n\n[1] true");
        assert_eq!(build_details(&[]), EMPTY_DETAILS);
    }

    #[test]
    fn each_argument_gets_its_own_cycle_scope() {
        let shared = RawValue::map(vec![("k", RawValue::from(1_i64))]);
        let builder = EntryBuilder::new();
        let entry = builder.build(CaptureLevel::Log, &[shared.clone(), shared]);
        // The same container appears fully in both args because cycle
        // detection is scoped per argument, not per call.
        assert_eq!(entry.args[0], entry.args[1]);
        assert!(matches!(entry.args[0], CaptureValue::Map(_)));
    }

    #[test]
    fn level_names_are_lowercase() {
        for level in CaptureLevel::ALL {
            assert_eq!(
                serde_json::to_string(&level).unwrap(),
                format!("\"{}\"", level.as_str())
            );
        }
    }
}
