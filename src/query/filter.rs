//! This module provides pure filtering, counting, and sampling functions
//! over captured entries.
//!
//! Nothing here touches the store: every function is a deterministic view
//! over the slice it is given.
use std::sync::Arc;

use crate::entry::CaptureEntry;

/// Bucket key for entries without a prefix.
pub const UNTYPED_BUCKET: &str = "untyped";

/// Which prefix bucket a view should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefixFilter {
    /// Every entry passes.
    All,
    /// Only entries without a prefix pass.
    Untyped,
    /// Only entries whose stored (lowercase) prefix equals this exactly.
    Prefix(String),
}

impl PrefixFilter {
    /// Parses the selector strings used at the presentation boundary.
    pub fn from_selector(selector: &str) -> Self {
        match selector {
            "all" => PrefixFilter::All,
            UNTYPED_BUCKET => PrefixFilter::Untyped,
            other => PrefixFilter::Prefix(other.to_string()),
        }
    }

    /// The selector string, as embedded in exports and filenames.
    pub fn selector(&self) -> &str {
        match self {
            PrefixFilter::All => "all",
            PrefixFilter::Untyped => UNTYPED_BUCKET,
            PrefixFilter::Prefix(prefix) => prefix,
        }
    }
}

fn bucket_key(entry: &CaptureEntry) -> &str {
    entry.prefix.as_deref().unwrap_or(UNTYPED_BUCKET)
}

/// Counts entries per prefix bucket, in first-seen order.
pub fn count_by_prefix(entries: &[Arc<CaptureEntry>]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for entry in entries {
        let key = bucket_key(entry);
        match counts.iter().position(|(bucket, _)| bucket == key) {
            Some(index) => counts[index].1 += 1,
            None => counts.push((key.to_string(), 1)),
        }
    }
    counts
}

/// Keeps the entries that fall inside the selected prefix bucket.
pub fn filter_by_prefix(
    entries: &[Arc<CaptureEntry>],
    filter: &PrefixFilter,
) -> Vec<Arc<CaptureEntry>> {
    entries
        .iter()
        .filter(|entry| match filter {
            PrefixFilter::All => true,
            PrefixFilter::Untyped => entry.prefix.is_none(),
            PrefixFilter::Prefix(prefix) => entry.prefix.as_deref() == Some(prefix.as_str()),
        })
        .cloned()
        .collect()
}

/// Keeps the entries matching a free-text query, case-insensitively, against
/// summary, details, prefix, and level.
///
/// A blank query passes everything.
pub fn filter_by_search(entries: &[Arc<CaptureEntry>], query: &str) -> Vec<Arc<CaptureEntry>> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return entries.to_vec();
    }
    entries
        .iter()
        .filter(|entry| {
            let haystack = format!(
                "{}\n{}\n{}\n{}",
                entry.summary,
                entry.details,
                entry.prefix.as_deref().unwrap_or(""),
                entry.level.as_str()
            )
            .to_lowercase();
            haystack.contains(&needle)
        })
        .cloned()
        .collect()
}

/// Keeps at most `limit` entries per prefix bucket, preserving input order.
///
/// Once a bucket is full, later entries from it are dropped, not replaced;
/// on a newest-first input this yields the most recent rows per prefix.
pub fn sample_by_prefix(entries: &[Arc<CaptureEntry>], limit: usize) -> Vec<Arc<CaptureEntry>> {
    let mut used: Vec<(String, usize)> = Vec::new();
    let mut sampled = Vec::new();
    for entry in entries {
        let key = bucket_key(entry);
        let index = match used.iter().position(|(bucket, _)| bucket == key) {
            Some(index) => index,
            None => {
                used.push((key.to_string(), 0));
                used.len() - 1
            }
        };
        if used[index].1 >= limit {
            continue;
        }
        used[index].1 += 1;
        sampled.push(Arc::clone(entry));
    }
    sampled
}

/// Parses a bounded integer from presentation-layer input, clamping into
/// `[min, max]` and falling back on non-numeric text.
///
/// Total for any bounds: when `min > max`, `min` wins, as in
/// `max(min, min(parsed, max))`.
pub fn parse_bounded_int(raw: &str, fallback: i64, min: i64, max: i64) -> i64 {
    match raw.trim().parse::<i64>() {
        Ok(parsed) => parsed.min(max).max(min),
        Err(_) => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{CaptureLevel, EntryBuilder};
    use crate::value::RawValue;

    fn entry(builder: &EntryBuilder, level: CaptureLevel, text: &str) -> Arc<CaptureEntry> {
        Arc::new(builder.build(level, &[RawValue::from(text)]))
    }

    fn fixture() -> Vec<Arc<CaptureEntry>> {
        let builder = EntryBuilder::new();
        vec![
            entry(&builder, CaptureLevel::Log, "[api] fetch ok"),
            entry(&builder, CaptureLevel::Warn, "[api] slow response"),
            entry(&builder, CaptureLevel::Info, "no tag here"),
            entry(&builder, CaptureLevel::Error, "[ui] render failed"),
            entry(&builder, CaptureLevel::Log, "[api] cache hit"),
        ]
    }

    #[test]
    fn counts_buckets_in_first_seen_order() {
        let counts = count_by_prefix(&fixture());
        assert_eq!(
            counts,
            vec![
                ("api".to_string(), 3),
                (UNTYPED_BUCKET.to_string(), 1),
                ("ui".to_string(), 1),
            ]
        );
    }

    #[test]
    fn prefix_filter_selects_buckets() {
        let entries = fixture();
        assert_eq!(filter_by_prefix(&entries, &PrefixFilter::All).len(), 5);
        assert_eq!(filter_by_prefix(&entries, &PrefixFilter::Untyped).len(), 1);
        let api = filter_by_prefix(&entries, &PrefixFilter::Prefix("api".to_string()));
        assert_eq!(api.len(), 3);
        assert!(api.iter().all(|e| e.prefix.as_deref() == Some("api")));
        // Stored prefixes are lowercase; the match is exact and
        // case-sensitive.
        assert!(filter_by_prefix(&entries, &PrefixFilter::Prefix("API".to_string())).is_empty());
    }

    #[test]
    fn selector_round_trips() {
        for selector in ["all", "untyped", "api"] {
            assert_eq!(PrefixFilter::from_selector(selector).selector(), selector);
        }
    }

    #[test]
    fn search_is_case_insensitive_and_blank_passes_all() {
        let entries = fixture();
        assert_eq!(filter_by_search(&entries, "").len(), 5);
        assert_eq!(filter_by_search(&entries, "   ").len(), 5);
        assert_eq!(filter_by_search(&entries, "SLOW").len(), 1);
        // Level names are part of the searched text.
        assert_eq!(filter_by_search(&entries, "error").len(), 1);
        assert!(filter_by_search(&entries, "no such text").is_empty());
    }

    #[test]
    fn prefix_and_search_filters_commute() {
        let entries = fixture();
        let filter = PrefixFilter::Prefix("api".to_string());
        let one_way = filter_by_search(&filter_by_prefix(&entries, &filter), "cache");
        let other_way = filter_by_prefix(&filter_by_search(&entries, "cache"), &filter);
        let ids = |list: &[Arc<CaptureEntry>]| list.iter().map(|e| e.id).collect::<Vec<_>>();
        assert_eq!(ids(&one_way), ids(&other_way));
    }

    #[test]
    fn sampling_caps_each_bucket_and_preserves_order() {
        let entries = fixture();
        let sampled = sample_by_prefix(&entries, 1);
        let summaries: Vec<&str> = sampled.iter().map(|e| e.summary.as_str()).collect();
        assert_eq!(
            summaries,
            vec!["[api] fetch ok", "no tag here", "[ui] render failed"]
        );

        let sampled_two = sample_by_prefix(&entries, 2);
        assert_eq!(sampled_two.len(), 4);
    }

    #[test]
    fn bounded_int_parsing_clamps_and_falls_back() {
        assert_eq!(parse_bounded_int("250", 50, 10, 500), 250);
        assert_eq!(parse_bounded_int(" 9999 ", 50, 10, 500), 500);
        assert_eq!(parse_bounded_int("-3", 50, 10, 500), 10);
        assert_eq!(parse_bounded_int("abc", 50, 10, 500), 50);
        assert_eq!(parse_bounded_int("", 50, 10, 500), 50);
    }

    #[test]
    fn bounded_int_parsing_tolerates_inverted_bounds() {
        // min wins over max, matching max(min, min(parsed, max)).
        assert_eq!(parse_bounded_int("7", 0, 10, 5), 10);
        assert_eq!(parse_bounded_int("2", 0, 10, 5), 10);
    }
}
