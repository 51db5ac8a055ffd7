//! This module renders captured entries into their three export encodings:
//! bulk JSON, single-entry JSON, and the human-readable prefix summary.
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use super::filter::{PrefixFilter, UNTYPED_BUCKET};
use crate::entry::{CaptureEntry, CaptureLevel};
use crate::value::CaptureValue;

/// Filename stem for downloaded exports.
const FILENAME_PREFIX: &str = "console-capture";

/// The per-entry export shape: identity and structure only; the rendered
/// summary/details text intentionally stays behind.
#[derive(Serialize)]
struct ExportedEntry<'a> {
    id: u64,
    level: CaptureLevel,
    timestamp: i64,
    prefix: &'a Option<String>,
    details: ExportedDetails<'a>,
}

#[derive(Serialize)]
struct ExportedDetails<'a> {
    args: &'a [CaptureValue],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportEnvelope<'a> {
    exported_at: String,
    filter: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<&'a str>,
    count: usize,
    logs: Vec<ExportedEntry<'a>>,
}

fn exported_entry(entry: &CaptureEntry) -> ExportedEntry<'_> {
    ExportedEntry {
        id: entry.id,
        level: entry.level,
        timestamp: entry.timestamp,
        prefix: &entry.prefix,
        details: ExportedDetails { args: &entry.args },
    }
}

/// Current time in the ISO-8601 form exports are stamped with.
fn iso_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Renders the currently visible entries as pretty-printed JSON, stamped
/// with the export time and the active filter/search.
///
/// A blank search is omitted from the output entirely.
pub fn export_visible(
    entries: &[Arc<CaptureEntry>],
    filter: &PrefixFilter,
    search: &str,
) -> String {
    let trimmed = search.trim();
    let envelope = ExportEnvelope {
        exported_at: iso_now(),
        filter: filter.selector(),
        search: if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        },
        count: entries.len(),
        logs: entries.iter().map(|entry| exported_entry(entry)).collect(),
    };
    // The envelope is JSON-safe by construction.
    serde_json::to_string_pretty(&envelope).unwrap_or_default()
}

/// Renders one entry in the same per-entry shape the bulk export uses.
pub fn export_single(entry: &CaptureEntry) -> String {
    serde_json::to_string_pretty(&exported_entry(entry)).unwrap_or_default()
}

/// Renders the prefix summary text: a total header, then one line per
/// `(prefix, count)` row in the order given.
///
/// The untyped bucket renders as the bare token `untyped`; named prefixes
/// render bracketed.
pub fn export_prefix_summary(rows: &[(String, usize)], total: usize) -> String {
    let lines: Vec<String> = rows
        .iter()
        .map(|(prefix, count)| {
            if prefix == UNTYPED_BUCKET {
                format!("{UNTYPED_BUCKET} {count}")
            } else {
                format!("[{prefix}] {count}")
            }
        })
        .collect();
    format!("Visible prefixes ({total} logs)\n{}", lines.join("\n"))
}

/// Builds the download filename: stem, filter selector, and an ISO timestamp
/// with colons replaced so it is filesystem-safe.
pub fn download_filename(filter: &PrefixFilter) -> String {
    let stamp = iso_now().replace(':', "-");
    format!("{FILENAME_PREFIX}-logs-{}-{stamp}.json", filter.selector())
}
