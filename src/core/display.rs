// ApiLog - core/display.rs
//
// Display-time cleanup of record messages and the per-record rows shown by
// the entries table. Pure functions of a record's current fields; nothing
// here is cached on the record, so edits are always reflected.

use crate::core::model::LogRecord;
use crate::util::constants::{
    ELLIPSIS, EMPTY_CELL, ENDPOINT_COLUMN_WIDTH, MESSAGE_COLUMN_WIDTH, SERVICE_COLUMN_WIDTH,
    THREAD_COLUMN_WIDTH,
};
use regex::Regex;
use std::sync::OnceLock;

/// Literal prefixes stripped from the start of a message, in order.
const NOISY_PREFIXES: &[&str] = &["===========", "===("];

struct CleanupPatterns {
    result_message: Regex,
    equals_run: Regex,
    response_log_marker: Regex,
}

fn cleanup_patterns() -> &'static CleanupPatterns {
    static PATTERNS: OnceLock<CleanupPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        fn re(pat: &str) -> Regex {
            Regex::new(pat).expect("display: invalid regex")
        }
        CleanupPatterns {
            result_message: re(r"RSLT_MSG\[([^\]]+)\]"),
            equals_run: re(r"=+"),
            response_log_marker: re(r"\(.*?response log.*?\)"),
        }
    })
}

/// Clean a record's message for display and cap it at `max_length` chars.
///
/// The lifecycle override is re-derived here from the record's current
/// `operation_type` and `endpoint`, since either may have changed since the
/// line was classified.
pub fn render_message(record: &LogRecord, max_length: usize) -> String {
    let p = cleanup_patterns();
    let mut msg = record.message.clone();

    for prefix in NOISY_PREFIXES {
        if let Some(rest) = msg.strip_prefix(prefix) {
            msg = rest.trim().to_string();
        }
    }

    if let Some(op) = record.operation_type {
        msg = match record.endpoint.as_deref() {
            Some(endpoint) => format!("{op} - {endpoint}"),
            None => format!("{op} - operation"),
        };
    }

    if let Some(caps) = p.result_message.captures(&msg) {
        msg = caps[1].to_string();
    }

    let msg = p.equals_run.replace_all(&msg, "");
    let msg = msg.trim();
    let msg = p.response_log_marker.replace_all(msg, "");

    truncate_text(msg.trim(), max_length)
}

/// Truncate to at most `max_length` characters, ending in an ellipsis that
/// counts toward the limit.
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }
    let keep = max_length.saturating_sub(ELLIPSIS.chars().count());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Format a byte count in human-readable units.
pub fn format_file_size(size_bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = size_bytes as f64;
    for unit in UNITS {
        if size < 1024.0 {
            return format!("{size:.2} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.2} PB")
}

// =============================================================================
// Entries table rows
// =============================================================================

/// One row of the entries table, already truncated to column widths.
///
/// Level and status stay typed so the presentation layer can colour them.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRow {
    pub line_number: u64,
    /// `HH:MM:SS.mmm` or the empty-cell placeholder.
    pub time: String,
    pub level: Option<String>,
    pub thread: String,
    pub service: String,
    pub method: String,
    pub endpoint: String,
    pub status_code: Option<u32>,
    pub message: String,
}

/// Build the display row for one record.
pub fn display_row(record: &LogRecord) -> DisplayRow {
    let message = render_message(record, MESSAGE_COLUMN_WIDTH);
    DisplayRow {
        line_number: record.line_number(),
        time: record
            .timestamp
            .map(|ts| ts.format("%H:%M:%S%.3f").to_string())
            .unwrap_or_else(|| EMPTY_CELL.to_string()),
        level: record.level.clone(),
        thread: cell(record.thread.as_deref(), THREAD_COLUMN_WIDTH),
        service: cell(record.service_name.as_deref(), SERVICE_COLUMN_WIDTH),
        method: cell(record.method.as_deref(), usize::MAX),
        endpoint: cell(record.endpoint.as_deref(), ENDPOINT_COLUMN_WIDTH),
        status_code: record.status_code,
        message: if message.is_empty() {
            EMPTY_CELL.to_string()
        } else {
            message
        },
    }
}

/// Rows for the first `limit` records of a view, in view order.
pub fn list_entries<'a, I>(view: I, limit: usize) -> Vec<DisplayRow>
where
    I: IntoIterator<Item = &'a LogRecord>,
{
    view.into_iter().take(limit).map(display_row).collect()
}

fn cell(value: Option<&str>, width: usize) -> String {
    match value {
        Some(v) if !v.is_empty() => truncate_text(v, width),
        _ => EMPTY_CELL.to_string(),
    }
}
