// ApiLog - ui/panels/summary.rs
//
// Log summary table: totals, file size and the histograms of the active view.

use crate::core::display::format_file_size;
use crate::core::summary::Summary;
use crate::ui::theme::{Theme, Tone};
use comfy_table::{ContentArrangement, Table};
use std::fmt::Display;

/// Render the summary table.
pub fn render(summary: &Summary, theme: &Theme) -> String {
    let mut table = Table::new();
    theme.style_table(&mut table);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Metric", "Value"]);

    let mut add = |metric: &str, value: String| {
        table.add_row(vec![
            theme.cell(metric, Tone::Cyan),
            theme.cell(value, Tone::Green),
        ]);
    };

    add("Total Entries", summary.total_count.to_string());
    add("File Size", format_file_size(summary.file_size_bytes));

    // Empty histograms are left out rather than shown blank.
    if !summary.levels.is_empty() {
        add("Log Levels", join_buckets(&summary.levels));
    }
    if !summary.methods.is_empty() {
        add("HTTP Methods", join_buckets(&summary.methods));
    }
    if !summary.statuses.is_empty() {
        add("Status Codes", join_buckets(&summary.statuses));
    }
    if !summary.thread_groups.is_empty() {
        add("Top Threads", join_buckets(&summary.thread_groups));
    }
    if !summary.services.is_empty() {
        add("Top Services", join_buckets(&summary.services));
    }

    format!("{}\n{table}\n", theme.heading("Log Summary"))
}

fn join_buckets<K: Display>(buckets: &[(K, usize)]) -> String {
    buckets
        .iter()
        .map(|(label, count)| format!("{label}: {count}"))
        .collect::<Vec<_>>()
        .join(", ")
}
