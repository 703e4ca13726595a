// ApiLog - ui/panels/entries.rs
//
// Entries table: one row per record of the active view, columns already
// truncated by the core display rows.

use crate::core::display::DisplayRow;
use crate::ui::theme::{level_tone, message_tone, status_tone, Theme, Tone};
use crate::util::constants::EMPTY_CELL;
use comfy_table::{ContentArrangement, Table};

/// Render the entries table. `view_len` is the size of the whole view, of
/// which `rows` are the first few.
pub fn render(rows: &[DisplayRow], view_len: usize, theme: &Theme) -> String {
    let title = theme.heading(&format!(
        "Log Entries (showing {} of {view_len})",
        rows.len()
    ));

    if rows.is_empty() {
        return format!("{title}\n{}\n", theme.hint("No entries to display."));
    }

    let mut table = Table::new();
    theme.style_table(&mut table);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "#", "Time", "Level", "Thread", "Service", "Method", "Endpoint", "Status", "Message",
    ]);

    for row in rows {
        let level = row.level.as_deref();
        table.add_row(vec![
            theme.cell(row.line_number, Tone::Dim),
            theme.cell(&row.time, Tone::Cyan),
            theme.cell(level.unwrap_or(EMPTY_CELL), level_tone(level)),
            theme.cell(&row.thread, Tone::Blue),
            theme.cell(&row.service, Tone::Magenta),
            theme.cell(&row.method, Tone::Blue),
            theme.cell(&row.endpoint, Tone::Yellow),
            theme.cell(
                row.status_code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| EMPTY_CELL.to_string()),
                status_tone(row.status_code),
            ),
            theme.cell(&row.message, message_tone(level)),
        ]);
    }

    format!("{title}\n{table}\n")
}
