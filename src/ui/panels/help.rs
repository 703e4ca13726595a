// ApiLog - ui/panels/help.rs
//
// Command reference shown by `help`.

use crate::ui::theme::Theme;
use crate::util::constants::{APP_NAME, APP_VERSION};

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Viewing",
        &[
            ("summary", "Show log statistics summary"),
            ("list [limit]", "List log entries (default from config, 50)"),
            ("view <line_number>", "View detailed entry information"),
            ("stats", "Alias for summary"),
        ],
    ),
    (
        "Filtering",
        &[
            ("filter level <LEVEL>", "Filter by log level (DEBUG, INFO, WARN, ERROR)"),
            ("filter method <METHOD>", "Filter by HTTP method (GET, POST, etc.)"),
            ("filter status <CODE>", "Filter by status code (200, 404, etc.)"),
            ("filter thread <NAME>", "Filter by thread name (e.g. http-nio)"),
            ("filter service <NAME>", "Filter by service/controller name"),
            ("filter search <TEXT>", "Search the raw log text"),
            ("clear", "Clear all filters"),
        ],
    ),
    (
        "Editing",
        &[
            ("edit <line_number>", "Replace an entry's text and re-parse it"),
            ("save [path]", "Save all entries (default: the loaded file)"),
        ],
    ),
    (
        "Export",
        &[
            ("export <path> [raw|csv|json]", "Export the filtered entries"),
            ("reload", "Re-read the loaded file"),
        ],
    ),
    (
        "Other",
        &[
            ("help", "Show this help message"),
            ("quit | exit | q", "Exit the application"),
        ],
    ),
];

/// Render the command reference.
pub fn render(theme: &Theme) -> String {
    let width = SECTIONS
        .iter()
        .flat_map(|(_, commands)| commands.iter())
        .map(|(usage, _)| usage.len())
        .max()
        .unwrap_or(0);

    let mut out = theme.heading("API Log Viewer Commands");
    out.push('\n');
    for (title, commands) in SECTIONS {
        out.push('\n');
        out.push_str(&theme.heading(title));
        out.push('\n');
        for (usage, description) in commands.iter() {
            out.push_str(&format!("  {usage:<width$}  {}\n", theme.hint(description)));
        }
    }
    out.push('\n');
    out.push_str(&theme.hint(
        "Consecutive filters narrow the view; `clear` starts over.",
    ));
    out.push('\n');
    out
}

/// Startup banner.
pub fn banner(theme: &Theme) -> String {
    format!(
        "{}\n{}\n",
        theme.heading(&format!("{APP_NAME} v{APP_VERSION}")),
        theme.hint("Structured, framework-style and free-text API logs")
    )
}
