// ApiLog - ui/theme.rs
//
// Colour scheme for levels, status codes and messages.
// No dependencies on app state or business logic.

use colored::Colorize;
use comfy_table::{Cell, Color, Table};

/// Semantic colour of a piece of output, independent of the backend that
/// draws it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Dim,
    Cyan,
    Green,
    Blue,
    Magenta,
    Yellow,
    Red,
    BrightRed,
}

impl Tone {
    fn table_color(self) -> Option<Color> {
        match self {
            Tone::Plain => None,
            Tone::Dim => Some(Color::DarkGrey),
            Tone::Cyan => Some(Color::Cyan),
            Tone::Green => Some(Color::Green),
            Tone::Blue => Some(Color::Blue),
            Tone::Magenta => Some(Color::Magenta),
            Tone::Yellow => Some(Color::Yellow),
            Tone::Red => Some(Color::DarkRed),
            Tone::BrightRed => Some(Color::Red),
        }
    }
}

/// Colour for a severity level. Unknown or absent levels are plain.
pub fn level_tone(level: Option<&str>) -> Tone {
    match level {
        Some("DEBUG") => Tone::Cyan,
        Some("INFO") => Tone::Green,
        Some("WARN" | "WARNING") => Tone::Yellow,
        Some("ERROR") => Tone::Red,
        Some("FATAL" | "CRITICAL") => Tone::BrightRed,
        _ => Tone::Plain,
    }
}

/// Colour for an HTTP status: 2xx green, 3xx blue, 4xx yellow, anything
/// else red. Absent is plain.
pub fn status_tone(status: Option<u32>) -> Tone {
    match status {
        None => Tone::Plain,
        Some(200..=299) => Tone::Green,
        Some(300..=399) => Tone::Blue,
        Some(400..=499) => Tone::Yellow,
        Some(_) => Tone::Red,
    }
}

/// Tint of a message in the entries table, derived from its level.
pub fn message_tone(level: Option<&str>) -> Tone {
    match level {
        Some("ERROR" | "FATAL" | "CRITICAL") => Tone::Red,
        Some("WARN" | "WARNING") => Tone::Yellow,
        Some("DEBUG") => Tone::Dim,
        _ => Tone::Plain,
    }
}

/// Output styling policy, resolved once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub color: bool,
}

impl Theme {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// No ANSI escapes anywhere. Used for non-terminal output and tests.
    pub fn plain() -> Self {
        Self { color: false }
    }

    /// Colour a free-standing string.
    pub fn paint(&self, text: &str, tone: Tone) -> String {
        if !self.color {
            return text.to_string();
        }
        match tone {
            Tone::Plain => text.to_string(),
            Tone::Dim => text.dimmed().to_string(),
            Tone::Cyan => text.cyan().to_string(),
            Tone::Green => text.green().to_string(),
            Tone::Blue => text.blue().to_string(),
            Tone::Magenta => text.magenta().to_string(),
            Tone::Yellow => text.yellow().to_string(),
            Tone::Red => text.red().to_string(),
            Tone::BrightRed => text.bright_red().bold().to_string(),
        }
    }

    /// Bold heading text.
    pub fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().cyan().to_string()
        } else {
            text.to_string()
        }
    }

    /// Confirmation line, e.g. after a save.
    pub fn success(&self, text: &str) -> String {
        self.paint(&format!("✓ {text}"), Tone::Green)
    }

    pub fn error(&self, text: &str) -> String {
        self.paint(text, Tone::Red)
    }

    pub fn hint(&self, text: &str) -> String {
        self.paint(text, Tone::Dim)
    }

    /// A table cell in `tone`.
    pub fn cell(&self, text: impl ToString, tone: Tone) -> Cell {
        let cell = Cell::new(text.to_string());
        match tone.table_color() {
            Some(color) if self.color => cell.fg(color),
            _ => cell,
        }
    }

    /// Apply the styling policy to a table. comfy-table would otherwise
    /// decide from whether stdout is a terminal.
    pub fn style_table(&self, table: &mut Table) {
        if self.color {
            table.enforce_styling();
        } else {
            table.force_no_tty();
        }
    }
}
