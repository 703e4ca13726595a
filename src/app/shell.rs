// ApiLog - app/shell.rs
//
// Interactive command loop. Reads prompt lines from any BufRead, drives the
// RecordStore and writes rendered panels to any Write.
//
// Command failures (bad input, missing entries, write errors) are reported
// and the loop continues; only I/O errors on the terminal itself end it.

use crate::app::commands::{parse_command, Command};
use crate::app::store::RecordStore;
use crate::core::filter::FilterPredicates;
use crate::ui::panels;
use crate::ui::theme::{Theme, Tone};
use crate::util::constants::PROMPT;
use crate::util::error::CommandError;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Whether the loop should keep reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct Shell<R, W> {
    store: RecordStore,
    input: R,
    output: W,
    theme: Theme,
    list_limit: usize,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(store: RecordStore, input: R, output: W, theme: Theme, list_limit: usize) -> Self {
        Self {
            store,
            input,
            output,
            theme,
            list_limit,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Run until `quit` or end of input. End of input never saves.
    pub fn run(&mut self) -> io::Result<()> {
        let hint = self.theme.hint("Type 'help' for available commands");
        writeln!(self.output, "{hint}\n")?;

        loop {
            let Some(line) = self.prompt(PROMPT)? else {
                tracing::debug!("End of input; leaving without saving");
                writeln!(self.output)?;
                break;
            };

            let command = match parse_command(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    tracing::debug!(input = %line.trim(), error = %e, "Rejected command");
                    self.error(&e.to_string())?;
                    if matches!(e, CommandError::Unknown { .. }) {
                        let hint = self.theme.hint("Type 'help' for available commands");
                        writeln!(self.output, "{hint}")?;
                    }
                    writeln!(self.output)?;
                    continue;
                }
            };

            if self.dispatch(command)? == Flow::Quit {
                break;
            }
        }

        self.output.flush()
    }

    fn dispatch(&mut self, command: Command) -> io::Result<Flow> {
        tracing::debug!(?command, "Dispatching command");
        match command {
            Command::Help => {
                let text = panels::help::render(&self.theme);
                write!(self.output, "{text}")?;
            }
            Command::Summary => self.show_summary()?,
            Command::List { limit } => self.show_entries(limit.unwrap_or(self.list_limit))?,
            Command::View { line_number } => match self.store.view_detail(line_number) {
                Ok(record) => {
                    let text = panels::detail::render(record, &self.theme);
                    writeln!(self.output, "{text}")?;
                }
                Err(e) => self.error(&e.to_string())?,
            },
            Command::Filter(predicates) => self.filter(predicates)?,
            Command::Clear => {
                self.store.clear();
                let text = self.theme.success("Filters cleared");
                writeln!(self.output, "{text}\n")?;
                self.show_entries(self.list_limit)?;
            }
            Command::Edit { line_number } => self.edit(line_number)?,
            Command::Save { path } => self.save(path.as_deref())?,
            Command::Export { path, format } => match self.store.export(&path, format) {
                Ok(count) => {
                    let text = self.theme.success(&format!(
                        "Exported {count} entries to {}",
                        path.display()
                    ));
                    writeln!(self.output, "{text}\n")?;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Export failed");
                    self.error(&format!("Error exporting: {e}"))?;
                }
            },
            Command::Reload => self.reload()?,
            Command::Quit => {
                let answer = self.prompt("Save changes before exiting? [y/N] ")?;
                if answer.is_some_and(|a| is_yes(&a)) {
                    self.save(None)?;
                }
                let text = self.theme.paint("Goodbye!", Tone::Cyan);
                writeln!(self.output, "{text}")?;
                return Ok(Flow::Quit);
            }
        }
        Ok(Flow::Continue)
    }

    fn show_summary(&mut self) -> io::Result<()> {
        let text = panels::summary::render(&self.store.summary(), &self.theme);
        writeln!(self.output, "{text}")
    }

    fn show_entries(&mut self, limit: usize) -> io::Result<()> {
        let rows = self.store.list_entries(limit);
        let text = panels::entries::render(&rows, self.store.view_len(), &self.theme);
        writeln!(self.output, "{text}")
    }

    fn filter(&mut self, predicates: FilterPredicates) -> io::Result<()> {
        let count = self.store.refine(predicates);
        let summary = self.store.active_filter().summary();
        let text = self.theme.success(&format!("Filtered to {count} entries"));
        if summary.is_empty() {
            writeln!(self.output, "{text}\n")?;
        } else {
            let detail = self.theme.hint(&format!("({summary})"));
            writeln!(self.output, "{text} {detail}\n")?;
        }
        self.show_entries(self.list_limit)
    }

    fn edit(&mut self, line_number: u64) -> io::Result<()> {
        match self.store.view_detail(line_number) {
            Ok(record) => {
                let text = panels::detail::render(record, &self.theme);
                writeln!(self.output, "{text}")?;
            }
            Err(e) => return self.error(&e.to_string()),
        }

        let new_content = match self.prompt("Enter new content: ")? {
            Some(line) if !line.trim().is_empty() => line,
            _ => {
                let text = self.theme.hint("Edit cancelled");
                return writeln!(self.output, "{text}\n");
            }
        };

        match self.store.edit(line_number, &new_content) {
            Ok(()) => {
                let text = self.theme.success(&format!("Entry #{line_number} updated"));
                writeln!(self.output, "{text}\n")
            }
            Err(e) => self.error(&e.to_string()),
        }
    }

    fn save(&mut self, path: Option<&Path>) -> io::Result<()> {
        match self.store.save(path) {
            Ok((target, count)) => {
                let text = self.theme.success(&format!(
                    "Saved {count} entries to {}",
                    target.display()
                ));
                writeln!(self.output, "{text}\n")
            }
            Err(e) => {
                tracing::warn!(error = %e, "Save failed");
                self.error(&format!("Error saving: {e}"))
            }
        }
    }

    fn reload(&mut self) -> io::Result<()> {
        let Some(path) = self.store.source_path().map(Path::to_path_buf) else {
            return self.error("Nothing to reload: no file was loaded");
        };
        match self.store.load_file(&path) {
            Ok(count) => {
                let text = self.theme.success(&format!("Loaded {count} log entries"));
                writeln!(self.output, "{text}\n")
            }
            Err(e) => {
                tracing::warn!(error = %e, "Reload failed; keeping previous records");
                self.error(&e.to_string())
            }
        }
    }

    /// Print `prompt` and read one line. `None` at end of input.
    fn prompt(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn error(&mut self, message: &str) -> io::Result<()> {
        let text = self.theme.error(message);
        writeln!(self.output, "{text}")
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_script(lines: &[&str], script: &str) -> (String, RecordStore) {
        let mut store = RecordStore::new();
        store.load_lines(
            lines
                .iter()
                .enumerate()
                .map(|(i, l)| (i as u64 + 1, l.to_string())),
        );
        let mut output = Vec::new();
        let mut shell = Shell::new(store, script.as_bytes(), &mut output, Theme::plain(), 50);
        shell.run().unwrap();
        let Shell { store, .. } = shell;
        (String::from_utf8(output).unwrap(), store)
    }

    const LINES: &[&str] = &[
        "2024-01-20 10:30:45 INFO GET /api/users 200 45ms",
        "2024-01-20 10:30:46 ERROR POST /api/orders 500 120ms",
        "2024-01-20 10:30:47 ERROR GET /api/items 503 80ms",
    ];

    #[test]
    fn test_consecutive_filters_narrow() {
        let (out, store) = run_script(LINES, "filter level error\nfilter method GET\n");
        assert!(out.contains("✓ Filtered to 2 entries (level=error)"));
        assert!(out.contains("✓ Filtered to 1 entries (level=error | method=GET)"));
        assert_eq!(store.view_len(), 1);
    }

    #[test]
    fn test_clear_resets() {
        let (out, store) = run_script(LINES, "filter status 500\nclear\n");
        assert!(out.contains("✓ Filters cleared"));
        assert!(out.contains("showing 3 of 3"));
        assert_eq!(store.view_len(), 3);
    }

    #[test]
    fn test_errors_do_not_stop_the_loop() {
        let (out, _) = run_script(LINES, "bogus\nview 99\nfilter status abc\nlist 1\n");
        assert!(out.contains("Unknown command: bogus"));
        assert!(out.contains("Entry #99 not found"));
        assert!(out.contains("Invalid status 'abc'"));
        assert!(out.contains("showing 1 of 3"));
    }

    #[test]
    fn test_edit_prompts_for_content() {
        let (out, store) = run_script(LINES, "edit 2\nINFO all good now\n");
        assert!(out.contains("Entry #2\n"));
        assert!(out.contains("✓ Entry #2 updated"));
        let record = store.find_by_line_number(2).unwrap();
        assert_eq!(record.level.as_deref(), Some("INFO"));
        assert_eq!(record.raw_line, "INFO all good now");
    }

    #[test]
    fn test_edit_with_blank_content_is_cancelled() {
        let (out, store) = run_script(LINES, "edit 2\n\n");
        assert!(out.contains("Edit cancelled"));
        assert_eq!(
            store.find_by_line_number(2).unwrap().level.as_deref(),
            Some("ERROR")
        );
    }

    #[test]
    fn test_quit_declining_save() {
        let (out, _) = run_script(LINES, "quit\nn\nlist\n");
        assert!(out.contains("Save changes before exiting?"));
        assert!(out.contains("Goodbye!"));
        // Nothing after quit is processed.
        assert!(!out.contains("Log Entries"));
    }

    #[test]
    fn test_quit_save_without_source_reports_error() {
        let (out, _) = run_script(LINES, "q\ny\n");
        assert!(out.contains("Error saving"));
        assert!(out.contains("Goodbye!"));
    }

    #[test]
    fn test_reload_without_source() {
        let (out, store) = run_script(LINES, "reload\n");
        assert!(out.contains("Nothing to reload"));
        assert_eq!(store.total_len(), 3);
    }

    #[test]
    fn test_help_and_summary() {
        let (out, _) = run_script(LINES, "help\nstats\n");
        assert!(out.contains("API Log Viewer Commands"));
        assert!(out.contains("Log Summary"));
        assert!(out.contains("ERROR: 2, INFO: 1"));
    }
}
