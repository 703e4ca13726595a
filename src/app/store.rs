// ApiLog - app/store.rs
//
// In-memory record store: the full classified set plus the active filtered
// view. Owned by the interactive shell; all mutation is sequential.
//
// The view is a list of indices into `entries`, so edits are visible through
// it without rebuilding and no record is ever duplicated.

use crate::core::classifier::classify;
use crate::core::display::{self, DisplayRow};
use crate::core::export::{self, ExportFormat};
use crate::core::filter::{apply_filters, FilterPredicates};
use crate::core::model::LogRecord;
use crate::core::summary::{summarize, Summary};
use crate::platform::fs;
use crate::util::error::{ExportError, LoadError, LookupError};
use rayon::prelude::*;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Records of one source file and the currently active view of them.
#[derive(Debug, Default)]
pub struct RecordStore {
    /// Full set in file order.
    entries: Vec<LogRecord>,

    /// Indices into `entries` for the active view, ascending.
    filtered: Vec<usize>,

    /// Predicates behind the active view. Informational only.
    active_filter: FilterPredicates,

    /// File the records were loaded from; default target of `save`.
    source_path: Option<PathBuf>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Loading
    // -------------------------------------------------------------------------

    /// Replace the store contents with `path`'s classified lines.
    ///
    /// On error the store is left untouched, so a failed reload keeps the
    /// previous records.
    pub fn load_file(&mut self, path: &Path) -> Result<usize, LoadError> {
        let lines = fs::read_numbered_lines(path)?;
        let count = self.load_lines(lines);
        self.source_path = Some(path.to_path_buf());
        tracing::info!(path = %path.display(), records = count, "Log file loaded");
        Ok(count)
    }

    /// Classify numbered lines and make them the full set.
    ///
    /// Blank (whitespace-only) lines are skipped without renumbering the rest.
    /// Classification runs in parallel; `collect` keeps input order.
    pub fn load_lines<I>(&mut self, lines: I) -> usize
    where
        I: IntoIterator<Item = (u64, String)>,
    {
        let lines: Vec<(u64, String)> = lines
            .into_iter()
            .filter(|(_, line)| !line.trim().is_empty())
            .collect();

        self.entries = lines
            .par_iter()
            .map(|(line_number, line)| classify(line, *line_number))
            .collect();
        self.filtered = (0..self.entries.len()).collect();
        self.active_filter = FilterPredicates::default();

        self.entries.len()
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// The full record set in file order.
    pub fn entries(&self) -> &[LogRecord] {
        &self.entries
    }

    /// Records in the active view, in order.
    pub fn view(&self) -> impl Iterator<Item = &LogRecord> + '_ {
        self.filtered.iter().map(move |&idx| &self.entries[idx])
    }

    pub fn view_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn total_len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn active_filter(&self) -> &FilterPredicates {
        &self.active_filter
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    // -------------------------------------------------------------------------
    // Filtering
    // -------------------------------------------------------------------------

    /// Make the view exactly the records matching `predicates`, evaluated
    /// against the full set. Returns the new view size.
    pub fn filter(&mut self, predicates: FilterPredicates) -> usize {
        self.filtered = apply_filters(&self.entries, &predicates);
        tracing::debug!(
            filter = %predicates.summary(),
            matched = self.filtered.len(),
            total = self.entries.len(),
            "Filter applied"
        );
        self.active_filter = predicates;
        self.filtered.len()
    }

    /// Add `predicates` to the active ones (replacing any of the same kind)
    /// and re-filter from the full set.
    pub fn refine(&mut self, predicates: FilterPredicates) -> usize {
        let merged = self.active_filter.merged_with(predicates);
        self.filter(merged)
    }

    /// Reset the view to the full set. Returns the full count.
    pub fn clear(&mut self) -> usize {
        self.filtered = (0..self.entries.len()).collect();
        self.active_filter = FilterPredicates::default();
        self.entries.len()
    }

    // -------------------------------------------------------------------------
    // Lookup and edit
    // -------------------------------------------------------------------------

    /// Linear lookup over the full set by original line number.
    pub fn find_by_line_number(&self, line_number: u64) -> Option<&LogRecord> {
        self.position_of(line_number).map(|idx| &self.entries[idx])
    }

    /// The record for the detail panel, or `NotFound`.
    pub fn view_detail(&self, line_number: u64) -> Result<&LogRecord, LookupError> {
        self.find_by_line_number(line_number)
            .ok_or(LookupError::NotFound { line_number })
    }

    /// Replace a record with a fresh classification of `new_text`.
    ///
    /// The line number is kept; every derived field is recomputed. The record
    /// keeps its place in the active view even if it no longer matches the
    /// active filter.
    pub fn edit(&mut self, line_number: u64, new_text: &str) -> Result<(), LookupError> {
        let idx = self
            .position_of(line_number)
            .ok_or(LookupError::NotFound { line_number })?;
        self.entries[idx] = classify(new_text, line_number);
        tracing::debug!(line_number, "Record edited");
        Ok(())
    }

    fn position_of(&self, line_number: u64) -> Option<usize> {
        self.entries
            .iter()
            .position(|record| record.line_number() == line_number)
    }

    // -------------------------------------------------------------------------
    // Export and save
    // -------------------------------------------------------------------------

    /// Write the active view to `path` in `format`, in view order.
    pub fn export(&self, path: &Path, format: ExportFormat) -> Result<usize, ExportError> {
        let out = fs::create_output(path)?;
        let count = export::write_view(self.view(), format, out, path)?;
        tracing::info!(path = %path.display(), %format, records = count, "View exported");
        Ok(count)
    }

    /// Write the full set to `writer` as raw lines in line-number order.
    /// `path` is used for error context only.
    pub fn save_to<W: Write>(&self, writer: W, path: &Path) -> Result<usize, ExportError> {
        let mut records: Vec<&LogRecord> = self.entries.iter().collect();
        records.sort_by_key(|record| record.line_number());
        export::write_raw_lines(records, writer, path)
    }

    /// Save the full set to `path`, or back to the source file when `None`.
    /// Returns the destination and the record count.
    pub fn save(&self, path: Option<&Path>) -> Result<(PathBuf, usize), ExportError> {
        let target = match path.or(self.source_path.as_deref()) {
            Some(p) => p.to_path_buf(),
            None => {
                return Err(ExportError::Io {
                    path: PathBuf::new(),
                    source: io::Error::new(io::ErrorKind::InvalidInput, "no save destination"),
                })
            }
        };

        let out = fs::create_output(&target)?;
        let count = self.save_to(out, &target)?;
        tracing::info!(path = %target.display(), records = count, "Records saved");
        Ok((target, count))
    }

    // -------------------------------------------------------------------------
    // Presentation data
    // -------------------------------------------------------------------------

    /// Statistics over the active view.
    pub fn summary(&self) -> Summary {
        let size = self.source_path.as_deref().map(fs::file_size).unwrap_or(0);
        summarize(self.view(), size)
    }

    /// Display rows for the first `limit` records of the active view.
    pub fn list_entries(&self, limit: usize) -> Vec<DisplayRow> {
        display::list_entries(self.view(), limit)
    }
}
