// ApiLog - core/export.rs
//
// Writing a view of records to any Write sink.
// Core layer: the caller opens the destination; the path is only used for
// error context.
//
// Raw-line output is the round-trip format: one trimmed raw line per record,
// newline-terminated, UTF-8. CSV and JSON are one-way reports.

use crate::core::model::LogRecord;
use crate::util::error::ExportError;
use std::fmt;
use std::io::Write;
use std::path::Path;

/// Output format for `export`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Raw lines, re-loadable by the viewer.
    #[default]
    Raw,
    Csv,
    Json,
}

impl ExportFormat {
    /// Parse a format name as typed at the prompt (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "raw" | "log" | "txt" => Some(Self::Raw),
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Raw => "raw",
            Self::Csv => "csv",
            Self::Json => "json",
        })
    }
}

/// Write records in `format`, in the order given. Returns the record count.
pub fn write_view<'a, I, W>(
    view: I,
    format: ExportFormat,
    writer: W,
    path: &Path,
) -> Result<usize, ExportError>
where
    I: IntoIterator<Item = &'a LogRecord>,
    W: Write,
{
    match format {
        ExportFormat::Raw => write_raw_lines(view, writer, path),
        ExportFormat::Csv => export_csv(view, writer, path),
        ExportFormat::Json => export_json(view, writer, path),
    }
}

/// Write each record's `raw_line`, one per line, in the order given.
///
/// Never re-sorts; callers that need line-number order sort first.
pub fn write_raw_lines<'a, I, W>(view: I, mut writer: W, path: &Path) -> Result<usize, ExportError>
where
    I: IntoIterator<Item = &'a LogRecord>,
    W: Write,
{
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut count = 0;
    for record in view {
        writer.write_all(record.raw_line.as_bytes()).map_err(io_err)?;
        writer.write_all(b"\n").map_err(io_err)?;
        count += 1;
    }
    writer.flush().map_err(io_err)?;

    Ok(count)
}

/// Export records to CSV.
///
/// Columns: line, timestamp, level, thread, logger, service, method,
/// endpoint, status, response_time_ms, message
pub fn export_csv<'a, I, W>(view: I, writer: W, path: &Path) -> Result<usize, ExportError>
where
    I: IntoIterator<Item = &'a LogRecord>,
    W: Write,
{
    let csv_err = |source| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record([
            "line",
            "timestamp",
            "level",
            "thread",
            "logger",
            "service",
            "method",
            "endpoint",
            "status",
            "response_time_ms",
            "message",
        ])
        .map_err(csv_err)?;

    let mut count = 0;
    for record in view {
        let ts = record
            .timestamp
            .map(|t| t.format("%Y-%m-%dT%H:%M:%S%.3f").to_string())
            .unwrap_or_default();
        let status = record.status_code.map(|c| c.to_string()).unwrap_or_default();
        let latency = record
            .response_time
            .map(|ms| ms.to_string())
            .unwrap_or_default();
        let line = record.line_number().to_string();

        csv_writer
            .write_record([
                line.as_str(),
                ts.as_str(),
                record.level.as_deref().unwrap_or(""),
                record.thread.as_deref().unwrap_or(""),
                record.logger.as_deref().unwrap_or(""),
                record.service_name.as_deref().unwrap_or(""),
                record.method.as_deref().unwrap_or(""),
                record.endpoint.as_deref().unwrap_or(""),
                status.as_str(),
                latency.as_str(),
                record.message.as_str(),
            ])
            .map_err(csv_err)?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(count)
}

/// Export records as a pretty-printed JSON array of objects.
pub fn export_json<'a, I, W>(view: I, mut writer: W, path: &Path) -> Result<usize, ExportError>
where
    I: IntoIterator<Item = &'a LogRecord>,
    W: Write,
{
    let records: Vec<&LogRecord> = view.into_iter().collect();
    serde_json::to_writer_pretty(&mut writer, &records).map_err(|e| ExportError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;
    writer.flush().map_err(|e| ExportError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(records.len())
}
