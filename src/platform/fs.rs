// ApiLog - platform/fs.rs
//
// Filesystem access for the viewer: the line supplier used at load time and
// the output sink used by export and save.

use crate::util::error::{ExportError, LoadError};
use regex::Regex;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;
use std::sync::OnceLock;

/// Read a file as numbered lines, 1-based, in file order.
///
/// Invalid UTF-8 is replaced rather than rejected. `\n`, `\r\n` and a bare
/// `\r` all end a line. Blank lines are returned; skipping them is the
/// caller's decision so that numbering always reflects the file.
pub fn read_numbered_lines(path: &Path) -> Result<Vec<(u64, String)>, LoadError> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let text = String::from_utf8_lossy(&bytes);
    if matches!(text, std::borrow::Cow::Owned(_)) {
        tracing::debug!(path = %path.display(), "Invalid UTF-8 replaced while reading");
    }

    let mut pieces: Vec<&str> = line_break().split(&text).collect();
    // A trailing terminator does not start another line.
    if pieces.last() == Some(&"") {
        pieces.pop();
    }

    let lines: Vec<(u64, String)> = pieces
        .into_iter()
        .enumerate()
        .map(|(idx, line)| (idx as u64 + 1, line.to_string()))
        .collect();

    tracing::debug!(
        path = %path.display(),
        bytes = bytes.len(),
        lines = lines.len(),
        "File read"
    );
    Ok(lines)
}

fn line_break() -> &'static Regex {
    static LINE_BREAK: OnceLock<Regex> = OnceLock::new();
    LINE_BREAK.get_or_init(|| Regex::new(r"\r\n|\r|\n").expect("fs: invalid regex"))
}

/// Create (or truncate) `path` for writing, buffered.
pub fn create_output(path: &Path) -> Result<BufWriter<File>, ExportError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| ExportError::Io {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Size of the file on disk in bytes, or 0 if it cannot be read.
pub fn file_size(path: &Path) -> u64 {
    match std::fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Could not stat file");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_numbered_lines_keep_blank_positions() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "first\r\n\nthird\n").unwrap();

        let lines = read_numbered_lines(file.path()).unwrap();
        assert_eq!(
            lines,
            vec![
                (1, "first".to_string()),
                (2, String::new()),
                (3, "third".to_string()),
            ]
        );
    }

    #[test]
    fn test_bare_carriage_returns_split_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"INFO one\rINFO two\r\rINFO four\r").unwrap();

        let lines = read_numbered_lines(file.path()).unwrap();
        assert_eq!(
            lines,
            vec![
                (1, "INFO one".to_string()),
                (2, "INFO two".to_string()),
                (3, String::new()),
                (4, "INFO four".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_file_has_no_lines() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(read_numbered_lines(file.path()).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"ok \xFF\xFE line\n").unwrap();

        let lines = read_numbered_lines(file.path()).unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].1.contains('\u{FFFD}'));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_numbered_lines(&dir.path().join("absent.log")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
    }

    #[test]
    fn test_create_output_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.log");
        std::fs::write(&path, "old content that is long\n").unwrap();

        {
            let mut out = create_output(&path).unwrap();
            out.write_all(b"new\n").unwrap();
        }
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new\n");
        assert_eq!(file_size(&path), 4);
    }

    #[test]
    fn test_file_size_of_missing_file_is_zero() {
        assert_eq!(file_size(Path::new("/definitely/not/here.log")), 0);
    }
}
