// ApiLog - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation.
// All errors preserve the causal chain for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error for failures reported at startup, before the prompt runs.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum ApiLogError {
    /// Loading the source log file failed.
    Load(LoadError),

    /// Configuration loading or validation failed.
    Config(ConfigError),
}

impl fmt::Display for ApiLogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load(e) => write!(f, "Load error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl std::error::Error for ApiLogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Load(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Load errors
// ---------------------------------------------------------------------------

/// Errors raised while reading the source log file.
#[derive(Debug)]
pub enum LoadError {
    /// The source file does not exist.
    NotFound { path: PathBuf },

    /// The source file exists but could not be read.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => write!(f, "File not found: {}", path.display()),
            Self::Io { path, source } => {
                write!(f, "Error loading file '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::NotFound { .. } => None,
        }
    }
}

impl From<LoadError> for ApiLogError {
    fn from(e: LoadError) -> Self {
        Self::Load(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export and save operations.
///
/// The destination may be left partially written; nothing is rolled back
/// or retried.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error creating or writing the output file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Error writing '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Lookup errors
// ---------------------------------------------------------------------------

/// A record addressed by its original line number does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupError {
    NotFound { line_number: u64 },
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { line_number } => write!(f, "Entry #{line_number} not found"),
        }
    }
}

impl std::error::Error for LookupError {}

// ---------------------------------------------------------------------------
// Command errors
// ---------------------------------------------------------------------------

/// Errors in a line typed at the interactive prompt.
///
/// These are caller-side validation failures; the core never sees
/// malformed predicate values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The first word is not a known command.
    Unknown { command: String },

    /// A command was given the wrong number of arguments.
    Usage { usage: &'static str },

    /// An argument that must be numeric was not.
    InvalidNumber { field: &'static str, value: String },

    /// `filter` was given an unknown predicate kind.
    UnknownFilter { kind: String },

    /// `export` was given an unknown format name.
    UnknownFormat { format: String },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown { command } => write!(f, "Unknown command: {command}"),
            Self::Usage { usage } => write!(f, "Usage: {usage}"),
            Self::InvalidNumber { field, value } => {
                write!(f, "Invalid {field} '{value}': expected a whole number")
            }
            Self::UnknownFilter { kind } => write!(
                f,
                "Unknown filter type '{kind}'. Use: level, method, status, thread, service, or search"
            ),
            Self::UnknownFormat { format } => write!(
                f,
                "Unknown export format '{format}'. Use: raw, csv, or json"
            ),
        }
    }
}

impl std::error::Error for CommandError {}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for ApiLogError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for ApiLog results.
pub type Result<T> = std::result::Result<T, ApiLogError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_load_error_keeps_io_source() {
        let err = LoadError::Io {
            path: PathBuf::from("api.log"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("api.log"));
        assert!(err.source().is_some());

        let top: ApiLogError = err.into();
        assert!(top.to_string().starts_with("Load error:"));
        assert!(top.source().is_some());
    }

    #[test]
    fn test_config_error_wraps_into_top_level() {
        let err = ConfigError::ValueOutOfRange {
            field: "display.list_limit".to_string(),
            value: "0".to_string(),
            expected: "1..=10000".to_string(),
        };
        let top = ApiLogError::from(err);
        assert!(top.to_string().starts_with("Configuration error:"));
        assert!(top.to_string().contains("display.list_limit"));
        assert!(top.source().is_some());
    }

    #[test]
    fn test_lookup_error_message() {
        let err = LookupError::NotFound { line_number: 42 };
        assert_eq!(err.to_string(), "Entry #42 not found");
    }

    #[test]
    fn test_command_error_messages() {
        let err = CommandError::InvalidNumber {
            field: "status",
            value: "abc".to_string(),
        };
        assert!(err.to_string().contains("'abc'"));

        let err = CommandError::Usage {
            usage: "view <line_number>",
        };
        assert_eq!(err.to_string(), "Usage: view <line_number>");
    }
}
