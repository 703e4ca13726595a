// ApiLog - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "API Log Viewer";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "apilog";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Display limits
// =============================================================================

/// Default number of rows shown by `list` when no limit is given.
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Minimum sensible value for the list limit.
pub const MIN_LIST_LIMIT: usize = 1;

/// Hard upper bound on the list limit (prevents flooding the terminal).
pub const ABSOLUTE_MAX_LIST_LIMIT: usize = 10_000;

/// Width of the thread column in the entries table.
pub const THREAD_COLUMN_WIDTH: usize = 25;

/// Width of the service column in the entries table.
pub const SERVICE_COLUMN_WIDTH: usize = 20;

/// Width of the endpoint column in the entries table.
pub const ENDPOINT_COLUMN_WIDTH: usize = 20;

/// Width of the cleaned message column in the entries table.
pub const MESSAGE_COLUMN_WIDTH: usize = 35;

/// Marker appended to truncated text. Counts toward the width limit.
pub const ELLIPSIS: &str = "...";

/// Placeholder shown for absent fields in the entries table.
pub const EMPTY_CELL: &str = "-";

/// Placeholder shown for absent fields in the detail panel.
pub const NOT_AVAILABLE: &str = "N/A";

/// Number of buckets kept in the top-N summary histograms.
pub const SUMMARY_TOP_N: usize = 5;

// =============================================================================
// Parsing
// =============================================================================

/// Status code emitted by the upstream framework for "not found" results.
pub const SENTINEL_NOT_FOUND_CODE: u32 = 719;

/// HTTP status the sentinel code is translated to.
pub const NOT_FOUND_STATUS: u32 = 404;

/// Method assumed for framework-style lines that name an endpoint but no verb.
pub const FRAMEWORK_DEFAULT_METHOD: &str = "POST";

/// Maximum characters of a raw line echoed into debug logs.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;

// =============================================================================
// Configuration and logging
// =============================================================================

/// Default log level. Kept quiet so the interactive prompt stays readable.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Configuration file name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Prompt shown by the interactive shell.
pub const PROMPT: &str = "› ";
