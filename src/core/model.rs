// ApiLog - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers.

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

// =============================================================================
// Log Record (normalised output of classification)
// =============================================================================

/// A single classified log line.
///
/// This is the core data unit that flows through filtering, display,
/// and export. Every grammar in the classification cascade produces one of
/// these regardless of the source line's native structure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord {
    /// 1-based position in the source file. Stable identity key; only
    /// readable through [`LogRecord::line_number`].
    line_number: u64,

    /// Trimmed original text. The only field written back on save/export.
    pub raw_line: String,

    /// Wall-clock instant as written in the log. Time-only stamps are
    /// combined with the processing date.
    pub timestamp: Option<NaiveDateTime>,

    /// Severity, uppercased (DEBUG/INFO/WARN/WARNING/ERROR/FATAL/CRITICAL).
    pub level: Option<String>,

    /// HTTP verb, uppercased.
    pub method: Option<String>,

    pub endpoint: Option<String>,

    pub status_code: Option<u32>,

    /// Response latency in milliseconds.
    pub response_time: Option<f64>,

    /// Human-readable message. Defaults to `raw_line`; may be empty.
    pub message: String,

    pub thread: Option<String>,
    pub logger: Option<String>,
    pub service_name: Option<String>,
    pub controller_name: Option<String>,

    /// Lifecycle marker. Overrides any other message content when present.
    pub operation_type: Option<OperationType>,

    /// Decoded embedded JSON object, kept verbatim for the detail view.
    pub structured_payload: Option<Map<String, Value>>,
}

impl LogRecord {
    /// Build a record from the fields a classification stage committed.
    ///
    /// Absent message defaults to the raw line. When both a lifecycle marker
    /// and an endpoint are known the message is rewritten to
    /// `"{operation_type} - {endpoint}"`.
    pub(crate) fn from_fields(raw_line: &str, line_number: u64, fields: RecordFields) -> Self {
        let mut message = fields.message.unwrap_or_else(|| raw_line.to_string());
        if let (Some(op), Some(endpoint)) = (fields.operation_type, fields.endpoint.as_deref()) {
            message = format!("{op} - {endpoint}");
        }

        Self {
            line_number,
            raw_line: raw_line.to_string(),
            timestamp: fields.timestamp,
            level: fields.level,
            method: fields.method,
            endpoint: fields.endpoint,
            status_code: fields.status_code,
            response_time: fields.response_time,
            message,
            thread: fields.thread,
            logger: fields.logger,
            service_name: fields.service_name,
            controller_name: fields.controller_name,
            operation_type: fields.operation_type,
            structured_payload: fields.structured_payload,
        }
    }

    /// 1-based line number in the original source. Never changes, even
    /// across edits.
    pub fn line_number(&self) -> u64 {
        self.line_number
    }
}

// =============================================================================
// Operation type
// =============================================================================

/// Request lifecycle marker emitted by the framework (`=== /CODE START`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationType {
    Start,
    Stop,
}

impl OperationType {
    /// Parse the literal marker token. Case-sensitive, as logged.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "START" => Some(Self::Start),
            "STOP" => Some(Self::Stop),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "START",
            Self::Stop => "STOP",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OperationType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// =============================================================================
// Record fields (one stage's partial result)
// =============================================================================

/// The fields a single classification stage extracted from a line.
///
/// Every field is optional; `None` means "this stage did not find it".
/// Stages return one of these and [`RecordFields::or`] layers two of them
/// with set-if-absent precedence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFields {
    pub timestamp: Option<NaiveDateTime>,
    pub level: Option<String>,
    pub method: Option<String>,
    pub endpoint: Option<String>,
    pub status_code: Option<u32>,
    pub response_time: Option<f64>,
    pub message: Option<String>,
    pub thread: Option<String>,
    pub logger: Option<String>,
    pub service_name: Option<String>,
    pub controller_name: Option<String>,
    pub operation_type: Option<OperationType>,
    pub structured_payload: Option<Map<String, Value>>,
}

impl RecordFields {
    /// Set-if-absent merge: every field already present in `self` is kept,
    /// every field `self` lacks is taken from `fallback`.
    pub fn or(self, fallback: RecordFields) -> RecordFields {
        RecordFields {
            timestamp: self.timestamp.or(fallback.timestamp),
            level: self.level.or(fallback.level),
            method: self.method.or(fallback.method),
            endpoint: self.endpoint.or(fallback.endpoint),
            status_code: self.status_code.or(fallback.status_code),
            response_time: self.response_time.or(fallback.response_time),
            message: self.message.or(fallback.message),
            thread: self.thread.or(fallback.thread),
            logger: self.logger.or(fallback.logger),
            service_name: self.service_name.or(fallback.service_name),
            controller_name: self.controller_name.or(fallback.controller_name),
            operation_type: self.operation_type.or(fallback.operation_type),
            structured_payload: self.structured_payload.or(fallback.structured_payload),
        }
    }
}
