// ApiLog - core/classifier.rs
//
// Multi-format line classification.
// Core layer: pure function from (raw line, line number) to LogRecord.
//
// Three grammars are tried in a fixed order and the first that matches
// commits its fields:
//   1. Embedded JSON object, optionally preceded by framework-style text.
//   2. Framework-style line: `HH:MM:SS.mmm [thread] LEVEL logger :: message`.
//   3. Generic free text, scanned for every field independently.
//
// Classification never fails. A line nothing recognises still yields a
// record whose message is the raw line.

use crate::core::model::{LogRecord, OperationType, RecordFields};
use crate::core::timestamp::{normalize_timestamp, on_processing_date};
use crate::util::constants;
use chrono::NaiveTime;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

// =============================================================================
// Cascade
// =============================================================================

/// One grammar in the classification cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// A JSON object embedded from the first `{` to end of line.
    Structured,
    /// The fixed-shape framework line grammar.
    Framework,
    /// Free-text fallback. Always matches.
    Generic,
}

/// Stages in priority order. The first `Some` wins.
pub const CASCADE: [Stage; 3] = [Stage::Structured, Stage::Framework, Stage::Generic];

impl Stage {
    /// Attempt this grammar on an already-trimmed line.
    ///
    /// `None` means "no match, try the next stage"; it never signals an error.
    pub fn try_match(self, line: &str) -> Option<RecordFields> {
        match self {
            Stage::Structured => match_structured(line),
            Stage::Framework => match_framework(line),
            Stage::Generic => Some(match_generic(line)),
        }
    }
}

/// Classify one raw line into a [`LogRecord`].
///
/// Deterministic apart from the processing date used for time-only stamps.
pub fn classify(raw_line: &str, line_number: u64) -> LogRecord {
    let line = raw_line.trim();
    let (stage, fields) = run_cascade(line);

    tracing::trace!(
        line_number,
        stage = ?stage,
        preview = %preview(line),
        "Line classified"
    );

    LogRecord::from_fields(line, line_number, fields)
}

/// Run the cascade and report which stage committed.
pub fn run_cascade(line: &str) -> (Stage, RecordFields) {
    CASCADE
        .iter()
        .find_map(|stage| stage.try_match(line).map(|fields| (*stage, fields)))
        .unwrap_or((Stage::Generic, RecordFields::default()))
}

fn preview(line: &str) -> &str {
    match line.char_indices().nth(constants::DEBUG_MAX_LINE_PREVIEW) {
        Some((idx, _)) => &line[..idx],
        None => line,
    }
}

// =============================================================================
// Patterns
// =============================================================================

struct Patterns {
    framework_line: Regex,
    controller: Regex,
    lifecycle: Regex,
    bare_endpoint: Regex,
    framework_method: Regex,
    status_codes: Vec<Regex>,
    framework_latency: Regex,
    generic_datetime: Regex,
    generic_time: Regex,
    generic_level: Regex,
    generic_request: Regex,
    generic_status: Regex,
    generic_latency: Regex,
    generic_trailing: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();

    PATTERNS.get_or_init(|| {
        // Patterns are fixed literals exercised by the unit tests below, so a
        // mistake shows up as a failing test rather than a runtime panic.
        fn re(pat: &str) -> Regex {
            Regex::new(pat).expect("classifier: invalid regex")
        }

        Patterns {
            framework_line: re(concat!(
                r"(?i)^(\d{2}:\d{2}:\d{2}\.\d{3})\s+",
                r"\[([^\]]+)\]\s+",
                r"(DEBUG|INFO|WARN|WARNING|ERROR|FATAL|CRITICAL)\s+",
                r"([^\s:]+)\s*::\s*(.+)$",
            )),
            controller: re(r"([A-Za-z]+(?:Cntr|Controller|Service)):\s*([A-Z0-9]+)"),
            lifecycle: re(r"=+\s*/([A-Z0-9]+)\s+(START|STOP)"),
            bare_endpoint: re(r"/([A-Z0-9]+)"),
            framework_method: re(r"\b(GET|POST|PUT|DELETE|PATCH|HEAD|OPTIONS)\b"),
            status_codes: vec![
                re(r"Response Code\s*:\s*(\d{3})"),
                re(r"status[:\s=]+(\d{3})"),
                re(r"RSLT_CD\[(\d+)\]"),
            ],
            framework_latency: re(r"(\d+(?:\.\d+)?)\s*(ms|milliseconds?)"),
            generic_datetime: re(
                r"\d{4}-\d{2}-\d{2}[T\s]\d{2}:\d{2}:\d{2}(?:\.\d+)?(?:Z|[+-]\d{2}:?\d{2})?",
            ),
            generic_time: re(r"\d{2}:\d{2}:\d{2}(?:\.\d+)?"),
            generic_level: re(r"(?i)\b(?:DEBUG|INFO|WARN|WARNING|ERROR|FATAL|CRITICAL)\b"),
            generic_request: re(r"\b(GET|POST|PUT|DELETE|PATCH|HEAD|OPTIONS)\s+(\S+)"),
            generic_status: re(r"\b[1-5]\d{2}\b"),
            generic_latency: re(r"(\d+(?:\.\d+)?)\s*(ms|s)"),
            generic_trailing: re(concat!(
                r"(?i)\b(?:GET|POST|PUT|DELETE|PATCH|HEAD|OPTIONS)\s+",
                r"\S+\s+",
                r"(?:status=)?[1-5]\d{2}",
                r"(?:\s+\d+(?:\.\d+)?(?:ms|s))?",
                r"\s+(.*)$",
            )),
        }
    })
}

// =============================================================================
// Stage 1: embedded JSON
// =============================================================================

const TIMESTAMP_KEYS: &[&str] = &["timestamp", "time", "@timestamp"];
const LEVEL_KEYS: &[&str] = &["level", "severity"];
const METHOD_KEYS: &[&str] = &["method", "http_method"];
const ENDPOINT_KEYS: &[&str] = &["path", "endpoint", "url"];
const STATUS_KEYS: &[&str] = &["status", "status_code"];
const LATENCY_KEYS: &[&str] = &["response_time", "duration"];
const MESSAGE_KEYS: &[&str] = &["message", "msg"];

fn match_structured(line: &str) -> Option<RecordFields> {
    if !(line.contains('{') && line.contains('}')) {
        return None;
    }
    let start = line.find('{')?;

    let payload: Map<String, Value> = match serde_json::from_str(&line[start..]) {
        Ok(map) => map,
        Err(e) => {
            tracing::trace!(error = %e, "Embedded JSON did not decode; trying next grammar");
            return None;
        }
    };

    let mut fields = fields_from_payload(&payload);
    fields.structured_payload = Some(payload);

    // Text before the object may itself be a framework-style line. Its
    // fields only fill what the JSON left unset.
    let prefix = &line[..start];
    if let Some(prefix_fields) = match_framework(prefix) {
        fields = fields.or(prefix_fields);
    }

    Some(fields)
}

fn fields_from_payload(payload: &Map<String, Value>) -> RecordFields {
    RecordFields {
        timestamp: first_present(payload, TIMESTAMP_KEYS)
            .and_then(Value::as_str)
            .and_then(normalize_timestamp),
        level: first_present(payload, LEVEL_KEYS).map(|v| value_text(v).to_uppercase()),
        method: first_present(payload, METHOD_KEYS).map(|v| value_text(v).to_uppercase()),
        endpoint: first_present(payload, ENDPOINT_KEYS).map(value_text),
        status_code: first_present(payload, STATUS_KEYS).and_then(value_u32),
        response_time: first_present(payload, LATENCY_KEYS).and_then(value_f64),
        // A JSON line without a message has an empty message, not the raw line.
        message: Some(
            first_present(payload, MESSAGE_KEYS)
                .map(value_text)
                .unwrap_or_default(),
        ),
        ..Default::default()
    }
}

/// First key in `keys` whose value is present (not null, not an empty string).
fn first_present<'a>(payload: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| payload.get(*key))
        .find(|value| match value {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            _ => true,
        })
}

/// String form of a JSON value. Strings are taken verbatim, anything else
/// is rendered as JSON text.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn value_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// =============================================================================
// Stage 2: framework-style line
// =============================================================================

fn match_framework(line: &str) -> Option<RecordFields> {
    let caps = patterns().framework_line.captures(line)?;

    let mut fields = message_details(&caps[5]);
    fields.timestamp = NaiveTime::parse_from_str(&caps[1], "%H:%M:%S%.3f")
        .ok()
        .map(on_processing_date);
    fields.thread = Some(caps[2].to_string());
    fields.level = Some(caps[3].to_uppercase());
    fields.logger = Some(caps[4].to_string());

    Some(fields)
}

/// Pull request details out of the free text after `::`.
fn message_details(message: &str) -> RecordFields {
    let p = patterns();
    let mut fields = RecordFields {
        message: Some(message.to_string()),
        ..Default::default()
    };

    if let Some(caps) = p.controller.captures(message) {
        let name = caps[1].to_string();
        fields.endpoint = Some(format!("/{}", &caps[2]));
        fields.service_name = Some(name.clone());
        fields.controller_name = Some(name);
    }

    // The lifecycle marker names the endpoint authoritatively.
    if let Some(caps) = p.lifecycle.captures(message) {
        fields.endpoint = Some(format!("/{}", &caps[1]));
        fields.operation_type = OperationType::from_token(&caps[2]);
    }

    if fields.endpoint.is_none() {
        fields.endpoint = p
            .bare_endpoint
            .captures(message)
            .map(|caps| format!("/{}", &caps[1]));
    }

    fields.method = p
        .framework_method
        .find(message)
        .map(|m| m.as_str().to_string());
    if fields.method.is_none() && fields.endpoint.is_some() {
        fields.method = Some(constants::FRAMEWORK_DEFAULT_METHOD.to_string());
    }

    fields.status_code = framework_status(message);

    fields.response_time = p
        .framework_latency
        .captures(message)
        .and_then(|caps| caps[1].parse().ok());

    fields
}

/// First status pattern that matches wins, with the upstream "not found"
/// sentinel translated to 404.
fn framework_status(message: &str) -> Option<u32> {
    let caps = patterns()
        .status_codes
        .iter()
        .find_map(|re| re.captures(message))?;
    let code: u32 = caps[1].parse().ok()?;
    if code == constants::SENTINEL_NOT_FOUND_CODE {
        Some(constants::NOT_FOUND_STATUS)
    } else {
        Some(code)
    }
}

// =============================================================================
// Stage 3: generic free text
// =============================================================================

fn match_generic(line: &str) -> RecordFields {
    let p = patterns();
    let mut fields = RecordFields::default();

    fields.timestamp = p
        .generic_datetime
        .find(line)
        .or_else(|| p.generic_time.find(line))
        .and_then(|m| normalize_timestamp(m.as_str()));

    fields.level = p.generic_level.find(line).map(|m| m.as_str().to_uppercase());

    if let Some(caps) = p.generic_request.captures(line) {
        fields.method = Some(caps[1].to_string());
        fields.endpoint = Some(caps[2].to_string());
    }

    fields.status_code = p
        .generic_status
        .find(line)
        .and_then(|m| m.as_str().parse().ok());

    fields.response_time = p.generic_latency.captures(line).and_then(|caps| {
        let value: f64 = caps[1].parse().ok()?;
        Some(if &caps[2] == "ms" { value } else { value * 1000.0 })
    });

    // Only a full `VERB endpoint status [latency] rest` shape replaces the
    // default message.
    fields.message = p
        .generic_trailing
        .captures(line)
        .map(|caps| caps[1].trim().to_string());

    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    // -------------------------------------------------------------------------
    // Totality
    // -------------------------------------------------------------------------

    #[test]
    fn test_empty_line_yields_raw_message() {
        let record = classify("", 1);
        assert_eq!(record.message, "");
        assert!(record.level.is_none());
        assert!(record.timestamp.is_none());
    }

    #[test]
    fn test_unrecognised_line_keeps_raw_message() {
        let record = classify("   just some words here   ", 3);
        assert_eq!(record.raw_line, "just some words here");
        assert_eq!(record.message, "just some words here");
        assert!(record.method.is_none());
        assert!(record.status_code.is_none());
        assert!(record.operation_type.is_none());
    }

    #[test]
    fn test_replacement_chars_and_long_lines_terminate() {
        let garbage = "\u{FFFD}\u{FFFD}{\u{FFFD}}[::] \u{FFFD}".repeat(50);
        let record = classify(&garbage, 1);
        assert!(!record.message.is_empty());

        let long = format!("INFO GET /x 200 {}", "z".repeat(200_000));
        let record = classify(&long, 2);
        assert_eq!(record.status_code, Some(200));
    }

    // -------------------------------------------------------------------------
    // Generic fallback
    // -------------------------------------------------------------------------

    #[test]
    fn test_generic_api_line() {
        let record = classify("2024-01-20 10:30:45 INFO GET /api/users 200 45ms", 1);
        assert_eq!(record.level.as_deref(), Some("INFO"));
        assert_eq!(record.method.as_deref(), Some("GET"));
        assert_eq!(record.endpoint.as_deref(), Some("/api/users"));
        assert_eq!(record.status_code, Some(200));
        assert_eq!(record.response_time, Some(45.0));
        assert_eq!(
            record.timestamp.map(|t| t.to_string()).as_deref(),
            Some("2024-01-20 10:30:45")
        );
    }

    #[test]
    fn test_generic_bracketed_iso_line() {
        let record = classify(
            "[2024-01-20T10:30:45Z] ERROR POST /api/orders status=500 time=120ms",
            1,
        );
        assert_eq!(record.level.as_deref(), Some("ERROR"));
        assert_eq!(record.method.as_deref(), Some("POST"));
        assert_eq!(record.endpoint.as_deref(), Some("/api/orders"));
        assert_eq!(record.status_code, Some(500));
        assert_eq!(record.response_time, Some(120.0));
        assert_eq!(record.message, "time=120ms");
    }

    #[test]
    fn test_generic_trailing_message() {
        let record = classify(
            "2024-01-20 10:30:46 WARN DELETE /api/items/9 404 12ms item already gone",
            1,
        );
        assert_eq!(record.message, "item already gone");
        assert_eq!(record.status_code, Some(404));
    }

    #[test]
    fn test_generic_without_full_shape_keeps_raw_message() {
        let line = "[2024-01-20T10:30:47Z] WARN GET /api/products status=404";
        let record = classify(line, 1);
        assert_eq!(record.message, line);
        assert_eq!(record.status_code, Some(404));
    }

    #[test]
    fn test_generic_seconds_converted_to_millis() {
        let record = classify("job finished in 1.5s", 1);
        assert_eq!(record.response_time, Some(1500.0));
    }

    #[test]
    fn test_generic_level_case_insensitive() {
        let record = classify("something warning happened", 1);
        assert_eq!(record.level.as_deref(), Some("WARNING"));
    }

    #[test]
    fn test_generic_time_only_uses_processing_date() {
        let record = classify("at 08:00:01 nothing else", 1);
        let ts = record.timestamp.expect("time-only stamp should parse");
        assert_eq!(ts.date(), Local::now().date_naive());
    }

    #[test]
    fn test_generic_does_not_default_method() {
        // The POST default belongs to the framework grammar only.
        let record = classify("/ABC123 served", 1);
        assert!(record.method.is_none());
        assert!(record.endpoint.is_none());
    }

    // -------------------------------------------------------------------------
    // Embedded JSON
    // -------------------------------------------------------------------------

    #[test]
    fn test_json_line() {
        let record = classify(
            r#"{"timestamp":"2024-01-20T10:30:45Z","level":"ERROR","message":"boom"}"#,
            1,
        );
        assert_eq!(record.level.as_deref(), Some("ERROR"));
        assert_eq!(record.message, "boom");
        let payload = record.structured_payload.expect("payload should be kept");
        assert_eq!(payload.get("message"), Some(&Value::from("boom")));
        assert_eq!(
            record.timestamp.map(|t| t.to_string()).as_deref(),
            Some("2024-01-20 10:30:45")
        );
    }

    #[test]
    fn test_json_full_field_mapping() {
        let record = classify(
            r#"{"timestamp": "2024-01-20T10:30:45Z", "level": "info", "method": "get", "path": "/api/users", "status": 200, "response_time": 45.2, "message": "Success"}"#,
            1,
        );
        assert_eq!(record.level.as_deref(), Some("INFO"));
        assert_eq!(record.method.as_deref(), Some("GET"));
        assert_eq!(record.endpoint.as_deref(), Some("/api/users"));
        assert_eq!(record.status_code, Some(200));
        assert_eq!(record.response_time, Some(45.2));
        assert_eq!(record.message, "Success");
    }

    #[test]
    fn test_json_alternate_keys() {
        let record = classify(
            r#"{"@timestamp":"2024-01-20 10:30:45","severity":"warn","http_method":"PUT","url":"/v2/x","status_code":"503","duration":7,"msg":"slow"}"#,
            1,
        );
        assert_eq!(record.level.as_deref(), Some("WARN"));
        assert_eq!(record.method.as_deref(), Some("PUT"));
        assert_eq!(record.endpoint.as_deref(), Some("/v2/x"));
        assert_eq!(record.status_code, Some(503));
        assert_eq!(record.response_time, Some(7.0));
        assert_eq!(record.message, "slow");
        assert!(record.timestamp.is_some());
    }

    #[test]
    fn test_json_without_message_is_empty() {
        let record = classify(r#"{"level": "DEBUG"}"#, 1);
        assert_eq!(record.message, "");
    }

    #[test]
    fn test_json_non_string_message_is_coerced() {
        let record = classify(r#"{"message": {"code": 5}}"#, 1);
        assert_eq!(record.message, r#"{"code":5}"#);
    }

    #[test]
    fn test_json_decode_failure_falls_through_untouched() {
        let line = "10:15:02.123 [main] INFO com.app.Svc :: payload {not json}";
        let (stage, _) = run_cascade(line);
        assert_eq!(stage, Stage::Framework);

        let record = classify(line, 1);
        assert!(record.structured_payload.is_none());
        assert_eq!(record.raw_line, line);
        assert_eq!(record.message, "payload {not json}");
    }

    #[test]
    fn test_json_with_unrelated_prefix_wins_over_prefix_text() {
        let record = classify(r#"INFO [t1] {"level":"ERROR"}"#, 1);
        assert_eq!(record.level.as_deref(), Some("ERROR"));
        assert!(record.structured_payload.is_some());
    }

    #[test]
    fn test_json_prefix_fills_absent_fields_only() {
        let line =
            r#"10:15:02.123 [http-nio-1] WARN com.app.Api :: OrderService: ORD01 {"status":201,"level":"error"}"#;
        let (stage, _) = run_cascade(line);
        assert_eq!(stage, Stage::Structured);

        let record = classify(line, 1);
        // Structured wins where present.
        assert_eq!(record.level.as_deref(), Some("ERROR"));
        assert_eq!(record.status_code, Some(201));
        // Prefix fills the rest.
        assert_eq!(record.thread.as_deref(), Some("http-nio-1"));
        assert_eq!(record.logger.as_deref(), Some("com.app.Api"));
        assert_eq!(record.service_name.as_deref(), Some("OrderService"));
        assert_eq!(record.endpoint.as_deref(), Some("/ORD01"));
        assert_eq!(record.method.as_deref(), Some("POST"));
        assert_eq!(record.message, "");
    }

    #[test]
    fn test_json_prefix_level_used_when_structured_lacks_it() {
        let record = classify(
            r#"10:15:02.123 [worker-2] DEBUG com.app.Job :: tick {"message":"ok"}"#,
            1,
        );
        assert_eq!(record.level.as_deref(), Some("DEBUG"));
        assert_eq!(record.message, "ok");
    }

    // -------------------------------------------------------------------------
    // Framework-style lines
    // -------------------------------------------------------------------------

    #[test]
    fn test_framework_controller_line() {
        let record = classify(
            "10:15:02.123 [http-nio-1] WARN com.app.Svc :: BackendInvoiceCntr: ABC123 Response Code: 404",
            1,
        );
        assert_eq!(record.thread.as_deref(), Some("http-nio-1"));
        assert_eq!(record.level.as_deref(), Some("WARN"));
        assert_eq!(record.logger.as_deref(), Some("com.app.Svc"));
        assert_eq!(record.controller_name.as_deref(), Some("BackendInvoiceCntr"));
        assert_eq!(record.service_name.as_deref(), Some("BackendInvoiceCntr"));
        assert_eq!(record.endpoint.as_deref(), Some("/ABC123"));
        assert_eq!(record.status_code, Some(404));
        assert_eq!(record.method.as_deref(), Some("POST"));

        let ts = record.timestamp.expect("framework time should parse");
        assert_eq!(ts.date(), Local::now().date_naive());
        assert_eq!(ts.format("%H:%M:%S%.3f").to_string(), "10:15:02.123");
    }

    #[test]
    fn test_framework_lifecycle_marker() {
        let record = classify(
            "10:15:03.000 [http-nio-2] INFO com.app.Flow :: === /XYZ START ===",
            1,
        );
        assert_eq!(record.operation_type, Some(OperationType::Start));
        assert_eq!(record.endpoint.as_deref(), Some("/XYZ"));
        assert_eq!(record.message, "START - /XYZ");
    }

    #[test]
    fn test_framework_lifecycle_overrides_controller_endpoint() {
        let record = classify(
            "10:15:03.000 [exec-1] INFO c.a.F :: PayController: AAA1 ==== /BBB2 STOP done",
            1,
        );
        assert_eq!(record.controller_name.as_deref(), Some("PayController"));
        assert_eq!(record.endpoint.as_deref(), Some("/BBB2"));
        assert_eq!(record.operation_type, Some(OperationType::Stop));
        assert_eq!(record.message, "STOP - /BBB2");
    }

    #[test]
    fn test_framework_sentinel_remap() {
        let record = classify(
            "10:15:04.500 [exec-3] ERROR com.app.Gw :: call failed RSLT_CD[719] RSLT_MSG[Not found]",
            1,
        );
        assert_eq!(record.status_code, Some(404));
    }

    #[test]
    fn test_framework_status_pattern_order() {
        // `Response Code` is checked before `status`, regardless of position.
        let record = classify(
            "10:15:04.500 [exec-3] INFO com.app.Gw :: status=500 then Response Code: 201",
            1,
        );
        assert_eq!(record.status_code, Some(201));
    }

    #[test]
    fn test_framework_explicit_method_and_latency() {
        let record = classify(
            "10:15:05.010 [http-nio-9] info com.app.Api :: GET /USERS took 38.5 milliseconds",
            1,
        );
        assert_eq!(record.level.as_deref(), Some("INFO"));
        assert_eq!(record.method.as_deref(), Some("GET"));
        assert_eq!(record.endpoint.as_deref(), Some("/USERS"));
        assert_eq!(record.response_time, Some(38.5));
    }

    #[test]
    fn test_framework_without_endpoint_has_no_method() {
        let record = classify(
            "10:15:05.010 [main] INFO com.app.Boot :: application started",
            1,
        );
        assert!(record.endpoint.is_none());
        assert!(record.method.is_none());
        assert_eq!(record.message, "application started");
    }

    #[test]
    fn test_framework_requires_double_colon() {
        let (stage, _) = run_cascade("10:15:05.010 [main] INFO com.app.Boot : started");
        assert_eq!(stage, Stage::Generic);
    }

    #[test]
    fn test_framework_invalid_time_still_matches() {
        let record = classify("99:99:99.999 [main] INFO com.app.Boot :: up", 1);
        assert_eq!(record.thread.as_deref(), Some("main"));
        assert!(record.timestamp.is_none());
    }

    #[test]
    fn test_classify_is_deterministic() {
        let line = r#"10:15:02.123 [t] INFO a.b :: X {"status":200}"#;
        assert_eq!(classify(line, 4), classify(line, 4));
    }
}
