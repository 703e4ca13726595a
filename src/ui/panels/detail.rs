// ApiLog - ui/panels/detail.rs
//
// Entry detail panel: every field of one record, the embedded JSON payload
// pretty-printed, and the raw line.

use crate::core::model::LogRecord;
use crate::ui::theme::{level_tone, status_tone, Theme, Tone};
use crate::util::constants::NOT_AVAILABLE;
use serde_json::Value;

/// Render the detail panel for one record.
pub fn render(record: &LogRecord, theme: &Theme) -> String {
    let or_na = |value: Option<String>| value.unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let fields = [
        ("Line Number", Some(record.line_number().to_string()), Tone::Plain),
        (
            "Timestamp",
            record
                .timestamp
                .map(|ts| ts.format("%Y-%m-%d %H:%M:%S%.3f").to_string()),
            Tone::Plain,
        ),
        ("Level", record.level.clone(), level_tone(record.level.as_deref())),
        ("Thread", record.thread.clone(), Tone::Plain),
        ("Logger", record.logger.clone(), Tone::Plain),
        ("Service", record.service_name.clone(), Tone::Plain),
        ("Method", record.method.clone(), Tone::Plain),
        ("Endpoint", record.endpoint.clone(), Tone::Plain),
        (
            "Status Code",
            record.status_code.map(|c| c.to_string()),
            status_tone(record.status_code),
        ),
        (
            "Response Time",
            record.response_time.map(|ms| format!("{ms} ms")),
            Tone::Plain,
        ),
    ];

    let mut out = theme.heading(&format!("Entry #{}", record.line_number()));
    out.push('\n');
    for (label, value, tone) in fields {
        out.push_str(&format!(
            "{} {}\n",
            theme.paint(&format!("{label}:"), Tone::Cyan),
            theme.paint(&or_na(value), tone)
        ));
    }

    out.push_str(&format!(
        "\n{}\n{}\n",
        theme.paint("Message:", Tone::Cyan),
        record.message
    ));

    // Keys print in the order the line carried them.
    if let Some(payload) = &record.structured_payload {
        let pretty = format!("{:#}", Value::Object(payload.clone()));
        out.push_str(&format!(
            "\n{}\n{}\n",
            theme.heading("JSON Data"),
            theme.paint(&pretty, Tone::Green)
        ));
    }

    out.push_str(&format!("\n{}\n{}\n", theme.heading("Raw Line"), record.raw_line));
    out
}
