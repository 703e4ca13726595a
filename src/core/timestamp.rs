// ApiLog - core/timestamp.rs
//
// Shared timestamp normalisation for every classification stage.
// Best-effort only: unparsable input yields None, never an error.

use chrono::{DateTime, Local, NaiveDateTime, NaiveTime};

/// Absolute formats tried after RFC 3339, in order. `%.f` also accepts a
/// missing fraction, so each entry covers both the whole-second and the
/// fractional form.
const ABSOLUTE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%d %H:%M:%S%.fZ",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Absolute formats carrying a numeric UTC offset (`+05:30` or `+0530`).
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Time-of-day formats. Always combined with the processing date.
const TIME_ONLY_FORMATS: &[&str] = &["%H:%M:%S%.f"];

/// Normalise a raw timestamp string.
///
/// Strategy:
///   1. RFC 3339 / ISO 8601 with `Z` or an offset.
///   2. Numeric-offset variants chrono's RFC 3339 parser rejects.
///   3. Zone-less absolute date-times (`T` or space separated).
///   4. Time-of-day only, placed on the current local date.
///
/// Zoned stamps keep the wall-clock time written in the log; the offset is
/// dropped rather than converted.
pub fn normalize_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(trimmed, format) {
            return Some(dt.naive_local());
        }
    }

    for format in ABSOLUTE_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(ndt);
        }
    }

    for format in TIME_ONLY_FORMATS {
        if let Ok(time) = NaiveTime::parse_from_str(trimmed, format) {
            return Some(on_processing_date(time));
        }
    }

    tracing::trace!(raw = trimmed, "Unparsable timestamp");
    None
}

/// Place a time of day on the current local date.
///
/// Logs that only record the time lose their own date; the processing date
/// stands in for it.
pub fn on_processing_date(time: NaiveTime) -> NaiveDateTime {
    Local::now().date_naive().and_time(time)
}
