// ApiLog - core/filter.rs
//
// Composable filter engine for log records.
// All set predicates are AND-combined and always evaluated against the
// full record set.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::model::LogRecord;

/// Predicates for one filter call. `None` (or an empty string) is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPredicates {
    /// Case-insensitive exact match against the record level.
    pub level: Option<String>,

    /// Case-insensitive exact match against the HTTP method.
    pub method: Option<String>,

    /// Exact match against the status code.
    pub status_code: Option<u32>,

    /// Case-insensitive substring of the thread name.
    pub thread: Option<String>,

    /// Case-insensitive substring of the service name.
    pub service: Option<String>,

    /// Case-insensitive substring of the raw line.
    pub search: Option<String>,
}

impl FilterPredicates {
    /// Returns true if no predicate is active.
    pub fn is_empty(&self) -> bool {
        self.applied().is_empty()
    }

    /// Layer `newer` over `self`: predicates set in `newer` replace the same
    /// predicate in `self`, all others are kept.
    pub fn merged_with(&self, newer: FilterPredicates) -> FilterPredicates {
        FilterPredicates {
            level: active(newer.level).or_else(|| self.level.clone()),
            method: active(newer.method).or_else(|| self.method.clone()),
            status_code: newer.status_code.or(self.status_code),
            thread: active(newer.thread).or_else(|| self.thread.clone()),
            service: active(newer.service).or_else(|| self.service.clone()),
            search: active(newer.search).or_else(|| self.search.clone()),
        }
    }

    /// Applied predicates as `(name, value)` pairs in the fixed order
    /// level, method, status, thread, service, search.
    pub fn applied(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        if let Some(level) = non_empty(&self.level) {
            out.push(("level", level.to_string()));
        }
        if let Some(method) = non_empty(&self.method) {
            out.push(("method", method.to_string()));
        }
        if let Some(code) = self.status_code {
            out.push(("status_code", code.to_string()));
        }
        if let Some(thread) = non_empty(&self.thread) {
            out.push(("thread", thread.to_string()));
        }
        if let Some(service) = non_empty(&self.service) {
            out.push(("service", service.to_string()));
        }
        if let Some(search) = non_empty(&self.search) {
            out.push(("search", search.to_string()));
        }
        out
    }

    /// Informational summary, e.g. `level=ERROR | method=GET`.
    pub fn summary(&self) -> String {
        self.applied()
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// Apply predicates to the full record set, returning indices of matching
/// records in their original order.
///
/// Returns indices rather than copies so the view can be rebuilt or
/// re-rendered without cloning records.
pub fn apply_filters(records: &[LogRecord], predicates: &FilterPredicates) -> Vec<usize> {
    if predicates.is_empty() {
        return (0..records.len()).collect();
    }

    let lowered = Lowered::from(predicates);

    records
        .iter()
        .enumerate()
        .filter(|(_, record)| matches_all(record, predicates, &lowered))
        .map(|(idx, _)| idx)
        .collect()
}

/// Predicate strings case-folded once per filter call.
struct Lowered {
    level: Option<String>,
    method: Option<String>,
    thread: Option<String>,
    service: Option<String>,
    search: Option<String>,
}

impl From<&FilterPredicates> for Lowered {
    fn from(p: &FilterPredicates) -> Self {
        Self {
            level: non_empty(&p.level).map(str::to_uppercase),
            method: non_empty(&p.method).map(str::to_uppercase),
            thread: non_empty(&p.thread).map(str::to_lowercase),
            service: non_empty(&p.service).map(str::to_lowercase),
            search: non_empty(&p.search).map(str::to_lowercase),
        }
    }
}

/// Check if a single record matches all active predicates.
fn matches_all(record: &LogRecord, predicates: &FilterPredicates, lowered: &Lowered) -> bool {
    if let Some(ref level) = lowered.level {
        if !equals_folded(record.level.as_deref(), level) {
            return false;
        }
    }

    if let Some(ref method) = lowered.method {
        if !equals_folded(record.method.as_deref(), method) {
            return false;
        }
    }

    if let Some(code) = predicates.status_code {
        if record.status_code != Some(code) {
            return false;
        }
    }

    if let Some(ref thread) = lowered.thread {
        if !contains_folded(record.thread.as_deref(), thread) {
            return false;
        }
    }

    if let Some(ref service) = lowered.service {
        if !contains_folded(record.service_name.as_deref(), service) {
            return false;
        }
    }

    if let Some(ref search) = lowered.search {
        if !record.raw_line.to_lowercase().contains(search.as_str()) {
            return false;
        }
    }

    true
}

fn equals_folded(field: Option<&str>, upper: &str) -> bool {
    field.is_some_and(|value| value.to_uppercase() == upper)
}

fn contains_folded(field: Option<&str>, lower: &str) -> bool {
    field.is_some_and(|value| value.to_lowercase().contains(lower))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn active(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
