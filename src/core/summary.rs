// ApiLog - core/summary.rs
//
// Aggregate statistics over a view of records.
// Core layer: the file size is supplied by the caller.

use crate::core::model::LogRecord;
use crate::util::constants::SUMMARY_TOP_N;
use std::collections::HashMap;
use std::hash::Hash;

/// One histogram bucket: label and occurrence count.
pub type Bucket = (String, usize);

/// Statistics for the summary panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub total_count: usize,
    pub file_size_bytes: u64,
    /// Top levels by count, descending.
    pub levels: Vec<Bucket>,
    /// Every method seen, sorted by name.
    pub methods: Vec<Bucket>,
    /// Top status codes by count, descending.
    pub statuses: Vec<(u32, usize)>,
    /// Top thread groups (text before the first `-`), descending.
    pub thread_groups: Vec<Bucket>,
    /// Top services by count, descending.
    pub services: Vec<Bucket>,
}

/// Summarise a view. Absent fields are not counted.
pub fn summarize<'a, I>(view: I, file_size_bytes: u64) -> Summary
where
    I: IntoIterator<Item = &'a LogRecord>,
{
    let mut total_count = 0;
    let mut levels = Counter::default();
    let mut methods = Counter::default();
    let mut statuses: Counter<u32> = Counter::default();
    let mut thread_groups = Counter::default();
    let mut services = Counter::default();

    for record in view {
        total_count += 1;
        if let Some(level) = &record.level {
            levels.add(level.clone());
        }
        if let Some(method) = &record.method {
            methods.add(method.clone());
        }
        if let Some(code) = record.status_code {
            statuses.add(code);
        }
        if let Some(thread) = &record.thread {
            thread_groups.add(thread_group(thread).to_string());
        }
        if let Some(service) = &record.service_name {
            services.add(service.clone());
        }
    }

    let mut methods = methods.into_buckets();
    methods.sort_by(|a, b| a.0.cmp(&b.0));

    Summary {
        total_count,
        file_size_bytes,
        levels: levels.top(SUMMARY_TOP_N),
        methods,
        statuses: statuses.top(SUMMARY_TOP_N),
        thread_groups: thread_groups.top(SUMMARY_TOP_N),
        services: services.top(SUMMARY_TOP_N),
    }
}

/// Thread pool name: everything before the first `-`.
pub fn thread_group(thread: &str) -> &str {
    thread.split('-').next().unwrap_or(thread)
}

/// Insertion-ordered occurrence counter. The index maps a key to its bucket,
/// so counting is linear in the records and ties keep first-seen order.
struct Counter<K> {
    buckets: Vec<(K, usize)>,
    index: HashMap<K, usize>,
}

impl<K> Default for Counter<K> {
    fn default() -> Self {
        Self {
            buckets: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> Counter<K> {
    fn add(&mut self, key: K) {
        match self.index.get(&key) {
            Some(&slot) => self.buckets[slot].1 += 1,
            None => {
                self.index.insert(key.clone(), self.buckets.len());
                self.buckets.push((key, 1));
            }
        }
    }

    fn into_buckets(self) -> Vec<(K, usize)> {
        self.buckets
    }

    /// Highest `n` counts. Stable sort, so ties stay in first-seen order.
    fn top(self, n: usize) -> Vec<(K, usize)> {
        let mut buckets = self.buckets;
        buckets.sort_by(|a, b| b.1.cmp(&a.1));
        buckets.truncate(n);
        buckets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::classifier::classify;

    fn records(lines: &[&str]) -> Vec<LogRecord> {
        lines
            .iter()
            .enumerate()
            .map(|(i, line)| classify(line, i as u64 + 1))
            .collect()
    }

    #[test]
    fn test_empty_view() {
        let summary = summarize(&Vec::<LogRecord>::new(), 0);
        assert_eq!(summary.total_count, 0);
        assert!(summary.levels.is_empty());
        assert!(summary.methods.is_empty());
    }

    #[test]
    fn test_level_and_status_histograms() {
        let recs = records(&[
            "INFO GET /a 200 1ms",
            "ERROR GET /b 500 1ms",
            "INFO POST /c 201 1ms",
            "INFO GET /d 200 1ms",
        ]);
        let summary = summarize(&recs, 2048);
        assert_eq!(summary.total_count, 4);
        assert_eq!(summary.file_size_bytes, 2048);
        assert_eq!(
            summary.levels,
            vec![("INFO".to_string(), 3), ("ERROR".to_string(), 1)]
        );
        assert_eq!(summary.statuses, vec![(200, 2), (500, 1), (201, 1)]);
    }

    #[test]
    fn test_methods_sorted_by_name() {
        let recs = records(&[
            "PUT /x 200",
            "GET /y 200",
            "GET /z 200",
            "DELETE /w 204",
        ]);
        let summary = summarize(&recs, 0);
        assert_eq!(
            summary.methods,
            vec![
                ("DELETE".to_string(), 1),
                ("GET".to_string(), 2),
                ("PUT".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_thread_groups_and_services() {
        let recs = records(&[
            "10:00:00.000 [http-nio-1] INFO a.B :: PayCntr: P1 ok",
            "10:00:00.001 [http-nio-2] INFO a.B :: PayCntr: P2 ok",
            "10:00:00.002 [scheduler] INFO a.B :: tick",
        ]);
        let summary = summarize(&recs, 0);
        assert_eq!(
            summary.thread_groups,
            vec![("http".to_string(), 2), ("scheduler".to_string(), 1)]
        );
        assert_eq!(summary.services, vec![("PayCntr".to_string(), 2)]);
    }

    #[test]
    fn test_top_n_is_capped() {
        let lines: Vec<String> = (0..8).map(|i| format!("GET /x 20{i}")).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let summary = summarize(&records(&refs), 0);
        assert_eq!(summary.statuses.len(), SUMMARY_TOP_N);
        // Equal counts keep first-seen order.
        assert_eq!(summary.statuses[0], (200, 1));
    }

    #[test]
    fn test_counter_with_many_distinct_keys() {
        let mut counter = Counter::default();
        for i in 0..10_000 {
            counter.add(format!("Svc{i}Cntr"));
        }
        counter.add("Svc9999Cntr".to_string());
        counter.add("Svc42Cntr".to_string());
        counter.add("Svc9999Cntr".to_string());

        let top = counter.top(3);
        assert_eq!(
            top,
            vec![
                ("Svc9999Cntr".to_string(), 3),
                ("Svc42Cntr".to_string(), 2),
                ("Svc0Cntr".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_thread_group_without_dash() {
        assert_eq!(thread_group("main"), "main");
        assert_eq!(thread_group("pool-3-thread-1"), "pool");
    }
}
