//! Per-provider success/failure counters.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// Running counters for one provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HealthRecord {
    pub success_count: u64,
    pub failure_count: u64,
    pub last_failure: Option<DateTime<Utc>>,
}

/// Additive health bookkeeping shared by concurrent `analyze` calls.
///
/// Counters are never reset or evicted. Updates go through a mutex so
/// concurrent increments on the same provider are not lost.
#[derive(Debug, Default)]
pub struct HealthTracker {
    records: Mutex<BTreeMap<String, HealthRecord>>,
}

impl HealthTracker {
    /// Create a tracker with one zeroed record per provider name.
    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let records = names
            .into_iter()
            .map(|name| (name.to_string(), HealthRecord::default()))
            .collect();
        Self {
            records: Mutex::new(records),
        }
    }

    pub fn record_success(&self, name: &str) {
        self.lock().entry(name.to_string()).or_default().success_count += 1;
    }

    pub fn record_failure(&self, name: &str) {
        let mut records = self.lock();
        let record = records.entry(name.to_string()).or_default();
        record.failure_count += 1;
        record.last_failure = Some(Utc::now());
    }

    /// Copy of every record, keyed by provider name.
    pub fn snapshot(&self) -> BTreeMap<String, HealthRecord> {
        self.lock().clone()
    }

    // A panic while holding the lock cannot leave a counter half-written.
    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, HealthRecord>> {
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_initialized_zeroed() {
        let tracker = HealthTracker::new(["a", "b"]);
        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot["a"], HealthRecord::default());
        assert!(snapshot["b"].last_failure.is_none());
    }

    #[test]
    fn test_record_success_and_failure() {
        let tracker = HealthTracker::new(["a"]);
        tracker.record_success("a");
        tracker.record_failure("a");
        tracker.record_failure("a");

        let record = &tracker.snapshot()["a"];
        assert_eq!(record.success_count, 1);
        assert_eq!(record.failure_count, 2);
        assert!(record.last_failure.is_some());
    }

    #[test]
    fn test_concurrent_increments_not_lost() {
        let tracker = Arc::new(HealthTracker::new(["a"]));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let tracker = tracker.clone();
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        tracker.record_failure("a");
                        tracker.record_success("a");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let record = &tracker.snapshot()["a"];
        assert_eq!(record.failure_count, 4000);
        assert_eq!(record.success_count, 4000);
    }
}
