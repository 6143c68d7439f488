//! Validation counters
//!
//! - Counters only
//! - Monotonic increase
//! - Thread-safe, Relaxed ordering

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for validation outcomes
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Records that passed validation
    records_validated: AtomicU64,
    /// Records rejected
    records_rejected: AtomicU64,
    /// Field violations across all rejected records
    violations_reported: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one record that passed validation
    pub fn increment_validated(&self) {
        self.records_validated.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one rejected record and its violations
    pub fn increment_rejected(&self, violations: u64) {
        self.records_rejected.fetch_add(1, Ordering::Relaxed);
        self.violations_reported.fetch_add(violations, Ordering::Relaxed);
    }

    /// Take a point-in-time copy of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            records_validated: self.records_validated.load(Ordering::Relaxed),
            records_rejected: self.records_rejected.load(Ordering::Relaxed),
            violations_reported: self.violations_reported.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MetricsSnapshot {
    pub records_validated: u64,
    pub records_rejected: u64,
    pub violations_reported: u64,
}

impl MetricsSnapshot {
    /// Total records seen
    pub fn records_seen(&self) -> u64 {
        self.records_validated + self.records_rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_counters_start_at_zero() {
        assert_eq!(MetricsRegistry::new().snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_increment() {
        let metrics = MetricsRegistry::new();
        metrics.increment_validated();
        metrics.increment_rejected(3);
        metrics.increment_rejected(1);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.records_validated, 1);
        assert_eq!(snapshot.records_rejected, 2);
        assert_eq!(snapshot.violations_reported, 4);
        assert_eq!(snapshot.records_seen(), 3);
    }

    #[test]
    fn test_concurrent_increments() {
        let metrics = Arc::new(MetricsRegistry::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let metrics = Arc::clone(&metrics);
                thread::spawn(move || {
                    for _ in 0..250 {
                        metrics.increment_validated();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(metrics.snapshot().records_validated, 1000);
    }
}
