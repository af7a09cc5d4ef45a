//! Metrics collection for cycle monitoring
//!
//! Lock-free counters using atomic operations.
//! Updated by the extraction engine, exported via `/api/status`.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::core::FeedStatus;

/// Extraction cycle metrics collector
pub struct MetricsCollector {
    /// Cycles run (scheduled and manual)
    cycles: AtomicU64,
    /// Cycles ending in `success`
    successes: AtomicU64,
    /// Cycles ending in `connection_error`
    connection_errors: AtomicU64,
    /// Cycles ending in `no_table_found` or `no_data_found`
    empty_cycles: AtomicU64,
    /// Cycles ending in `error`
    errors: AtomicU64,
    /// Wall time of the last cycle (millis)
    last_cycle_ms: AtomicU64,
    /// Start time for uptime calculation
    start_time: Instant,
}

/// Metrics snapshot for API export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub cycles: u64,
    pub successes: u64,
    pub connection_errors: u64,
    pub empty_cycles: u64,
    pub errors: u64,
    pub last_cycle_ms: u64,
    pub uptime_seconds: u64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            cycles: AtomicU64::new(0),
            successes: AtomicU64::new(0),
            connection_errors: AtomicU64::new(0),
            empty_cycles: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            last_cycle_ms: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a finished cycle and how long it took
    pub fn record_cycle(&self, status: FeedStatus, elapsed: Duration) {
        self.cycles.fetch_add(1, Ordering::Relaxed);
        self.last_cycle_ms
            .store(elapsed.as_millis() as u64, Ordering::Relaxed);

        let counter = match status {
            FeedStatus::Success => &self.successes,
            FeedStatus::ConnectionError => &self.connection_errors,
            FeedStatus::NoTableFound | FeedStatus::NoDataFound => &self.empty_cycles,
            FeedStatus::Error => &self.errors,
            FeedStatus::Initializing => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current snapshot of metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            cycles: self.cycles.load(Ordering::Relaxed),
            successes: self.successes.load(Ordering::Relaxed),
            connection_errors: self.connection_errors.load(Ordering::Relaxed),
            empty_cycles: self.empty_cycles.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            last_cycle_ms: self.last_cycle_ms.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
