//! Refresh metrics
//!
//! Atomic counters updated once per refresh cycle.
//! Snapshots are taken for logging.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Instant, SystemTime};

/// Refresh cycle counters
///
/// Thread-safe; shared via `Arc` between the scheduler and callers.
pub struct RefreshMetrics {
    /// Cycles started (including skipped ones)
    cycles: AtomicU64,
    /// Cycles that rendered a row
    rendered: AtomicU64,
    /// Cycles whose payload produced an empty row
    empty: AtomicU64,
    /// Fetch-or-parse failures
    failures: AtomicU64,
    /// Cycles skipped because the page has no ticker
    skipped: AtomicU64,
    /// Items shown by the last rendered cycle
    last_item_count: AtomicU64,
    /// Last rendered cycle (Unix millis, 0 = never)
    last_success_time: AtomicU64,
    /// Start time for uptime calculation
    start_time: Instant,
}

/// Metrics snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsSnapshot {
    pub cycles: u64,
    pub rendered: u64,
    pub empty: u64,
    pub failures: u64,
    pub skipped: u64,
    pub last_item_count: u64,
    pub last_success_ms: Option<u64>,
    pub uptime_seconds: u64,
}

impl MetricsSnapshot {
    /// Share of attempted cycles that failed, 0.0 when none attempted
    pub fn failure_ratio(&self) -> f64 {
        let attempted = self.cycles.saturating_sub(self.skipped);
        if attempted == 0 {
            0.0
        } else {
            self.failures as f64 / attempted as f64
        }
    }
}

impl RefreshMetrics {
    pub fn new() -> Self {
        Self {
            cycles: AtomicU64::new(0),
            rendered: AtomicU64::new(0),
            empty: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            skipped: AtomicU64::new(0),
            last_item_count: AtomicU64::new(0),
            last_success_time: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    #[inline]
    pub fn record_cycle(&self) {
        self.cycles.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_rendered(&self, items: usize) {
        self.rendered.fetch_add(1, Ordering::Relaxed);
        self.last_item_count.store(items as u64, Ordering::Relaxed);
        self.last_success_time.store(unix_millis(), Ordering::Relaxed);
    }

    #[inline]
    pub fn record_empty(&self) {
        self.empty.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let last = self.last_success_time.load(Ordering::Relaxed);
        MetricsSnapshot {
            cycles: self.cycles.load(Ordering::Relaxed),
            rendered: self.rendered.load(Ordering::Relaxed),
            empty: self.empty.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            last_item_count: self.last_item_count.load(Ordering::Relaxed),
            last_success_ms: (last != 0).then_some(last),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for RefreshMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
