//! Scheduler metrics collection

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Outcome of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TickReport {
    /// Pairs in the snapshot, including skipped ones
    pub pairs: usize,
    /// Signal frames handed to the sink
    pub signals: usize,
    /// Error frames handed to the sink
    pub errors: usize,
    /// Pairs skipped because no strategy has that name
    pub unknown_strategies: usize,
    /// Frames the sink refused, usually because the client left mid-tick
    pub undelivered: usize,
}

/// Point-in-time copy of [`SchedulerMetrics`], as served on `/status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub ticks: u64,
    pub evaluations: u64,
    pub signals: u64,
    pub errors: u64,
    pub unknown_strategies: u64,
    pub undelivered: u64,
    pub uptime_secs: u64,
}

/// Thread-safe running totals across ticks
#[derive(Debug)]
pub struct SchedulerMetrics {
    start_time: Instant,
    ticks: AtomicU64,
    evaluations: AtomicU64,
    signals: AtomicU64,
    errors: AtomicU64,
    unknown_strategies: AtomicU64,
    undelivered: AtomicU64,
}

impl SchedulerMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            ticks: AtomicU64::new(0),
            evaluations: AtomicU64::new(0),
            signals: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            unknown_strategies: AtomicU64::new(0),
            undelivered: AtomicU64::new(0),
        }
    }

    pub fn record_tick(&self, report: &TickReport) {
        let evaluated = report.pairs.saturating_sub(report.unknown_strategies);

        self.ticks.fetch_add(1, Ordering::Relaxed);
        self.evaluations.fetch_add(evaluated as u64, Ordering::Relaxed);
        self.signals.fetch_add(report.signals as u64, Ordering::Relaxed);
        self.errors.fetch_add(report.errors as u64, Ordering::Relaxed);
        self.unknown_strategies
            .fetch_add(report.unknown_strategies as u64, Ordering::Relaxed);
        self.undelivered
            .fetch_add(report.undelivered as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            ticks: self.ticks.load(Ordering::Relaxed),
            evaluations: self.evaluations.load(Ordering::Relaxed),
            signals: self.signals.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            unknown_strategies: self.unknown_strategies.load(Ordering::Relaxed),
            undelivered: self.undelivered.load(Ordering::Relaxed),
            uptime_secs: self.uptime().as_secs(),
        }
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl Default for SchedulerMetrics {
    fn default() -> Self {
        Self::new()
    }
}
