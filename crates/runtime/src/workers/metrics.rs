//! Damage notification metrics.
//!
//! Tracks how many events were queued, dropped on a full queue and consumed,
//! along with queue depth.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by the damage producer and the notifier task.
///
/// Uses atomics for lock-free access across threads.
#[derive(Debug, Default)]
pub struct NotifierMetrics {
    /// Events accepted by the queue
    enqueued: AtomicU64,

    /// Events discarded because the queue was full or closed
    dropped: AtomicU64,

    /// Events turned into reports by the consumer
    processed: AtomicU64,

    /// Events waiting in the queue as of the last update
    queue_depth: AtomicU64,

    /// Peak queue depth observed
    peak_queue_depth: AtomicU64,
}

impl NotifierMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_enqueued(&self) {
        self.enqueued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_processed(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    /// Updates queue depth and tracks peak.
    pub fn set_queue_depth(&self, depth: u64) {
        self.queue_depth.store(depth, Ordering::Relaxed);

        // Update peak using compare-and-swap loop
        let mut current_peak = self.peak_queue_depth.load(Ordering::Relaxed);
        while depth > current_peak {
            match self.peak_queue_depth.compare_exchange_weak(
                current_peak,
                depth,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(actual) => current_peak = actual,
            }
        }
    }

    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    pub fn queue_depth(&self) -> u64 {
        self.queue_depth.load(Ordering::Relaxed)
    }

    pub fn peak_queue_depth(&self) -> u64 {
        self.peak_queue_depth.load(Ordering::Relaxed)
    }

    /// Share of offered events that were dropped, as a percentage (0-100).
    pub fn drop_rate(&self) -> f64 {
        let enqueued = self.enqueued();
        let dropped = self.dropped();
        let total = enqueued + dropped;

        if total == 0 {
            0.0
        } else {
            (dropped as f64 / total as f64) * 100.0
        }
    }

    /// Creates a snapshot of all metrics for display/logging.
    ///
    /// Note: This is not atomic across all fields - individual fields
    /// are read atomically but the snapshot as a whole may be inconsistent
    /// if metrics are being updated concurrently.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            enqueued: self.enqueued(),
            dropped: self.dropped(),
            processed: self.processed(),
            queue_depth: self.queue_depth(),
            peak_queue_depth: self.peak_queue_depth(),
        }
    }
}

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub enqueued: u64,
    pub dropped: u64,
    pub processed: u64,
    pub queue_depth: u64,
    pub peak_queue_depth: u64,
}
