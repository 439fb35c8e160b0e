//! Metrics hooks for filter operations
//!
//! Provides instrumentation points for monitoring how often keys collide,
//! how many removals are rejected and how many membership bits removals are
//! forced to keep.
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use dlbf::{DeletableFilter, Dlbf, Metrics};
//!
//! let metrics = Arc::new(Metrics::new());
//! let mut filter = Dlbf::new(1024, 8, 16).unwrap().with_metrics(metrics.clone());
//!
//! filter.insert(7).unwrap();
//! filter.remove(7).unwrap();
//!
//! let snapshot = metrics.snapshot();
//! assert_eq!(snapshot.inserts, 1);
//! assert_eq!(snapshot.removes, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics collector for filter operations
///
/// Counters are atomic so one collector can be shared by several filters.
#[derive(Debug, Default)]
pub struct Metrics {
    /// Total filters created
    pub filters_created: AtomicU64,
    /// Bytes currently allocated for filter buffers
    pub bytes_allocated: AtomicU64,
    /// Successful inserts
    pub inserts: AtomicU64,
    /// Inserts rejected because the key was already present
    pub duplicate_inserts: AtomicU64,
    /// Hash slots that landed on an already-set bit during insert
    pub insert_collisions: AtomicU64,
    /// Queries performed
    pub queries: AtomicU64,
    /// Queries that reported membership (possibly false positive)
    pub queries_positive: AtomicU64,
    /// Successful removals
    pub removes: AtomicU64,
    /// Removals rejected because the key was not present
    pub removes_rejected: AtomicU64,
    /// Membership bits kept set by removals in flagged regions
    pub bits_retained: AtomicU64,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record filter creation
    pub fn record_filter_created(&self, buffer_bytes: usize) {
        self.filters_created.fetch_add(1, Ordering::Relaxed);
        self.bytes_allocated.fetch_add(buffer_bytes as u64, Ordering::Relaxed);
    }

    /// Record filter deallocation
    ///
    /// Saturates at zero, so filters still alive across a [`reset`](Self::reset)
    /// cannot wrap the counter when they are dropped.
    pub fn record_filter_freed(&self, buffer_bytes: usize) {
        let _ = self
            .bytes_allocated
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |held| {
                Some(held.saturating_sub(buffer_bytes as u64))
            });
    }

    /// Record a successful insert and its colliding slot count
    pub fn record_insert(&self, collisions: usize) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
        self.insert_collisions.fetch_add(collisions as u64, Ordering::Relaxed);
    }

    /// Record an insert of a key already present
    pub fn record_duplicate_insert(&self) {
        self.duplicate_inserts.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a query
    pub fn record_query(&self, found: bool) {
        self.queries.fetch_add(1, Ordering::Relaxed);
        if found {
            self.queries_positive.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a successful removal and the bits it had to keep
    pub fn record_remove(&self, retained: usize) {
        self.removes.fetch_add(1, Ordering::Relaxed);
        self.bits_retained.fetch_add(retained as u64, Ordering::Relaxed);
    }

    /// Record a removal of a key not present
    pub fn record_remove_rejected(&self) {
        self.removes_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            filters_created: self.filters_created.load(Ordering::Relaxed),
            bytes_allocated: self.bytes_allocated.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            duplicate_inserts: self.duplicate_inserts.load(Ordering::Relaxed),
            insert_collisions: self.insert_collisions.load(Ordering::Relaxed),
            queries: self.queries.load(Ordering::Relaxed),
            queries_positive: self.queries_positive.load(Ordering::Relaxed),
            removes: self.removes.load(Ordering::Relaxed),
            removes_rejected: self.removes_rejected.load(Ordering::Relaxed),
            bits_retained: self.bits_retained.load(Ordering::Relaxed),
        }
    }

    /// Ratio of positive queries to total queries
    ///
    /// Includes both true and false positives.
    pub fn observed_positive_rate(&self) -> f64 {
        let total = self.queries.load(Ordering::Relaxed);
        let positive = self.queries_positive.load(Ordering::Relaxed);
        if total > 0 {
            positive as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        self.filters_created.store(0, Ordering::Relaxed);
        self.bytes_allocated.store(0, Ordering::Relaxed);
        self.inserts.store(0, Ordering::Relaxed);
        self.duplicate_inserts.store(0, Ordering::Relaxed);
        self.insert_collisions.store(0, Ordering::Relaxed);
        self.queries.store(0, Ordering::Relaxed);
        self.queries_positive.store(0, Ordering::Relaxed);
        self.removes.store(0, Ordering::Relaxed);
        self.removes_rejected.store(0, Ordering::Relaxed);
        self.bits_retained.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub filters_created: u64,
    pub bytes_allocated: u64,
    pub inserts: u64,
    pub duplicate_inserts: u64,
    pub insert_collisions: u64,
    pub queries: u64,
    pub queries_positive: u64,
    pub removes: u64,
    pub removes_rejected: u64,
    pub bits_retained: u64,
}

/// Trait for custom metrics recording implementations
///
/// Implement this trait to forward filter events to an external metrics
/// system.
pub trait MetricsRecorder: Send + Sync {
    fn record_filter_created(&self, buffer_bytes: usize);
    fn record_filter_freed(&self, buffer_bytes: usize);
    fn record_insert(&self, collisions: usize);
    fn record_duplicate_insert(&self);
    fn record_query(&self, found: bool);
    fn record_remove(&self, retained: usize);
    fn record_remove_rejected(&self);
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_filter_created(&self, _: usize) {}
    fn record_filter_freed(&self, _: usize) {}
    fn record_insert(&self, _: usize) {}
    fn record_duplicate_insert(&self) {}
    fn record_query(&self, _: bool) {}
    fn record_remove(&self, _: usize) {}
    fn record_remove_rejected(&self) {}
}

impl MetricsRecorder for Metrics {
    fn record_filter_created(&self, buffer_bytes: usize) {
        Metrics::record_filter_created(self, buffer_bytes);
    }

    fn record_filter_freed(&self, buffer_bytes: usize) {
        Metrics::record_filter_freed(self, buffer_bytes);
    }

    fn record_insert(&self, collisions: usize) {
        Metrics::record_insert(self, collisions);
    }

    fn record_duplicate_insert(&self) {
        Metrics::record_duplicate_insert(self);
    }

    fn record_query(&self, found: bool) {
        Metrics::record_query(self, found);
    }

    fn record_remove(&self, retained: usize) {
        Metrics::record_remove(self, retained);
    }

    fn record_remove_rejected(&self) {
        Metrics::record_remove_rejected(self);
    }
}
