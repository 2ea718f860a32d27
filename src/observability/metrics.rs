//! Metrics registry for the rule store
//!
//! Counters only, monotonic, reset on process start. Thread-safe via
//! atomics with Relaxed ordering (exactness per read is not required).

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters for the rule store
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Rules created
    rules_created: AtomicU64,
    /// Rules updated (partial update)
    rules_updated: AtomicU64,
    /// Rules deleted
    rules_deleted: AtomicU64,
    /// Rules whose enabled flag was toggled
    rules_toggled: AtomicU64,
    /// Rules written by bulk import (creates + overwrites)
    rules_imported: AtomicU64,
    /// Bulk import entries rejected (missing fields, bad id, duplicate)
    import_entries_rejected: AtomicU64,
    /// Records skipped on read (parse failure or id/filename mismatch)
    records_skipped: AtomicU64,
    /// List operations served
    lists_served: AtomicU64,
    /// Get operations served
    gets_served: AtomicU64,
}

/// Point-in-time copy of all counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub rules_created: u64,
    pub rules_updated: u64,
    pub rules_deleted: u64,
    pub rules_toggled: u64,
    pub rules_imported: u64,
    pub import_entries_rejected: u64,
    pub records_skipped: u64,
    pub lists_served: u64,
    pub gets_served: u64,
}

impl MetricsRegistry {
    /// Create a new registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_rules_created(&self) {
        self.rules_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rules_updated(&self) {
        self.rules_updated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rules_deleted(&self) {
        self.rules_deleted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rules_toggled(&self) {
        self.rules_toggled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rules_imported(&self) {
        self.rules_imported.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_import_entries_rejected(&self) {
        self.import_entries_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Bumped whenever the read side drops a record instead of failing.
    /// A growing value means rule files are corrupt or misnamed on disk.
    pub fn increment_records_skipped(&self) {
        self.records_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_lists_served(&self) {
        self.lists_served.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_gets_served(&self) {
        self.gets_served.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of records dropped by the permissive read side so far
    pub fn records_skipped(&self) -> u64 {
        self.records_skipped.load(Ordering::Relaxed)
    }

    /// Take a consistent-enough snapshot of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            rules_created: self.rules_created.load(Ordering::Relaxed),
            rules_updated: self.rules_updated.load(Ordering::Relaxed),
            rules_deleted: self.rules_deleted.load(Ordering::Relaxed),
            rules_toggled: self.rules_toggled.load(Ordering::Relaxed),
            rules_imported: self.rules_imported.load(Ordering::Relaxed),
            import_entries_rejected: self.import_entries_rejected.load(Ordering::Relaxed),
            records_skipped: self.records_skipped.load(Ordering::Relaxed),
            lists_served: self.lists_served.load(Ordering::Relaxed),
            gets_served: self.gets_served.load(Ordering::Relaxed),
        }
    }
}
