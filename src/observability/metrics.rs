//! Scan counters
//!
//! Counters only, monotonic, reset when the owning scan is created.

use std::sync::atomic::{AtomicU64, Ordering};

/// Per-scan counters
#[derive(Debug, Default)]
pub struct ScanMetrics {
    catalog_rows: AtomicU64,
    files_opened: AtomicU64,
    files_skipped: AtomicU64,
    lines_read: AtomicU64,
    rows_returned: AtomicU64,
    rows_rejected: AtomicU64,
}

/// Point-in-time copy of [`ScanMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    /// Rows fetched from the catalog cursor
    pub catalog_rows: u64,
    /// Files successfully opened
    pub files_opened: u64,
    /// Catalog entries or files skipped because of data errors
    pub files_skipped: u64,
    /// Scan lines loaded into buffers
    pub lines_read: u64,
    /// Rows handed to the host
    pub rows_returned: u64,
    /// Samples rejected by the in-process geometry recheck
    pub rows_rejected: u64,
}

impl ScanMetrics {
    /// Creates a registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_catalog_rows(&self) {
        self.catalog_rows.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_files_opened(&self) {
        self.files_opened.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_files_skipped(&self) {
        self.files_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_lines_read(&self) {
        self.lines_read.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rows_returned(&self) {
        self.rows_returned.fetch_add(1, Ordering::Relaxed);
    }

    /// Adds the number of samples the geometry recheck dropped from a line
    pub fn add_rows_rejected(&self, count: u64) {
        self.rows_rejected.fetch_add(count, Ordering::Relaxed);
    }

    /// Takes a snapshot of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            catalog_rows: self.catalog_rows.load(Ordering::Relaxed),
            files_opened: self.files_opened.load(Ordering::Relaxed),
            files_skipped: self.files_skipped.load(Ordering::Relaxed),
            lines_read: self.lines_read.load(Ordering::Relaxed),
            rows_returned: self.rows_returned.load(Ordering::Relaxed),
            rows_rejected: self.rows_rejected.load(Ordering::Relaxed),
        }
    }
}
