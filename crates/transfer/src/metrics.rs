//! Sink metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for a single transfer sink
#[derive(Debug, Default)]
pub struct TransferMetrics {
    /// Files opened for writing
    files_opened: AtomicU64,
    /// Files closed successfully
    files_closed: AtomicU64,
    /// Total write calls
    write_count: AtomicU64,
    /// Total bytes written
    bytes_written: AtomicU64,
    /// Total failed operations
    failure_count: AtomicU64,
}

impl TransferMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_files_opened(&self) {
        self.files_opened.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_files_closed(&self) {
        self.files_closed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one write call of `bytes` bytes
    pub fn record_write(&self, bytes: usize) {
        self.write_count.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn write_count(&self) -> u64 {
        self.write_count.load(Ordering::Relaxed)
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written.load(Ordering::Relaxed)
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            files_opened: self.files_opened.load(Ordering::Relaxed),
            files_closed: self.files_closed.load(Ordering::Relaxed),
            write_count: self.write_count(),
            bytes_written: self.bytes_written(),
            failure_count: self.failure_count.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of sink metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub files_opened: u64,
    pub files_closed: u64,
    pub write_count: u64,
    pub bytes_written: u64,
    pub failure_count: u64,
}
