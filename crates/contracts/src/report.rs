//! DrainReport - AcquisitionController output
//!
//! Outcome of one drain pass, consumed by observability and the CLI summary.

use serde::{Deserialize, Serialize};

/// How a drain pass ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrainStatus {
    /// All pending bytes copied, staging store truncated
    Completed,
    /// Device detached mid-drain, pending bytes kept for the next attach
    Aborted,
}

impl DrainStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DrainStatus::Completed => "completed",
            DrainStatus::Aborted => "aborted",
        }
    }
}

/// Drain pass summary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrainReport {
    /// Pending bytes when the drain started
    pub pending_at_start: usize,

    /// Bytes written to the transfer sink
    pub bytes_transferred: usize,

    /// Number of sink write calls
    pub write_calls: u32,

    /// Wall time spent in the drain (milliseconds)
    pub duration_ms: f64,

    /// Completion status
    pub status: DrainStatus,
}

impl DrainReport {
    /// Start a report for a drain of `pending` bytes
    pub fn begin(pending: usize) -> Self {
        Self {
            pending_at_start: pending,
            bytes_transferred: 0,
            write_calls: 0,
            duration_ms: 0.0,
            status: DrainStatus::Completed,
        }
    }

    /// Record one chunk written
    pub fn record_chunk(&mut self, len: usize) {
        self.bytes_transferred += len;
        self.write_calls += 1;
    }

    pub fn is_completed(&self) -> bool {
        self.status == DrainStatus::Completed
    }
}
