//! # Transfer
//!
//! Removable storage targets for the drain.
//!
//! Responsibilities:
//! - Mount / unmount the removable device
//! - Create the target file and accept chunked sequential writes
//! - Count opens, writes, bytes and failures per sink

pub mod metrics;
pub mod sinks;

pub use contracts::TransferSink;
pub use metrics::{MetricsSnapshot, TransferMetrics};
pub use sinks::{DirectorySink, MemoryHandle, MemorySink, SinkFile};
