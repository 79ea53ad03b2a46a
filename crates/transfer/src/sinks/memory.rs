//! MemorySink - in-memory removable device, records every call
//!
//! Used by tests and dry runs. Device presence and failures can be scripted.

use std::collections::HashMap;
use std::sync::Arc;

use contracts::{LoggerError, StorageOp, TransferSink};
use tracing::debug;

use crate::metrics::TransferMetrics;

/// Handle to a file on a [`MemorySink`]
#[derive(Debug)]
pub struct MemoryHandle {
    file_name: String,
}

/// Sink that keeps written files in memory
pub struct MemorySink {
    name: String,
    present: bool,
    mounted: bool,
    files: HashMap<String, Vec<u8>>,
    write_sizes: Vec<usize>,
    mounts: u32,
    unmounts: u32,
    opens: u32,
    closes: u32,
    max_write: Option<usize>,
    fail_write_at: Option<usize>,
    metrics: Arc<TransferMetrics>,
}

impl MemorySink {
    /// Create a sink with the device present
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            present: true,
            mounted: false,
            files: HashMap::new(),
            write_sizes: Vec::new(),
            mounts: 0,
            unmounts: 0,
            opens: 0,
            closes: 0,
            max_write: None,
            fail_write_at: None,
            metrics: Arc::new(TransferMetrics::new()),
        }
    }

    /// Simulate plugging / unplugging the device
    pub fn set_present(&mut self, present: bool) {
        self.present = present;
        if !present {
            self.mounted = false;
        }
    }

    /// Accept at most `max` bytes per write call (short writes beyond that)
    pub fn with_max_write(mut self, max: usize) -> Self {
        self.max_write = Some(max);
        self
    }

    /// Fail the write call with the given zero-based index
    pub fn with_failing_write(mut self, index: usize) -> Self {
        self.fail_write_at = Some(index);
        self
    }

    /// Contents of a written file
    pub fn file(&self, file_name: &str) -> Option<&[u8]> {
        self.files.get(file_name).map(Vec::as_slice)
    }

    /// Size of every write call, in order
    pub fn write_sizes(&self) -> &[usize] {
        &self.write_sizes
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn mounts(&self) -> u32 {
        self.mounts
    }

    pub fn unmounts(&self) -> u32 {
        self.unmounts
    }

    pub fn opens(&self) -> u32 {
        self.opens
    }

    pub fn closes(&self) -> u32 {
        self.closes
    }

    pub fn metrics(&self) -> &Arc<TransferMetrics> {
        &self.metrics
    }

    fn require_mounted(&self, op: StorageOp) -> Result<(), LoggerError> {
        if !self.present {
            self.metrics.inc_failure_count();
            return Err(LoggerError::storage(op, "device removed"));
        }
        if !self.mounted {
            self.metrics.inc_failure_count();
            return Err(LoggerError::storage(op, "device not mounted"));
        }
        Ok(())
    }
}

impl TransferSink for MemorySink {
    type Handle = MemoryHandle;

    fn name(&self) -> &str {
        &self.name
    }

    fn mount(&mut self) -> Result<(), LoggerError> {
        if !self.present {
            self.metrics.inc_failure_count();
            return Err(LoggerError::mount("device not present"));
        }
        self.mounted = true;
        self.mounts += 1;
        Ok(())
    }

    fn unmount(&mut self) -> Result<(), LoggerError> {
        self.unmounts += 1;
        self.mounted = false;
        Ok(())
    }

    fn open_write(&mut self, file_name: &str) -> Result<MemoryHandle, LoggerError> {
        self.require_mounted(StorageOp::Open)?;
        self.files.insert(file_name.to_string(), Vec::new());
        self.opens += 1;
        self.metrics.inc_files_opened();
        debug!(sink = %self.name, file_name, "memory target opened");
        Ok(MemoryHandle {
            file_name: file_name.to_string(),
        })
    }

    fn write(&mut self, handle: &mut MemoryHandle, bytes: &[u8]) -> Result<usize, LoggerError> {
        self.require_mounted(StorageOp::Write)?;
        if self.fail_write_at == Some(self.write_sizes.len()) {
            self.metrics.inc_failure_count();
            return Err(LoggerError::storage(StorageOp::Write, "injected write failure"));
        }

        let n = self.max_write.map_or(bytes.len(), |max| max.min(bytes.len()));
        self.files
            .entry(handle.file_name.clone())
            .or_default()
            .extend_from_slice(&bytes[..n]);
        self.write_sizes.push(n);
        self.metrics.record_write(n);
        Ok(n)
    }

    fn close(&mut self, handle: MemoryHandle) -> Result<(), LoggerError> {
        self.require_mounted(StorageOp::Close)?;
        self.closes += 1;
        self.metrics.inc_files_closed();
        debug!(sink = %self.name, file_name = %handle.file_name, "memory target closed");
        Ok(())
    }
}
