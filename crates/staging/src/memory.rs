//! MemoryStagingLog - RAM-disk analogue

use bytes::{Bytes, BytesMut};
use contracts::{LoggerError, StagingLog};
use tracing::{debug, trace};

/// In-memory staging log
///
/// Volatile by nature; contents are lost with the process.
#[derive(Debug)]
pub struct MemoryStagingLog {
    data: BytesMut,
    cursor: usize,
    capacity: usize,
}

impl MemoryStagingLog {
    /// Create an empty log holding at most `capacity` bytes
    pub fn new(capacity: usize) -> Self {
        Self {
            data: BytesMut::with_capacity(capacity.min(64 * 1024)),
            cursor: 0,
            capacity,
        }
    }

    /// Snapshot of the stored bytes
    pub fn contents(&self) -> Bytes {
        Bytes::copy_from_slice(&self.data)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current read cursor position
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl StagingLog for MemoryStagingLog {
    fn append(&mut self, bytes: &[u8]) -> Result<usize, LoggerError> {
        let room = self.capacity.saturating_sub(self.data.len());
        let n = room.min(bytes.len());
        self.data.extend_from_slice(&bytes[..n]);
        trace!(appended = n, len = self.data.len(), "staging append");
        Ok(n)
    }

    fn rewind(&mut self) -> Result<(), LoggerError> {
        self.cursor = 0;
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, LoggerError> {
        let available = self.data.len() - self.cursor;
        let n = available.min(buf.len());
        buf[..n].copy_from_slice(&self.data[self.cursor..self.cursor + n]);
        self.cursor += n;
        Ok(n)
    }

    fn truncate(&mut self) -> Result<(), LoggerError> {
        debug!(from = self.data.len(), to = self.cursor, "staging truncate");
        self.data.truncate(self.cursor);
        Ok(())
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}
