//! StagingLog trait - fast local append-only store

use crate::LoggerError;

/// Append-only byte log with an independent read cursor
///
/// Appends always land at the end of the log; `rewind` and `read` move only
/// the read cursor.
pub trait StagingLog: Send {
    /// Append bytes at the end of the log
    ///
    /// Returns the number of bytes actually written.
    fn append(&mut self, bytes: &[u8]) -> Result<usize, LoggerError>;

    /// Move the read cursor back to the start
    fn rewind(&mut self) -> Result<(), LoggerError>;

    /// Read up to `buf.len()` bytes from the read cursor
    ///
    /// Returns the number of bytes read; 0 means end of log.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, LoggerError>;

    /// Drop everything from the read cursor onwards
    fn truncate(&mut self) -> Result<(), LoggerError>;

    /// Bytes currently stored
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<L: StagingLog + ?Sized> StagingLog for Box<L> {
    fn append(&mut self, bytes: &[u8]) -> Result<usize, LoggerError> {
        (**self).append(bytes)
    }

    fn rewind(&mut self) -> Result<(), LoggerError> {
        (**self).rewind()
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, LoggerError> {
        (**self).read(buf)
    }

    fn truncate(&mut self) -> Result<(), LoggerError> {
        (**self).truncate()
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}
