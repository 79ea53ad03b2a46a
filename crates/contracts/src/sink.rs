//! TransferSink trait - removable storage target
//!
//! Defines the abstract interface the drain writes through.

use crate::LoggerError;

/// Removable storage target
///
/// All calls are blocking and run on the controller's main loop.
pub trait TransferSink: Send {
    /// Open file handle
    type Handle;

    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Mount the device's filesystem
    ///
    /// # Errors
    /// Returns [`LoggerError::Mount`] when the device is absent or unusable.
    fn mount(&mut self) -> Result<(), LoggerError>;

    /// Unmount the device's filesystem
    fn unmount(&mut self) -> Result<(), LoggerError>;

    /// Create (or truncate) `file_name` and open it for writing
    fn open_write(&mut self, file_name: &str) -> Result<Self::Handle, LoggerError>;

    /// Write bytes, returning the number actually written
    fn write(&mut self, handle: &mut Self::Handle, bytes: &[u8]) -> Result<usize, LoggerError>;

    /// Flush and close a handle
    fn close(&mut self, handle: Self::Handle) -> Result<(), LoggerError>;
}
