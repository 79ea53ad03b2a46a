//! DirectorySink - writes the drained stream under a removable device's mount point

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use contracts::{LoggerError, StorageOp, TransferConfig, TransferSink};
use tracing::{debug, error, info, instrument};

use crate::metrics::TransferMetrics;

/// Open target file on the mounted device
#[derive(Debug)]
pub struct SinkFile {
    file: File,
    path: PathBuf,
}

impl SinkFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Sink that writes to a mounted directory
///
/// The mount point appearing as a writable directory plays the role of the
/// mass-storage stack reporting a usable volume.
pub struct DirectorySink {
    name: String,
    mount_point: PathBuf,
    mounted: bool,
    metrics: Arc<TransferMetrics>,
}

impl DirectorySink {
    /// Create a new DirectorySink (not yet mounted)
    pub fn new(name: impl Into<String>, mount_point: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            mount_point: mount_point.into(),
            mounted: false,
            metrics: Arc::new(TransferMetrics::new()),
        }
    }

    /// Create from transfer configuration
    pub fn from_config(name: impl Into<String>, config: &TransferConfig) -> Self {
        Self::new(name, config.mount_point.clone())
    }

    pub fn mount_point(&self) -> &Path {
        &self.mount_point
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Shared metrics handle
    pub fn metrics(&self) -> &Arc<TransferMetrics> {
        &self.metrics
    }

    fn fail(&self, op: StorageOp, e: io::Error) -> LoggerError {
        self.metrics.inc_failure_count();
        error!(sink = %self.name, %op, error = %e, "Sink operation failed");
        LoggerError::storage(op, e.to_string())
    }
}

impl TransferSink for DirectorySink {
    type Handle = SinkFile;

    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "directory_sink_mount", skip(self), fields(sink = %self.name))]
    fn mount(&mut self) -> Result<(), LoggerError> {
        let meta = fs::metadata(&self.mount_point).map_err(|e| {
            self.metrics.inc_failure_count();
            LoggerError::mount(format!(
                "device not present at {}: {e}",
                self.mount_point.display()
            ))
        })?;

        if !meta.is_dir() {
            return Err(LoggerError::mount(format!(
                "{} is not a directory",
                self.mount_point.display()
            )));
        }
        if meta.permissions().readonly() {
            return Err(LoggerError::mount(format!(
                "{} is read-only",
                self.mount_point.display()
            )));
        }

        self.mounted = true;
        info!(mount_point = %self.mount_point.display(), "Device mounted");
        Ok(())
    }

    #[instrument(name = "directory_sink_unmount", skip(self), fields(sink = %self.name))]
    fn unmount(&mut self) -> Result<(), LoggerError> {
        if self.mounted {
            self.mounted = false;
            info!(mount_point = %self.mount_point.display(), "Device unmounted");
        }
        Ok(())
    }

    #[instrument(name = "directory_sink_open", skip(self), fields(sink = %self.name))]
    fn open_write(&mut self, file_name: &str) -> Result<SinkFile, LoggerError> {
        if !self.mounted {
            return Err(LoggerError::storage(StorageOp::Open, "device not mounted"));
        }

        let path = self.mount_point.join(file_name);
        let file = File::create(&path).map_err(|e| self.fail(StorageOp::Open, e))?;
        self.metrics.inc_files_opened();
        debug!(path = %path.display(), "Target file opened");
        Ok(SinkFile { file, path })
    }

    fn write(&mut self, handle: &mut SinkFile, bytes: &[u8]) -> Result<usize, LoggerError> {
        let written = handle
            .file
            .write(bytes)
            .map_err(|e| self.fail(StorageOp::Write, e))?;
        self.metrics.record_write(written);
        Ok(written)
    }

    #[instrument(name = "directory_sink_close", skip(self, handle), fields(sink = %self.name))]
    fn close(&mut self, handle: SinkFile) -> Result<(), LoggerError> {
        handle
            .file
            .sync_all()
            .map_err(|e| self.fail(StorageOp::Close, e))?;
        self.metrics.inc_files_closed();
        debug!(path = %handle.path.display(), "Target file closed");
        Ok(())
    }
}
