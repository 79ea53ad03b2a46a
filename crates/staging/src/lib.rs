//! # Staging
//!
//! Fast local staging store for samples awaiting transfer.
//!
//! Responsibilities:
//! - Append fixed-width sample records at the end of the log
//! - Sequential chunked reads from an independent read cursor
//! - Rewind and truncate after a successful drain
//! - Enforce a byte capacity (appends past it are short writes)
//!
//! ## Usage Example
//!
//! ```ignore
//! use staging::{create_staging_log, MemoryStagingLog};
//! use contracts::StagingLog;
//!
//! let mut log = MemoryStagingLog::new(64 * 1024);
//! log.append(&sample.to_le_bytes())?;
//! log.rewind()?;
//! let n = log.read(&mut chunk)?;
//! ```

mod file;
mod memory;

pub use contracts::StagingLog;
pub use file::FileStagingLog;
pub use memory::MemoryStagingLog;

use contracts::{LoggerError, StagingBackend, StagingConfig};
use tracing::info;

/// Build the staging backend selected by configuration
///
/// The file backend is recreated empty: staged data never survives a restart.
pub fn create_staging_log(config: &StagingConfig) -> Result<Box<dyn StagingLog>, LoggerError> {
    let capacity = config.effective_capacity();
    let log: Box<dyn StagingLog> = match config.backend {
        StagingBackend::Memory => Box::new(MemoryStagingLog::new(capacity)),
        StagingBackend::File => {
            let path = config.path.as_ref().ok_or_else(|| {
                LoggerError::config_validation("staging.path", "file staging backend requires path")
            })?;
            Box::new(FileStagingLog::create(path, capacity)?)
        }
    };

    info!(backend = ?config.backend, capacity, "Staging store ready");
    Ok(log)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_create_memory_backend() {
        let config = StagingConfig {
            capacity_bytes: 64,
            ..Default::default()
        };
        let mut log = create_staging_log(&config).unwrap();
        assert_eq!(log.append(&[1, 2, 3, 4, 5, 6]).unwrap(), 6);
        assert_eq!(log.len(), 6);
    }

    #[test]
    fn test_create_file_backend() {
        let dir = tempdir().unwrap();
        let config = StagingConfig {
            backend: StagingBackend::File,
            path: Some(dir.path().join("ram").join("data.txt")),
            ..Default::default()
        };
        let log = create_staging_log(&config).unwrap();
        assert!(log.is_empty());
        assert!(dir.path().join("ram").join("data.txt").exists());
    }

    #[test]
    fn test_file_backend_without_path_fails() {
        let config = StagingConfig {
            backend: StagingBackend::File,
            ..Default::default()
        };
        assert!(matches!(
            create_staging_log(&config),
            Err(LoggerError::ConfigValidation { .. })
        ));
    }
}
