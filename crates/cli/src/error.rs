//! Error types for CLI operations.

use contracts::LoggerError;
use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Controller stopped on a fatal error
    #[error("Controller halted: {source}")]
    ControllerHalted {
        #[source]
        source: LoggerError,
    },

    /// Acquisition worker did not finish cleanly
    #[error("Acquisition worker failed: {message}")]
    Worker { message: String },
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn controller_halted(source: LoggerError) -> Self {
        Self::ControllerHalted { source }
    }

    pub fn worker(message: impl Into<String>) -> Self {
        Self::Worker {
            message: message.into(),
        }
    }
}
