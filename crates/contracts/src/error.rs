//! Layered error definitions
//!
//! Categorized by source: config / sensor / storage / device

use std::fmt;

use thiserror::Error;

/// Storage operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOp {
    Append,
    Read,
    Rewind,
    Truncate,
    Open,
    Write,
    Close,
}

impl fmt::Display for StorageOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageOp::Append => "append",
            StorageOp::Read => "read",
            StorageOp::Rewind => "rewind",
            StorageOp::Truncate => "truncate",
            StorageOp::Open => "open",
            StorageOp::Write => "write",
            StorageOp::Close => "close",
        };
        f.write_str(name)
    }
}

/// Unified error type
#[derive(Debug, Error)]
pub enum LoggerError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Sensor Errors =====
    /// Sensor read failed or returned a partial reading
    #[error("sensor read error: {message}")]
    SensorRead { message: String },

    // ===== Storage Errors =====
    /// Staging or transfer storage operation failed
    #[error("storage {op} error: {message}")]
    StorageIo { op: StorageOp, message: String },

    /// Removable device could not be mounted
    #[error("mount error: {message}")]
    Mount { message: String },

    /// Staging store reached its capacity
    #[error("staging store full: pending={pending}, capacity={capacity}")]
    StagingFull { pending: usize, capacity: usize },

    // ===== Controller Errors =====
    /// Controller halted after an earlier fatal error
    #[error("controller halted after a fatal error")]
    Halted,

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl LoggerError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create sensor read error
    pub fn sensor_read(message: impl Into<String>) -> Self {
        Self::SensorRead {
            message: message.into(),
        }
    }

    /// Create storage error for the given operation
    pub fn storage(op: StorageOp, message: impl Into<String>) -> Self {
        Self::StorageIo {
            op,
            message: message.into(),
        }
    }

    /// Create short transfer error (fewer bytes than requested)
    pub fn short_transfer(op: StorageOp, expected: usize, actual: usize) -> Self {
        Self::storage(op, format!("short {op}: expected {expected} bytes, got {actual}"))
    }

    /// Create mount error
    pub fn mount(message: impl Into<String>) -> Self {
        Self::Mount {
            message: message.into(),
        }
    }

    /// Short label used for logging and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConfigParse { .. } | Self::ConfigValidation { .. } => "config",
            Self::SensorRead { .. } => "sensor",
            Self::StorageIo { .. } | Self::Io(_) => "storage",
            Self::Mount { .. } => "mount",
            Self::StagingFull { .. } => "staging_full",
            Self::Halted => "halted",
        }
    }
}
