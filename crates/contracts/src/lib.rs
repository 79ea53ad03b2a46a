//! # Contracts
//!
//! Frozen interface contracts shared by every crate of the logger.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Data Model
//! - A [`Sample`] is three `i16` axes, staged as 6 little-endian bytes
//! - The staging store and the transfer target hold identical byte streams
//! - [`ControllerState`] is the only state written from asynchronous callbacks

mod blueprint;
mod device_monitor;
mod error;
mod indicator;
mod report;
mod sample;
mod sensor_source;
mod sink;
mod staging;
mod state;

pub use blueprint::*;
pub use device_monitor::{DeviceEventCallback, DeviceMonitor};
pub use error::*;
pub use indicator::Indicator;
pub use report::{DrainReport, DrainStatus};
pub use sample::{Sample, SAMPLE_WIDTH};
pub use sensor_source::SensorSource;
pub use sink::TransferSink;
pub use staging::StagingLog;
pub use state::*;
