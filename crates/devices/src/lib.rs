//! # Devices
//!
//! Host-side implementations of the logger's hardware collaborators.
//!
//! Responsibilities:
//! - Motion sensors (`SensorSource`): mock waveform and file replay
//! - Removable device notifications (`DeviceMonitor`): mount-point watcher and scripted events
//! - Status lights (`Indicator`): tracing-backed and recording
//! - Build the configured sensor from `SensorConfig`

pub mod factory;
pub mod indicator;
pub mod monitors;
pub mod sensors;

pub use contracts::{DeviceMonitor, Indicator, SensorSource};
pub use factory::create_sensor;
pub use indicator::{IndicatorProbe, LogIndicator, RecordingIndicator};
pub use monitors::{MountWatcher, ScriptedMonitor};
pub use sensors::{MockAccelerometer, MockSensorConfig, ReplaySensor};
