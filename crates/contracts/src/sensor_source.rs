//! SensorSource trait - motion sensor abstraction
//!
//! Decouples the controller from concrete sensors so that hardware,
//! mock and replay sources share one synchronous API.

use crate::{LoggerError, Sample};

/// 3-axis motion sensor
///
/// A read must be effectively instantaneous relative to the cadence interval.
pub trait SensorSource: Send {
    /// Sensor name (used for logging)
    fn name(&self) -> &str;

    /// Read one sample
    ///
    /// # Errors
    /// Returns [`LoggerError::SensorRead`] on a failed or partial reading.
    fn read(&mut self) -> Result<Sample, LoggerError>;
}

impl<S: SensorSource + ?Sized> SensorSource for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn read(&mut self) -> Result<Sample, LoggerError> {
        (**self).read()
    }
}
