//! Mock accelerometer
//!
//! Implements `SensorSource`, generates a deterministic 3-axis waveform.
//! Used for testing and development without sensor hardware.

use contracts::{LoggerError, Sample, SensorSource};
use tracing::{trace, warn};

/// Resting z-axis reading (1 g in mg)
const GRAVITY_MG: f64 = 1000.0;

/// Mock accelerometer configuration
#[derive(Debug, Clone)]
pub struct MockSensorConfig {
    /// Peak x/y deflection
    pub amplitude: i16,
    /// Reads per full waveform period
    pub period: u32,
    /// Fail every read after this many successful reads
    pub fail_after: Option<u64>,
}

impl Default for MockSensorConfig {
    fn default() -> Self {
        Self {
            amplitude: 1000,
            period: 64,
            fail_after: None,
        }
    }
}

/// Mock accelerometer
///
/// x and y trace a circle of radius `amplitude`, z wobbles around 1 g.
pub struct MockAccelerometer {
    name: String,
    config: MockSensorConfig,
    reads: u64,
}

impl MockAccelerometer {
    /// Create new mock sensor
    pub fn new(name: impl Into<String>, config: MockSensorConfig) -> Self {
        Self {
            name: name.into(),
            config,
            reads: 0,
        }
    }

    /// Create mock sensor with default configuration
    pub fn with_defaults(name: impl Into<String>) -> Self {
        Self::new(name, MockSensorConfig::default())
    }

    /// Successful reads so far
    pub fn reads(&self) -> u64 {
        self.reads
    }

    fn waveform(&self, step: u64) -> Sample {
        let period = self.config.period.max(1) as f64;
        let phase = (step as f64 / period) * std::f64::consts::TAU;
        let amplitude = self.config.amplitude as f64;

        Sample::new(
            (amplitude * phase.sin()).round() as i16,
            (amplitude * phase.cos()).round() as i16,
            (GRAVITY_MG + amplitude * 0.05 * (2.0 * phase).sin()).round() as i16,
        )
    }
}

impl SensorSource for MockAccelerometer {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&mut self) -> Result<Sample, LoggerError> {
        if let Some(limit) = self.config.fail_after {
            if self.reads >= limit {
                warn!(sensor = %self.name, reads = self.reads, "injected sensor failure");
                return Err(LoggerError::sensor_read(format!(
                    "{}: no response after {} reads",
                    self.name, self.reads
                )));
            }
        }

        let sample = self.waveform(self.reads);
        self.reads += 1;
        trace!(sensor = %self.name, x = sample.x, y = sample.y, z = sample.z, "mock sample");
        Ok(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waveform_is_deterministic() {
        let mut a = MockAccelerometer::with_defaults("a");
        let mut b = MockAccelerometer::with_defaults("b");
        for _ in 0..10 {
            assert_eq!(a.read().unwrap(), b.read().unwrap());
        }
    }

    #[test]
    fn test_first_sample_at_rest() {
        let mut sensor = MockAccelerometer::with_defaults("acc");
        let sample = sensor.read().unwrap();
        assert_eq!(sample.x, 0);
        assert_eq!(sample.y, 1000);
        assert_eq!(sample.z, 1000);
    }

    #[test]
    fn test_fail_after_keeps_failing() {
        let mut sensor = MockAccelerometer::new(
            "acc",
            MockSensorConfig {
                fail_after: Some(2),
                ..Default::default()
            },
        );
        assert!(sensor.read().is_ok());
        assert!(sensor.read().is_ok());
        assert!(matches!(sensor.read(), Err(LoggerError::SensorRead { .. })));
        assert!(sensor.read().is_err());
        assert_eq!(sensor.reads(), 2);
    }
}
