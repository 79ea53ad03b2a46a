//! Sensor factory
//!
//! Builds the configured `SensorSource` from `SensorConfig`.

use contracts::{LoggerError, SensorConfig, SensorKind, SensorSource};
use tracing::{info, instrument};

use crate::sensors::{MockAccelerometer, MockSensorConfig, ReplaySensor};

/// Create the sensor described by `config`
#[instrument(name = "create_sensor", skip(config), fields(sensor = %config.name, kind = ?config.kind))]
pub fn create_sensor(config: &SensorConfig) -> Result<Box<dyn SensorSource>, LoggerError> {
    let sensor: Box<dyn SensorSource> = match config.kind {
        SensorKind::Mock => Box::new(MockAccelerometer::new(
            config.name.clone(),
            MockSensorConfig {
                amplitude: config.amplitude,
                fail_after: config.fail_after,
                ..Default::default()
            },
        )),
        SensorKind::Replay => {
            let path = config.replay_path.as_deref().ok_or_else(|| {
                LoggerError::config_validation("sensor.replay_path", "required for replay sensor")
            })?;
            Box::new(ReplaySensor::load(
                config.name.clone(),
                path,
                config.loop_playback,
            )?)
        }
    };

    info!("Sensor created");
    Ok(sensor)
}
