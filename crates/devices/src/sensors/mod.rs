//! Motion sensor sources

mod mock;
mod replay;

pub use mock::{MockAccelerometer, MockSensorConfig};
pub use replay::ReplaySensor;
