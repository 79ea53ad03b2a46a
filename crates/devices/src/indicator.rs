//! Indicator implementations
//!
//! - `LogIndicator`: emits a tracing event on every change
//! - `RecordingIndicator`: exposes its state through a shared probe

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use contracts::Indicator;
use tracing::info;

/// Indicator backed by the log
#[derive(Debug)]
pub struct LogIndicator {
    name: String,
    lit: bool,
}

impl LogIndicator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lit: false,
        }
    }
}

impl Indicator for LogIndicator {
    fn on(&mut self) {
        if !self.lit {
            self.lit = true;
            info!(indicator = %self.name, "indicator on");
        }
    }

    fn off(&mut self) {
        if self.lit {
            self.lit = false;
            info!(indicator = %self.name, "indicator off");
        }
    }

    fn is_on(&self) -> bool {
        self.lit
    }
}

/// Shared view of a `RecordingIndicator`
///
/// Stays readable after the indicator itself has been boxed and handed over.
#[derive(Debug, Clone, Default)]
pub struct IndicatorProbe {
    lit: Arc<AtomicBool>,
    switched_on: Arc<AtomicU32>,
}

impl IndicatorProbe {
    pub fn is_on(&self) -> bool {
        self.lit.load(Ordering::SeqCst)
    }

    /// Number of off -> on transitions
    pub fn times_switched_on(&self) -> u32 {
        self.switched_on.load(Ordering::SeqCst)
    }
}

/// Indicator that records its state for inspection
#[derive(Debug, Default)]
pub struct RecordingIndicator {
    probe: IndicatorProbe,
}

impl RecordingIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn probe(&self) -> IndicatorProbe {
        self.probe.clone()
    }
}

impl Indicator for RecordingIndicator {
    fn on(&mut self) {
        if !self.probe.lit.swap(true, Ordering::SeqCst) {
            self.probe.switched_on.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn off(&mut self) {
        self.probe.lit.store(false, Ordering::SeqCst);
    }

    fn is_on(&self) -> bool {
        self.probe.is_on()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_indicator_probe() {
        let mut led = RecordingIndicator::new();
        let probe = led.probe();

        led.on();
        led.on();
        assert!(probe.is_on());
        assert_eq!(probe.times_switched_on(), 1);

        led.off();
        led.on();
        assert_eq!(probe.times_switched_on(), 2);
        led.off();
        assert!(!led.is_on());
    }

    #[test]
    fn test_log_indicator_state() {
        let mut led = LogIndicator::new("transfer");
        assert!(!led.is_on());
        led.on();
        assert!(led.is_on());
        led.off();
        assert!(!led.is_on());
    }
}
