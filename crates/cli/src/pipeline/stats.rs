//! Pipeline statistics and metrics.

use std::time::Duration;

use acquisition::ControllerStats;
use contracts::LoggerError;
use observability::DrainMetricsAggregator;
use transfer::MetricsSnapshot;

/// Statistics from an acquisition run
#[derive(Debug, Default)]
pub struct PipelineStats {
    /// Controller counters
    pub controller: ControllerStats,

    /// Bytes still staged when the run ended
    pub pending_bytes: usize,

    /// Removable device sink counters
    pub transfer: MetricsSnapshot,

    /// Drain metrics aggregator
    pub drain_metrics: DrainMetricsAggregator,

    /// Total duration of the run
    pub duration: Duration,

    /// Fatal error that halted the controller
    pub fault: Option<LoggerError>,
}

impl PipelineStats {
    /// Samples staged per second
    pub fn sample_rate(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.controller.samples_taken as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Dropped samples as percentage of all due samples
    pub fn drop_rate(&self) -> f64 {
        let total = self.controller.samples_taken + self.controller.samples_dropped;
        if total > 0 {
            (self.controller.samples_dropped as f64 / total as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                  Motion Logger Statistics                    ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        println!("📊 Overview");
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Samples staged: {}", self.controller.samples_taken);
        println!(
            "   ├─ Samples dropped: {} ({:.2}%)",
            self.controller.samples_dropped,
            self.drop_rate()
        );
        println!("   ├─ Sample rate: {:.2}/s", self.sample_rate());
        println!("   ├─ Devices released: {}", self.controller.devices_released);
        println!("   └─ Pending bytes: {}", self.pending_bytes);

        println!("\n💾 Removable Device");
        println!("   ├─ Files opened: {}", self.transfer.files_opened);
        println!("   ├─ Files closed: {}", self.transfer.files_closed);
        println!("   ├─ Write calls: {}", self.transfer.write_count);
        println!("   ├─ Bytes written: {}", self.transfer.bytes_written);
        println!("   └─ Failures: {}", self.transfer.failure_count);

        println!("\n{}", self.drain_metrics.summary());

        if let Some(ref fault) = self.fault {
            println!("⛔ Halted: {}", fault);
        }

        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates() {
        let stats = PipelineStats {
            controller: ControllerStats {
                samples_taken: 30,
                samples_dropped: 10,
                ..Default::default()
            },
            duration: Duration::from_secs(10),
            ..Default::default()
        };
        assert_eq!(stats.sample_rate(), 3.0);
        assert_eq!(stats.drop_rate(), 25.0);
    }

    #[test]
    fn test_rates_empty_run() {
        let stats = PipelineStats::default();
        assert_eq!(stats.sample_rate(), 0.0);
        assert_eq!(stats.drop_rate(), 0.0);
    }
}
