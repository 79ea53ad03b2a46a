//! Pipeline orchestrator - wires the controller to its collaborators.
//!
//! The controller runs on a blocking worker thread; the cadence timer runs
//! as a tokio task and the mount watcher on its own thread. Both reach the
//! controller only through its handle.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use acquisition::{AcquisitionController, CadenceTimer, ControllerConfig, StepOutcome};
use anyhow::{Context, Result};
use contracts::{DeviceMonitor, LoggerBlueprint, LoggerError, SensorSource, StagingLog, TransferSink};
use devices::{LogIndicator, MountWatcher};
use observability::DrainMetricsAggregator;
use tracing::{info, warn};
use transfer::DirectorySink;

use super::PipelineStats;
use crate::error::CliError;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// The logger blueprint configuration
    pub blueprint: LoggerBlueprint,

    /// Stop after this many completed drains (None = unlimited)
    pub max_drains: Option<u64>,

    /// Run timeout (None = no timeout)
    pub timeout: Option<Duration>,

    /// Sleep between idle steps
    pub poll_interval: Duration,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

/// What the worker thread hands back
struct LoopOutcome {
    stats: acquisition::ControllerStats,
    pending_bytes: usize,
    drain_metrics: DrainMetricsAggregator,
    fault: Option<LoggerError>,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run until `shutdown` resolves, the timeout expires, the drain limit
    /// is reached or the controller halts
    pub async fn run<F>(self, shutdown: F) -> Result<PipelineStats>
    where
        F: Future<Output = ()>,
    {
        let start_time = Instant::now();
        let blueprint = &self.config.blueprint;

        // Initialize Metrics (optional)
        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        let sensor = devices::create_sensor(&blueprint.sensor).context("Failed to create sensor")?;
        let staging = staging::create_staging_log(&blueprint.staging)
            .context("Failed to create staging store")?;
        let sink = DirectorySink::from_config("removable", &blueprint.transfer);
        let transfer_metrics = sink.metrics().clone();

        let controller = AcquisitionController::new(
            ControllerConfig::from_blueprint(blueprint),
            sensor,
            staging,
            sink,
            Box::new(LogIndicator::new("transfer")),
            Box::new(LogIndicator::new("fault")),
        );

        info!(
            sensor = %blueprint.sensor.name,
            mount_point = %blueprint.transfer.mount_point.display(),
            sample_interval_ms = blueprint.cadence.sample_interval().as_millis() as u64,
            chunk_capacity = blueprint.transfer.chunk_capacity,
            "Controller configured"
        );

        // Callbacks
        let timer = Arc::new(CadenceTimer::new(
            controller.handle(),
            blueprint.cadence.ticks_per_sample,
        ));
        let ticker = timer.spawn(blueprint.cadence.tick_period());

        let monitor = MountWatcher::new(
            &blueprint.transfer.mount_point,
            blueprint.device.poll_interval(),
        );
        monitor.listen(controller.handle().device_callback());

        // Main loop
        let stop = Arc::new(AtomicBool::new(false));
        let mut worker = {
            let stop = stop.clone();
            let max_drains = self.config.max_drains;
            let poll_interval = self.config.poll_interval;
            tokio::task::spawn_blocking(move || {
                run_loop(controller, &stop, max_drains, poll_interval)
            })
        };

        info!(max_drains = ?self.config.max_drains, "Acquisition running");

        let timeout = self.config.timeout;
        let finished = tokio::select! {
            joined = &mut worker => Some(joined),
            _ = shutdown => {
                warn!("Received shutdown signal, stopping acquisition...");
                None
            }
            _ = sleep_or_forever(timeout) => {
                warn!(timeout_secs = ?timeout.map(|t| t.as_secs()), "Run timed out");
                None
            }
        };
        let joined = match finished {
            Some(joined) => joined,
            None => {
                stop.store(true, Ordering::SeqCst);
                worker.await
            }
        };

        // Shutdown
        ticker.abort();
        monitor.stop();

        let outcome = joined.map_err(|e| CliError::worker(e.to_string()))?;

        let stats = PipelineStats {
            controller: outcome.stats,
            pending_bytes: outcome.pending_bytes,
            transfer: transfer_metrics.snapshot(),
            drain_metrics: outcome.drain_metrics,
            duration: start_time.elapsed(),
            fault: outcome.fault,
        };

        info!(
            duration_secs = stats.duration.as_secs_f64(),
            samples = stats.controller.samples_taken,
            drains = stats.controller.drains_completed,
            "Acquisition shutdown complete"
        );

        Ok(stats)
    }
}

/// Step the controller until stopped, halted or the drain limit is reached
fn run_loop<S, L, T>(
    mut controller: AcquisitionController<S, L, T>,
    stop: &AtomicBool,
    max_drains: Option<u64>,
    poll_interval: Duration,
) -> LoopOutcome
where
    S: SensorSource,
    L: StagingLog,
    T: TransferSink,
{
    let mut drain_metrics = DrainMetricsAggregator::new();
    let mut fault = None;

    while !stop.load(Ordering::Relaxed) {
        match controller.step() {
            Ok(StepOutcome::Idle) => thread::sleep(poll_interval),
            Ok(StepOutcome::Drained(report)) => {
                drain_metrics.update(&report);
                if let Some(max) = max_drains {
                    if controller.stats().drains_completed >= max {
                        info!(drains = max, "Reached max drains limit");
                        break;
                    }
                }
            }
            Ok(StepOutcome::DrainAborted(report)) => drain_metrics.update(&report),
            Ok(_) => {}
            Err(e) => {
                fault = Some(e);
                break;
            }
        }
    }

    LoopOutcome {
        stats: controller.stats(),
        pending_bytes: controller.pending(),
        drain_metrics,
        fault,
    }
}

async fn sleep_or_forever(timeout: Option<Duration>) {
    match timeout {
        Some(duration) => tokio::time::sleep(duration).await,
        None => std::future::pending().await,
    }
}
