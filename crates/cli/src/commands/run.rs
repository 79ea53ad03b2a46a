//! `run` command implementation.

use anyhow::{Context, Result};
use std::time::Duration;
use tracing::info;

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Execute the `run` command
pub async fn run_pipeline(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    // Validate config path
    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()).into());
    }

    // Load and parse configuration
    let mut blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Apply CLI overrides
    if let Some(ref mount_point) = args.mount_point {
        info!(mount_point = %mount_point.display(), "Overriding mount point from CLI");
        blueprint.transfer.mount_point = mount_point.clone();
    }
    config_loader::ConfigLoader::validate(&blueprint)
        .context("Invalid configuration after CLI overrides")?;

    info!(
        sensor = %blueprint.sensor.name,
        kind = ?blueprint.sensor.kind,
        staging = ?blueprint.staging.backend,
        mount_point = %blueprint.transfer.mount_point.display(),
        "Configuration loaded"
    );

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&blueprint);
        return Ok(());
    }

    let pipeline_config = PipelineConfig {
        blueprint,
        max_drains: if args.max_drains == 0 {
            None
        } else {
            Some(args.max_drains)
        },
        timeout: if args.timeout == 0 {
            None
        } else {
            Some(Duration::from_secs(args.timeout))
        },
        poll_interval: Duration::from_millis(args.poll_ms.max(1)),
        metrics_port: if args.metrics_port == 0 {
            None
        } else {
            Some(args.metrics_port)
        },
    };

    info!("Starting acquisition...");

    let mut stats = Pipeline::new(pipeline_config)
        .run(shutdown_signal())
        .await
        .context("Acquisition failed to start")?;

    stats.print_summary();

    if let Some(fault) = stats.fault.take() {
        return Err(CliError::controller_halted(fault).into());
    }

    info!(
        samples = stats.controller.samples_taken,
        drains = stats.controller.drains_completed,
        bytes = stats.controller.bytes_transferred,
        "Motion Logger finished"
    );
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
///
/// If a handler cannot be installed that source never resolves.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print configuration summary for dry-run mode
fn print_config_summary(blueprint: &contracts::LoggerBlueprint) {
    println!("\n=== Configuration Summary ===\n");
    println!("Cadence:");
    println!(
        "  {} ticks x {} ms = one sample every {} ms",
        blueprint.cadence.ticks_per_sample,
        blueprint.cadence.tick_period_ms,
        blueprint.cadence.sample_interval().as_millis()
    );
    println!("\nSensor:");
    println!("  {} ({:?})", blueprint.sensor.name, blueprint.sensor.kind);
    println!("\nStaging:");
    println!(
        "  {:?}, {} bytes, overflow {:?}",
        blueprint.staging.backend,
        blueprint.staging.effective_capacity(),
        blueprint.staging.overflow
    );
    println!("\nTransfer:");
    println!(
        "  {} -> {} in chunks of {} bytes",
        blueprint.transfer.mount_point.display(),
        blueprint.transfer.target_file,
        blueprint.transfer.chunk_capacity
    );
    println!();
}
