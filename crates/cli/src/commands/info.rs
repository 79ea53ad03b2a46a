//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::LoggerBlueprint;
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;
use crate::error::CliError;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    cadence: CadenceInfo,
    sensor: SensorInfo,
    staging: StagingInfo,
    transfer: TransferInfo,
    device_poll_interval_ms: u64,
}

#[derive(Serialize)]
struct CadenceInfo {
    tick_period_ms: u64,
    ticks_per_sample: u32,
    sample_interval_ms: u64,
}

#[derive(Serialize)]
struct SensorInfo {
    name: String,
    kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    replay_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fail_after: Option<u64>,
}

#[derive(Serialize)]
struct StagingInfo {
    backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    capacity_bytes: usize,
    capacity_samples: usize,
    overflow: String,
}

#[derive(Serialize)]
struct TransferInfo {
    mount_point: String,
    target_file: String,
    chunk_capacity: usize,
    device_present: bool,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()).into());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let info = build_config_info(&blueprint);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&blueprint);
    }

    Ok(())
}

fn build_config_info(blueprint: &LoggerBlueprint) -> ConfigInfo {
    let capacity = blueprint.staging.effective_capacity();
    ConfigInfo {
        version: format!("{:?}", blueprint.version),
        cadence: CadenceInfo {
            tick_period_ms: blueprint.cadence.tick_period_ms,
            ticks_per_sample: blueprint.cadence.ticks_per_sample,
            sample_interval_ms: blueprint.cadence.sample_interval().as_millis() as u64,
        },
        sensor: SensorInfo {
            name: blueprint.sensor.name.clone(),
            kind: format!("{:?}", blueprint.sensor.kind),
            replay_path: blueprint
                .sensor
                .replay_path
                .as_ref()
                .map(|p| p.display().to_string()),
            fail_after: blueprint.sensor.fail_after,
        },
        staging: StagingInfo {
            backend: format!("{:?}", blueprint.staging.backend),
            path: blueprint
                .staging
                .path
                .as_ref()
                .map(|p| p.display().to_string()),
            capacity_bytes: capacity,
            capacity_samples: capacity / contracts::SAMPLE_WIDTH,
            overflow: format!("{:?}", blueprint.staging.overflow),
        },
        transfer: TransferInfo {
            mount_point: blueprint.transfer.mount_point.display().to_string(),
            target_file: blueprint.transfer.target_file.clone(),
            chunk_capacity: blueprint.transfer.chunk_capacity,
            device_present: blueprint.transfer.mount_point.is_dir(),
        },
        device_poll_interval_ms: blueprint.device.poll_interval_ms,
    }
}

fn print_config_info(blueprint: &LoggerBlueprint) {
    let info = build_config_info(blueprint);

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║               Motion Logger Configuration                    ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("⏱  Cadence");
    println!("   ├─ Version: {}", info.version);
    println!("   ├─ Tick period: {} ms", info.cadence.tick_period_ms);
    println!("   ├─ Ticks per sample: {}", info.cadence.ticks_per_sample);
    println!("   └─ Sample interval: {} ms", info.cadence.sample_interval_ms);

    println!("\n📈 Sensor");
    println!("   ├─ Name: {}", info.sensor.name);
    match &info.sensor.replay_path {
        Some(path) => {
            println!("   ├─ Kind: {}", info.sensor.kind);
            println!("   └─ Replay file: {}", path);
        }
        None => println!("   └─ Kind: {}", info.sensor.kind),
    }

    println!("\n🗄  Staging");
    println!("   ├─ Backend: {}", info.staging.backend);
    if let Some(ref path) = info.staging.path {
        println!("   ├─ Path: {}", path);
    }
    println!(
        "   ├─ Capacity: {} bytes ({} samples)",
        info.staging.capacity_bytes, info.staging.capacity_samples
    );
    println!("   └─ Overflow: {}", info.staging.overflow);

    println!("\n💾 Transfer");
    println!("   ├─ Mount point: {}", info.transfer.mount_point);
    println!("   ├─ Target file: {}", info.transfer.target_file);
    println!("   ├─ Chunk capacity: {} bytes", info.transfer.chunk_capacity);
    println!(
        "   └─ Device: {} (polled every {} ms)",
        if info.transfer.device_present {
            "present"
        } else {
            "absent"
        },
        info.device_poll_interval_ms
    );

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_config_info() {
        let blueprint = config_loader::ConfigLoader::load_from_str(
            r#"
[cadence]
tick_period_ms = 2
ticks_per_sample = 500

[staging]
capacity_bytes = 60

[transfer]
mount_point = "/nonexistent/usb"
"#,
            config_loader::ConfigFormat::Toml,
        )
        .unwrap();

        let info = build_config_info(&blueprint);
        assert_eq!(info.cadence.sample_interval_ms, 1000);
        assert_eq!(info.staging.capacity_samples, 10);
        assert!(!info.transfer.device_present);

        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["transfer"]["target_file"], "data.txt");
        assert!(json["sensor"].get("replay_path").is_none());
    }
}
