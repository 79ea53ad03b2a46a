//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{LoggerBlueprint, SAMPLE_WIDTH};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    sensor: String,
    sample_interval_ms: u64,
    staging_capacity: usize,
    mount_point: String,
    chunk_capacity: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    // Check file exists
    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(blueprint) => {
            let warnings = collect_warnings(&blueprint);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    version: format!("{:?}", blueprint.version),
                    sensor: format!("{} ({:?})", blueprint.sensor.name, blueprint.sensor.kind),
                    sample_interval_ms: blueprint.cadence.sample_interval().as_millis() as u64,
                    staging_capacity: blueprint.staging.effective_capacity(),
                    mount_point: blueprint.transfer.mount_point.display().to_string(),
                    chunk_capacity: blueprint.transfer.chunk_capacity,
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(blueprint: &LoggerBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();

    if blueprint.staging.capacity_bytes % SAMPLE_WIDTH != 0 {
        warnings.push(format!(
            "staging.capacity_bytes {} is rounded down to {} (whole samples)",
            blueprint.staging.capacity_bytes,
            blueprint.staging.effective_capacity()
        ));
    }

    if blueprint.transfer.chunk_capacity > blueprint.staging.effective_capacity() {
        warnings.push(
            "transfer.chunk_capacity exceeds the staging capacity - every drain is a single write"
                .to_string(),
        );
    }

    if blueprint.sensor.fail_after.is_some() {
        warnings.push("sensor.fail_after is set - the controller will halt on purpose".to_string());
    }

    if !blueprint.transfer.mount_point.is_dir() {
        warnings.push(format!(
            "mount point {} is not present - samples are staged until it appears",
            blueprint.transfer.mount_point.display()
        ));
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Sensor: {}", summary.sensor);
            println!("  Sample interval: {} ms", summary.sample_interval_ms);
            println!("  Staging capacity: {} bytes", summary.staging_capacity);
            println!("  Mount point: {}", summary.mount_point);
            println!("  Chunk capacity: {} bytes", summary.chunk_capacity);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn args(config: PathBuf) -> ValidateArgs {
        ValidateArgs {
            config,
            json: true,
        }
    }

    #[test]
    fn test_missing_file_is_invalid() {
        let result = validate_config(&args(PathBuf::from("/nonexistent/logger.toml")));
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("File not found"));
    }

    #[test]
    fn test_valid_config_with_warnings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logger.toml");
        std::fs::write(
            &path,
            r#"
[staging]
capacity_bytes = 100

[transfer]
mount_point = "/nonexistent/usb"
"#,
        )
        .unwrap();

        let result = validate_config(&args(path));
        assert!(result.valid);
        let warnings = result.warnings.unwrap();
        assert!(warnings.iter().any(|w| w.contains("rounded down to 96")));
        assert!(warnings.iter().any(|w| w.contains("not present")));
        assert_eq!(result.summary.unwrap().staging_capacity, 96);
    }

    #[test]
    fn test_invalid_config_reports_field() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logger.toml");
        std::fs::write(
            &path,
            r#"
[cadence]
ticks_per_sample = 0

[transfer]
mount_point = "/media/usb"
"#,
        )
        .unwrap();

        let result = validate_config(&args(path));
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("cadence.ticks_per_sample"));
    }
}
