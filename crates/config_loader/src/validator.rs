//! 配置校验模块
//!
//! 校验规则：
//! - 数值范围 (derive 规则：节拍、块大小、容量、轮询间隔)
//! - target_file 为纯文件名，不含路径分隔符
//! - Replay 传感器必须提供 replay_path
//! - File 暂存后端必须提供 path

use contracts::{LoggerBlueprint, LoggerError, SensorKind, StagingBackend};
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

/// 校验 LoggerBlueprint 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(blueprint: &LoggerBlueprint) -> Result<(), LoggerError> {
    validate_ranges(blueprint)?;
    validate_target_file(blueprint)?;
    validate_sensor(blueprint)?;
    validate_staging(blueprint)?;
    Ok(())
}

/// 校验 derive 声明的数值范围
fn validate_ranges(blueprint: &LoggerBlueprint) -> Result<(), LoggerError> {
    match blueprint.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let (field, message) = first_violation("", &errors)
                .unwrap_or_else(|| ("<unknown>".to_string(), errors.to_string()));
            Err(LoggerError::config_validation(field, message))
        }
    }
}

/// 按字段名排序后取第一个违规项，保证错误信息稳定
fn first_violation(prefix: &str, errors: &ValidationErrors) -> Option<(String, String)> {
    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    for (field, kind) in fields {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };

        match kind {
            ValidationErrorsKind::Field(list) => {
                if let Some(err) = list.first() {
                    return Some((path, describe(err)));
                }
            }
            ValidationErrorsKind::Struct(inner) => {
                if let Some(found) = first_violation(&path, inner) {
                    return Some(found);
                }
            }
            ValidationErrorsKind::List(items) => {
                for (idx, inner) in items {
                    if let Some(found) = first_violation(&format!("{path}[{idx}]"), inner) {
                        return Some(found);
                    }
                }
            }
        }
    }
    None
}

fn describe(err: &ValidationError) -> String {
    if let Some(message) = &err.message {
        return message.to_string();
    }
    let mut params: Vec<_> = err.params.iter().collect();
    params.sort_by(|a, b| a.0.cmp(b.0));
    let params = params
        .into_iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("failed '{}' constraint ({params})", err.code)
}

/// 校验目标文件名
fn validate_target_file(blueprint: &LoggerBlueprint) -> Result<(), LoggerError> {
    let name = blueprint.transfer.target_file.as_str();
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(LoggerError::config_validation(
            "transfer.target_file",
            format!("target_file must be a plain file name, got '{name}'"),
        ));
    }
    Ok(())
}

/// 校验传感器配置
fn validate_sensor(blueprint: &LoggerBlueprint) -> Result<(), LoggerError> {
    let sensor = &blueprint.sensor;
    if sensor.kind == SensorKind::Replay && sensor.replay_path.is_none() {
        return Err(LoggerError::config_validation(
            "sensor.replay_path",
            "replay sensor requires replay_path",
        ));
    }
    Ok(())
}

/// 校验暂存区配置
fn validate_staging(blueprint: &LoggerBlueprint) -> Result<(), LoggerError> {
    let staging = &blueprint.staging;
    if staging.backend == StagingBackend::File && staging.path.is_none() {
        return Err(LoggerError::config_validation(
            "staging.path",
            "file staging backend requires path",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::TransferConfig;

    fn blueprint() -> LoggerBlueprint {
        LoggerBlueprint {
            version: Default::default(),
            cadence: Default::default(),
            sensor: Default::default(),
            staging: Default::default(),
            transfer: TransferConfig::new("/media/usb0"),
            device: Default::default(),
        }
    }

    #[test]
    fn test_default_blueprint_is_valid() {
        assert!(validate(&blueprint()).is_ok());
    }

    #[test]
    fn test_zero_ticks_per_sample_names_field() {
        let mut bp = blueprint();
        bp.cadence.ticks_per_sample = 0;
        let err = validate(&bp).unwrap_err();
        match err {
            LoggerError::ConfigValidation { field, message } => {
                assert_eq!(field, "cadence.ticks_per_sample");
                assert!(message.contains("range"), "message: {message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_oversized_cadence_rejected() {
        let toml = r#"
[cadence]
tick_period_ms = 9223372036854775807
ticks_per_sample = 4000

[transfer]
mount_point = "/media/usb0"
"#;
        let err = crate::ConfigLoader::load_from_str(toml, crate::ConfigFormat::Toml).unwrap_err();
        match err {
            LoggerError::ConfigValidation { field, .. } => {
                assert_eq!(field, "cadence.tick_period_ms")
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let mut bp = blueprint();
        bp.cadence.ticks_per_sample = 1_000_001;
        let err = validate(&bp).unwrap_err();
        assert!(err.to_string().contains("cadence.ticks_per_sample"));
    }

    #[test]
    fn test_capacity_below_one_sample_rejected() {
        let mut bp = blueprint();
        bp.staging.capacity_bytes = 5;
        let err = validate(&bp).unwrap_err();
        assert!(err.to_string().contains("staging.capacity_bytes"));
    }

    #[test]
    fn test_target_file_with_separator_rejected() {
        let mut bp = blueprint();
        bp.transfer.target_file = "logs/data.txt".to_string();
        let err = validate(&bp).unwrap_err();
        assert!(err.to_string().contains("transfer.target_file"));
    }

    #[test]
    fn test_replay_requires_path() {
        let mut bp = blueprint();
        bp.sensor.kind = SensorKind::Replay;
        let err = validate(&bp).unwrap_err();
        assert!(err.to_string().contains("sensor.replay_path"));
    }

    #[test]
    fn test_file_backend_requires_path() {
        let mut bp = blueprint();
        bp.staging.backend = StagingBackend::File;
        let err = validate(&bp).unwrap_err();
        assert!(err.to_string().contains("staging.path"));
    }
}
