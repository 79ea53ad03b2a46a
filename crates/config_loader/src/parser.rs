//! 配置解析模块
//!
//! 支持 TOML (主要) 和 JSON (可选) 格式。

use contracts::{LoggerBlueprint, LoggerError};

/// 配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML 格式 (推荐)
    Toml,
    /// JSON 格式
    Json,
}

impl ConfigFormat {
    /// 从文件扩展名推断格式
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// 解析 TOML 格式配置
pub fn parse_toml(content: &str) -> Result<LoggerBlueprint, LoggerError> {
    toml::from_str(content).map_err(|e| LoggerError::ConfigParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// 解析 JSON 格式配置
pub fn parse_json(content: &str) -> Result<LoggerBlueprint, LoggerError> {
    serde_json::from_str(content).map_err(|e| LoggerError::ConfigParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// 根据格式解析配置
pub fn parse(content: &str, format: ConfigFormat) -> Result<LoggerBlueprint, LoggerError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{OverflowPolicy, SensorKind, StagingBackend};

    #[test]
    fn test_parse_toml_full() {
        let content = r#"
[cadence]
tick_period_ms = 1
ticks_per_sample = 500

[sensor]
name = "lis3dsh"
kind = "mock"
amplitude = 2000

[staging]
backend = "file"
path = "/dev/shm/motion-logger/data.txt"
capacity_bytes = 4096
overflow = "halt"

[transfer]
mount_point = "/media/usb0"
target_file = "log.bin"
chunk_capacity = 64

[device]
poll_interval_ms = 100
"#;
        let result = parse_toml(content);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let bp = result.unwrap();
        assert_eq!(bp.cadence.ticks_per_sample, 500);
        assert_eq!(bp.sensor.name, "lis3dsh");
        assert_eq!(bp.sensor.kind, SensorKind::Mock);
        assert_eq!(bp.staging.backend, StagingBackend::File);
        assert_eq!(bp.staging.overflow, OverflowPolicy::Halt);
        assert_eq!(bp.transfer.chunk_capacity, 64);
        assert_eq!(bp.device.poll_interval_ms, 100);
    }

    #[test]
    fn test_parse_json_minimal() {
        let content = r#"{ "transfer": { "mount_point": "/media/usb0" } }"#;
        let result = parse_json(content);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
    }

    #[test]
    fn test_parse_toml_missing_transfer() {
        let result = parse_toml("[cadence]\nticks_per_sample = 10\n");
        assert!(matches!(result, Err(LoggerError::ConfigParse { .. })));
    }

    #[test]
    fn test_parse_toml_syntax_error() {
        let content = "invalid toml [[[";
        let result = parse_toml(content);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, LoggerError::ConfigParse { .. }));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_extension("toml"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("TOML"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("json"),
            Some(ConfigFormat::Json)
        );
        assert_eq!(ConfigFormat::from_extension("yaml"), None);
    }
}
