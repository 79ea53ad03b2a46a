//! LoggerBlueprint - Config Loader 输出
//!
//! 描述完整的记录器配置：采样节拍、传感器、暂存区、传输目标、设备监视。

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::SAMPLE_WIDTH;

/// 配置版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// 完整的记录器配置蓝图
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoggerBlueprint {
    /// 配置版本
    #[serde(default)]
    pub version: ConfigVersion,

    /// 采样节拍
    #[serde(default)]
    #[validate(nested)]
    pub cadence: CadenceConfig,

    /// 传感器设置
    #[serde(default)]
    #[validate(nested)]
    pub sensor: SensorConfig,

    /// 暂存区设置
    #[serde(default)]
    #[validate(nested)]
    pub staging: StagingConfig,

    /// 传输目标设置
    #[validate(nested)]
    pub transfer: TransferConfig,

    /// 设备监视设置
    #[serde(default)]
    #[validate(nested)]
    pub device: DeviceConfig,
}

/// 采样节拍配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CadenceConfig {
    /// 硬件节拍周期 (毫秒, 最长 1 分钟)
    #[serde(default = "default_tick_period_ms")]
    #[validate(range(min = 1, max = 60_000))]
    pub tick_period_ms: u64,

    /// 每次采样所需节拍数
    #[serde(default = "default_ticks_per_sample")]
    #[validate(range(min = 1, max = 1_000_000))]
    pub ticks_per_sample: u32,
}

impl CadenceConfig {
    /// 单个节拍的时长
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    /// 两次采样之间的时长
    pub fn sample_interval(&self) -> Duration {
        self.tick_period().saturating_mul(self.ticks_per_sample)
    }
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: default_tick_period_ms(),
            ticks_per_sample: default_ticks_per_sample(),
        }
    }
}

fn default_tick_period_ms() -> u64 {
    1
}

fn default_ticks_per_sample() -> u32 {
    1000
}

/// 传感器类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    /// 模拟加速度计
    #[default]
    Mock,
    /// 回放已导出的数据文件
    Replay,
}

/// 传感器配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SensorConfig {
    /// 传感器名称
    #[serde(default = "default_sensor_name")]
    #[validate(length(min = 1))]
    pub name: String,

    /// 传感器类型
    #[serde(default)]
    pub kind: SensorKind,

    /// 模拟波形幅值 (仅 Mock)
    #[serde(default = "default_amplitude")]
    #[validate(range(min = 0))]
    pub amplitude: i16,

    /// 第 N 次读取后注入故障 (仅 Mock, 用于测试)
    #[serde(default)]
    pub fail_after: Option<u64>,

    /// 回放文件路径 (仅 Replay)
    #[serde(default)]
    pub replay_path: Option<PathBuf>,

    /// 回放结束后是否循环 (仅 Replay)
    #[serde(default = "default_true")]
    pub loop_playback: bool,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            name: default_sensor_name(),
            kind: SensorKind::default(),
            amplitude: default_amplitude(),
            fail_after: None,
            replay_path: None,
            loop_playback: true,
        }
    }
}

fn default_sensor_name() -> String {
    "accelerometer".to_string()
}

fn default_amplitude() -> i16 {
    1000
}

fn default_true() -> bool {
    true
}

/// 暂存区后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StagingBackend {
    /// 内存 (RAM 盘)
    #[default]
    Memory,
    /// 本地文件 (tmpfs 等)
    File,
}

/// 暂存区满时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// 丢弃新样本并计数
    #[default]
    DropNewest,
    /// 视为致命错误并停机
    Halt,
}

/// 暂存区配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StagingConfig {
    /// 后端类型
    #[serde(default)]
    pub backend: StagingBackend,

    /// 文件路径 (仅 File 后端)
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// 容量上限 (字节)
    #[serde(default = "default_capacity_bytes")]
    #[validate(range(min = 6))]
    pub capacity_bytes: usize,

    /// 溢出策略
    #[serde(default)]
    pub overflow: OverflowPolicy,
}

impl StagingConfig {
    /// 向下取整到完整样本的容量
    pub fn effective_capacity(&self) -> usize {
        self.capacity_bytes / SAMPLE_WIDTH * SAMPLE_WIDTH
    }
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            backend: StagingBackend::default(),
            path: None,
            capacity_bytes: default_capacity_bytes(),
            overflow: OverflowPolicy::default(),
        }
    }
}

fn default_capacity_bytes() -> usize {
    64 * 1024
}

/// 传输目标配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TransferConfig {
    /// 可移动设备挂载点
    pub mount_point: PathBuf,

    /// 设备上的目标文件名
    #[serde(default = "default_target_file")]
    #[validate(length(min = 1))]
    pub target_file: String,

    /// 单次传输块大小 (字节)
    #[serde(default = "default_chunk_capacity")]
    #[validate(range(min = 1))]
    pub chunk_capacity: usize,
}

impl TransferConfig {
    pub fn new(mount_point: impl Into<PathBuf>) -> Self {
        Self {
            mount_point: mount_point.into(),
            target_file: default_target_file(),
            chunk_capacity: default_chunk_capacity(),
        }
    }
}

fn default_target_file() -> String {
    "data.txt".to_string()
}

fn default_chunk_capacity() -> usize {
    32
}

/// 设备监视配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DeviceConfig {
    /// 挂载点轮询间隔 (毫秒)
    #[serde(default = "default_poll_interval_ms")]
    #[validate(range(min = 1))]
    pub poll_interval_ms: u64,
}

impl DeviceConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    200
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_json_uses_defaults() {
        let bp: LoggerBlueprint =
            serde_json::from_str(r#"{ "transfer": { "mount_point": "/media/usb" } }"#).unwrap();
        assert_eq!(bp.cadence.ticks_per_sample, 1000);
        assert_eq!(bp.cadence.sample_interval(), Duration::from_secs(1));
        assert_eq!(bp.transfer.target_file, "data.txt");
        assert_eq!(bp.transfer.chunk_capacity, 32);
        assert_eq!(bp.staging.backend, StagingBackend::Memory);
        assert_eq!(bp.staging.overflow, OverflowPolicy::DropNewest);
        assert!(bp.validate().is_ok());
    }

    #[test]
    fn test_effective_capacity_rounds_down() {
        let staging = StagingConfig {
            capacity_bytes: 20,
            ..Default::default()
        };
        assert_eq!(staging.effective_capacity(), 18);
    }

    #[test]
    fn test_cadence_bounds() {
        let cadence = CadenceConfig {
            tick_period_ms: 60_000,
            ticks_per_sample: 1_000_000,
        };
        assert!(cadence.validate().is_ok());
        assert_eq!(cadence.sample_interval(), Duration::from_secs(60_000_000));

        let cadence = CadenceConfig {
            tick_period_ms: u64::MAX / 2,
            ticks_per_sample: 4000,
        };
        assert!(cadence.validate().is_err());
        assert_eq!(cadence.sample_interval(), Duration::MAX);
    }

    #[test]
    fn test_derive_rejects_zero_chunk() {
        let mut transfer = TransferConfig::new("/media/usb");
        transfer.chunk_capacity = 0;
        assert!(transfer.validate().is_err());
    }
}
