//! Replay Sensor - 从导出的数据文件回放样本
//!
//! 读取一次传输写出的 data.txt (连续的 6 字节样本)，按顺序逐个返回。

use std::fs;
use std::path::{Path, PathBuf};

use contracts::{LoggerError, Sample, SensorSource, SAMPLE_WIDTH};
use tracing::{debug, info, warn};

/// Replay Sensor
pub struct ReplaySensor {
    name: String,
    replay_path: PathBuf,
    samples: Vec<Sample>,
    position: usize,
    loop_playback: bool,
}

impl ReplaySensor {
    /// 从文件加载样本
    pub fn load(
        name: impl Into<String>,
        replay_path: &Path,
        loop_playback: bool,
    ) -> Result<Self, LoggerError> {
        let name = name.into();
        let bytes = fs::read(replay_path)?;
        if bytes.len() % SAMPLE_WIDTH != 0 {
            warn!(
                path = %replay_path.display(),
                trailing = bytes.len() % SAMPLE_WIDTH,
                "Replay file ends with a partial record, ignoring it"
            );
        }

        let samples = Sample::decode_all(&bytes);
        if samples.is_empty() {
            return Err(LoggerError::sensor_read(format!(
                "replay file {} holds no complete sample",
                replay_path.display()
            )));
        }

        info!(
            sensor = %name,
            path = %replay_path.display(),
            samples = samples.len(),
            "Loaded replay sensor"
        );

        Ok(Self {
            name,
            replay_path: replay_path.to_path_buf(),
            samples,
            position: 0,
            loop_playback,
        })
    }

    /// 剩余样本数 (循环模式下为本轮剩余)
    pub fn remaining(&self) -> usize {
        self.samples.len() - self.position
    }
}

impl SensorSource for ReplaySensor {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&mut self) -> Result<Sample, LoggerError> {
        if self.position == self.samples.len() {
            if !self.loop_playback {
                return Err(LoggerError::sensor_read(format!(
                    "replay of {} exhausted",
                    self.replay_path.display()
                )));
            }
            debug!(sensor = %self.name, "Replay wrapped around");
            self.position = 0;
        }

        let sample = self.samples[self.position];
        self.position += 1;
        Ok(sample)
    }
}
