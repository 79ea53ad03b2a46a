//! AcquisitionController - 状态机主体
//!
//! 拥有传感器、暂存区、传输目标与指示灯，仅在主循环中被 `step()` 驱动。

use std::sync::Arc;

use contracts::{
    ControllerState, DeviceSession, DrainReport, Indicator, LoggerBlueprint, LoggerError,
    OverflowPolicy, Sample, SensorSource, StagingLog, StorageOp, TransferSink, SAMPLE_WIDTH,
};
use observability::{
    record_fault, record_pending_bytes, record_sample_appended, record_sample_dropped,
};
use tracing::{debug, error, info, instrument, trace, warn};

use crate::signals::{ControllerHandle, ControllerSignals};

/// 控制器配置
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// 设备上的目标文件名
    pub target_file: String,
    /// 传输块大小 (字节)
    pub chunk_capacity: usize,
    /// 暂存区容量 (字节, 整数个样本)
    pub staging_capacity: usize,
    /// 暂存区满时的策略
    pub overflow: OverflowPolicy,
}

impl ControllerConfig {
    pub fn from_blueprint(blueprint: &LoggerBlueprint) -> Self {
        Self {
            target_file: blueprint.transfer.target_file.clone(),
            chunk_capacity: blueprint.transfer.chunk_capacity,
            staging_capacity: blueprint.staging.effective_capacity(),
            overflow: blueprint.staging.overflow,
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            target_file: "data.txt".to_string(),
            chunk_capacity: 32,
            staging_capacity: 64 * 1024,
            overflow: OverflowPolicy::DropNewest,
        }
    }
}

/// 单步执行结果
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// 无事可做
    Idle,
    /// 采样并追加到暂存区
    Sampled(Sample),
    /// 暂存区已满，样本被丢弃
    SampleDropped,
    /// 传输完成
    Drained(DrainReport),
    /// 传输因设备拔出而中止，暂存数据保留
    DrainAborted(DrainReport),
    /// 设备已释放 (卸载)
    DeviceReleased,
}

/// 控制器运行统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerStats {
    pub samples_taken: u64,
    pub samples_dropped: u64,
    pub drains_completed: u64,
    pub drains_aborted: u64,
    pub bytes_transferred: u64,
    pub devices_released: u64,
}

/// 采集控制器
pub struct AcquisitionController<S, L, T>
where
    S: SensorSource,
    L: StagingLog,
    T: TransferSink,
{
    pub(crate) config: ControllerConfig,
    pub(crate) sensor: S,
    pub(crate) staging: L,
    pub(crate) sink: T,
    pub(crate) transfer_led: Box<dyn Indicator>,
    pub(crate) fault_led: Box<dyn Indicator>,
    pub(crate) signals: Arc<ControllerSignals>,
    /// 传输块缓冲区
    pub(crate) chunk: Vec<u8>,
    /// 暂存区中待传输的字节数
    pub(crate) pending: usize,
    pub(crate) session: DeviceSession,
    halted: bool,
    pub(crate) stats: ControllerStats,
}

impl<S, L, T> AcquisitionController<S, L, T>
where
    S: SensorSource,
    L: StagingLog,
    T: TransferSink,
{
    /// 创建控制器，初始状态 Idle
    ///
    /// 暂存区中已有的字节计入 pending。
    pub fn new(
        config: ControllerConfig,
        sensor: S,
        staging: L,
        sink: T,
        transfer_led: Box<dyn Indicator>,
        fault_led: Box<dyn Indicator>,
    ) -> Self {
        let chunk = vec![0u8; config.chunk_capacity.max(1)];
        let pending = staging.len();
        Self {
            config,
            sensor,
            staging,
            sink,
            transfer_led,
            fault_led,
            signals: Arc::new(ControllerSignals::new()),
            chunk,
            pending,
            session: DeviceSession::NotPresent,
            halted: false,
            stats: ControllerStats::default(),
        }
    }

    /// 回调使用的句柄
    pub fn handle(&self) -> ControllerHandle {
        ControllerHandle::new(self.signals.clone())
    }

    /// 执行一步
    ///
    /// 先处理未完成的卸载请求，再按当前状态采样或传输。任何错误都是致命的：
    /// 控制器停机，之后每次调用都返回 [`LoggerError::Halted`]。
    pub fn step(&mut self) -> Result<StepOutcome, LoggerError> {
        if self.halted {
            return Err(LoggerError::Halted);
        }

        if self.signals.take_unmount_request() {
            self.release_device();
            return Ok(StepOutcome::DeviceReleased);
        }

        let result = match self.signals.state() {
            ControllerState::Idle => Ok(StepOutcome::Idle),
            ControllerState::SampleReady => self.take_sample(),
            ControllerState::TransferReady => self.drain(),
        };

        result.map_err(|e| self.halt(e))
    }

    /// 采样并追加
    #[instrument(level = "trace", name = "acquisition_take_sample", skip(self), fields(pending = self.pending))]
    fn take_sample(&mut self) -> Result<StepOutcome, LoggerError> {
        if !self.signals.claim_sample() {
            // 状态在读取后被回调改写，下一步处理
            return Ok(StepOutcome::Idle);
        }

        self.transfer_led.off();
        let sample = self.sensor.read()?;

        if self.pending + SAMPLE_WIDTH > self.config.staging_capacity {
            return match self.config.overflow {
                OverflowPolicy::DropNewest => {
                    self.stats.samples_dropped += 1;
                    record_sample_dropped();
                    warn!(
                        pending = self.pending,
                        capacity = self.config.staging_capacity,
                        dropped = self.stats.samples_dropped,
                        "Staging store full, sample dropped"
                    );
                    Ok(StepOutcome::SampleDropped)
                }
                OverflowPolicy::Halt => Err(LoggerError::StagingFull {
                    pending: self.pending,
                    capacity: self.config.staging_capacity,
                }),
            };
        }

        let bytes = sample.to_le_bytes();
        let written = self.staging.append(&bytes)?;
        if written != SAMPLE_WIDTH {
            return Err(LoggerError::short_transfer(
                StorageOp::Append,
                SAMPLE_WIDTH,
                written,
            ));
        }

        self.pending += SAMPLE_WIDTH;
        self.stats.samples_taken += 1;
        record_sample_appended(self.pending);
        trace!(x = sample.x, y = sample.y, z = sample.z, pending = self.pending, "sample staged");
        Ok(StepOutcome::Sampled(sample))
    }

    /// 卸载设备 (尽力而为，忽略失败)
    fn release_device(&mut self) {
        if let Err(e) = self.sink.unmount() {
            debug!(sink = %self.sink.name(), error = %e, "unmount failed, ignored");
        }
        self.session = DeviceSession::NotPresent;
        self.stats.devices_released += 1;
        record_pending_bytes(self.pending);
        info!(
            sink = %self.sink.name(),
            pending = self.pending,
            "Device released, staged data kept"
        );
    }

    /// 致命错误：停机并点亮故障指示灯
    fn halt(&mut self, err: LoggerError) -> LoggerError {
        self.halted = true;
        self.fault_led.on();
        record_fault(err.kind());
        error!(
            error = %err,
            kind = err.kind(),
            pending = self.pending,
            "Fatal error, controller halted"
        );
        err
    }

    pub fn state(&self) -> ControllerState {
        self.signals.state()
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn session(&self) -> DeviceSession {
        self.session
    }

    pub fn stats(&self) -> ControllerStats {
        self.stats
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    pub fn staging(&self) -> &L {
        &self.staging
    }

    pub fn sink(&self) -> &T {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut T {
        &mut self.sink
    }

    pub fn transfer_indicator(&self) -> &dyn Indicator {
        self.transfer_led.as_ref()
    }

    pub fn fault_indicator(&self) -> &dyn Indicator {
        self.fault_led.as_ref()
    }
}
