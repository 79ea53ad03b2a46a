//! 记录器指标收集模块
//!
//! 基于采样与 DrainReport 收集和统计记录器的运行指标。

use contracts::{DrainReport, DrainStatus};
use metrics::{counter, gauge, histogram};

/// 记录一次成功暂存的样本
pub fn record_sample_appended(pending_bytes: usize) {
    counter!("motion_logger_samples_total").increment(1);
    gauge!("motion_logger_pending_bytes").set(pending_bytes as f64);
}

/// 记录一次因暂存区满而丢弃的样本
pub fn record_sample_dropped() {
    counter!("motion_logger_samples_dropped_total").increment(1);
}

/// 记录暂存区深度
pub fn record_pending_bytes(pending_bytes: usize) {
    gauge!("motion_logger_pending_bytes").set(pending_bytes as f64);
}

/// 从 DrainReport 记录指标
///
/// 每次传输结束 (完成或中止) 时调用。
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_drain_metrics;
///
/// if let StepOutcome::Drained(report) = controller.step()? {
///     record_drain_metrics(&report);
/// }
/// ```
pub fn record_drain_metrics(report: &DrainReport) {
    counter!(
        "motion_logger_drains_total",
        "status" => report.status.as_str()
    )
    .increment(1);

    histogram!("motion_logger_drain_bytes").record(report.bytes_transferred as f64);
    histogram!("motion_logger_drain_chunks").record(report.write_calls as f64);
    histogram!("motion_logger_drain_duration_ms").record(report.duration_ms);

    if report.status == DrainStatus::Completed {
        gauge!("motion_logger_pending_bytes").set(0.0);
    }
}

/// 记录致命错误
pub fn record_fault(kind: &'static str) {
    counter!("motion_logger_faults_total", "kind" => kind).increment(1);
}

/// 传输指标聚合器
///
/// 在内存中聚合指标，便于统计和输出摘要。
#[derive(Debug, Clone, Default)]
pub struct DrainMetricsAggregator {
    /// 完成的传输次数
    pub completed: u64,

    /// 中止的传输次数
    pub aborted: u64,

    /// 传输字节总数
    pub total_bytes: u64,

    /// 写调用总数
    pub total_chunks: u64,

    /// 单次传输字节数统计
    pub bytes_stats: RunningStats,

    /// 单次传输耗时统计 (毫秒)
    pub duration_stats: RunningStats,
}

impl DrainMetricsAggregator {
    /// 创建新的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    /// 更新聚合统计
    pub fn update(&mut self, report: &DrainReport) {
        match report.status {
            DrainStatus::Completed => self.completed += 1,
            DrainStatus::Aborted => self.aborted += 1,
        }
        self.total_bytes += report.bytes_transferred as u64;
        self.total_chunks += report.write_calls as u64;

        if report.status == DrainStatus::Completed {
            self.bytes_stats.push(report.bytes_transferred as f64);
            self.duration_stats.push(report.duration_ms);
        }
    }

    /// 生成摘要报告
    pub fn summary(&self) -> MetricsSummary {
        let total = self.completed + self.aborted;
        MetricsSummary {
            completed: self.completed,
            aborted: self.aborted,
            total_bytes: self.total_bytes,
            total_chunks: self.total_chunks,
            abort_rate: if total > 0 {
                self.aborted as f64 / total as f64 * 100.0
            } else {
                0.0
            },
            drain_bytes: StatsSummary::from(&self.bytes_stats),
            drain_duration_ms: StatsSummary::from(&self.duration_stats),
        }
    }

    /// 重置统计
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 指标摘要
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub completed: u64,
    pub aborted: u64,
    pub total_bytes: u64,
    pub total_chunks: u64,
    pub abort_rate: f64,
    pub drain_bytes: StatsSummary,
    pub drain_duration_ms: StatsSummary,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Drain Metrics Summary ===")?;
        writeln!(f, "Completed drains: {}", self.completed)?;
        writeln!(
            f,
            "Aborted drains: {} ({:.2}%)",
            self.aborted, self.abort_rate
        )?;
        writeln!(f, "Bytes transferred: {}", self.total_bytes)?;
        writeln!(f, "Write calls: {}", self.total_chunks)?;
        writeln!(f, "Bytes per drain: {}", self.drain_bytes)?;
        writeln!(f, "Drain duration (ms): {}", self.drain_duration_ms)?;
        Ok(())
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 样本方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
