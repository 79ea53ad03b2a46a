//! CadenceTimer - 采样节拍
//!
//! 每个硬件节拍调用一次 `on_tick()`，累计 `ticks_per_sample` 次后触发一次采样。
//! 主机上由 tokio interval 任务驱动。

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, trace};

use crate::ControllerHandle;

/// 采样节拍计数器
#[derive(Debug)]
pub struct CadenceTimer {
    handle: ControllerHandle,
    ticks_per_sample: u32,
    counter: AtomicU32,
}

impl CadenceTimer {
    pub fn new(handle: ControllerHandle, ticks_per_sample: u32) -> Self {
        Self {
            handle,
            ticks_per_sample: ticks_per_sample.max(1),
            counter: AtomicU32::new(0),
        }
    }

    /// 处理一个节拍；触发采样时返回 true
    pub fn on_tick(&self) -> bool {
        let count = self.counter.fetch_add(1, Ordering::AcqRel) + 1;
        if count < self.ticks_per_sample {
            return false;
        }

        self.counter.store(0, Ordering::Release);
        self.handle.raise_sample_due();
        trace!("sample due");
        true
    }

    /// 启动节拍任务，每 `tick_period` 调用一次 `on_tick()`
    ///
    /// 必须在 tokio 运行时内调用；返回的 `JoinHandle` 用 `abort()` 停止。
    pub fn spawn(self: Arc<Self>, tick_period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = time::interval(tick_period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
            debug!(
                tick_period_ms = tick_period.as_millis() as u64,
                ticks_per_sample = self.ticks_per_sample,
                "cadence timer started"
            );

            // 第一次 tick 立即完成，跳过
            interval.tick().await;
            loop {
                interval.tick().await;
                self.on_tick();
            }
        })
    }
}
