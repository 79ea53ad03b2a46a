//! # Acquisition
//!
//! 采集/暂存/传输状态机。
//!
//! 负责：
//! - 节拍触发采样 (`CadenceTimer`)
//! - 设备通知写入共享状态 (`ControllerHandle`)
//! - 主循环单步执行：采样追加、整体传输 (drain)、设备释放
//! - 致命错误后停机并点亮故障指示灯
//!
//! ## 使用示例
//!
//! ```ignore
//! use acquisition::{AcquisitionController, CadenceTimer, ControllerConfig};
//!
//! let mut controller = AcquisitionController::new(
//!     ControllerConfig::from_blueprint(&blueprint),
//!     sensor, staging, sink, transfer_led, fault_led,
//! );
//!
//! let timer = Arc::new(CadenceTimer::new(controller.handle(), 1000));
//! let ticker = timer.spawn(blueprint.cadence.tick_period());
//! monitor.listen(controller.handle().device_callback());
//!
//! loop {
//!     match controller.step()? {
//!         StepOutcome::Drained(report) => println!("{report:?}"),
//!         _ => {}
//!     }
//! }
//! ```

mod cadence;
mod controller;
mod drain;
mod signals;

pub use cadence::CadenceTimer;
pub use controller::{AcquisitionController, ControllerConfig, ControllerStats, StepOutcome};
pub use signals::{ControllerHandle, ControllerSignals};

// Re-export contracts types
pub use contracts::{ControllerState, DeviceEvent, DrainReport, DrainStatus};
