//! DeviceMonitor trait - removable device notifications

use std::sync::Arc;

use crate::DeviceEvent;

/// Device notification callback type
///
/// Invoked from the monitor's own context; it must only record state and
/// never block.
pub type DeviceEventCallback = Arc<dyn Fn(DeviceEvent) + Send + Sync>;

/// Source of attach/detach/ready notifications
pub trait DeviceMonitor: Send + Sync {
    /// Register the notification callback
    ///
    /// Repeated calls while listening are ignored.
    fn listen(&self, callback: DeviceEventCallback);

    /// Stop producing notifications
    fn stop(&self);

    /// Check if currently listening
    fn is_listening(&self) -> bool;
}
