//! Scripted monitor
//!
//! Implements `DeviceMonitor` by replaying a fixed list of delayed events.
//! Used for demos and end-to-end tests without a real removable device.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use contracts::{DeviceEvent, DeviceEventCallback, DeviceMonitor};
use tracing::{debug, trace};

/// Scripted monitor
pub struct ScriptedMonitor {
    script: Vec<(Duration, DeviceEvent)>,
    listening: Arc<AtomicBool>,
}

impl ScriptedMonitor {
    /// Each entry fires `delay` after the previous one
    pub fn new(script: Vec<(Duration, DeviceEvent)>) -> Self {
        Self {
            script,
            listening: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Attach sequence (`Selected`, `ClassActive`) after `delay`
    pub fn attach_after(delay: Duration) -> Vec<(Duration, DeviceEvent)> {
        vec![
            (delay, DeviceEvent::Selected),
            (Duration::ZERO, DeviceEvent::ClassActive),
        ]
    }
}

impl DeviceMonitor for ScriptedMonitor {
    fn listen(&self, callback: DeviceEventCallback) {
        if self.listening.swap(true, Ordering::SeqCst) {
            return;
        }

        let script = self.script.clone();
        let listening = self.listening.clone();

        thread::spawn(move || {
            debug!(events = script.len(), "scripted monitor started");
            for (delay, event) in script {
                thread::sleep(delay);
                if !listening.load(Ordering::Relaxed) {
                    break;
                }
                trace!(?event, "scripted device event");
                callback(event);
            }
            debug!("scripted monitor finished");
        });
    }

    fn stop(&self) {
        self.listening.store(false, Ordering::SeqCst);
    }

    fn is_listening(&self) -> bool {
        self.listening.load(Ordering::Relaxed)
    }
}
