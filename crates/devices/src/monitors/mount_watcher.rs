//! Mount-point watcher
//!
//! Implements `DeviceMonitor` by polling a directory in a background thread.
//! The directory appearing is reported as an attach (`Selected`, then
//! `ClassActive`); it disappearing is reported as `Detached`.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use contracts::{DeviceEvent, DeviceEventCallback, DeviceMonitor};
use tracing::{debug, info};

/// Mount-point watcher
pub struct MountWatcher {
    mount_point: PathBuf,
    poll_interval: Duration,
    listening: Arc<AtomicBool>,
}

impl MountWatcher {
    pub fn new(mount_point: impl Into<PathBuf>, poll_interval: Duration) -> Self {
        Self {
            mount_point: mount_point.into(),
            poll_interval,
            listening: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn mount_point(&self) -> &Path {
        &self.mount_point
    }

    fn is_present(mount_point: &Path) -> bool {
        mount_point.is_dir()
    }
}

impl DeviceMonitor for MountWatcher {
    fn listen(&self, callback: DeviceEventCallback) {
        // Idempotent: if already listening, don't start again
        if self.listening.swap(true, Ordering::SeqCst) {
            return;
        }

        let mount_point = self.mount_point.clone();
        let poll_interval = self.poll_interval;
        let listening = self.listening.clone();

        thread::spawn(move || {
            let mut present = false;
            debug!(
                mount_point = %mount_point.display(),
                poll_ms = poll_interval.as_millis() as u64,
                "mount watcher started"
            );

            while listening.load(Ordering::Relaxed) {
                let now_present = Self::is_present(&mount_point);
                if now_present != present {
                    present = now_present;
                    if present {
                        info!(mount_point = %mount_point.display(), "removable device attached");
                        callback(DeviceEvent::Selected);
                        callback(DeviceEvent::ClassActive);
                    } else {
                        info!(mount_point = %mount_point.display(), "removable device detached");
                        callback(DeviceEvent::Detached);
                    }
                }
                thread::sleep(poll_interval);
            }

            debug!(mount_point = %mount_point.display(), "mount watcher stopped");
        });
    }

    fn stop(&self) {
        self.listening.store(false, Ordering::SeqCst);
    }

    fn is_listening(&self) -> bool {
        self.listening.load(Ordering::Relaxed)
    }
}
