//! Removable device monitors

mod mount_watcher;
mod scripted;

pub use mount_watcher::MountWatcher;
pub use scripted::ScriptedMonitor;
