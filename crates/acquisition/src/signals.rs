//! Shared controller signals
//!
//! The only state written from timer and device callbacks. Callbacks write
//! through [`ControllerHandle`]; the main loop performs completion
//! transitions by compare-and-swap so a notification that lands mid-step is
//! never overwritten.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use contracts::{ControllerState, DeviceEvent, DeviceEventCallback};
use tracing::{debug, trace};

const IDLE: u8 = ControllerState::Idle.as_u8();
const SAMPLE_READY: u8 = ControllerState::SampleReady.as_u8();
const TRANSFER_READY: u8 = ControllerState::TransferReady.as_u8();

/// Atomic state cell plus the flags that travel with it
#[derive(Debug, Default)]
pub struct ControllerSignals {
    state: AtomicU8,
    /// Tick seen while a transfer was pending
    sample_due: AtomicBool,
    unmount_requested: AtomicBool,
    /// Set on detach, cleared once the main loop has released the device
    detached: AtomicBool,
}

impl ControllerSignals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ControllerState {
        ControllerState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Tick path: Idle -> SampleReady, or latch the tick behind a pending transfer
    pub fn raise_sample_due(&self) {
        loop {
            match self.state.load(Ordering::Acquire) {
                IDLE => {
                    if self
                        .state
                        .compare_exchange(IDLE, SAMPLE_READY, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        return;
                    }
                }
                TRANSFER_READY => {
                    self.sample_due.store(true, Ordering::Release);
                    if self.state.load(Ordering::Acquire) == TRANSFER_READY {
                        return;
                    }
                    // The transfer completed between the load and the latch.
                    // Reclaim the latch unless the completion already consumed it.
                    if !self.sample_due.swap(false, Ordering::AcqRel) {
                        return;
                    }
                }
                _ => return,
            }
        }
    }

    /// Device notification path
    pub fn notify(&self, event: DeviceEvent) {
        match event {
            DeviceEvent::ClassActive => {
                let previous = self.state.swap(TRANSFER_READY, Ordering::AcqRel);
                if previous == SAMPLE_READY {
                    self.sample_due.store(true, Ordering::Release);
                }
                debug!(previous = ?ControllerState::from_u8(previous), "device ready");
            }
            DeviceEvent::Detached => {
                self.detached.store(true, Ordering::Release);
                self.unmount_requested.store(true, Ordering::Release);
                self.state.store(SAMPLE_READY, Ordering::Release);
                self.sample_due.store(false, Ordering::Release);
                debug!("device detached");
            }
            DeviceEvent::Selected => {
                trace!("device configuration selected");
            }
        }
    }

    /// Claim a due sample: SampleReady -> Idle
    pub(crate) fn claim_sample(&self) -> bool {
        self.state
            .compare_exchange(SAMPLE_READY, IDLE, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Finish a completed drain: TransferReady -> Idle, or SampleReady if a
    /// tick was latched. Returns the state left behind.
    pub(crate) fn complete_transfer(&self) -> ControllerState {
        // Leave TransferReady before consuming the latch
        if let Err(actual) =
            self.state
                .compare_exchange(TRANSFER_READY, IDLE, Ordering::AcqRel, Ordering::Acquire)
        {
            return ControllerState::from_u8(actual);
        }

        if !self.sample_due.swap(false, Ordering::AcqRel) {
            return self.state();
        }

        match self
            .state
            .compare_exchange(IDLE, SAMPLE_READY, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => ControllerState::SampleReady,
            Err(TRANSFER_READY) => {
                // A new transfer slipped in; keep the tick behind it
                self.sample_due.store(true, Ordering::Release);
                ControllerState::TransferReady
            }
            Err(actual) => ControllerState::from_u8(actual),
        }
    }

    /// Consume a pending unmount request
    pub(crate) fn take_unmount_request(&self) -> bool {
        if self.unmount_requested.swap(false, Ordering::AcqRel) {
            self.detached.store(false, Ordering::Release);
            true
        } else {
            false
        }
    }

    /// A detach arrived that the main loop has not handled yet
    pub(crate) fn detach_pending(&self) -> bool {
        self.detached.load(Ordering::Acquire)
    }

    pub(crate) fn sample_latched(&self) -> bool {
        self.sample_due.load(Ordering::Acquire)
    }
}

/// Cloneable write access to [`ControllerSignals`] for callbacks
#[derive(Debug, Clone)]
pub struct ControllerHandle {
    signals: Arc<ControllerSignals>,
}

impl ControllerHandle {
    pub(crate) fn new(signals: Arc<ControllerSignals>) -> Self {
        Self { signals }
    }

    /// Record a device notification
    pub fn notify(&self, event: DeviceEvent) {
        self.signals.notify(event);
    }

    /// Record that a sample is due
    pub fn raise_sample_due(&self) {
        self.signals.raise_sample_due();
    }

    pub fn state(&self) -> ControllerState {
        self.signals.state()
    }

    /// Callback forwarding device notifications to this handle
    pub fn device_callback(&self) -> DeviceEventCallback {
        let handle = self.clone();
        Arc::new(move |event| handle.notify(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_moves_idle_to_sample_ready() {
        let signals = ControllerSignals::new();
        signals.raise_sample_due();
        assert_eq!(signals.state(), ControllerState::SampleReady);
        signals.raise_sample_due();
        assert_eq!(signals.state(), ControllerState::SampleReady);
        assert!(!signals.sample_latched());
    }

    #[test]
    fn test_tick_during_transfer_is_latched() {
        let signals = ControllerSignals::new();
        signals.notify(DeviceEvent::ClassActive);
        signals.raise_sample_due();

        assert_eq!(signals.state(), ControllerState::TransferReady);
        assert!(signals.sample_latched());
        assert_eq!(signals.complete_transfer(), ControllerState::SampleReady);
        assert!(!signals.sample_latched());
    }

    #[test]
    fn test_ready_over_sample_ready_keeps_tick() {
        let signals = ControllerSignals::new();
        signals.raise_sample_due();
        signals.notify(DeviceEvent::ClassActive);

        assert_eq!(signals.state(), ControllerState::TransferReady);
        assert_eq!(signals.complete_transfer(), ControllerState::SampleReady);
    }

    #[test]
    fn test_complete_transfer_without_tick_goes_idle() {
        let signals = ControllerSignals::new();
        signals.notify(DeviceEvent::ClassActive);
        assert_eq!(signals.complete_transfer(), ControllerState::Idle);
    }

    #[test]
    fn test_detach_forces_sample_ready_and_requests_unmount() {
        let signals = ControllerSignals::new();
        signals.notify(DeviceEvent::ClassActive);
        signals.notify(DeviceEvent::Detached);

        assert_eq!(signals.state(), ControllerState::SampleReady);
        assert!(signals.detach_pending());
        // Completion must not overwrite the detach
        assert_eq!(signals.complete_transfer(), ControllerState::SampleReady);

        assert!(signals.take_unmount_request());
        assert!(!signals.detach_pending());
        assert!(!signals.take_unmount_request());
    }

    #[test]
    fn test_selected_has_no_effect() {
        let signals = ControllerSignals::new();
        signals.notify(DeviceEvent::Selected);
        assert_eq!(signals.state(), ControllerState::Idle);
        assert!(!signals.detach_pending());
    }

    #[test]
    fn test_claim_sample_only_from_sample_ready() {
        let signals = ControllerSignals::new();
        assert!(!signals.claim_sample());
        signals.raise_sample_due();
        assert!(signals.claim_sample());
        assert_eq!(signals.state(), ControllerState::Idle);
    }

    #[test]
    fn test_tick_racing_completion_is_never_lost() {
        use std::sync::Barrier;
        use std::thread;

        for round in 0..20_000 {
            let signals = Arc::new(ControllerSignals::new());
            signals.notify(DeviceEvent::ClassActive);
            let barrier = Arc::new(Barrier::new(2));

            let ticker = {
                let signals = signals.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    signals.raise_sample_due();
                })
            };

            barrier.wait();
            signals.complete_transfer();
            ticker.join().unwrap();

            assert_eq!(
                signals.state(),
                ControllerState::SampleReady,
                "tick lost in round {round}"
            );
            assert!(!signals.sample_latched(), "stale latch in round {round}");
        }
    }

    #[test]
    fn test_device_callback_forwards() {
        let signals = Arc::new(ControllerSignals::new());
        let callback = ControllerHandle::new(signals.clone()).device_callback();
        callback(DeviceEvent::ClassActive);
        assert_eq!(signals.state(), ControllerState::TransferReady);
    }
}
