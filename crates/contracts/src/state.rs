//! Controller state, device notifications and session state.

use serde::{Deserialize, Serialize};

/// Acquisition controller state
///
/// Written by the cadence and device callbacks, read and completed by the main loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ControllerState {
    /// Nothing to do
    #[default]
    Idle = 0,
    /// A sample is due
    SampleReady = 1,
    /// The removable device is ready for a drain
    TransferReady = 2,
}

impl ControllerState {
    /// Raw encoding used by the atomic state cell
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decode the atomic state cell; unknown values fall back to `Idle`
    pub const fn from_u8(raw: u8) -> Self {
        match raw {
            1 => ControllerState::SampleReady,
            2 => ControllerState::TransferReady,
            _ => ControllerState::Idle,
        }
    }
}

/// Removable device notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceEvent {
    /// Configuration selected (acknowledged, no state effect)
    Selected,
    /// Device removed
    Detached,
    /// Mass-storage class active, device ready for writing
    ClassActive,
}

/// Usability of the removable device as seen by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceSession {
    #[default]
    NotPresent,
    Mounted,
}
