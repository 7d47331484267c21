//! Input devices
//!
//! The device set is closed: a keyboard and HID-like controllers. Both sit
//! behind [`Device`] so the aggregator can dispatch without knowing which is
//! which.

mod hid;
mod keyboard;

pub use hid::HidDevice;
pub use keyboard::KeyboardDevice;

use super::provider::{DeviceHandle, HidReport};
use super::{Buttons, PlayerSlot};
use winit::keyboard::KeyCode;

/// Raw-input usages (generic desktop page) a keyboard listens to
const KEYBOARD_USAGES: &[u16] = &[0x06];
/// Raw-input usages (generic desktop page) for joysticks and gamepads
const HID_USAGES: &[u16] = &[0x04, 0x05];

/// A report already routed to a specific device.
#[derive(Debug, Clone, Copy)]
pub enum DeviceEvent<'a> {
    Key { key: KeyCode, pressed: bool },
    Report(&'a HidReport),
}

/// One attached input device
#[derive(Debug, Clone)]
pub enum Device {
    Keyboard(KeyboardDevice),
    Hid(HidDevice),
}

impl Device {
    /// Stable name (config namespace for HID devices)
    pub fn name(&self) -> &str {
        match self {
            Self::Keyboard(_) => "keyboard",
            Self::Hid(device) => device.name(),
        }
    }

    /// Provider handle, for devices that have one
    pub fn handle(&self) -> Option<DeviceHandle> {
        match self {
            Self::Keyboard(_) => None,
            Self::Hid(device) => Some(device.handle()),
        }
    }

    /// Raw-input usages the host must register for this device to receive reports
    pub fn required_capabilities(&self) -> &'static [u16] {
        match self {
            Self::Keyboard(_) => KEYBOARD_USAGES,
            Self::Hid(_) => HID_USAGES,
        }
    }

    /// Apply an event. Events of the wrong kind for this device are ignored.
    pub fn update(&mut self, event: DeviceEvent<'_>) {
        match (self, event) {
            (Self::Keyboard(device), DeviceEvent::Key { key, pressed }) => {
                device.update_key(key, pressed)
            }
            (Self::Hid(device), DeviceEvent::Report(report)) => device.update_report(report),
            _ => {}
        }
    }

    /// Current button mask contributed to `player`
    pub fn buttons(&self, player: PlayerSlot) -> Buttons {
        match self {
            Self::Keyboard(device) => device.buttons(player),
            Self::Hid(device) => device.buttons(player),
        }
    }

    /// Drop all held buttons and directions
    pub fn clear_buttons(&mut self) {
        match self {
            Self::Keyboard(device) => device.clear_buttons(),
            Self::Hid(device) => device.clear_buttons(),
        }
    }
}

impl From<KeyboardDevice> for Device {
    fn from(device: KeyboardDevice) -> Self {
        Self::Keyboard(device)
    }
}

impl From<HidDevice> for Device {
    fn from(device: HidDevice) -> Self {
        Self::Hid(device)
    }
}
