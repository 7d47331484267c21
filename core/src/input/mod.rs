//! Unified input: devices, capability bindings and directional override
//!
//! Raw reports from every attached device flow through the
//! [`InputAggregator`], which hands each one to the device that owns its
//! source. Devices translate raw capabilities into logical [`Buttons`] with
//! their [`CapabilityBinding`], collapse simultaneous directions with a
//! [`DirectionPriorityResolver`], and the aggregator ORs the results per
//! player.

mod aggregator;
mod axis;
mod binding;
mod device;
mod direction;
#[cfg(feature = "gamepad")]
mod gamepad;
mod provider;
#[cfg(test)]
mod tests;

pub use aggregator::InputAggregator;
pub use axis::{HAT_SWITCH_USAGE, axis_direction, axis_position, hat_direction};
pub use binding::{AxisRole, CapabilityBinding, LogicalMeaning, RawCapability};
pub use device::{Device, DeviceEvent, HidDevice, KeyboardDevice};
pub use direction::DirectionPriorityResolver;
#[cfg(feature = "gamepad")]
pub use gamepad::GilrsProvider;
pub use provider::{
    ButtonCapability, CapabilityProvider, DeviceDescriptor, DeviceHandle, HidReport, NoDevices,
    ProviderError, RawReport, ValueCapability,
};

bitflags::bitflags! {
    /// Logical button mask handed to the host for one player.
    ///
    /// Bit positions match the host's input word layout.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Buttons: u16 {
        const B = 0x0001;
        const A = 0x0002;
        const RIGHT = 0x0004;
        const LEFT = 0x0008;
        const DOWN = 0x0010;
        const UP = 0x0020;
        const START = 0x0080;
        const D = 0x4000;
        const C = 0x8000;

        /// All four directional bits
        const DIRECTIONS = Self::UP.bits() | Self::DOWN.bits() | Self::LEFT.bits() | Self::RIGHT.bits();
    }
}

impl Default for Buttons {
    fn default() -> Self {
        Self::empty()
    }
}

/// Logical player slot a device feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    /// Map a configured player number; anything but 1 or 2 is rejected
    pub fn from_config(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            _ => None,
        }
    }

    /// Zero-based slot index
    pub fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }
}
