//! Device capability provider interface
//!
//! Enumeration and low-level report parsing live outside this crate. A
//! platform backend implements [`CapabilityProvider`] and exposes each
//! HID-like device as a descriptor of button and value capabilities.

use smallvec::SmallVec;
use winit::keyboard::KeyCode;

use super::axis::HAT_SWITCH_USAGE;

/// Stable per-device handle assigned by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceHandle(pub u64);

/// A contiguous range of button usages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonCapability {
    pub usage_page: u16,
    pub usage_min: u16,
    pub usage_max: u16,
}

impl ButtonCapability {
    /// Number of sequential logical buttons in the range
    pub fn count(&self) -> usize {
        if self.usage_max < self.usage_min {
            0
        } else {
            usize::from(self.usage_max - self.usage_min) + 1
        }
    }
}

/// An axis or hat switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueCapability {
    pub usage_page: u16,
    pub usage: u16,
    pub logical_min: i32,
    pub logical_max: i32,
}

impl ValueCapability {
    pub fn is_hat(&self) -> bool {
        self.usage == HAT_SWITCH_USAGE
    }
}

/// Everything the provider reports about one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    /// Display / product name, used as the config namespace
    pub name: String,
    pub button_caps: Vec<ButtonCapability>,
    pub value_caps: Vec<ValueCapability>,
}

/// Decoded state of one HID report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HidReport {
    /// Usages of every button currently held
    pub pressed_usages: SmallVec<[u16; 16]>,
    /// Current value per value capability (same order as the descriptor);
    /// `None` when the value could not be read from this report
    pub values: Vec<Option<i32>>,
}

/// A raw report as delivered by the host's input plumbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawReport<'a> {
    /// Keyboard key transition
    Key { key: KeyCode, pressed: bool },
    /// Undecoded HID report from a provider device
    Hid { handle: DeviceHandle, data: &'a [u8] },
}

/// Error from a capability provider. Never fatal: the affected device or
/// report is skipped.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    #[error("device {0:?} is not available")]
    Unavailable(DeviceHandle),
    #[error("capability query failed: {0}")]
    Capabilities(String),
    #[error("failed to parse report: {0}")]
    Report(String),
}

/// Backend that enumerates devices and decodes their reports.
pub trait CapabilityProvider {
    /// Handles of every currently attached HID-like device
    fn enumerate(&mut self) -> Vec<DeviceHandle>;

    /// Query name and capabilities of a device
    fn describe(&mut self, handle: DeviceHandle) -> Result<DeviceDescriptor, ProviderError>;

    /// Decode a raw report buffer into held buttons and value readings
    fn parse_report(
        &mut self,
        handle: DeviceHandle,
        descriptor: &DeviceDescriptor,
        data: &[u8],
    ) -> Result<HidReport, ProviderError>;

    /// Release any resources held for a device
    fn release(&mut self, _handle: DeviceHandle) {}
}

/// Provider with no HID devices (keyboard-only sessions).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDevices;

impl CapabilityProvider for NoDevices {
    fn enumerate(&mut self) -> Vec<DeviceHandle> {
        Vec::new()
    }

    fn describe(&mut self, handle: DeviceHandle) -> Result<DeviceDescriptor, ProviderError> {
        Err(ProviderError::Unavailable(handle))
    }

    fn parse_report(
        &mut self,
        handle: DeviceHandle,
        _descriptor: &DeviceDescriptor,
        _data: &[u8],
    ) -> Result<HidReport, ProviderError> {
        Err(ProviderError::Unavailable(handle))
    }
}
