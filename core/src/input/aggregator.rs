//! Input aggregator: owns attached devices and merges their button masks

use hashbrown::HashMap;
use tracing::{debug, info, warn};

use crate::config::ConfigSource;

use super::device::{Device, DeviceEvent, HidDevice, KeyboardDevice};
use super::provider::{CapabilityProvider, DeviceHandle, RawReport};
use super::{Buttons, PlayerSlot};

/// Routes raw reports to their devices and combines the result per player.
pub struct InputAggregator<P: CapabilityProvider> {
    provider: P,
    devices: Vec<Device>,
}

impl<P: CapabilityProvider> InputAggregator<P> {
    /// Create an aggregator with no devices attached
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            devices: Vec::new(),
        }
    }

    /// Attach a device. Several devices may feed the same player.
    pub fn attach(&mut self, device: impl Into<Device>) {
        let device = device.into();
        info!("Attached input device '{}'", device.name());
        self.devices.push(device);
    }

    /// Attach the keyboard plus every provider device with a valid player.
    ///
    /// Devices sharing a product name get `" N"` appended for the Nth copy so
    /// each has its own config namespace. Devices whose capabilities cannot
    /// be queried are skipped. Returns the number of devices attached.
    pub fn attach_configured(&mut self, config: &impl ConfigSource) -> usize {
        let before = self.devices.len();
        self.attach(KeyboardDevice::from_config(config));

        let mut seen: HashMap<String, usize> = HashMap::new();
        for handle in self.provider.enumerate() {
            let descriptor = match self.provider.describe(handle) {
                Ok(descriptor) => descriptor,
                Err(e) => {
                    warn!("Skipping input device {:?}: {}", handle, e);
                    self.provider.release(handle);
                    continue;
                }
            };

            let count = seen.entry(descriptor.name.clone()).or_insert(0);
            *count += 1;
            let name = if *count > 1 {
                format!("{} {}", descriptor.name, count)
            } else {
                descriptor.name.clone()
            };

            match HidDevice::from_config(config, &name, handle, descriptor) {
                Some(device) => self.attach(device),
                None => {
                    info!("Input device '{}' has no player assigned, ignoring", name);
                    self.provider.release(handle);
                }
            }
        }

        self.devices.len() - before
    }

    /// Dispatch a raw report to the device owning its source.
    ///
    /// Reports from unknown handles are ignored. A HID report the provider
    /// cannot parse zeroes that device's buttons.
    pub fn update(&mut self, report: RawReport<'_>) {
        match report {
            RawReport::Key { key, pressed } => {
                for device in &mut self.devices {
                    device.update(DeviceEvent::Key { key, pressed });
                }
            }
            RawReport::Hid { handle, data } => {
                let Some(device) = self
                    .devices
                    .iter_mut()
                    .find(|device| device.handle() == Some(handle))
                else {
                    debug!("Ignoring report from unknown device {:?}", handle);
                    return;
                };
                let Device::Hid(hid) = &*device else {
                    return;
                };

                match self.provider.parse_report(handle, hid.descriptor(), data) {
                    Ok(parsed) => device.update(DeviceEvent::Report(&parsed)),
                    Err(e) => {
                        debug!("Dropping report from '{}': {}", device.name(), e);
                        device.clear_buttons();
                    }
                }
            }
        }
    }

    /// OR of every attached device's mask for `player`
    pub fn combined_buttons(&self, player: PlayerSlot) -> Buttons {
        self.devices
            .iter()
            .fold(Buttons::empty(), |acc, device| acc | device.buttons(player))
    }

    /// Zero every device's buttons and direction stack (focus lost)
    pub fn clear_all(&mut self) {
        for device in &mut self.devices {
            device.clear_buttons();
        }
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Find an attached device by its provider handle
    pub fn device(&self, handle: DeviceHandle) -> Option<&Device> {
        self.devices.iter().find(|d| d.handle() == Some(handle))
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }
}

impl<P: CapabilityProvider> Drop for InputAggregator<P> {
    fn drop(&mut self) {
        for handle in self.devices.iter().filter_map(Device::handle) {
            self.provider.release(handle);
        }
    }
}
