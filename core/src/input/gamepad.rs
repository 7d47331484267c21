//! gilrs-backed capability provider
//!
//! Exposes every connected gamepad as a HID-like device with a fixed button
//! and axis order, so gamepads are configured with the same
//! `joystick.<name>.*` keys as any other controller.

use gilrs::{Axis, Button, GamepadId, Gilrs};
use smallvec::SmallVec;

use super::provider::{
    ButtonCapability, CapabilityProvider, DeviceDescriptor, DeviceHandle, HidReport,
    ProviderError, ValueCapability,
};

/// Button index order. Usage = index + 1.
const BUTTONS: [Button; 14] = [
    Button::West,
    Button::South,
    Button::East,
    Button::North,
    Button::LeftTrigger,
    Button::RightTrigger,
    Button::Select,
    Button::Start,
    Button::LeftThumb,
    Button::RightThumb,
    Button::DPadUp,
    Button::DPadDown,
    Button::DPadLeft,
    Button::DPadRight,
];

/// Axis index order with generic-desktop usages (X, Y, Rx, Ry)
const AXES: [(Axis, u16); 4] = [
    (Axis::LeftStickX, 0x30),
    (Axis::LeftStickY, 0x31),
    (Axis::RightStickX, 0x33),
    (Axis::RightStickY, 0x34),
];

/// gilrs axis values are scaled to `[-AXIS_SCALE, AXIS_SCALE]`
const AXIS_SCALE: i32 = 32767;

pub struct GilrsProvider {
    gilrs: Gilrs,
}

impl GilrsProvider {
    pub fn new() -> Result<Self, ProviderError> {
        let gilrs = Gilrs::new().map_err(|e| ProviderError::Capabilities(e.to_string()))?;
        Ok(Self { gilrs })
    }

    /// Drain pending gilrs events, returning handles whose state changed.
    ///
    /// The host feeds each returned handle back as an empty
    /// [`RawReport::Hid`](super::RawReport::Hid); the report is read from
    /// the gamepad's cached state.
    pub fn pump_events(&mut self) -> Vec<DeviceHandle> {
        let mut changed = Vec::new();
        while let Some(event) = self.gilrs.next_event() {
            let handle = handle_of(event.id);
            if !changed.contains(&handle) {
                changed.push(handle);
            }
        }
        changed
    }

    fn gamepad_id(&self, handle: DeviceHandle) -> Option<GamepadId> {
        self.gilrs
            .gamepads()
            .map(|(id, _)| id)
            .find(|&id| handle_of(id) == handle)
    }
}

fn handle_of(id: GamepadId) -> DeviceHandle {
    DeviceHandle(usize::from(id) as u64)
}

impl CapabilityProvider for GilrsProvider {
    fn enumerate(&mut self) -> Vec<DeviceHandle> {
        self.gilrs.gamepads().map(|(id, _)| handle_of(id)).collect()
    }

    fn describe(&mut self, handle: DeviceHandle) -> Result<DeviceDescriptor, ProviderError> {
        let id = self
            .gamepad_id(handle)
            .ok_or(ProviderError::Unavailable(handle))?;
        let gamepad = self.gilrs.gamepad(id);

        Ok(DeviceDescriptor {
            name: gamepad.name().to_string(),
            button_caps: vec![ButtonCapability {
                usage_page: 0x09,
                usage_min: 1,
                usage_max: BUTTONS.len() as u16,
            }],
            value_caps: AXES
                .iter()
                .map(|&(_, usage)| ValueCapability {
                    usage_page: 0x01,
                    usage,
                    logical_min: -AXIS_SCALE,
                    logical_max: AXIS_SCALE,
                })
                .collect(),
        })
    }

    fn parse_report(
        &mut self,
        handle: DeviceHandle,
        _descriptor: &DeviceDescriptor,
        _data: &[u8],
    ) -> Result<HidReport, ProviderError> {
        let id = self
            .gamepad_id(handle)
            .ok_or(ProviderError::Unavailable(handle))?;
        let gamepad = self.gilrs.gamepad(id);
        if !gamepad.is_connected() {
            return Err(ProviderError::Unavailable(handle));
        }

        let pressed_usages: SmallVec<[u16; 16]> = BUTTONS
            .iter()
            .enumerate()
            .filter(|&(_, &button)| gamepad.is_pressed(button))
            .map(|(index, _)| index as u16 + 1)
            .collect();

        let values = AXES
            .iter()
            .map(|&(axis, _)| {
                let value = gamepad.value(axis);
                // gilrs reports up as positive; HID convention is down-positive
                let value = match axis {
                    Axis::LeftStickY | Axis::RightStickY => -value,
                    _ => value,
                };
                Some((value * AXIS_SCALE as f32).round() as i32)
            })
            .collect();

        Ok(HidReport {
            pressed_usages,
            values,
        })
    }
}
