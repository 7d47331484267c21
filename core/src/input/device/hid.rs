//! HID-like controller device

use crate::config::ConfigSource;
use crate::input::axis::{axis_direction, axis_position, hat_direction};
use crate::input::binding::{CapabilityBinding, LogicalMeaning, RawCapability};
use crate::input::direction::DirectionPriorityResolver;
use crate::input::provider::{DeviceDescriptor, DeviceHandle, HidReport};
use crate::input::{Buttons, PlayerSlot};

/// A joystick or gamepad assigned to one player.
///
/// Configured under `joystick.<name>`; the `player` key must be 1 or 2 for
/// the device to attach at all.
#[derive(Debug, Clone)]
pub struct HidDevice {
    handle: DeviceHandle,
    name: String,
    player: PlayerSlot,
    descriptor: DeviceDescriptor,
    binding: CapabilityBinding,
    directions: DirectionPriorityResolver,
    buttons: Buttons,
}

impl HidDevice {
    /// Build a device from its config namespace.
    ///
    /// `name` is the (possibly de-duplicated) device name. Returns `None`
    /// when `joystick.<name>.player` is missing or not 1 or 2.
    pub fn from_config(
        config: &impl ConfigSource,
        name: &str,
        handle: DeviceHandle,
        descriptor: DeviceDescriptor,
    ) -> Option<Self> {
        let namespace = format!("joystick.{name}");
        let player = PlayerSlot::from_config(config.value_int(0, &format!("{namespace}.player")))?;
        let binding = CapabilityBinding::from_config(config, &namespace, &descriptor);

        Some(Self {
            handle,
            name: name.to_string(),
            player,
            descriptor,
            binding,
            directions: DirectionPriorityResolver::new(),
            buttons: Buttons::empty(),
        })
    }

    pub fn handle(&self) -> DeviceHandle {
        self.handle
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn player(&self) -> PlayerSlot {
        self.player
    }

    pub fn descriptor(&self) -> &DeviceDescriptor {
        &self.descriptor
    }

    pub fn binding(&self) -> &CapabilityBinding {
        &self.binding
    }

    /// Recompute the button mask from a decoded report.
    ///
    /// Each report describes the full device state, so the mask is rebuilt
    /// from scratch rather than patched.
    pub fn update_report(&mut self, report: &HidReport) {
        let mut raw = Buttons::empty();

        for (index, value) in report.values.iter().enumerate() {
            let Some(value) = *value else {
                continue;
            };
            match self.binding.bind(RawCapability::Value(index)) {
                LogicalMeaning::Hat => raw |= hat_direction(value),
                LogicalMeaning::Axis(role) => {
                    let Some(cap) = self.binding.value_cap(index) else {
                        continue;
                    };
                    if let Some(position) = axis_position(value, cap.logical_min, cap.logical_max)
                    {
                        raw |= axis_direction(position, self.binding.deadzone(), role);
                    }
                }
                LogicalMeaning::Button(_) | LogicalMeaning::None => {}
            }
        }

        for &usage in &report.pressed_usages {
            if let LogicalMeaning::Button(mask) = self.binding.bind_usage(usage) {
                raw |= mask;
            }
        }

        let direction = self.directions.update(raw & Buttons::DIRECTIONS);
        self.buttons = (raw - Buttons::DIRECTIONS) | direction;
    }

    /// Buttons this device contributes to `player`
    pub fn buttons(&self, player: PlayerSlot) -> Buttons {
        if player == self.player {
            self.buttons
        } else {
            Buttons::empty()
        }
    }

    pub fn clear_buttons(&mut self) {
        self.buttons = Buttons::empty();
        self.directions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::input::HAT_SWITCH_USAGE;
    use crate::input::provider::{ButtonCapability, ValueCapability};
    use smallvec::smallvec;

    const X_USAGE: u16 = 0x30;
    const Y_USAGE: u16 = 0x31;

    fn pad_descriptor() -> DeviceDescriptor {
        let axis = |usage| ValueCapability {
            usage_page: 0x01,
            usage,
            logical_min: 0,
            logical_max: 100,
        };
        DeviceDescriptor {
            name: "Arcade Stick".to_string(),
            button_caps: vec![ButtonCapability {
                usage_page: 0x09,
                usage_min: 1,
                usage_max: 10,
            }],
            value_caps: vec![
                axis(X_USAGE),
                axis(Y_USAGE),
                ValueCapability {
                    usage_page: 0x01,
                    usage: HAT_SWITCH_USAGE,
                    logical_min: 0,
                    logical_max: 7,
                },
            ],
        }
    }

    fn pad_config(player: &str) -> Config {
        let mut config = Config::new();
        config.set("joystick.Arcade Stick.player", player);
        config.set("joystick.Arcade Stick.left_right", "0");
        config.set("joystick.Arcade Stick.up_down", "1");
        config
    }

    fn pad(player: &str) -> Option<HidDevice> {
        HidDevice::from_config(
            &pad_config(player),
            "Arcade Stick",
            DeviceHandle(1),
            pad_descriptor(),
        )
    }

    fn report(usages: &[u16], x: i32, y: i32, hat: i32) -> HidReport {
        HidReport {
            pressed_usages: usages.iter().copied().collect(),
            values: vec![Some(x), Some(y), Some(hat)],
        }
    }

    // === Player assignment ===

    #[test]
    fn test_player_must_be_one_or_two() {
        assert_eq!(pad("1").map(|p| p.player()), Some(PlayerSlot::One));
        assert_eq!(pad("2").map(|p| p.player()), Some(PlayerSlot::Two));
        assert!(pad("3").is_none());
        assert!(pad("0").is_none());
        assert!(
            HidDevice::from_config(&Config::new(), "Arcade Stick", DeviceHandle(1), pad_descriptor())
                .is_none()
        );
    }

    #[test]
    fn test_buttons_only_reach_own_player() {
        let mut device = pad("2").unwrap();
        // usage 2 is button index 1 -> A
        device.update_report(&report(&[2], 50, 50, 8));
        assert_eq!(device.buttons(PlayerSlot::Two), Buttons::A);
        assert_eq!(device.buttons(PlayerSlot::One), Buttons::empty());
    }

    // === Report decoding ===

    #[test]
    fn test_default_button_usages() {
        let mut device = pad("1").unwrap();
        // usage 1 -> D, usage 8 -> START
        device.update_report(&report(&[1, 8], 50, 50, 8));
        assert_eq!(device.buttons(PlayerSlot::One), Buttons::D | Buttons::START);

        device.update_report(&report(&[], 50, 50, 8));
        assert_eq!(device.buttons(PlayerSlot::One), Buttons::empty());
    }

    #[test]
    fn test_axis_outside_deadzone() {
        let mut device = pad("1").unwrap();
        device.update_report(&report(&[], 100, 50, 8));
        assert_eq!(device.buttons(PlayerSlot::One), Buttons::RIGHT);

        device.update_report(&report(&[], 50, 0, 8));
        assert_eq!(device.buttons(PlayerSlot::One), Buttons::UP);
    }

    #[test]
    fn test_axis_at_deadzone_is_ignored() {
        let mut device = pad("1").unwrap();
        device.update_report(&report(&[], 75, 25, 8));
        assert_eq!(device.buttons(PlayerSlot::One), Buttons::empty());
    }

    #[test]
    fn test_hat_cardinals() {
        let mut device = pad("1").unwrap();
        for (hat, expected) in [
            (0, Buttons::UP),
            (2, Buttons::RIGHT),
            (4, Buttons::DOWN),
            (6, Buttons::LEFT),
            (1, Buttons::empty()),
            (8, Buttons::empty()),
        ] {
            device.clear_buttons();
            device.update_report(&report(&[], 50, 50, hat));
            assert_eq!(device.buttons(PlayerSlot::One), expected, "hat value {hat}");
        }
    }

    #[test]
    fn test_latest_direction_wins_across_sources() {
        let mut device = pad("1").unwrap();
        device.update_report(&report(&[], 50, 50, 0));
        assert_eq!(device.buttons(PlayerSlot::One), Buttons::UP);

        // stick pushed right while hat still up
        device.update_report(&report(&[], 100, 50, 0));
        assert_eq!(device.buttons(PlayerSlot::One), Buttons::RIGHT);

        device.update_report(&report(&[], 50, 50, 0));
        assert_eq!(device.buttons(PlayerSlot::One), Buttons::UP);
    }

    #[test]
    fn test_missing_values_are_skipped() {
        let mut device = pad("1").unwrap();
        let partial = HidReport {
            pressed_usages: smallvec![3],
            values: vec![None, None, None],
        };
        device.update_report(&partial);
        assert_eq!(device.buttons(PlayerSlot::One), Buttons::B);
    }

    #[test]
    fn test_clear_buttons() {
        let mut device = pad("1").unwrap();
        device.update_report(&report(&[2], 0, 50, 8));
        device.clear_buttons();
        assert_eq!(device.buttons(PlayerSlot::One), Buttons::empty());
    }
}
