//! Aggregator tests driven by a scripted capability provider

use std::cell::RefCell;
use std::rc::Rc;

use hashbrown::HashMap;
use winit::keyboard::KeyCode;

use super::*;
use crate::config::Config;

/// Provider whose reports are encoded as `[buttons..., 0xFF, hat]`.
#[derive(Default)]
struct FakeProvider {
    devices: Vec<(DeviceHandle, Result<DeviceDescriptor, ProviderError>)>,
    released: Rc<RefCell<Vec<DeviceHandle>>>,
}

impl FakeProvider {
    fn with(mut self, handle: u64, name: &str) -> Self {
        self.devices.push((DeviceHandle(handle), Ok(pad(name))));
        self
    }

    fn with_broken(mut self, handle: u64) -> Self {
        self.devices.push((
            DeviceHandle(handle),
            Err(ProviderError::Capabilities("access denied".to_string())),
        ));
        self
    }
}

fn pad(name: &str) -> DeviceDescriptor {
    DeviceDescriptor {
        name: name.to_string(),
        button_caps: vec![ButtonCapability {
            usage_page: 0x09,
            usage_min: 1,
            usage_max: 8,
        }],
        value_caps: vec![ValueCapability {
            usage_page: 0x01,
            usage: HAT_SWITCH_USAGE,
            logical_min: 0,
            logical_max: 7,
        }],
    }
}

impl CapabilityProvider for FakeProvider {
    fn enumerate(&mut self) -> Vec<DeviceHandle> {
        self.devices.iter().map(|(handle, _)| *handle).collect()
    }

    fn describe(&mut self, handle: DeviceHandle) -> Result<DeviceDescriptor, ProviderError> {
        self.devices
            .iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, d)| d.clone())
            .unwrap_or(Err(ProviderError::Unavailable(handle)))
    }

    fn parse_report(
        &mut self,
        _handle: DeviceHandle,
        _descriptor: &DeviceDescriptor,
        data: &[u8],
    ) -> Result<HidReport, ProviderError> {
        let split = data
            .iter()
            .position(|&b| b == 0xFF)
            .ok_or_else(|| ProviderError::Report("missing separator".to_string()))?;
        let hat = data.get(split + 1).map(|&h| i32::from(h));
        Ok(HidReport {
            pressed_usages: data[..split].iter().map(|&b| u16::from(b)).collect(),
            values: vec![hat],
        })
    }

    fn release(&mut self, handle: DeviceHandle) {
        self.released.borrow_mut().push(handle);
    }
}

fn config(players: &[(&str, i32)]) -> Config {
    let mut config = Config::new();
    for (name, player) in players {
        config.set(format!("joystick.{name}.player"), player.to_string());
    }
    config
}

fn key(aggregator: &mut InputAggregator<FakeProvider>, key: KeyCode, pressed: bool) {
    aggregator.update(RawReport::Key { key, pressed });
}

fn hid(aggregator: &mut InputAggregator<FakeProvider>, handle: u64, data: &[u8]) {
    aggregator.update(RawReport::Hid {
        handle: DeviceHandle(handle),
        data,
    });
}

// === Attachment ===

#[test]
fn test_attach_configured_keyboard_only() {
    let mut aggregator = InputAggregator::new(FakeProvider::default());
    assert_eq!(aggregator.attach_configured(&Config::new()), 1);
    assert_eq!(aggregator.devices().len(), 1);
    assert_eq!(aggregator.devices()[0].name(), "keyboard");
    assert_eq!(aggregator.devices()[0].required_capabilities(), &[0x06]);
}

#[test]
fn test_devices_without_valid_player_are_rejected() {
    let provider = FakeProvider::default()
        .with(1, "Pad One")
        .with(2, "Pad Three")
        .with(3, "Pad None");
    let mut aggregator = InputAggregator::new(provider);
    let attached =
        aggregator.attach_configured(&config(&[("Pad One", 1), ("Pad Three", 3)]));

    assert_eq!(attached, 2);
    assert!(aggregator.device(DeviceHandle(1)).is_some());
    assert!(aggregator.device(DeviceHandle(2)).is_none());
    assert!(aggregator.device(DeviceHandle(3)).is_none());
    assert_eq!(
        *aggregator.provider().released.borrow(),
        vec![DeviceHandle(2), DeviceHandle(3)]
    );
}

#[test]
fn test_duplicate_names_get_counter() {
    let provider = FakeProvider::default()
        .with(10, "USB Gamepad")
        .with(11, "USB Gamepad")
        .with(12, "USB Gamepad");
    let mut aggregator = InputAggregator::new(provider);
    aggregator.attach_configured(&config(&[
        ("USB Gamepad", 1),
        ("USB Gamepad 2", 2),
        ("USB Gamepad 3", 2),
    ]));

    let names: Vec<_> = aggregator.devices().iter().map(|d| d.name().to_string()).collect();
    assert_eq!(
        names,
        ["keyboard", "USB Gamepad", "USB Gamepad 2", "USB Gamepad 3"]
    );
}

#[test]
fn test_capability_failure_skips_device() {
    let provider = FakeProvider::default().with_broken(1).with(2, "Good Pad");
    let mut aggregator = InputAggregator::new(provider);
    assert_eq!(aggregator.attach_configured(&config(&[("Good Pad", 1)])), 2);
    assert!(aggregator.device(DeviceHandle(1)).is_none());
    assert!(aggregator.device(DeviceHandle(2)).is_some());
    assert_eq!(*aggregator.provider().released.borrow(), vec![DeviceHandle(1)]);
}

#[test]
fn test_drop_releases_handles() {
    let provider = FakeProvider::default().with(7, "Pad").with(8, "Other");
    let released = Rc::clone(&provider.released);
    let mut aggregator = InputAggregator::new(provider);
    aggregator.attach_configured(&config(&[("Pad", 1)]));
    assert_eq!(*released.borrow(), vec![DeviceHandle(8)]);

    drop(aggregator);
    assert_eq!(*released.borrow(), vec![DeviceHandle(8), DeviceHandle(7)]);
}

// === Dispatch and combination ===

#[test]
fn test_keyboard_override_sequence() {
    let mut aggregator = InputAggregator::new(FakeProvider::default());
    aggregator.attach_configured(&Config::new());

    key(&mut aggregator, KeyCode::KeyW, true);
    assert_eq!(aggregator.combined_buttons(PlayerSlot::One), Buttons::UP);
    key(&mut aggregator, KeyCode::KeyA, true);
    assert_eq!(aggregator.combined_buttons(PlayerSlot::One), Buttons::LEFT);
    key(&mut aggregator, KeyCode::KeyW, false);
    assert_eq!(aggregator.combined_buttons(PlayerSlot::One), Buttons::LEFT);
    key(&mut aggregator, KeyCode::KeyA, false);
    assert_eq!(aggregator.combined_buttons(PlayerSlot::One), Buttons::empty());
}

#[test]
fn test_devices_for_same_player_or_together() {
    let provider = FakeProvider::default().with(1, "Pad A").with(2, "Pad B");
    let mut aggregator = InputAggregator::new(provider);
    aggregator.attach_configured(&config(&[("Pad A", 1), ("Pad B", 2)]));

    key(&mut aggregator, KeyCode::KeyH, true);
    // usage 3 -> B on the player 1 pad, usage 2 -> A on the player 2 pad
    hid(&mut aggregator, 1, &[3, 0xFF, 8]);
    hid(&mut aggregator, 2, &[2, 0xFF, 4]);

    assert_eq!(
        aggregator.combined_buttons(PlayerSlot::One),
        Buttons::A | Buttons::B
    );
    assert_eq!(
        aggregator.combined_buttons(PlayerSlot::Two),
        Buttons::A | Buttons::DOWN
    );
}

#[test]
fn test_unknown_handle_is_ignored() {
    let provider = FakeProvider::default().with(1, "Pad");
    let mut aggregator = InputAggregator::new(provider);
    aggregator.attach_configured(&config(&[("Pad", 1)]));

    hid(&mut aggregator, 99, &[2, 0xFF, 0]);
    assert_eq!(aggregator.combined_buttons(PlayerSlot::One), Buttons::empty());
    assert_eq!(aggregator.combined_buttons(PlayerSlot::Two), Buttons::empty());
}

#[test]
fn test_unparseable_report_clears_device() {
    let provider = FakeProvider::default().with(1, "Pad");
    let mut aggregator = InputAggregator::new(provider);
    aggregator.attach_configured(&config(&[("Pad", 1)]));

    hid(&mut aggregator, 1, &[2, 0xFF, 0]);
    assert_eq!(
        aggregator.combined_buttons(PlayerSlot::One),
        Buttons::A | Buttons::UP
    );
    hid(&mut aggregator, 1, &[2]);
    assert_eq!(aggregator.combined_buttons(PlayerSlot::One), Buttons::empty());
}

#[test]
fn test_clear_all_prevents_stuck_keys() {
    let provider = FakeProvider::default().with(1, "Pad");
    let mut aggregator = InputAggregator::new(provider);
    aggregator.attach_configured(&config(&[("Pad", 1)]));

    key(&mut aggregator, KeyCode::KeyW, true);
    key(&mut aggregator, KeyCode::KeyJ, true);
    hid(&mut aggregator, 1, &[8, 0xFF, 6]);
    aggregator.clear_all();
    assert_eq!(aggregator.combined_buttons(PlayerSlot::One), Buttons::empty());

    // same hat value after the clear registers as a fresh press
    hid(&mut aggregator, 1, &[0xFF, 6]);
    assert_eq!(aggregator.combined_buttons(PlayerSlot::One), Buttons::LEFT);
}

#[test]
fn test_manual_attach() {
    let mut aggregator = InputAggregator::new(NoDevices);
    let mut config = Config::new();
    config.set("keyboard.A", "Space");
    aggregator.attach(KeyboardDevice::from_config(&config));

    aggregator.update(RawReport::Key {
        key: KeyCode::Space,
        pressed: true,
    });
    assert_eq!(aggregator.combined_buttons(PlayerSlot::One), Buttons::A);
}

#[test]
fn test_device_descriptors_by_name() {
    let provider = FakeProvider::default().with(4, "Stick").with(5, "Stick");
    let mut aggregator = InputAggregator::new(provider);
    aggregator.attach_configured(&config(&[("Stick", 2), ("Stick 2", 1)]));

    let players: HashMap<String, PlayerSlot> = aggregator
        .devices()
        .iter()
        .filter_map(|d| match d {
            Device::Hid(hid) => Some((hid.name().to_string(), hid.player())),
            Device::Keyboard(_) => None,
        })
        .collect();
    assert_eq!(players.get("Stick"), Some(&PlayerSlot::Two));
    assert_eq!(players.get("Stick 2"), Some(&PlayerSlot::One));
}
