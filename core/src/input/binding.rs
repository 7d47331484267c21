//! Raw capability -> logical meaning table

use crate::config::ConfigSource;

use super::Buttons;
use super::provider::{DeviceDescriptor, ValueCapability};

/// Which pair of directions an axis drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisRole {
    UpDown,
    LeftRight,
}

/// What a raw capability means to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalMeaning {
    Button(Buttons),
    Axis(AxisRole),
    /// Discrete hat switch, converted through the fixed hat table
    Hat,
    None,
}

/// Raw capability identifier as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawCapability {
    /// Button index relative to the lowest button usage
    Button(usize),
    /// Index into the device's value capabilities
    Value(usize),
}

/// Default button indices when a device namespace leaves them unset.
const DEFAULT_A: i32 = 1;
const DEFAULT_B: i32 = 2;
const DEFAULT_C: i32 = 3;
const DEFAULT_D: i32 = 0;
const DEFAULT_START: i32 = 7;
const DEFAULT_DEADZONE: f32 = 0.5;

/// Per-device binding, built once at attach time and immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct CapabilityBinding {
    lowest_usage: u16,
    button_masks: Vec<Buttons>,
    value_caps: Vec<ValueCapability>,
    axis_roles: Vec<Option<AxisRole>>,
    deadzone: f32,
}

impl CapabilityBinding {
    /// Build the binding from the `<namespace>.*` config keys.
    ///
    /// Indices that are unset or outside the device's capability range bind
    /// to nothing. When several logical buttons share an index the later one
    /// in `up, down, left, right, A, B, C, D, start` order wins.
    pub fn from_config(
        config: &impl ConfigSource,
        namespace: &str,
        descriptor: &DeviceDescriptor,
    ) -> Self {
        let key = |name: &str| format!("{namespace}.{name}");

        let (lowest_usage, button_count) = descriptor
            .button_caps
            .first()
            .map_or((0, 0), |caps| (caps.usage_min, caps.count()));

        let mut button_masks = vec![Buttons::empty(); button_count];
        let bindings = [
            (config.value_int(-1, &key("up")), Buttons::UP),
            (config.value_int(-1, &key("down")), Buttons::DOWN),
            (config.value_int(-1, &key("left")), Buttons::LEFT),
            (config.value_int(-1, &key("right")), Buttons::RIGHT),
            (config.value_int(DEFAULT_A, &key("A")), Buttons::A),
            (config.value_int(DEFAULT_B, &key("B")), Buttons::B),
            (config.value_int(DEFAULT_C, &key("C")), Buttons::C),
            (config.value_int(DEFAULT_D, &key("D")), Buttons::D),
            (config.value_int(DEFAULT_START, &key("start")), Buttons::START),
        ];
        for (index, mask) in bindings {
            if let Some(slot) = checked_index(index, button_masks.len()) {
                button_masks[slot] = mask;
            }
        }

        let mut axis_roles = vec![None; descriptor.value_caps.len()];
        let axes = [
            (config.value_int(-1, &key("up_down")), AxisRole::UpDown),
            (config.value_int(-1, &key("left_right")), AxisRole::LeftRight),
        ];
        for (index, role) in axes {
            if let Some(slot) = checked_index(index, axis_roles.len()) {
                axis_roles[slot] = Some(role);
            }
        }

        Self {
            lowest_usage,
            button_masks,
            value_caps: descriptor.value_caps.clone(),
            axis_roles,
            deadzone: config.value_float(DEFAULT_DEADZONE, &key("deadzone")),
        }
    }

    /// Logical meaning of a raw capability
    pub fn bind(&self, raw: RawCapability) -> LogicalMeaning {
        match raw {
            RawCapability::Button(index) => match self.button_masks.get(index) {
                Some(mask) if !mask.is_empty() => LogicalMeaning::Button(*mask),
                _ => LogicalMeaning::None,
            },
            RawCapability::Value(index) => {
                if self.value_caps.get(index).is_some_and(ValueCapability::is_hat) {
                    return LogicalMeaning::Hat;
                }
                match self.axis_roles.get(index) {
                    Some(Some(role)) => LogicalMeaning::Axis(*role),
                    _ => LogicalMeaning::None,
                }
            }
        }
    }

    /// Logical meaning of a held button usage
    pub fn bind_usage(&self, usage: u16) -> LogicalMeaning {
        match usage.checked_sub(self.lowest_usage) {
            Some(index) => self.bind(RawCapability::Button(usize::from(index))),
            None => LogicalMeaning::None,
        }
    }

    /// Value capability descriptor by index
    pub fn value_cap(&self, index: usize) -> Option<&ValueCapability> {
        self.value_caps.get(index)
    }

    pub fn deadzone(&self) -> f32 {
        self.deadzone
    }

    pub fn button_count(&self) -> usize {
        self.button_masks.len()
    }
}

fn checked_index(index: i32, len: usize) -> Option<usize> {
    usize::try_from(index).ok().filter(|&i| i < len)
}
