//! Axis and hat switch conversion to directional bits

use super::Buttons;
use super::binding::AxisRole;

/// HID usage identifying a hat switch value capability
pub const HAT_SWITCH_USAGE: u16 = 0x39;

/// Hat position -> direction. Only the cardinal positions produce a bit;
/// diagonals and the centered value (8) contribute nothing.
const HAT_DIRECTIONS: [Buttons; 9] = [
    Buttons::UP,
    Buttons::empty(),
    Buttons::RIGHT,
    Buttons::empty(),
    Buttons::DOWN,
    Buttons::empty(),
    Buttons::LEFT,
    Buttons::empty(),
    Buttons::empty(),
];

/// Rescale a raw axis value from its logical range to `[-1.0, 1.0]`.
///
/// Returns `None` for a degenerate range.
pub fn axis_position(value: i32, logical_min: i32, logical_max: i32) -> Option<f32> {
    if logical_max <= logical_min {
        return None;
    }
    let span = (logical_max as f64 - logical_min as f64) as f32;
    let offset = (value as f64 - logical_min as f64) as f32;
    Some((offset / span - 0.5) * 2.0)
}

/// Direction produced by a rescaled axis position.
///
/// Positions whose magnitude does not exceed the deadzone produce nothing.
/// Positive values point down / right.
pub fn axis_direction(position: f32, deadzone: f32, role: AxisRole) -> Buttons {
    if position.abs() <= deadzone {
        return Buttons::empty();
    }
    match (role, position > 0.0) {
        (AxisRole::UpDown, true) => Buttons::DOWN,
        (AxisRole::UpDown, false) => Buttons::UP,
        (AxisRole::LeftRight, true) => Buttons::RIGHT,
        (AxisRole::LeftRight, false) => Buttons::LEFT,
    }
}

/// Direction produced by a raw hat switch value
pub fn hat_direction(value: i32) -> Buttons {
    usize::try_from(value)
        .ok()
        .and_then(|idx| HAT_DIRECTIONS.get(idx))
        .copied()
        .unwrap_or_default()
}
