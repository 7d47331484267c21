//! Last-pressed-wins directional override

use smallvec::SmallVec;

use super::Buttons;

/// Turns a raw directional mask into a single active direction.
///
/// Held directions are kept most-recent first. A newly pressed direction goes
/// to the front, a released one is removed wherever it sits, and the front
/// entry is the visible direction. Each direction appears at most once.
#[derive(Debug, Clone, Default)]
pub struct DirectionPriorityResolver {
    held: SmallVec<[Buttons; 4]>,
    previous: Buttons,
}

impl DirectionPriorityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed this update's raw directions and return the resolved direction.
    ///
    /// Non-directional bits in `raw` are ignored. Directions pressed in the
    /// same update are pushed in ascending bit order, so the highest bit wins.
    pub fn update(&mut self, raw: Buttons) -> Buttons {
        let raw = raw & Buttons::DIRECTIONS;
        let changed = raw ^ self.previous;
        let pressed = changed & raw;
        let released = changed & self.previous;

        for bit in 0..u16::BITS {
            let mask = Buttons::from_bits_retain(1 << bit);
            if !Buttons::DIRECTIONS.contains(mask) {
                continue;
            }

            if pressed.contains(mask) {
                if !self.held.contains(&mask) {
                    self.held.insert(0, mask);
                }
            } else if released.contains(mask) {
                self.held.retain(|held| *held != mask);
            }
        }

        self.previous = raw;
        self.active()
    }

    /// Currently visible direction (empty if nothing is held)
    pub fn active(&self) -> Buttons {
        self.held.first().copied().unwrap_or_default()
    }

    /// Held directions, most recently pressed first
    pub fn held(&self) -> &[Buttons] {
        &self.held
    }

    /// Forget every held direction (used on focus loss)
    pub fn clear(&mut self) {
        self.held.clear();
        self.previous = Buttons::empty();
    }
}
