//! Keyboard device

use hashbrown::HashMap;
use winit::keyboard::KeyCode;

use crate::config::ConfigSource;
use crate::input::direction::DirectionPriorityResolver;
use crate::input::{Buttons, PlayerSlot};

/// Keyboard feeding player 1.
///
/// Bindings come from the fixed `keyboard.*` keys:
/// `up, down, left, right, A, B, C, D, start`.
#[derive(Debug, Clone)]
pub struct KeyboardDevice {
    key_map: HashMap<KeyCode, Buttons>,
    /// Logical buttons physically held, directions unresolved
    held: Buttons,
    buttons: Buttons,
    directions: DirectionPriorityResolver,
}

impl KeyboardDevice {
    /// Load key bindings from config
    pub fn from_config(config: &impl ConfigSource) -> Self {
        let bindings = [
            (config.value_key(KeyCode::KeyW, "keyboard.up"), Buttons::UP),
            (config.value_key(KeyCode::KeyS, "keyboard.down"), Buttons::DOWN),
            (config.value_key(KeyCode::KeyA, "keyboard.left"), Buttons::LEFT),
            (config.value_key(KeyCode::KeyD, "keyboard.right"), Buttons::RIGHT),
            (config.value_key(KeyCode::KeyH, "keyboard.A"), Buttons::A),
            (config.value_key(KeyCode::KeyJ, "keyboard.B"), Buttons::B),
            (config.value_key(KeyCode::KeyK, "keyboard.C"), Buttons::C),
            (config.value_key(KeyCode::KeyL, "keyboard.D"), Buttons::D),
            (config.value_key(KeyCode::Enter, "keyboard.start"), Buttons::START),
        ];

        Self {
            key_map: bindings.into_iter().collect(),
            held: Buttons::empty(),
            buttons: Buttons::empty(),
            directions: DirectionPriorityResolver::new(),
        }
    }

    /// Logical button bound to `key`, if any
    pub fn binding(&self, key: KeyCode) -> Option<Buttons> {
        self.key_map.get(&key).copied()
    }

    /// Apply a key transition
    pub fn update_key(&mut self, key: KeyCode, pressed: bool) {
        let Some(mask) = self.binding(key) else {
            return;
        };

        self.held.set(mask, pressed);
        let direction = self.directions.update(self.held & Buttons::DIRECTIONS);
        self.buttons = (self.held - Buttons::DIRECTIONS) | direction;
    }

    /// The keyboard only ever drives player 1
    pub fn buttons(&self, player: PlayerSlot) -> Buttons {
        match player {
            PlayerSlot::One => self.buttons,
            PlayerSlot::Two => Buttons::empty(),
        }
    }

    pub fn clear_buttons(&mut self) {
        self.held = Buttons::empty();
        self.buttons = Buttons::empty();
        self.directions.clear();
    }
}
