//! Per-frame keyboard input resource.
//!
//! [`InputState`] holds the keys the submarine reacts to. WASD drives the
//! main directions and the arrow keys mirror them, so either binding can
//! steer. The resource implements [`InputSnapshot`], which is all the
//! controller needs to read from it.
use bevy_ecs::prelude::*;
use raylib::prelude::*;

use crate::controller::{ControlKey, InputSnapshot};

#[derive(Debug, Clone, Copy)]
/// Boolean key state with an associated keyboard binding.
pub struct BoolState {
    /// Whether the key is held this frame.
    pub active: bool,
    /// Whether the key went down this frame.
    pub just_pressed: bool,
    /// Whether the key went up this frame.
    pub just_released: bool,

    /// The key bound to this action.
    pub key_binding: KeyboardKey,
}

impl BoolState {
    pub fn bound_to(key_binding: KeyboardKey) -> Self {
        Self {
            key_binding,
            ..Self::default()
        }
    }

    /// Record whether the key is down this frame, deriving the edge flags
    /// from the previous frame's state.
    pub fn set(&mut self, down: bool) {
        self.just_pressed = down && !self.active;
        self.just_released = !down && self.active;
        self.active = down;
    }
}

impl Default for BoolState {
    fn default() -> Self {
        Self {
            active: false,
            just_pressed: false,
            just_released: false,
            key_binding: KeyboardKey::KEY_NULL,
        }
    }
}

/// Resource capturing the per-frame keyboard state relevant to the submarine.
#[derive(Resource, Debug, Clone)]
pub struct InputState {
    pub maindirection_up: BoolState,
    pub maindirection_left: BoolState,
    pub maindirection_down: BoolState,
    pub maindirection_right: BoolState,
    // Arrow keys
    pub secondarydirection_up: BoolState,
    pub secondarydirection_down: BoolState,
    pub secondarydirection_left: BoolState,
    pub secondarydirection_right: BoolState,
    pub action_back: BoolState,
    pub action_1: BoolState,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            maindirection_up: BoolState::bound_to(KeyboardKey::KEY_W),
            maindirection_left: BoolState::bound_to(KeyboardKey::KEY_A),
            maindirection_down: BoolState::bound_to(KeyboardKey::KEY_S),
            maindirection_right: BoolState::bound_to(KeyboardKey::KEY_D),
            secondarydirection_up: BoolState::bound_to(KeyboardKey::KEY_UP),
            secondarydirection_down: BoolState::bound_to(KeyboardKey::KEY_DOWN),
            secondarydirection_left: BoolState::bound_to(KeyboardKey::KEY_LEFT),
            secondarydirection_right: BoolState::bound_to(KeyboardKey::KEY_RIGHT),
            action_back: BoolState::bound_to(KeyboardKey::KEY_ESCAPE),
            action_1: BoolState::bound_to(KeyboardKey::KEY_SPACE),
        }
    }
}

impl InputState {
    /// Every binding, for polling.
    pub fn states_mut(&mut self) -> [&mut BoolState; 10] {
        [
            &mut self.maindirection_up,
            &mut self.maindirection_left,
            &mut self.maindirection_down,
            &mut self.maindirection_right,
            &mut self.secondarydirection_up,
            &mut self.secondarydirection_down,
            &mut self.secondarydirection_left,
            &mut self.secondarydirection_right,
            &mut self.action_back,
            &mut self.action_1,
        ]
    }

    fn bindings(&self, key: ControlKey) -> (&BoolState, Option<&BoolState>) {
        match key {
            ControlKey::Up => (&self.maindirection_up, Some(&self.secondarydirection_up)),
            ControlKey::Down => (&self.maindirection_down, Some(&self.secondarydirection_down)),
            ControlKey::Left => (&self.maindirection_left, Some(&self.secondarydirection_left)),
            ControlKey::Right => (&self.maindirection_right, Some(&self.secondarydirection_right)),
            ControlKey::Action => (&self.action_1, None),
        }
    }
}

impl InputSnapshot for InputState {
    fn is_down(&self, key: ControlKey) -> bool {
        let (main, secondary) = self.bindings(key);
        main.active || secondary.is_some_and(|s| s.active)
    }

    fn just_pressed(&self, key: ControlKey) -> bool {
        let (main, secondary) = self.bindings(key);
        main.just_pressed || secondary.is_some_and(|s| s.just_pressed)
    }
}
