//! Input system.
//!
//! [`update_input_state`] reads the keyboard from Raylib each frame and
//! writes the result into [`InputState`].
use bevy_ecs::prelude::*;

use crate::resources::input::InputState;

/// Poll Raylib for every bound key and update the `InputState` resource.
pub fn update_input_state(mut input: ResMut<InputState>, rl: NonSend<raylib::RaylibHandle>) {
    poll_input(&rl, &mut input);
}

/// Refresh `input` from the keyboard state held by `rl`.
pub fn poll_input(rl: &raylib::RaylibHandle, input: &mut InputState) {
    for state in input.states_mut() {
        state.set(rl.is_key_down(state.key_binding));
    }
}
