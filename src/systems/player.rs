//! Player submarine system.
//!
//! Runs every active [`PlayerSubmarine`] controller once per frame with the
//! current keyboard state and the shared physics world.
use bevy_ecs::prelude::*;
use log::error;

use crate::components::player::PlayerSubmarine;
use crate::resources::input::InputState;
use crate::resources::physics::PhysicsWorld;
use crate::resources::worldtime::WorldTime;

pub fn submarine_controller_system(
    mut query: Query<&mut PlayerSubmarine>,
    input: Res<InputState>,
    mut physics: ResMut<PhysicsWorld>,
    time: Res<WorldTime>,
) {
    if time.is_paused() {
        return;
    }
    for mut player in query.iter_mut() {
        let controller = &mut player.controller;
        if !controller.is_active() {
            continue;
        }
        if let Err(e) = controller.update(&*input, &mut *physics, time.delta) {
            error!("[{}] update failed: {}", controller.config().label, e);
        }
    }
}
