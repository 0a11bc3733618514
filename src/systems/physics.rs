//! Physics systems.
//!
//! - [`physics_step_system`] advances the [`PhysicsWorld`] by one step.
//! - [`sync_attached_sprites`] moves each player sprite onto its body.
use bevy_ecs::prelude::*;

use crate::components::player::PlayerSubmarine;
use crate::controller::{PhysicsEngine, RenderHandle};
use crate::resources::physics::PhysicsWorld;
use crate::resources::worldtime::WorldTime;

pub fn physics_step_system(mut physics: ResMut<PhysicsWorld>, time: Res<WorldTime>) {
    if time.is_paused() {
        return;
    }
    physics.step();
}

pub fn sync_attached_sprites(mut query: Query<&mut PlayerSubmarine>, physics: Res<PhysicsWorld>) {
    for mut player in query.iter_mut() {
        let render = player.controller.render_mut();
        if let Some(position) = render.attached_body().and_then(|body| physics.position(body)) {
            render.set_position(position);
        }
    }
}
