//! Animation system.
//!
//! Advances the active clip of every player sprite by the scaled frame
//! delta from [`WorldTime`].
use bevy_ecs::prelude::*;

use crate::components::player::PlayerSubmarine;
use crate::resources::worldtime::WorldTime;

pub fn sprite_animation_system(mut query: Query<&mut PlayerSubmarine>, time: Res<WorldTime>) {
    for mut player in query.iter_mut() {
        player.controller.render_mut().advance(time.delta);
    }
}
