use bevy_ecs::prelude::Component;

use crate::components::rigidbody::BodyHandle;
use crate::components::spriterenderer::SpriteRenderer;
use crate::controller::SubmarineController;

/// Entity driven by the keyboard through a submarine controller.
#[derive(Component)]
pub struct PlayerSubmarine {
    pub controller: SubmarineController<SpriteRenderer>,
}

impl PlayerSubmarine {
    pub fn new(controller: SubmarineController<SpriteRenderer>) -> Self {
        Self { controller }
    }
}

/// Static body drawn as a rock.
#[derive(Component, Debug, Clone, Copy)]
pub struct Obstacle {
    pub body: BodyHandle,
}
