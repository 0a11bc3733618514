//! Render system.
//!
//! Draws obstacles as rocks, then each player submarine. Sprites whose sheet
//! is loaded in the [`TextureStore`] are cut from it; the others fall back to
//! a circle the size of the body with a short line showing the heading.
use bevy_ecs::prelude::*;
use raylib::prelude::*;

use crate::components::player::{Obstacle, PlayerSubmarine};
use crate::components::sprite::Sprite;
use crate::resources::physics::PhysicsWorld;
use crate::resources::texturestore::TextureStore;

const BACKGROUND: Color = Color::new(12, 40, 72, 255);
const ROCK: Color = Color::new(90, 84, 78, 255);

pub fn render_system(
    mut rl: NonSendMut<raylib::RaylibHandle>,
    th: NonSend<raylib::RaylibThread>,
    textures: Res<TextureStore>,
    physics: Res<PhysicsWorld>,
    players: Query<&PlayerSubmarine>,
    obstacles: Query<&Obstacle>,
) {
    let mut d = rl.begin_drawing(&th);
    d.clear_background(BACKGROUND);

    for obstacle in obstacles.iter() {
        if let Some(body) = physics.body(obstacle.body) {
            d.draw_circle_v(body.position, body.radius, ROCK);
        }
    }

    for player in players.iter() {
        let controller = &player.controller;
        let sprite = &controller.render().sprite;
        if !sprite.visible {
            continue;
        }
        match textures.get(&sprite.tex_key) {
            Some(tex) => draw_sprite(&mut d, tex, sprite),
            None => draw_placeholder(&mut d, sprite, controller.config().radius),
        }
        if let Some(state) = controller.state() {
            d.draw_text(&format!("{}: {}", controller.config().label, state), 10, 10, 20, Color::RAYWHITE);
        }
    }
}

fn draw_sprite(d: &mut impl RaylibDraw, tex: &Texture2D, sprite: &Sprite) {
    let columns = (tex.width as f32 / sprite.frame_width).floor().max(1.0) as u32;
    let offset = sprite.frame_offset(columns);
    // Negative source width makes raylib sample the frame mirrored.
    let src = Rectangle {
        x: offset.x,
        y: offset.y,
        width: if sprite.flip_x { -sprite.frame_width } else { sprite.frame_width },
        height: sprite.frame_height,
    };
    let dest = Rectangle {
        x: sprite.position.x,
        y: sprite.position.y,
        width: sprite.frame_width,
        height: sprite.frame_height,
    };
    d.draw_texture_pro(tex, src, dest, sprite.pivot(), 0.0, Color::WHITE);
}

fn draw_placeholder(d: &mut impl RaylibDraw, sprite: &Sprite, radius: f32) {
    d.draw_circle_v(sprite.position, radius, Color::GOLD);
    let heading = if sprite.flip_x { radius } else { -radius };
    d.draw_line_v(
        sprite.position,
        Vector2 {
            x: sprite.position.x + heading * 1.5,
            y: sprite.position.y,
        },
        Color::ORANGE,
    );
}
