//! Sprite with its own animation clips, usable as a [`RenderHandle`].
//!
//! [`SpriteRenderer`] bundles the [`Sprite`] being drawn, the
//! [`AnimationPlayer`] stepping through the active clip, and the clips
//! registered for this sprite. The
//! [`sprite_animation_system`](crate::systems::animation::sprite_animation_system)
//! calls [`SpriteRenderer::advance`] once per frame, and
//! [`sync_attached_sprites`](crate::systems::physics::sync_attached_sprites)
//! keeps `sprite.position` on the attached body.

use log::debug;
use raylib::prelude::Vector2;
use rustc_hash::FxHashMap;

use crate::components::animation::{AnimationClip, AnimationPlayer};
use crate::components::rigidbody::BodyHandle;
use crate::components::sprite::Sprite;
use crate::controller::{RenderError, RenderHandle};

#[derive(Debug, Clone)]
pub struct SpriteRenderer {
    pub sprite: Sprite,
    pub player: AnimationPlayer,
    clips: FxHashMap<String, AnimationClip>,
    body: Option<BodyHandle>,
    destroyed: bool,
}

impl SpriteRenderer {
    pub fn new(sprite: Sprite) -> Self {
        Self {
            sprite,
            player: AnimationPlayer::new(),
            clips: FxHashMap::default(),
            body: None,
            destroyed: false,
        }
    }

    pub fn clip(&self, key: &str) -> Option<&AnimationClip> {
        self.clips.get(key)
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Step playback by `dt` seconds and show the resulting frame.
    pub fn advance(&mut self, dt: f32) {
        if self.destroyed {
            return;
        }
        let Some(clip) = self.player.key.as_deref().and_then(|key| self.clips.get(key)) else {
            return;
        };
        if self.player.advance(clip, dt) {
            self.sprite.frame = self.player.frame(clip);
        }
    }

    fn start(&mut self, key: &str, reverse: bool, ignore_if_playing: bool) -> Result<(), RenderError> {
        if self.destroyed {
            return Err(RenderError::Destroyed);
        }
        let clip = self
            .clips
            .get(key)
            .ok_or_else(|| RenderError::UnknownAnimation(key.to_string()))?;
        if ignore_if_playing && self.player.is_playing(key, reverse) {
            return Ok(());
        }
        self.player.start(clip, reverse);
        self.sprite.frame = self.player.frame(clip);
        Ok(())
    }
}

impl RenderHandle for SpriteRenderer {
    fn create_animation(&mut self, clip: AnimationClip) -> Result<(), RenderError> {
        if self.destroyed {
            return Err(RenderError::Destroyed);
        }
        clip.validate()?;
        if self.clips.contains_key(&clip.key) {
            return Err(RenderError::DuplicateAnimation(clip.key));
        }
        debug!(
            "animation '{}' on '{}': frames {}..={} at {} fps, repeat {}",
            clip.key,
            clip.texture,
            clip.start,
            clip.end,
            clip.frame_rate,
            clip.repeat.count()
        );
        self.clips.insert(clip.key.clone(), clip);
        Ok(())
    }

    fn play(&mut self, key: &str, ignore_if_playing: bool) -> Result<(), RenderError> {
        self.start(key, false, ignore_if_playing)
    }

    fn play_reverse(&mut self, key: &str, ignore_if_playing: bool) -> Result<(), RenderError> {
        self.start(key, true, ignore_if_playing)
    }

    fn stop(&mut self) {
        self.player.stop();
    }

    fn set_flip_x(&mut self, flip: bool) {
        self.sprite.flip_x = flip;
    }

    fn set_origin(&mut self, origin: Vector2) {
        self.sprite.origin = origin;
    }

    fn position(&self) -> Vector2 {
        self.sprite.position
    }

    fn set_position(&mut self, position: Vector2) {
        self.sprite.position = position;
    }

    fn attach_body(&mut self, body: BodyHandle) {
        self.body = Some(body);
    }

    fn attached_body(&self) -> Option<BodyHandle> {
        self.body
    }

    fn destroy(&mut self) {
        self.destroyed = true;
        self.sprite.visible = false;
        self.player.stop();
        self.clips.clear();
        self.body = None;
    }
}
