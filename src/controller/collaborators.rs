//! Services the controller drives but does not implement.
//!
//! A controller talks to three engine services through these traits:
//!
//! - [`RenderHandle`] – one sprite with its animation clips, owned by the controller
//! - [`PhysicsEngine`] – the shared simulation that owns rigid bodies
//! - [`InputSnapshot`] – per-frame key state supplied by the host
//!
//! The crate ships implementations used by the demo binary
//! ([`SpriteRenderer`](crate::components::spriterenderer::SpriteRenderer),
//! [`PhysicsWorld`](crate::resources::physics::PhysicsWorld) and
//! [`InputState`](crate::resources::input::InputState)), but the controller
//! only ever sees the traits.

use raylib::prelude::Vector2;

use crate::components::animation::AnimationClip;
use crate::components::rigidbody::{BodyHandle, BodyOptions};

use super::error::{PhysicsError, RenderError};

/// A drawable sprite that can play named animation clips.
pub trait RenderHandle {
    /// Register a clip under `clip.key`.
    fn create_animation(&mut self, clip: AnimationClip) -> Result<(), RenderError>;

    /// Play a registered clip from its first frame. With `ignore_if_playing`
    /// the call does nothing while the same clip is already running forward.
    fn play(&mut self, key: &str, ignore_if_playing: bool) -> Result<(), RenderError>;

    /// Play a registered clip from its last frame backwards.
    fn play_reverse(&mut self, key: &str, ignore_if_playing: bool) -> Result<(), RenderError>;

    /// Stop playback on the current frame.
    fn stop(&mut self);

    /// Mirror the sprite horizontally.
    fn set_flip_x(&mut self, flip: bool);

    /// Set the pivot as a fraction of the frame size (`0.5, 0.5` is the center).
    fn set_origin(&mut self, origin: Vector2);

    fn position(&self) -> Vector2;

    fn set_position(&mut self, position: Vector2);

    /// Bind a rigid body whose position the sprite follows.
    fn attach_body(&mut self, body: BodyHandle);

    fn attached_body(&self) -> Option<BodyHandle>;

    /// Release the sprite. Further play calls fail with [`RenderError::Destroyed`].
    fn destroy(&mut self);
}

/// Rigid-body simulation shared by every entity in the world.
pub trait PhysicsEngine {
    /// Create a circular body centered on `position`.
    fn create_circle(
        &mut self,
        position: Vector2,
        radius: f32,
        options: &BodyOptions,
    ) -> Result<BodyHandle, PhysicsError>;

    /// Bind `body` to `render` so the sprite follows the body.
    fn attach<R: RenderHandle>(&mut self, body: BodyHandle, render: &mut R)
    -> Result<(), PhysicsError>;

    fn set_velocity(&mut self, body: BodyHandle, velocity: Vector2) -> Result<(), PhysicsError>;

    fn velocity(&self, body: BodyHandle) -> Option<Vector2>;

    fn position(&self, body: BodyHandle) -> Option<Vector2>;

    /// Remove a body. Returns false if it did not exist.
    fn remove_body(&mut self, body: BodyHandle) -> bool;
}

/// Keys a controller can react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKey {
    Up,
    Down,
    Left,
    Right,
    Action,
}

impl ControlKey {
    pub const ALL: [ControlKey; 5] = [
        ControlKey::Up,
        ControlKey::Down,
        ControlKey::Left,
        ControlKey::Right,
        ControlKey::Action,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Read-only view of the keyboard for the current frame.
pub trait InputSnapshot {
    /// Whether the key is held down.
    fn is_down(&self, key: ControlKey) -> bool;

    /// Whether the key went down this frame.
    fn just_pressed(&self, key: ControlKey) -> bool;
}

/// Owned copy of an [`InputSnapshot`] taken at the start of a frame.
///
/// State callbacks only get the controller's own fields, so the controller
/// copies the host's snapshot in before running its state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    held: [bool; 5],
    pressed: [bool; 5],
}

impl Controls {
    pub fn capture(input: &impl InputSnapshot) -> Self {
        let mut controls = Self::default();
        for key in ControlKey::ALL {
            controls.held[key.index()] = input.is_down(key);
            controls.pressed[key.index()] = input.just_pressed(key);
        }
        controls
    }

    /// Build controls with the given keys held (and just pressed).
    #[cfg(test)]
    pub(crate) fn holding(keys: &[ControlKey]) -> Self {
        let mut controls = Self::default();
        for key in keys {
            controls.held[key.index()] = true;
            controls.pressed[key.index()] = true;
        }
        controls
    }

    /// Either horizontal direction is held.
    pub fn horizontal(&self) -> bool {
        self.is_down(ControlKey::Left) || self.is_down(ControlKey::Right)
    }
}

impl InputSnapshot for Controls {
    fn is_down(&self, key: ControlKey) -> bool {
        self.held[key.index()]
    }

    fn just_pressed(&self, key: ControlKey) -> bool {
        self.pressed[key.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controls_capture_copies_every_key() {
        let source = Controls::holding(&[ControlKey::Left, ControlKey::Action]);
        let copy = Controls::capture(&source);
        assert_eq!(copy, source);
        assert!(copy.is_down(ControlKey::Left));
        assert!(copy.just_pressed(ControlKey::Action));
        assert!(!copy.is_down(ControlKey::Up));
        assert!(copy.horizontal());
    }

    #[test]
    fn test_controls_default_is_idle() {
        let controls = Controls::default();
        for key in ControlKey::ALL {
            assert!(!controls.is_down(key));
            assert!(!controls.just_pressed(key));
        }
        assert!(!controls.horizontal());
    }
}
