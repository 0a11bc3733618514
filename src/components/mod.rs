//! ECS components for entities.
//!
//! Submodules overview:
//! - [`animation`] – clip definitions and playback cursor for sprite sheets
//! - [`player`] – player submarine and obstacle markers
//! - [`rigidbody`] – circular bodies and their handles
//! - [`sprite`] – 2D sprite sheet frame placed in the world
//! - [`spriterenderer`] – sprite plus its clips, usable as a render handle

pub mod animation;
pub mod player;
pub mod rigidbody;
pub mod sprite;
pub mod spriterenderer;
