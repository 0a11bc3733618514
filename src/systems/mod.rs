//! Engine systems.
//!
//! Submodules overview
//! - [`animation`] – advance sprite clips by the frame delta
//! - [`input`] – read hardware input and update [`crate::resources::input::InputState`]
//! - [`physics`] – step the physics world and move sprites onto their bodies
//! - [`player`] – run the player submarine controllers
//! - [`render`] – draw obstacles and submarines using Raylib
//! - [`time`] – update simulation time and delta

pub mod animation;
pub mod input;
pub mod physics;
pub mod player;
pub mod render;
pub mod time;
