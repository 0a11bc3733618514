//! ECS resources made available to systems.
//!
//! - `gameconfig` – window, world and submarine settings from an INI file
//! - `input` – per-frame keyboard state of keys the submarine reacts to
//! - `obstacles` – shared registry of static bodies by label
//! - `physics` – circle physics world implementing the controller's physics seam
//! - `texturestore` – loaded textures keyed by name
//! - `worldtime` – simulation time and delta
pub mod gameconfig;
pub mod input;
pub mod obstacles;
pub mod physics;
pub mod texturestore;
pub mod worldtime;
