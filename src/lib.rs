//! Minisub library.
//!
//! A keyboard-driven submarine built on a small finite-state machine, plus
//! the bevy_ecs components, resources and systems the demo binary runs it
//! with. Exposed as a library for integration tests.

pub mod components;
pub mod controller;
pub mod resources;
pub mod statemachine;
pub mod systems;
