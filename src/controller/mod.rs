//! Entity behavior controllers.
//!
//! A controller owns one entity's configuration, its render handle and its
//! rigid body, and drives them through a
//! [`StateMachine`](crate::statemachine::StateMachine) once per frame.
//!
//! Submodules:
//! - [`collaborators`] – traits for the render, physics and input services
//! - [`error`] – error types returned by controllers and collaborators
//! - [`options`] – submarine defaults and partial overrides
//! - [`submarine`] – the player submarine controller and its states

pub mod collaborators;
pub mod error;
pub mod options;
pub mod submarine;

pub use collaborators::{ControlKey, Controls, InputSnapshot, PhysicsEngine, RenderHandle};
pub use error::{ControllerError, PhysicsError, RenderError};
pub use options::{Health, SubmarineConfig, SubmarineOptions, Vitals, Xy};
pub use submarine::{SubmarineController, SubmarineState};
