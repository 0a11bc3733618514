//! Error types for the controller and its collaborators.

use thiserror::Error;

use crate::components::rigidbody::BodyHandle;
use crate::statemachine::StateMachineError;

/// Errors raised by a [`RenderHandle`](super::RenderHandle).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("animation '{key}' has an empty frame range {start}..={end}")]
    InvalidFrameRange { key: String, start: u32, end: u32 },

    #[error("animation '{key}' has an invalid frame rate {frame_rate}")]
    InvalidFrameRate { key: String, frame_rate: f32 },

    #[error("animation '{0}' is already registered")]
    DuplicateAnimation(String),

    #[error("animation '{0}' is not registered")]
    UnknownAnimation(String),

    #[error("render handle was destroyed")]
    Destroyed,
}

/// Errors raised by a [`PhysicsEngine`](super::PhysicsEngine).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    #[error("body '{label}' needs a positive radius, got {radius}")]
    InvalidRadius { label: String, radius: f32 },

    #[error("body {0} does not exist")]
    UnknownBody(BodyHandle),
}

/// Errors surfaced by [`SubmarineController`](super::SubmarineController).
///
/// Collaborator errors pass through unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControllerError {
    #[error(transparent)]
    StateMachine(#[from] StateMachineError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Physics(#[from] PhysicsError),
}
