//! Circular rigid bodies simulated by the physics world.
//!
//! A [`RigidBody`] stores position, velocity and the material parameters the
//! physics step uses. Bodies live inside
//! [`PhysicsWorld`](crate::resources::physics::PhysicsWorld) and are referred
//! to from the outside by a [`BodyHandle`].
//!
//! Velocities are in world units per physics step (one step per frame).

use raylib::prelude::Vector2;
use std::fmt;

/// Opaque identifier of a body inside a physics world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub u32);

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Material parameters requested when creating a body.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyOptions {
    /// Diagnostic label, e.g. `"Player"` or `"rock"`.
    pub label: String,
    /// Fraction of tangential velocity lost when touching a surface.
    pub friction: f32,
    /// Fraction of velocity lost every step to the surrounding medium.
    pub friction_air: f32,
    /// Bounciness: 0.0 stops dead on impact, 1.0 is a perfect bounce.
    pub restitution: f32,
    /// Static bodies never move and act as obstacles.
    pub is_static: bool,
}

impl Default for BodyOptions {
    fn default() -> Self {
        Self {
            label: "Body".to_string(),
            friction: 0.1,
            friction_air: 0.01,
            restitution: 0.0,
            is_static: false,
        }
    }
}

impl BodyOptions {
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Options for an immovable obstacle.
    pub fn fixed(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            is_static: true,
            ..Self::default()
        }
    }
}

/// Circular body state.
///
/// # Fields
/// - `position` - Center of the circle in world units
/// - `velocity` - Displacement applied on the next step
/// - `radius` - Circle radius, always positive
/// - `friction`, `friction_air`, `restitution` - see [`BodyOptions`]
/// - `is_static` - Static bodies are skipped by integration
#[derive(Clone, Debug, PartialEq)]
pub struct RigidBody {
    pub label: String,
    pub position: Vector2,
    pub velocity: Vector2,
    pub radius: f32,
    pub friction: f32,
    pub friction_air: f32,
    pub restitution: f32,
    pub is_static: bool,
}

impl RigidBody {
    /// Create a body at rest.
    pub fn circle(position: Vector2, radius: f32, options: &BodyOptions) -> Self {
        Self {
            label: options.label.clone(),
            position,
            velocity: Vector2 { x: 0.0, y: 0.0 },
            radius,
            friction: options.friction,
            friction_air: options.friction_air,
            restitution: options.restitution,
            is_static: options.is_static,
        }
    }

    /// Advance one step: apply `gravity`, damp by air friction, move.
    pub fn integrate(&mut self, gravity: Vector2) {
        if self.is_static {
            return;
        }
        self.velocity.x += gravity.x;
        self.velocity.y += gravity.y;
        let damping = (1.0 - self.friction_air).clamp(0.0, 1.0);
        self.velocity.x *= damping;
        self.velocity.y *= damping;
        self.position.x += self.velocity.x;
        self.position.y += self.velocity.y;
    }

    /// Whether this circle overlaps another one.
    pub fn overlaps(&self, other: &RigidBody) -> bool {
        let dx = other.position.x - self.position.x;
        let dy = other.position.y - self.position.y;
        let reach = self.radius + other.radius;
        dx * dx + dy * dy < reach * reach
    }
}
