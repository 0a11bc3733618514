//! Minimal circle physics world.
//!
//! [`PhysicsWorld`] owns every [`RigidBody`] and advances them one step per
//! frame with [`PhysicsWorld::step`]:
//!
//! 1. gravity is added to the velocity of every dynamic body
//! 2. velocity is damped by the body's air friction
//! 3. the body moves by its velocity
//! 4. overlaps with static bodies and the world bounds are pushed out, and the
//!    normal velocity is reflected and scaled by the larger restitution of
//!    the two surfaces; tangential velocity loses the body's friction fraction
//!
//! Dynamic bodies do not collide with each other.

use bevy_ecs::prelude::Resource;
use log::debug;
use raylib::prelude::Vector2;
use rustc_hash::FxHashMap;

use crate::components::rigidbody::{BodyHandle, BodyOptions, RigidBody};
use crate::controller::{PhysicsEngine, PhysicsError, RenderHandle};

/// Axis-aligned rectangle bodies cannot leave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub min: Vector2,
    pub max: Vector2,
    pub restitution: f32,
}

impl WorldBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            min: Vector2 { x: 0.0, y: 0.0 },
            max: Vector2 { x: width, y: height },
            restitution: 0.0,
        }
    }
}

#[derive(Resource, Debug, Default)]
pub struct PhysicsWorld {
    bodies: FxHashMap<BodyHandle, RigidBody>,
    next_id: u32,
    pub gravity: Vector2,
    pub bounds: Option<WorldBounds>,
}

impl PhysicsWorld {
    pub fn new(gravity: Vector2, bounds: Option<WorldBounds>) -> Self {
        Self {
            bodies: FxHashMap::default(),
            next_id: 0,
            gravity,
            bounds,
        }
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.bodies.get(&handle)
    }

    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &RigidBody)> {
        self.bodies.iter().map(|(handle, body)| (*handle, body))
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Advance the simulation by one step.
    pub fn step(&mut self) {
        let statics: Vec<RigidBody> = self
            .bodies
            .values()
            .filter(|body| body.is_static)
            .cloned()
            .collect();

        for body in self.bodies.values_mut().filter(|body| !body.is_static) {
            body.integrate(self.gravity);
            for obstacle in &statics {
                resolve_circle(body, obstacle);
            }
            if let Some(bounds) = self.bounds {
                resolve_bounds(body, &bounds);
            }
        }
    }
}

/// Push `body` out of a static circle and bounce it.
fn resolve_circle(body: &mut RigidBody, obstacle: &RigidBody) {
    if !body.overlaps(obstacle) {
        return;
    }
    let dx = body.position.x - obstacle.position.x;
    let dy = body.position.y - obstacle.position.y;
    let distance = (dx * dx + dy * dy).sqrt();
    let normal = if distance > f32::EPSILON {
        Vector2 {
            x: dx / distance,
            y: dy / distance,
        }
    } else {
        Vector2 { x: 0.0, y: -1.0 }
    };
    let depth = body.radius + obstacle.radius - distance;
    body.position.x += normal.x * depth;
    body.position.y += normal.y * depth;

    let approach = body.velocity.x * normal.x + body.velocity.y * normal.y;
    if approach >= 0.0 {
        return;
    }
    let restitution = body.restitution.max(obstacle.restitution);
    let tangent = Vector2 {
        x: body.velocity.x - approach * normal.x,
        y: body.velocity.y - approach * normal.y,
    };
    let keep = 1.0 - body.friction.clamp(0.0, 1.0);
    body.velocity.x = tangent.x * keep - approach * restitution * normal.x;
    body.velocity.y = tangent.y * keep - approach * restitution * normal.y;
}

/// Keep `body` inside `bounds`, bouncing off the edges.
fn resolve_bounds(body: &mut RigidBody, bounds: &WorldBounds) {
    let restitution = body.restitution.max(bounds.restitution);
    let keep = 1.0 - body.friction.clamp(0.0, 1.0);
    let r = body.radius;

    if body.position.x - r < bounds.min.x {
        body.position.x = bounds.min.x + r;
        if body.velocity.x < 0.0 {
            body.velocity.x = -body.velocity.x * restitution;
            body.velocity.y *= keep;
        }
    } else if body.position.x + r > bounds.max.x {
        body.position.x = bounds.max.x - r;
        if body.velocity.x > 0.0 {
            body.velocity.x = -body.velocity.x * restitution;
            body.velocity.y *= keep;
        }
    }

    if body.position.y - r < bounds.min.y {
        body.position.y = bounds.min.y + r;
        if body.velocity.y < 0.0 {
            body.velocity.y = -body.velocity.y * restitution;
            body.velocity.x *= keep;
        }
    } else if body.position.y + r > bounds.max.y {
        body.position.y = bounds.max.y - r;
        if body.velocity.y > 0.0 {
            body.velocity.y = -body.velocity.y * restitution;
            body.velocity.x *= keep;
        }
    }
}

impl PhysicsEngine for PhysicsWorld {
    fn create_circle(
        &mut self,
        position: Vector2,
        radius: f32,
        options: &BodyOptions,
    ) -> Result<BodyHandle, PhysicsError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(PhysicsError::InvalidRadius {
                label: options.label.clone(),
                radius,
            });
        }
        self.next_id += 1;
        let handle = BodyHandle(self.next_id);
        self.bodies
            .insert(handle, RigidBody::circle(position, radius, options));
        debug!(
            "body {} '{}' r={} at ({:.1}, {:.1}){}",
            handle,
            options.label,
            radius,
            position.x,
            position.y,
            if options.is_static { " static" } else { "" }
        );
        Ok(handle)
    }

    fn attach<R: RenderHandle>(&mut self, body: BodyHandle, render: &mut R) -> Result<(), PhysicsError> {
        let rb = self.bodies.get(&body).ok_or(PhysicsError::UnknownBody(body))?;
        render.attach_body(body);
        render.set_position(rb.position);
        Ok(())
    }

    fn set_velocity(&mut self, body: BodyHandle, velocity: Vector2) -> Result<(), PhysicsError> {
        let rb = self
            .bodies
            .get_mut(&body)
            .ok_or(PhysicsError::UnknownBody(body))?;
        rb.velocity = velocity;
        Ok(())
    }

    fn velocity(&self, body: BodyHandle) -> Option<Vector2> {
        self.bodies.get(&body).map(|rb| rb.velocity)
    }

    fn position(&self, body: BodyHandle) -> Option<Vector2> {
        self.bodies.get(&body).map(|rb| rb.position)
    }

    fn remove_body(&mut self, body: BodyHandle) -> bool {
        let removed = self.bodies.remove(&body).is_some();
        if removed {
            debug!("body {} removed", body);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn no_drag(label: &str) -> BodyOptions {
        BodyOptions {
            label: label.into(),
            friction: 0.0,
            friction_air: 0.0,
            restitution: 0.0,
            is_static: false,
        }
    }

    fn zero() -> Vector2 {
        Vector2 { x: 0.0, y: 0.0 }
    }

    #[test]
    fn test_create_rejects_bad_radius() {
        let mut world = PhysicsWorld::default();
        assert!(matches!(
            world.create_circle(zero(), 0.0, &no_drag("a")),
            Err(PhysicsError::InvalidRadius { .. })
        ));
        assert!(world.is_empty());
    }

    #[test]
    fn test_handles_are_unique() {
        let mut world = PhysicsWorld::default();
        let a = world.create_circle(zero(), 1.0, &no_drag("a")).unwrap();
        let b = world.create_circle(zero(), 1.0, &no_drag("b")).unwrap();
        assert_ne!(a, b);
        assert!(world.remove_body(a));
        let c = world.create_circle(zero(), 1.0, &no_drag("c")).unwrap();
        assert_ne!(a, c);
        assert_eq!(world.len(), 2);
    }

    #[test]
    fn test_step_moves_by_velocity() {
        let mut world = PhysicsWorld::default();
        let h = world.create_circle(zero(), 5.0, &no_drag("sub")).unwrap();
        world.set_velocity(h, Vector2 { x: 3.0, y: -1.0 }).unwrap();
        world.step();
        world.step();
        let p = world.position(h).unwrap();
        assert!(approx_eq(p.x, 6.0));
        assert!(approx_eq(p.y, -2.0));
    }

    #[test]
    fn test_unknown_body_errors() {
        let mut world = PhysicsWorld::default();
        assert_eq!(
            world.set_velocity(BodyHandle(42), zero()),
            Err(PhysicsError::UnknownBody(BodyHandle(42)))
        );
        assert_eq!(world.velocity(BodyHandle(42)), None);
        assert!(!world.remove_body(BodyHandle(42)));
    }

    #[test]
    fn test_bounds_bounce_with_restitution() {
        let mut world = PhysicsWorld::new(zero(), Some(WorldBounds::new(100.0, 100.0)));
        let mut options = no_drag("sub");
        options.restitution = 0.5;
        let h = world
            .create_circle(Vector2 { x: 92.0, y: 50.0 }, 5.0, &options)
            .unwrap();
        world.set_velocity(h, Vector2 { x: 4.0, y: 0.0 }).unwrap();
        world.step();
        let rb = world.body(h).unwrap();
        assert!(approx_eq(rb.position.x, 95.0));
        assert!(approx_eq(rb.velocity.x, -2.0));
    }

    #[test]
    fn test_static_obstacle_blocks() {
        let mut world = PhysicsWorld::default();
        world
            .create_circle(Vector2 { x: 20.0, y: 0.0 }, 5.0, &BodyOptions::fixed("rock"))
            .unwrap();
        let h = world.create_circle(zero(), 5.0, &no_drag("sub")).unwrap();
        world.set_velocity(h, Vector2 { x: 12.0, y: 0.0 }).unwrap();
        world.step();
        let rb = world.body(h).unwrap();
        assert!(approx_eq(rb.position.x, 10.0));
        assert!(approx_eq(rb.velocity.x, 0.0));
    }

    #[test]
    fn test_static_bodies_ignore_gravity() {
        let mut world = PhysicsWorld::new(Vector2 { x: 0.0, y: 1.0 }, None);
        let rock = world
            .create_circle(zero(), 5.0, &BodyOptions::fixed("rock"))
            .unwrap();
        world.step();
        assert_eq!(world.position(rock), Some(zero()));
    }

    #[test]
    fn test_attach_moves_render_to_body() {
        use crate::components::sprite::Sprite;
        use crate::components::spriterenderer::SpriteRenderer;

        let mut world = PhysicsWorld::default();
        let h = world
            .create_circle(Vector2 { x: 7.0, y: 8.0 }, 2.0, &no_drag("sub"))
            .unwrap();
        let mut render = SpriteRenderer::new(Sprite::new("t", 8.0, 8.0, zero()));
        world.attach(h, &mut render).unwrap();
        assert_eq!(render.attached_body(), Some(h));
        assert_eq!(render.position(), Vector2 { x: 7.0, y: 8.0 });
        assert_eq!(
            world.attach(BodyHandle(99), &mut render),
            Err(PhysicsError::UnknownBody(BodyHandle(99)))
        );
    }
}
