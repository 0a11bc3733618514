//! Player submarine controller.
//!
//! [`SubmarineController`] ties one sprite, one rigid body and the keyboard
//! together through a [`StateMachine`] over [`SubmarineState`]. State
//! callbacks are plain functions receiving the [`Submarine`] record; they
//! play animations on the owned render handle right away and queue velocity
//! changes that the controller hands to the physics engine at the end of the
//! frame.
//!
//! # States
//!
//! | State | enter | update |
//! |---|---|---|
//! | `idle` | show `idle`, stopped | left/right → `movingForward`, up → `openTopHatch` |
//! | `movingForward` | play `move` | steer left/right, no direction → stop and `idle` |
//! | `openTopHatch` | play `openTopHatch` | down → `closeTopHatch` |
//! | `closeTopHatch` | play `openTopHatch` reversed | left/right → `movingForward`, up → `openTopHatch` |
//! | `openBottomHatch` | play `openTopHatch` | down → `closeTopHatch` |
//! | `closeBottomHatch` | play `openTopHatch` reversed | left/right → `movingForward`, up → `openTopHatch` |
//!
//! When a horizontal direction and up are held together, up wins.
//!
//! Speeds are applied per frame and do not scale with the frame delta.

use log::{info, warn};
use raylib::prelude::Vector2;
use smallvec::SmallVec;
use std::fmt;

use crate::components::animation::{AnimationClip, Repeat};
use crate::components::rigidbody::{BodyHandle, BodyOptions};
use crate::resources::obstacles::Obstacles;
use crate::statemachine::{State, StateMachine};

use super::collaborators::{ControlKey, Controls, InputSnapshot, PhysicsEngine, RenderHandle};
use super::error::ControllerError;
use super::options::{SubmarineConfig, SubmarineOptions, Vitals};

/// Sprite sheet the submarine clips are cut from.
pub const SUBMARINE_TEXTURE: &str = "minisub";

pub const ANIM_IDLE: &str = "idle";
pub const ANIM_MOVE: &str = "move";
pub const ANIM_HATCH: &str = "openTopHatch";

/// Clips registered on the render handle of every submarine.
pub fn submarine_clips() -> [AnimationClip; 3] {
    [
        AnimationClip::new(ANIM_MOVE, SUBMARINE_TEXTURE, 9..=11, 15.0, Repeat::Forever),
        AnimationClip::new(ANIM_IDLE, SUBMARINE_TEXTURE, 0..=0, 15.0, Repeat::Forever),
        AnimationClip::new(ANIM_HATCH, SUBMARINE_TEXTURE, 0..=3, 7.0, Repeat::Times(0)),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubmarineState {
    Idle,
    MovingForward,
    OpenTopHatch,
    CloseTopHatch,
    OpenBottomHatch,
    CloseBottomHatch,
}

impl SubmarineState {
    pub const ALL: [SubmarineState; 6] = [
        SubmarineState::Idle,
        SubmarineState::MovingForward,
        SubmarineState::OpenTopHatch,
        SubmarineState::CloseTopHatch,
        SubmarineState::OpenBottomHatch,
        SubmarineState::CloseBottomHatch,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SubmarineState::Idle => "idle",
            SubmarineState::MovingForward => "movingForward",
            SubmarineState::OpenTopHatch => "openTopHatch",
            SubmarineState::CloseTopHatch => "closeTopHatch",
            SubmarineState::OpenBottomHatch => "openBottomHatch",
            SubmarineState::CloseBottomHatch => "closeBottomHatch",
        }
    }
}

impl fmt::Display for SubmarineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Commands for the physics engine collected during a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyCommand {
    /// Set horizontal velocity, keeping the vertical component.
    SetVelocityX(f32),
}

/// Everything the state callbacks may read or change.
pub struct Submarine<R> {
    pub config: SubmarineConfig,
    pub vitals: Vitals,
    render: R,
    body: BodyHandle,
    obstacles: Obstacles,
    controls: Controls,
    commands: SmallVec<[BodyCommand; 2]>,
}

impl<R: RenderHandle> Submarine<R> {
    pub fn render(&self) -> &R {
        &self.render
    }

    pub fn body(&self) -> BodyHandle {
        self.body
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    fn held(&self, key: ControlKey) -> bool {
        self.controls.is_down(key)
    }

    fn play(&mut self, key: &str) {
        if let Err(e) = self.render.play(key, true) {
            warn!("[{}] cannot play '{}': {}", self.config.label, key, e);
        }
    }

    fn play_reverse(&mut self, key: &str) {
        if let Err(e) = self.render.play_reverse(key, true) {
            warn!("[{}] cannot play '{}' reversed: {}", self.config.label, key, e);
        }
    }

    fn set_velocity_x(&mut self, x: f32) {
        self.commands.push(BodyCommand::SetVelocityX(x));
    }
}

/// Controller for one player submarine.
pub struct SubmarineController<R> {
    machine: StateMachine<SubmarineState, Submarine<R>>,
    submarine: Submarine<R>,
}

impl<R: RenderHandle> SubmarineController<R> {
    /// Spawn a submarine around `render`.
    ///
    /// Registers the clips, creates the circular body at the sprite's current
    /// position, attaches it, and starts in [`SubmarineState::Idle`].
    pub fn new<P: PhysicsEngine>(
        mut render: R,
        physics: &mut P,
        obstacles: Obstacles,
        options: SubmarineOptions,
    ) -> Result<Self, ControllerError> {
        let config = options.resolve();

        for clip in submarine_clips() {
            render.create_animation(clip)?;
        }
        render.set_origin(config.origin.into());

        let body_options = BodyOptions {
            label: config.label.clone(),
            friction: config.friction,
            friction_air: config.friction_air,
            restitution: config.restitution,
            is_static: false,
        };
        let body = physics.create_circle(render.position(), config.radius, &body_options)?;
        if let Err(e) = physics.attach(body, &mut render) {
            physics.remove_body(body);
            return Err(e.into());
        }

        let mut machine: StateMachine<SubmarineState, Submarine<R>> =
            StateMachine::with_label(config.label.clone());
        machine
            .add_state(
                SubmarineState::Idle,
                State::new().on_enter(idle_on_enter).on_update(idle_on_update),
            )?
            .add_state(
                SubmarineState::MovingForward,
                State::new()
                    .on_enter(moving_forward_on_enter)
                    .on_update(moving_forward_on_update),
            )?
            .add_state(
                SubmarineState::OpenTopHatch,
                State::new().on_enter(open_hatch_on_enter).on_update(open_hatch_on_update),
            )?
            .add_state(
                SubmarineState::CloseTopHatch,
                State::new().on_enter(close_hatch_on_enter).on_update(closed_hatch_on_update),
            )?
            .add_state(
                SubmarineState::OpenBottomHatch,
                State::new().on_enter(open_hatch_on_enter).on_update(open_hatch_on_update),
            )?
            .add_state(
                SubmarineState::CloseBottomHatch,
                State::new().on_enter(close_hatch_on_enter).on_update(closed_hatch_on_update),
            )?;

        let mut submarine = Submarine {
            vitals: Vitals::from_config(&config),
            config,
            render,
            body,
            obstacles,
            controls: Controls::default(),
            commands: SmallVec::new(),
        };
        machine.set_state(&mut submarine, SubmarineState::Idle)?;

        info!(
            "spawned '{}' with body {} at ({:.1}, {:.1})",
            submarine.config.label,
            body,
            submarine.render.position().x,
            submarine.render.position().y
        );
        Ok(Self { machine, submarine })
    }

    /// Run one frame: read `input`, step the state machine, then send queued
    /// velocity changes to `physics`.
    pub fn update<I, P>(&mut self, input: &I, physics: &mut P, delta: f32) -> Result<(), ControllerError>
    where
        I: InputSnapshot,
        P: PhysicsEngine,
    {
        self.submarine.controls = Controls::capture(input);
        let stepped = self.machine.update(&mut self.submarine, delta);
        let flushed = self.flush_commands(physics);
        stepped?;
        flushed
    }

    /// Force a state change from outside the input rules.
    pub fn set_state(&mut self, state: SubmarineState) -> Result<(), ControllerError> {
        self.machine.set_state(&mut self.submarine, state)?;
        Ok(())
    }

    /// Release the sprite, the state machine and the rigid body.
    pub fn destroy<P: PhysicsEngine>(&mut self, physics: &mut P) {
        if !self.machine.is_active() {
            return;
        }
        self.submarine.render.destroy();
        self.machine.destroy();
        self.submarine.commands.clear();
        if !physics.remove_body(self.submarine.body) {
            warn!(
                "[{}] body {} was already gone",
                self.submarine.config.label, self.submarine.body
            );
        }
        info!("destroyed '{}'", self.submarine.config.label);
    }

    pub fn state(&self) -> Option<SubmarineState> {
        self.machine.current()
    }

    pub fn previous_state(&self) -> Option<SubmarineState> {
        self.machine.previous()
    }

    /// Seconds spent in the current state.
    pub fn time_in_state(&self) -> f32 {
        self.machine.time_in_state()
    }

    pub fn is_active(&self) -> bool {
        self.machine.is_active()
    }

    pub fn config(&self) -> &SubmarineConfig {
        &self.submarine.config
    }

    pub fn vitals(&self) -> &Vitals {
        &self.submarine.vitals
    }

    pub fn body(&self) -> BodyHandle {
        self.submarine.body
    }

    pub fn render(&self) -> &R {
        &self.submarine.render
    }

    pub fn render_mut(&mut self) -> &mut R {
        &mut self.submarine.render
    }

    /// Obstacle registry handed in at spawn; kept for collision response.
    pub fn obstacles(&self) -> &Obstacles {
        &self.submarine.obstacles
    }

    fn flush_commands<P: PhysicsEngine>(&mut self, physics: &mut P) -> Result<(), ControllerError> {
        let body = self.submarine.body;
        for command in self.submarine.commands.drain(..) {
            match command {
                BodyCommand::SetVelocityX(x) => {
                    let current = physics.velocity(body).unwrap_or(Vector2 { x: 0.0, y: 0.0 });
                    physics.set_velocity(body, Vector2 { x, y: current.y })?;
                }
            }
        }
        Ok(())
    }
}

// ==================== STATE CALLBACKS ====================

fn idle_on_enter<R: RenderHandle>(sub: &mut Submarine<R>) {
    sub.play(ANIM_IDLE);
    sub.render.stop();
}

fn idle_on_update<R: RenderHandle>(sub: &mut Submarine<R>, _delta: f32) -> Option<SubmarineState> {
    if sub.held(ControlKey::Up) {
        Some(SubmarineState::OpenTopHatch)
    } else if sub.controls.horizontal() {
        Some(SubmarineState::MovingForward)
    } else {
        None
    }
}

fn moving_forward_on_enter<R: RenderHandle>(sub: &mut Submarine<R>) {
    sub.play(ANIM_MOVE);
}

fn moving_forward_on_update<R: RenderHandle>(
    sub: &mut Submarine<R>,
    _delta: f32,
) -> Option<SubmarineState> {
    let speed = sub.config.speed.x;
    if sub.held(ControlKey::Left) {
        sub.set_velocity_x(-speed);
        sub.render.set_flip_x(false);
        None
    } else if sub.held(ControlKey::Right) {
        sub.set_velocity_x(speed);
        sub.render.set_flip_x(true);
        None
    } else {
        sub.set_velocity_x(0.0);
        Some(SubmarineState::Idle)
    }
}

fn open_hatch_on_enter<R: RenderHandle>(sub: &mut Submarine<R>) {
    sub.play(ANIM_HATCH);
}

fn open_hatch_on_update<R: RenderHandle>(
    sub: &mut Submarine<R>,
    _delta: f32,
) -> Option<SubmarineState> {
    sub.held(ControlKey::Down).then_some(SubmarineState::CloseTopHatch)
}

fn close_hatch_on_enter<R: RenderHandle>(sub: &mut Submarine<R>) {
    sub.play_reverse(ANIM_HATCH);
}

fn closed_hatch_on_update<R: RenderHandle>(
    sub: &mut Submarine<R>,
    _delta: f32,
) -> Option<SubmarineState> {
    if sub.held(ControlKey::Up) {
        Some(SubmarineState::OpenTopHatch)
    } else if sub.controls.horizontal() {
        Some(SubmarineState::MovingForward)
    } else {
        None
    }
}
