//! Generic finite state machine for driving entity behavior.
//!
//! A [`StateMachine`] holds a set of named states, each with optional
//! callbacks, and a pointer to the active state. States are identified by a
//! small `Copy` value, usually an enum, so the set of names is fixed at compile
//! time.
//!
//! # Architecture
//!
//! - **Three callback types per state:**
//!   - `on_enter` – called once when the state becomes active
//!   - `on_update` – called every frame while the state is active
//!   - `on_exit` – called once when the state is left
//! - **The context is borrowed, not owned** – every call that can run a
//!   callback takes `&mut C`, and the callbacks receive it as an explicit
//!   parameter. An entity usually keeps the machine next to its context struct
//!   and passes the context in on every frame.
//! - **Transitions from `on_update`** – return `Some(next)` to switch states.
//!   The switch happens before [`StateMachine::update`] returns: `on_exit` and
//!   `on_enter` fire immediately, the new state's `on_update` runs next frame.
//! - **Re-entering the active state is a no-op** – no callbacks fire, so
//!   animations are not restarted when `on_update` keeps asking for the state
//!   it is already in.
//!
//! # Example
//!
//! ```ignore
//! fn walk_update(ctx: &mut Walker, _delta: f32) -> Option<Mode> {
//!     (!ctx.moving).then_some(Mode::Rest)
//! }
//!
//! let mut machine = StateMachine::with_label("walker");
//! machine
//!     .add_state(Mode::Rest, State::new().on_enter(rest_enter))?
//!     .add_state(Mode::Walk, State::new().on_update(walk_update))?;
//! machine.set_state(&mut walker, Mode::Rest)?;
//! machine.update(&mut walker, delta)?;
//! ```

use log::{debug, trace};
use rustc_hash::FxHashMap;
use std::fmt;
use std::hash::Hash;
use thiserror::Error;

/// Callback run when a state is entered or exited.
pub type TransitionCallback<C> = fn(&mut C);

/// Callback run every frame while a state is active.
///
/// # Parameters
///
/// - `ctx: &mut C` – the owning context
/// - `delta: f32` – seconds elapsed since the previous frame
///
/// # Returns
///
/// - `Some(next)` – switch to `next` before `update` returns
/// - `None` – stay in the current state
pub type UpdateCallback<S, C> = fn(&mut C, delta: f32) -> Option<S>;

/// Errors raised by [`StateMachine`] operations.
///
/// All variants are programming errors: a table that registers the same state
/// twice, a transition to a state that was never registered, or driving a
/// machine that was never activated or was already torn down.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateMachineError {
    #[error("[{machine}] state '{state}' is already registered")]
    DuplicateState { machine: String, state: String },

    #[error("[{machine}] state '{state}' is not registered")]
    UnknownState { machine: String, state: String },

    #[error("[{machine}] state machine is not active")]
    InactiveMachine { machine: String },
}

/// Callbacks registered for a single state.
pub struct State<S, C> {
    pub on_enter: Option<TransitionCallback<C>>,
    pub on_update: Option<UpdateCallback<S, C>>,
    pub on_exit: Option<TransitionCallback<C>>,
}

impl<S, C> State<S, C> {
    /// A state with no callbacks.
    pub fn new() -> Self {
        Self {
            on_enter: None,
            on_update: None,
            on_exit: None,
        }
    }

    /// Set the `on_enter` callback (builder pattern).
    pub fn on_enter(mut self, callback: TransitionCallback<C>) -> Self {
        self.on_enter = Some(callback);
        self
    }

    /// Set the `on_update` callback (builder pattern).
    pub fn on_update(mut self, callback: UpdateCallback<S, C>) -> Self {
        self.on_update = Some(callback);
        self
    }

    /// Set the `on_exit` callback (builder pattern).
    pub fn on_exit(mut self, callback: TransitionCallback<C>) -> Self {
        self.on_exit = Some(callback);
        self
    }
}

impl<S, C> Default for State<S, C> {
    fn default() -> Self {
        Self::new()
    }
}

// fn pointers are Copy whatever S and C are; derive would demand S: Clone, C: Clone.
impl<S, C> Clone for State<S, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, C> Copy for State<S, C> {}

impl<S, C> fmt::Debug for State<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("on_enter", &self.on_enter.is_some())
            .field("on_update", &self.on_update.is_some())
            .field("on_exit", &self.on_exit.is_some())
            .finish()
    }
}

/// Finite state machine over state identifiers `S` and context `C`.
///
/// # Fields
///
/// - `label` – optional name used in log lines and errors
/// - `states` – registered states keyed by name
/// - `current` – the active state, `None` until the first [`set_state`](Self::set_state)
/// - `previous` – the state active before the last transition
/// - `time_in_state` – seconds accumulated by [`update`](Self::update) since the last transition
/// - `torn_down` – set by [`destroy`](Self::destroy)
pub struct StateMachine<S, C> {
    label: Option<String>,
    states: FxHashMap<S, State<S, C>>,
    current: Option<S>,
    previous: Option<S>,
    time_in_state: f32,
    torn_down: bool,
}

impl<S, C> StateMachine<S, C>
where
    S: Copy + Eq + Hash + fmt::Display,
{
    /// Create an empty, unlabeled machine.
    pub fn new() -> Self {
        Self {
            label: None,
            states: FxHashMap::default(),
            current: None,
            previous: None,
            time_in_state: 0.0,
            torn_down: false,
        }
    }

    /// Create an empty machine with a diagnostic label.
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::new()
        }
    }

    /// The diagnostic label, or `"state machine"` when none was given.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or("state machine")
    }

    /// Register a state.
    ///
    /// Returns the machine so registrations can be chained with `?`.
    /// Fails with [`StateMachineError::DuplicateState`] if `name` is already
    /// registered; the existing registration is kept.
    pub fn add_state(
        &mut self,
        name: S,
        state: State<S, C>,
    ) -> Result<&mut Self, StateMachineError> {
        if self.torn_down {
            return Err(self.inactive());
        }
        if self.states.contains_key(&name) {
            return Err(StateMachineError::DuplicateState {
                machine: self.label().to_string(),
                state: name.to_string(),
            });
        }
        self.states.insert(name, state);
        Ok(self)
    }

    /// Switch to `name`, running `on_exit` of the outgoing state and then
    /// `on_enter` of the incoming one.
    ///
    /// Switching to the state that is already active does nothing.
    pub fn set_state(&mut self, ctx: &mut C, name: S) -> Result<(), StateMachineError> {
        if self.torn_down {
            return Err(self.inactive());
        }
        let Some(incoming) = self.states.get(&name).copied() else {
            return Err(StateMachineError::UnknownState {
                machine: self.label().to_string(),
                state: name.to_string(),
            });
        };
        if self.current == Some(name) {
            trace!("[{}] already in '{}'", self.label(), name);
            return Ok(());
        }

        let on_exit = self
            .current
            .and_then(|current| self.states.get(&current))
            .and_then(|state| state.on_exit);
        if let Some(callback) = on_exit {
            callback(ctx);
        }

        self.previous = self.current.replace(name);
        self.time_in_state = 0.0;
        match self.previous {
            Some(previous) => debug!("[{}] {} -> {}", self.label(), previous, name),
            None => debug!("[{}] start in {}", self.label(), name),
        }

        if let Some(callback) = incoming.on_enter {
            callback(ctx);
        }
        Ok(())
    }

    /// Run the active state's `on_update` callback.
    ///
    /// `delta` is the non-negative time elapsed since the previous frame. A NaN
    /// delta is passed through to the callback. A transition requested by the
    /// callback is applied before returning.
    pub fn update(&mut self, ctx: &mut C, delta: f32) -> Result<(), StateMachineError> {
        debug_assert!(delta.is_nan() || delta >= 0.0, "negative frame delta {delta}");
        let current = match self.current {
            Some(current) if !self.torn_down => current,
            _ => return Err(self.inactive()),
        };
        self.time_in_state += delta;

        let on_update = self.states.get(&current).and_then(|state| state.on_update);
        if let Some(callback) = on_update
            && let Some(next) = callback(ctx, delta)
        {
            self.set_state(ctx, next)?;
        }
        Ok(())
    }

    /// Drop every registered state and clear the current state.
    ///
    /// Later calls to [`update`](Self::update), [`set_state`](Self::set_state)
    /// and [`add_state`](Self::add_state) fail with
    /// [`StateMachineError::InactiveMachine`].
    pub fn destroy(&mut self) {
        if !self.torn_down {
            debug!("[{}] destroyed", self.label());
        }
        self.states.clear();
        self.current = None;
        self.previous = None;
        self.time_in_state = 0.0;
        self.torn_down = true;
    }

    /// The active state, if the machine was activated and not destroyed.
    pub fn current(&self) -> Option<S> {
        self.current
    }

    /// The state active before the last transition.
    pub fn previous(&self) -> Option<S> {
        self.previous
    }

    /// Seconds accumulated by `update` since the last transition.
    pub fn time_in_state(&self) -> f32 {
        self.time_in_state
    }

    /// Whether `update` can be called.
    pub fn is_active(&self) -> bool {
        self.current.is_some() && !self.torn_down
    }

    pub fn has_state(&self, name: S) -> bool {
        self.states.contains_key(&name)
    }

    /// Number of registered states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    fn inactive(&self) -> StateMachineError {
        StateMachineError::InactiveMachine {
            machine: self.label().to_string(),
        }
    }
}

impl<S, C> Default for StateMachine<S, C>
where
    S: Copy + Eq + Hash + fmt::Display,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S, C> fmt::Debug for StateMachine<S, C>
where
    S: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("label", &self.label)
            .field("states", &self.states.keys().collect::<Vec<_>>())
            .field("current", &self.current)
            .field("previous", &self.previous)
            .field("time_in_state", &self.time_in_state)
            .field("torn_down", &self.torn_down)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Journal {
        calls: Vec<String>,
        go_to: Option<&'static str>,
        updates_seen: Vec<f32>,
    }

    fn a_enter(j: &mut Journal) {
        j.calls.push("a.enter".into());
    }
    fn a_update(j: &mut Journal, delta: f32) -> Option<&'static str> {
        j.calls.push("a.update".into());
        j.updates_seen.push(delta);
        j.go_to.take()
    }
    fn a_exit(j: &mut Journal) {
        j.calls.push("a.exit".into());
    }
    fn b_enter(j: &mut Journal) {
        j.calls.push("b.enter".into());
    }
    fn b_update(j: &mut Journal, _delta: f32) -> Option<&'static str> {
        j.calls.push("b.update".into());
        j.go_to.take()
    }
    fn b_exit(j: &mut Journal) {
        j.calls.push("b.exit".into());
    }
    fn self_loop(j: &mut Journal, _delta: f32) -> Option<&'static str> {
        j.calls.push("loop.update".into());
        Some("loop")
    }
    fn loop_enter(j: &mut Journal) {
        j.calls.push("loop.enter".into());
    }

    fn machine() -> StateMachine<&'static str, Journal> {
        let mut m = StateMachine::with_label("test");
        m.add_state(
            "a",
            State::new().on_enter(a_enter).on_update(a_update).on_exit(a_exit),
        )
        .unwrap()
        .add_state(
            "b",
            State::new().on_enter(b_enter).on_update(b_update).on_exit(b_exit),
        )
        .unwrap();
        m
    }

    #[test]
    fn test_add_distinct_states() {
        let mut m: StateMachine<&'static str, Journal> = StateMachine::new();
        for name in ["idle", "walk", "run", "jump"] {
            assert!(m.add_state(name, State::new()).is_ok());
        }
        assert_eq!(m.len(), 4);
        assert!(m.has_state("run"));
        assert!(!m.is_active());
    }

    #[test]
    fn test_duplicate_state_rejected_and_mapping_kept() {
        let mut m = machine();
        let err = m.add_state("a", State::new()).unwrap_err();
        assert_eq!(
            err,
            StateMachineError::DuplicateState {
                machine: "test".into(),
                state: "a".into()
            }
        );
        assert_eq!(m.len(), 2);

        // The first "a" callbacks are still registered.
        let mut j = Journal::default();
        m.set_state(&mut j, "a").unwrap();
        assert_eq!(j.calls, vec!["a.enter"]);
    }

    #[test]
    fn test_unknown_state_leaves_current_unchanged() {
        let mut m = machine();
        let mut j = Journal::default();
        m.set_state(&mut j, "a").unwrap();
        let err = m.set_state(&mut j, "missing").unwrap_err();
        assert!(matches!(err, StateMachineError::UnknownState { ref state, .. } if state == "missing"));
        assert_eq!(m.current(), Some("a"));
        assert_eq!(j.calls, vec!["a.enter"]);
    }

    #[test]
    fn test_unknown_state_before_activation() {
        let mut m = machine();
        let mut j = Journal::default();
        assert!(m.set_state(&mut j, "zzz").is_err());
        assert_eq!(m.current(), None);
        assert!(j.calls.is_empty());
    }

    #[test]
    fn test_set_same_state_is_noop() {
        let mut m = machine();
        let mut j = Journal::default();
        m.set_state(&mut j, "a").unwrap();
        m.update(&mut j, 0.5).unwrap();
        j.calls.clear();

        m.set_state(&mut j, "a").unwrap();
        assert!(j.calls.is_empty());
        assert_eq!(m.current(), Some("a"));
        assert_eq!(m.previous(), None);
        assert!((m.time_in_state() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_exit_runs_before_enter_once() {
        let mut m = machine();
        let mut j = Journal::default();
        m.set_state(&mut j, "a").unwrap();
        j.calls.clear();

        m.set_state(&mut j, "b").unwrap();
        assert_eq!(j.calls, vec!["a.exit", "b.enter"]);
        assert_eq!(m.current(), Some("b"));
        assert_eq!(m.previous(), Some("a"));
    }

    #[test]
    fn test_update_before_activation_fails() {
        let mut m = machine();
        let mut j = Journal::default();
        let err = m.update(&mut j, 0.016).unwrap_err();
        assert_eq!(
            err,
            StateMachineError::InactiveMachine {
                machine: "test".into()
            }
        );
        assert!(j.calls.is_empty());
    }

    #[test]
    fn test_update_passes_delta() {
        let mut m = machine();
        let mut j = Journal::default();
        m.set_state(&mut j, "a").unwrap();
        m.update(&mut j, 0.25).unwrap();
        m.update(&mut j, 0.5).unwrap();
        assert_eq!(j.updates_seen, vec![0.25, 0.5]);
        assert!((m.time_in_state() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_update_passes_nan_delta_through() {
        let mut m = machine();
        let mut j = Journal::default();
        m.set_state(&mut j, "a").unwrap();
        m.update(&mut j, f32::NAN).unwrap();
        assert_eq!(j.updates_seen.len(), 1);
        assert!(j.updates_seen[0].is_nan());
        assert_eq!(m.current(), Some("a"));
    }

    #[test]
    fn test_transition_from_update_applies_immediately() {
        let mut m = machine();
        let mut j = Journal::default();
        m.set_state(&mut j, "a").unwrap();
        j.calls.clear();

        j.go_to = Some("b");
        m.update(&mut j, 0.1).unwrap();
        assert_eq!(m.current(), Some("b"));
        // b's update does not run on the frame it was entered
        assert_eq!(j.calls, vec!["a.update", "a.exit", "b.enter"]);
        assert_eq!(m.time_in_state(), 0.0);

        m.update(&mut j, 0.1).unwrap();
        assert_eq!(j.calls.last().map(String::as_str), Some("b.update"));
    }

    #[test]
    fn test_transition_to_unknown_from_update_propagates() {
        let mut m = machine();
        let mut j = Journal::default();
        m.set_state(&mut j, "a").unwrap();
        j.go_to = Some("nowhere");
        assert!(matches!(
            m.update(&mut j, 0.1),
            Err(StateMachineError::UnknownState { .. })
        ));
        assert_eq!(m.current(), Some("a"));
    }

    #[test]
    fn test_update_requesting_own_state_does_not_reenter() {
        let mut m: StateMachine<&'static str, Journal> = StateMachine::new();
        m.add_state("loop", State::new().on_enter(loop_enter).on_update(self_loop))
            .unwrap();
        let mut j = Journal::default();
        m.set_state(&mut j, "loop").unwrap();
        m.update(&mut j, 0.1).unwrap();
        m.update(&mut j, 0.1).unwrap();
        assert_eq!(j.calls, vec!["loop.enter", "loop.update", "loop.update"]);
    }

    #[test]
    fn test_state_without_callbacks() {
        let mut m: StateMachine<&'static str, Journal> = StateMachine::new();
        m.add_state("empty", State::new()).unwrap();
        let mut j = Journal::default();
        m.set_state(&mut j, "empty").unwrap();
        assert!(m.update(&mut j, 0.1).is_ok());
        assert!(j.calls.is_empty());
    }

    #[test]
    fn test_destroy_deactivates() {
        let mut m = machine();
        let mut j = Journal::default();
        m.set_state(&mut j, "a").unwrap();
        m.destroy();

        assert!(m.is_empty());
        assert_eq!(m.current(), None);
        assert!(!m.is_active());
        assert!(matches!(
            m.update(&mut j, 0.1),
            Err(StateMachineError::InactiveMachine { .. })
        ));
        assert!(matches!(
            m.set_state(&mut j, "a"),
            Err(StateMachineError::InactiveMachine { .. })
        ));
        assert!(matches!(
            m.add_state("c", State::new()),
            Err(StateMachineError::InactiveMachine { .. })
        ));
    }

    #[test]
    fn test_label_defaults() {
        let m: StateMachine<&'static str, Journal> = StateMachine::new();
        assert_eq!(m.label(), "state machine");
        let m: StateMachine<&'static str, Journal> = StateMachine::with_label("Player");
        assert_eq!(m.label(), "Player");
    }

    #[test]
    fn test_error_messages() {
        let err = StateMachineError::UnknownState {
            machine: "Player".into(),
            state: "swim".into(),
        };
        assert_eq!(err.to_string(), "[Player] state 'swim' is not registered");
    }
}
