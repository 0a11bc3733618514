//! Shared registry of obstacle bodies grouped by label.
//!
//! The host registers static bodies here (rocks, walls, wrecks) and hands a
//! clone of the registry to each controller. Clones share the same storage,
//! so bodies added after a controller spawned are visible to it.

use bevy_ecs::prelude::Resource;
use rustc_hash::FxHashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::components::rigidbody::BodyHandle;

type ObstacleMap = FxHashMap<String, Vec<BodyHandle>>;

#[derive(Resource, Clone, Debug, Default)]
pub struct Obstacles {
    inner: Arc<RwLock<ObstacleMap>>,
}

impl Obstacles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `body` under `label`. Adding the same pair twice is a no-op.
    pub fn add(&self, label: &str, body: BodyHandle) {
        let mut map = self.write();
        let bodies = map.entry(label.to_string()).or_default();
        if !bodies.contains(&body) {
            bodies.push(body);
        }
    }

    /// Whether `body` is registered under `label`.
    pub fn is(&self, label: &str, body: BodyHandle) -> bool {
        self.read()
            .get(label)
            .is_some_and(|bodies| bodies.contains(&body))
    }

    /// Forget `body` under every label. Returns true if it was registered.
    pub fn remove(&self, body: BodyHandle) -> bool {
        let mut removed = false;
        let mut map = self.write();
        for bodies in map.values_mut() {
            let before = bodies.len();
            bodies.retain(|b| *b != body);
            removed |= bodies.len() != before;
        }
        map.retain(|_, bodies| !bodies.is_empty());
        removed
    }

    /// Bodies registered under `label`.
    pub fn bodies(&self, label: &str) -> Vec<BodyHandle> {
        self.read().get(label).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.read().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> RwLockReadGuard<'_, ObstacleMap> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, ObstacleMap> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
