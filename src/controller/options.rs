//! Submarine configuration and partial overrides.
//!
//! [`SubmarineConfig::default()`] is the single source of default values.
//! Callers describe only what they want to change with a
//! [`SubmarineOptions`]; [`SubmarineOptions::resolve`] fills in the rest.
//!
//! The merge is shallow: a present field replaces the default as a whole.
//! A deserialized [`Health`] record fills its own missing fields from
//! [`Health::default()`].

use raylib::prelude::Vector2;
use serde::{Deserialize, Serialize};

/// A plain 2D pair for configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Xy {
    pub x: f32,
    pub y: f32,
}

impl Xy {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<Xy> for Vector2 {
    fn from(v: Xy) -> Self {
        Vector2 { x: v.x, y: v.y }
    }
}

/// Hit points. `additional` is a bonus pool on top of `current`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Health {
    pub max: f32,
    pub current: f32,
    pub additional: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self {
            max: 100.0,
            current: 100.0,
            additional: 0.0,
        }
    }
}

/// Fully resolved configuration of one submarine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmarineConfig {
    /// Diagnostic label, also given to the rigid body and the state machine.
    pub label: String,
    /// Movement speed in world units per frame.
    pub speed: Xy,
    pub health: Health,
    pub oxygen: f32,
    pub battery: f32,
    /// Radius of the circular rigid body.
    pub radius: f32,
    pub friction: f32,
    pub friction_air: f32,
    pub restitution: f32,
    /// Sprite pivot as a fraction of the frame size.
    pub origin: Xy,
}

impl Default for SubmarineConfig {
    fn default() -> Self {
        Self {
            label: "Player".to_string(),
            speed: Xy::new(3.0, 2.0),
            health: Health::default(),
            oxygen: 100.0,
            battery: 100.0,
            radius: 12.0,
            friction: 0.3,
            friction_air: 0.05,
            restitution: 0.5,
            origin: Xy::new(0.5, 0.5),
        }
    }
}

/// Partial [`SubmarineConfig`]: `None` keeps the default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmarineOptions {
    pub label: Option<String>,
    pub speed: Option<Xy>,
    pub health: Option<Health>,
    pub oxygen: Option<f32>,
    pub battery: Option<f32>,
    pub radius: Option<f32>,
    pub friction: Option<f32>,
    pub friction_air: Option<f32>,
    pub restitution: Option<f32>,
    pub origin: Option<Xy>,
}

impl SubmarineOptions {
    /// Parse options from a JSON document. Unknown keys are ignored.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Layer `other` on top of `self`; fields set in `other` win.
    pub fn merge(self, other: SubmarineOptions) -> Self {
        Self {
            label: other.label.or(self.label),
            speed: other.speed.or(self.speed),
            health: other.health.or(self.health),
            oxygen: other.oxygen.or(self.oxygen),
            battery: other.battery.or(self.battery),
            radius: other.radius.or(self.radius),
            friction: other.friction.or(self.friction),
            friction_air: other.friction_air.or(self.friction_air),
            restitution: other.restitution.or(self.restitution),
            origin: other.origin.or(self.origin),
        }
    }

    /// Apply the options over [`SubmarineConfig::default()`].
    pub fn resolve(self) -> SubmarineConfig {
        let defaults = SubmarineConfig::default();
        SubmarineConfig {
            label: self.label.unwrap_or(defaults.label),
            speed: self.speed.unwrap_or(defaults.speed),
            health: self.health.unwrap_or(defaults.health),
            oxygen: self.oxygen.unwrap_or(defaults.oxygen),
            battery: self.battery.unwrap_or(defaults.battery),
            radius: self.radius.unwrap_or(defaults.radius),
            friction: self.friction.unwrap_or(defaults.friction),
            friction_air: self.friction_air.unwrap_or(defaults.friction_air),
            restitution: self.restitution.unwrap_or(defaults.restitution),
            origin: self.origin.unwrap_or(defaults.origin),
        }
    }
}

/// Survival stats carried by a submarine.
///
/// Nothing drains them yet; they are part of the entity's shape so that
/// save data and HUDs can rely on them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub health: Health,
    pub oxygen: f32,
    pub battery: f32,
}

impl Vitals {
    pub fn from_config(config: &SubmarineConfig) -> Self {
        Self {
            health: config.health,
            oxygen: config.oxygen,
            battery: config.battery,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SubmarineOptions::default().resolve();
        assert_eq!(config, SubmarineConfig::default());
        assert_eq!(config.label, "Player");
        assert_eq!(config.speed, Xy::new(3.0, 2.0));
        assert_eq!(config.health, Health { max: 100.0, current: 100.0, additional: 0.0 });
        assert_eq!(config.radius, 12.0);
        assert_eq!(config.friction, 0.3);
        assert_eq!(config.friction_air, 0.05);
        assert_eq!(config.restitution, 0.5);
        assert_eq!(config.origin, Xy::new(0.5, 0.5));
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let config = SubmarineOptions {
            speed: Some(Xy::new(5.0, 1.0)),
            radius: Some(20.0),
            ..Default::default()
        }
        .resolve();
        assert_eq!(config.speed, Xy::new(5.0, 1.0));
        assert_eq!(config.radius, 20.0);
        assert_eq!(config.friction, 0.3);
        assert_eq!(config.label, "Player");
    }

    #[test]
    fn test_merge_later_layer_wins() {
        let file = SubmarineOptions {
            label: Some("FromIni".into()),
            radius: Some(10.0),
            ..Default::default()
        };
        let cli = SubmarineOptions {
            radius: Some(14.0),
            ..Default::default()
        };
        let merged = file.merge(cli);
        assert_eq!(merged.label.as_deref(), Some("FromIni"));
        assert_eq!(merged.radius, Some(14.0));
    }

    #[test]
    fn test_from_json_partial_health() {
        let options =
            SubmarineOptions::from_json(r#"{ "label": "Scout", "health": { "max": 150 } }"#)
                .unwrap();
        let config = options.resolve();
        assert_eq!(config.label, "Scout");
        assert_eq!(config.health.max, 150.0);
        assert_eq!(config.health.current, 100.0);
        assert_eq!(config.health.additional, 0.0);
        assert_eq!(config.speed, Xy::new(3.0, 2.0));
    }

    #[test]
    fn test_from_json_rejects_wrong_types() {
        assert!(SubmarineOptions::from_json(r#"{ "radius": "big" }"#).is_err());
    }

    #[test]
    fn test_vitals_follow_config() {
        let config = SubmarineOptions {
            oxygen: Some(40.0),
            ..Default::default()
        }
        .resolve();
        let vitals = Vitals::from_config(&config);
        assert_eq!(vitals.oxygen, 40.0);
        assert_eq!(vitals.battery, 100.0);
        assert_eq!(vitals.health.current, 100.0);
    }
}
