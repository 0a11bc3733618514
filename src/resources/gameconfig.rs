//! Game configuration resource.
//!
//! Settings are read from an INI file. Keys that are missing keep their
//! defaults, and the `[submarine]` section only overrides the keys it names.
//!
//! # Configuration File Format
//!
//! ```ini
//! [window]
//! width = 800
//! height = 450
//! target_fps = 60
//!
//! [world]
//! gravity_x = 0
//! gravity_y = 0
//!
//! [submarine]
//! label = Player
//! speed_x = 3
//! speed_y = 2
//! radius = 12
//! health_max = 100
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::{info, warn};
use std::path::PathBuf;
use thiserror::Error;

use crate::controller::{Health, SubmarineOptions, Xy};

const DEFAULT_WINDOW_WIDTH: u32 = 800;
const DEFAULT_WINDOW_HEIGHT: u32 = 450;
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {details}")]
    Read { path: PathBuf, details: String },
    #[error("invalid value for [{section}] {key}: {details}")]
    Value {
        section: String,
        key: String,
        details: String,
    },
    #[error("failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Game configuration resource.
#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    pub window_width: u32,
    pub window_height: u32,
    pub target_fps: u32,
    /// Velocity added to every dynamic body each physics step.
    pub gravity: Xy,
    /// Overrides for the player submarine.
    pub submarine: SubmarineOptions,
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            gravity: Xy::new(0.0, 0.0),
            submarine: SubmarineOptions::default(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from `config_path`.
    pub fn load_from_file(&mut self) -> Result<(), ConfigError> {
        let mut ini = Ini::new();
        ini.load(&self.config_path).map_err(|details| ConfigError::Read {
            path: self.config_path.clone(),
            details,
        })?;
        self.apply(&ini);
        info!(
            "Loaded config from {:?}: {}x{} window, fps={}, gravity=({}, {})",
            self.config_path,
            self.window_width,
            self.window_height,
            self.target_fps,
            self.gravity.x,
            self.gravity.y
        );
        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), ConfigError> {
        let mut ini = Ini::new();
        ini.read(text.to_string()).map_err(|details| ConfigError::Read {
            path: self.config_path.clone(),
            details,
        })?;
        self.apply(&ini);
        Ok(())
    }

    /// Malformed keys are skipped with a warning and keep their current value.
    fn apply(&mut self, ini: &Ini) {
        if let Some(width) = skip_bad(uint(ini, "window", "width")) {
            self.window_width = width;
        }
        if let Some(height) = skip_bad(uint(ini, "window", "height")) {
            self.window_height = height;
        }
        if let Some(fps) = skip_bad(uint(ini, "window", "target_fps")) {
            self.target_fps = fps;
        }
        if let Some(x) = skip_bad(float(ini, "world", "gravity_x")) {
            self.gravity.x = x;
        }
        if let Some(y) = skip_bad(float(ini, "world", "gravity_y")) {
            self.gravity.y = y;
        }
        self.submarine = self.submarine.clone().merge(submarine_section(ini));
    }

    /// Save configuration to `config_path`.
    ///
    /// Only the submarine keys that are set get written.
    pub fn save_to_file(&self) -> Result<(), ConfigError> {
        let mut ini = Ini::new();

        ini.set("window", "width", Some(self.window_width.to_string()));
        ini.set("window", "height", Some(self.window_height.to_string()));
        ini.set("window", "target_fps", Some(self.target_fps.to_string()));

        ini.set("world", "gravity_x", Some(self.gravity.x.to_string()));
        ini.set("world", "gravity_y", Some(self.gravity.y.to_string()));

        let sub = &self.submarine;
        let mut put = |key: &str, value: Option<String>| {
            if value.is_some() {
                ini.set("submarine", key, value);
            }
        };
        put("label", sub.label.clone());
        put("speed_x", sub.speed.map(|s| s.x.to_string()));
        put("speed_y", sub.speed.map(|s| s.y.to_string()));
        put("radius", sub.radius.map(|v| v.to_string()));
        put("friction", sub.friction.map(|v| v.to_string()));
        put("friction_air", sub.friction_air.map(|v| v.to_string()));
        put("restitution", sub.restitution.map(|v| v.to_string()));
        put("origin_x", sub.origin.map(|o| o.x.to_string()));
        put("origin_y", sub.origin.map(|o| o.y.to_string()));
        put("health_max", sub.health.map(|h| h.max.to_string()));
        put("health_current", sub.health.map(|h| h.current.to_string()));
        put("health_additional", sub.health.map(|h| h.additional.to_string()));
        put("oxygen", sub.oxygen.map(|v| v.to_string()));
        put("battery", sub.battery.map(|v| v.to_string()));

        ini.write(&self.config_path).map_err(|source| ConfigError::Write {
            path: self.config_path.clone(),
            source,
        })?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }
}

fn uint(ini: &Ini, section: &str, key: &str) -> Result<Option<u32>, ConfigError> {
    let value = ini.getuint(section, key).map_err(|details| value_error(section, key, details))?;
    value
        .map(|v| u32::try_from(v).map_err(|e| value_error(section, key, e.to_string())))
        .transpose()
}

fn float(ini: &Ini, section: &str, key: &str) -> Result<Option<f32>, ConfigError> {
    ini.getfloat(section, key)
        .map(|v| v.map(|v| v as f32))
        .map_err(|details| value_error(section, key, details))
}

fn skip_bad<T>(value: Result<Option<T>, ConfigError>) -> Option<T> {
    value.unwrap_or_else(|e| {
        warn!("{}; keeping the current value", e);
        None
    })
}

fn value_error(section: &str, key: &str, details: String) -> ConfigError {
    ConfigError::Value {
        section: section.to_string(),
        key: key.to_string(),
        details,
    }
}

/// Pair `<prefix>_x` / `<prefix>_y`. One missing half keeps `fallback`'s.
fn pair(ini: &Ini, prefix: &str, fallback: Xy) -> Option<Xy> {
    let x = skip_bad(float(ini, "submarine", &format!("{prefix}_x")));
    let y = skip_bad(float(ini, "submarine", &format!("{prefix}_y")));
    if x.is_none() && y.is_none() {
        return None;
    }
    Some(Xy::new(x.unwrap_or(fallback.x), y.unwrap_or(fallback.y)))
}

fn submarine_section(ini: &Ini) -> SubmarineOptions {
    let defaults = SubmarineOptions::default().resolve();
    let number = |key: &str| skip_bad(float(ini, "submarine", key));

    let max = number("health_max");
    let current = number("health_current");
    let additional = number("health_additional");
    let health = if max.is_none() && current.is_none() && additional.is_none() {
        None
    } else {
        let base = Health::default();
        Some(Health {
            max: max.unwrap_or(base.max),
            current: current.unwrap_or(base.current),
            additional: additional.unwrap_or(base.additional),
        })
    };

    SubmarineOptions {
        label: ini.get("submarine", "label"),
        speed: pair(ini, "speed", defaults.speed),
        health,
        oxygen: number("oxygen"),
        battery: number("battery"),
        radius: number("radius"),
        friction: number("friction"),
        friction_air: number("friction_air"),
        restitution: number("restitution"),
        origin: pair(ini, "origin", defaults.origin),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("minisub-{}-{}.ini", std::process::id(), name))
    }

    #[test]
    fn test_defaults() {
        let config = GameConfig::new();
        assert_eq!(config.window_size(), (800, 450));
        assert_eq!(config.target_fps, 60);
        assert_eq!(config.gravity, Xy::new(0.0, 0.0));
        assert_eq!(config.submarine, SubmarineOptions::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut config = GameConfig::new();
        config
            .load_from_str("[window]\nwidth = 1024\n\n[submarine]\nspeed_x = 5\nhealth_max = 150\n")
            .unwrap();
        assert_eq!(config.window_size(), (1024, 450));
        assert_eq!(config.submarine.speed, Some(Xy::new(5.0, 2.0)));
        assert_eq!(
            config.submarine.health,
            Some(Health {
                max: 150.0,
                current: 100.0,
                additional: 0.0
            })
        );
        assert_eq!(config.submarine.radius, None);

        let resolved = config.submarine.clone().resolve();
        assert_eq!(resolved.radius, 12.0);
        assert_eq!(resolved.label, "Player");
    }

    #[test]
    fn test_bad_value_is_skipped() {
        let mut config = GameConfig::new();
        config.gravity = Xy::new(0.0, 0.5);
        config
            .load_from_str(
                "[window]\nwidth = 1024\n\n[world]\ngravity_y = down\n\n[submarine]\nspeed_x = 9\n",
            )
            .unwrap();
        assert_eq!(config.window_width, 1024);
        assert_eq!(config.gravity, Xy::new(0.0, 0.5));
        assert_eq!(config.submarine.speed, Some(Xy::new(9.0, 2.0)));
    }

    #[test]
    fn test_bad_submarine_key_keeps_the_rest_of_the_section() {
        let mut config = GameConfig::new();
        config
            .load_from_str("[window]\ntarget_fps = -5\n\n[submarine]\nradius = big\nspeed_y = 4\nlabel = Nautilus\n")
            .unwrap();
        assert_eq!(config.target_fps, DEFAULT_TARGET_FPS);
        assert_eq!(config.submarine.radius, None);
        assert_eq!(config.submarine.speed, Some(Xy::new(3.0, 4.0)));
        assert_eq!(config.submarine.label.as_deref(), Some("Nautilus"));
    }

    #[test]
    fn test_missing_file() {
        let mut config = GameConfig::with_path(temp_path("missing"));
        assert!(matches!(config.load_from_file(), Err(ConfigError::Read { .. })));
        assert_eq!(config.window_width, DEFAULT_WINDOW_WIDTH);
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("saved");
        let mut config = GameConfig::with_path(&path);
        config.gravity = Xy::new(0.0, 0.25);
        config.submarine.label = Some("Nautilus".into());
        config.submarine.radius = Some(16.0);
        config.save_to_file().unwrap();

        let mut loaded = GameConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.gravity, Xy::new(0.0, 0.25));
        assert_eq!(loaded.submarine.label.as_deref(), Some("Nautilus"));
        assert_eq!(loaded.submarine.radius, Some(16.0));
        assert_eq!(loaded.submarine.speed, None);
    }
}
