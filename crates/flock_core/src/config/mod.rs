//! # Simulation Configuration
//!
//! Every numeric tunable lives here and is supplied at construction time; the
//! simulation never mutates its configuration.
//!
//! ## Usage
//! ```rust
//! use flock_core::config::SimConfig;
//!
//! let config = SimConfig::default();
//! let endurance = SimConfig::endurance();
//! assert!(endurance.hunter.hunting_drain_multiplier < config.hunter.hunting_drain_multiplier);
//! ```

mod boid_config;
mod flock_config;
mod food_config;
mod hunter_config;

pub use boid_config::BoidConfig;
pub use flock_config::FlockWeights;
pub use food_config::FoodConfig;
pub use hunter_config::HunterConfig;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Names accepted by [`SimConfig::from_preset`].
pub const PRESETS: &[&str] = &["default", "endurance"];

/// Full simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for spawning and wandering
    pub seed: u64,
    pub boid: BoidConfig,
    pub hunter: HunterConfig,
    pub food: FoodConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            boid: BoidConfig::default(),
            hunter: HunterConfig::default(),
            food: FoodConfig::default(),
        }
    }
}

impl SimConfig {
    /// Tighter capture, single-rate drain while hunting: longer chases.
    pub fn endurance() -> Self {
        let mut cfg = Self::default();
        cfg.hunter.capture_distance = 0.5;
        cfg.hunter.hunting_drain_multiplier = 1.0;
        cfg
    }

    pub fn from_preset(name: &str) -> Result<Self> {
        match name {
            "default" => Ok(Self::default()),
            "endurance" => Ok(Self::endurance()),
            other => Err(ConfigError::UnknownPreset(other.to_string())),
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let cfg: SimConfig = serde_yaml::from_str(yaml)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: SimConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from a `.yaml`/`.yml` or `.json` file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        let cfg = match ext.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text)?,
            Some("json") => Self::from_json_str(&text)?,
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.display().to_string(),
                })
            }
        };
        log::info!("Loaded simulation config from {}", path.display());
        Ok(cfg)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject negative or non-finite tunables.
    ///
    /// Zero is accepted everywhere: a zero speed cap simply yields a
    /// stationary agent.
    pub fn validate(&self) -> Result<()> {
        let b = &self.boid;
        let h = &self.hunter;
        let scalars: [(&str, f32); 26] = [
            ("boid.max_velocity", b.max_velocity),
            ("boid.max_force", b.max_force),
            ("boid.separation_radius", b.separation_radius),
            ("boid.flock_detection_range", b.flock_detection_range),
            ("boid.food_detection_range", b.food_detection_range),
            ("boid.hunter_detection_range", b.hunter_detection_range),
            ("boid.food_capture_radius", b.food_capture_radius),
            ("boid.arrive_slow_radius", b.arrive_slow_radius),
            ("boid.behavior_duration", b.behavior_duration),
            ("boid.wander_interval", b.wander_interval),
            ("boid.weights.separation", b.weights.separation),
            ("boid.weights.alignment", b.weights.alignment),
            ("boid.weights.cohesion", b.weights.cohesion),
            ("hunter.max_energy", h.max_energy),
            ("hunter.initial_energy_ratio", h.initial_energy_ratio),
            ("hunter.energy_drain_rate", h.energy_drain_rate),
            ("hunter.energy_recover_rate", h.energy_recover_rate),
            ("hunter.patrol_drain_multiplier", h.patrol_drain_multiplier),
            ("hunter.hunting_drain_multiplier", h.hunting_drain_multiplier),
            ("hunter.rest_duration", h.rest_duration),
            ("hunter.min_patrol_time", h.min_patrol_time),
            ("hunter.detection_range", h.detection_range),
            ("hunter.capture_distance", h.capture_distance),
            ("hunter.brake_radius", h.brake_radius),
            ("hunter.max_velocity", h.max_velocity),
            ("hunter.max_force", h.max_force),
        ];
        for (field, value) in scalars {
            check_non_negative(field, value)?;
        }
        check_non_negative("hunter.waypoint_threshold", h.waypoint_threshold)?;
        for (i, extent) in b.spawn_area.iter().chain(self.food.spawn_area.iter()).enumerate() {
            let field = if i < 2 { "boid.spawn_area" } else { "food.spawn_area" };
            check_non_negative(field, *extent)?;
            if !(*extent * 2.0).is_finite() {
                return Err(ConfigError::invalid(field, "extent too large"));
            }
        }
        if h.initial_energy_ratio > 1.0 {
            return Err(ConfigError::invalid(
                "hunter.initial_energy_ratio",
                "must not exceed 1.0",
            ));
        }
        let points = h.waypoints.iter().chain(std::iter::once(&h.spawn_position));
        if points.flatten().any(|c| !c.is_finite()) {
            return Err(ConfigError::invalid("hunter.waypoints", "coordinates must be finite"));
        }
        Ok(())
    }
}

fn check_non_negative(field: &str, value: f32) -> Result<()> {
    if !value.is_finite() {
        return Err(ConfigError::invalid(field, "must be finite"));
    }
    if value < 0.0 {
        return Err(ConfigError::invalid(field, format!("must be >= 0 (got {})", value)));
    }
    Ok(())
}

// ========== Tests ==========
