//! Boid tunables

use serde::{Deserialize, Serialize};

use super::FlockWeights;

/// Per-boid steering and perception parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoidConfig {
    /// Boids spawned when the simulation starts (default: 20)
    pub count: usize,
    /// Speed cap (default: 3.0)
    pub max_velocity: f32,
    /// Steering force cap per primitive (default: 0.3)
    pub max_force: f32,

    // === Perception ===
    /// Radius used by separation (default: 2.0)
    pub separation_radius: f32,
    /// Radius used by alignment, cohesion and the flock check (default: 5.0)
    pub flock_detection_range: f32,
    /// Food closer than this is noticed (default: 10.0)
    pub food_detection_range: f32,
    /// Hunter closer than this triggers evasion (default: 8.0)
    pub hunter_detection_range: f32,

    // === Foraging ===
    /// Food closer than this is eaten (default: 0.5)
    pub food_capture_radius: f32,
    /// Arrive slow-down radius when approaching food (default: 2.0)
    pub arrive_slow_radius: f32,

    // === Behavior cadence ===
    /// Seconds between behavior re-evaluations (default: 1.0)
    pub behavior_duration: f32,
    /// Seconds between random heading changes (default: 2.0)
    pub wander_interval: f32,

    /// Half extents (x, z) of the initial spawn rectangle (default: 20 x 20)
    pub spawn_area: [f32; 2],

    /// Flocking weights
    pub weights: FlockWeights,
}

impl Default for BoidConfig {
    fn default() -> Self {
        Self {
            count: 20,
            max_velocity: 3.0,
            max_force: 0.3,

            separation_radius: 2.0,
            flock_detection_range: 5.0,
            food_detection_range: 10.0,
            hunter_detection_range: 8.0,

            food_capture_radius: 0.5,
            arrive_slow_radius: 2.0,

            behavior_duration: 1.0,
            wander_interval: 2.0,

            spawn_area: [20.0, 20.0],

            weights: FlockWeights::default(),
        }
    }
}
