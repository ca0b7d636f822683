//! Hunter tunables

use serde::{Deserialize, Serialize};

/// Hunter energy, perception, patrol and capture parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HunterConfig {
    // === Energy ===
    /// Energy pool size (default: 100.0)
    pub max_energy: f32,
    /// Fraction of `max_energy` at spawn (default: 0.5, forces an initial rest)
    pub initial_energy_ratio: f32,
    /// Base drain per second while moving (default: 10.0)
    pub energy_drain_rate: f32,
    /// Recovery per second while resting (default: 20.0)
    pub energy_recover_rate: f32,
    /// Drain multiplier while patrolling (default: 1.0)
    pub patrol_drain_multiplier: f32,
    /// Drain multiplier while hunting (default: 2.0)
    pub hunting_drain_multiplier: f32,

    // === Timers ===
    /// Minimum rest before patrolling again (default: 5.0)
    pub rest_duration: f32,
    /// Minimum patrol time before a hunt may start or a waypoint advance (default: 2.0)
    pub min_patrol_time: f32,

    // === Perception / capture ===
    /// Boids closer than this can be targeted and are kept as target (default: 10.0)
    pub detection_range: f32,
    /// Target closer than this is captured (default: 1.0)
    pub capture_distance: f32,
    /// Pursuit braking radius (default: 2.0)
    pub brake_radius: f32,

    // === Motion ===
    /// Speed cap (default: 5.0)
    pub max_velocity: f32,
    /// Steering force cap (default: 1.0)
    pub max_force: f32,

    // === Patrol route ===
    /// Waypoint counts as reached inside this distance (default: 1.0)
    pub waypoint_threshold: f32,
    /// Patrol waypoints, visited cyclically
    pub waypoints: Vec<[f32; 3]>,
    /// Spawn position
    pub spawn_position: [f32; 3],
}

impl Default for HunterConfig {
    fn default() -> Self {
        Self {
            max_energy: 100.0,
            initial_energy_ratio: 0.5,
            energy_drain_rate: 10.0,
            energy_recover_rate: 20.0,
            patrol_drain_multiplier: 1.0,
            hunting_drain_multiplier: 2.0,

            rest_duration: 5.0,
            min_patrol_time: 2.0,

            detection_range: 10.0,
            capture_distance: 1.0,
            brake_radius: 2.0,

            max_velocity: 5.0,
            max_force: 1.0,

            waypoint_threshold: 1.0,
            waypoints: vec![
                [10.0, 0.0, 10.0],
                [10.0, 0.0, -10.0],
                [-10.0, 0.0, -10.0],
                [-10.0, 0.0, 10.0],
            ],
            spawn_position: [0.0, 0.0, 0.0],
        }
    }
}
