//! Serializable views of a running simulation and the JSON run API.

use serde::{Deserialize, Serialize};

use crate::boid::BoidBehavior;
use crate::config::SimConfig;
use crate::error::{ConfigError, Result};
use crate::hunter::HunterStateKey;
use crate::registry::{BoidId, FoodId};
use crate::simulation::{SimStats, Simulation};
use crate::steering::Vec3;
use crate::timestep::DEFAULT_DT;

/// Request/response schema understood by [`simulate_json`].
pub const SCHEMA_VERSION: u8 = 1;

fn arr(v: Vec3) -> [f32; 3] {
    [v.x, v.y, v.z]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub id: BoidId,
    pub position: [f32; 3],
    pub velocity: [f32; 3],
    pub forward: [f32; 3],
    pub behavior: Option<BoidBehavior>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodSnapshot {
    pub id: FoodId,
    pub position: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HunterSnapshot {
    pub position: [f32; 3],
    pub velocity: [f32; 3],
    pub forward: [f32; 3],
    pub energy: f32,
    pub state: Option<HunterStateKey>,
    pub target: Option<BoidId>,
}

/// Full world state at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub tick: u64,
    pub elapsed: f64,
    pub boids: Vec<AgentSnapshot>,
    pub foods: Vec<FoodSnapshot>,
    pub hunter: HunterSnapshot,
}

impl SimSnapshot {
    pub fn capture(sim: &Simulation) -> Self {
        let registry = &sim.world().registry;
        let boids = registry
            .boids()
            .map(|(id, body)| AgentSnapshot {
                id,
                position: arr(body.position),
                velocity: arr(body.velocity),
                forward: arr(body.forward),
                behavior: sim.boid_agent(id).map(|a| a.behavior()),
            })
            .collect();
        let foods = registry
            .foods()
            .map(|(id, pos)| FoodSnapshot {
                id,
                position: arr(pos),
            })
            .collect();

        let hunter = sim.hunter();
        Self {
            tick: sim.tick_count(),
            elapsed: sim.elapsed(),
            boids,
            foods,
            hunter: HunterSnapshot {
                position: arr(hunter.position()),
                velocity: arr(hunter.velocity()),
                forward: arr(hunter.hunter().forward()),
                energy: hunter.energy(),
                state: hunter.state(),
                target: hunter.target(),
            },
        }
    }
}

/// Totals reported alongside the final snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimSummary {
    pub boids_alive: usize,
    pub captures: u64,
    pub food_consumed: u64,
    pub hunter_transitions: u64,
}

impl SimSummary {
    pub fn new(stats: SimStats, boids_alive: usize) -> Self {
        Self {
            boids_alive,
            captures: stats.captures,
            food_consumed: stats.food_consumed,
            hunter_transitions: stats.hunter_transitions,
        }
    }
}

fn default_dt() -> f32 {
    DEFAULT_DT
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub schema_version: u8,
    /// Falls back to `SimConfig::default()`
    #[serde(default)]
    pub config: Option<SimConfig>,
    pub ticks: u64,
    #[serde(default = "default_dt")]
    pub dt: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResponse {
    pub schema_version: u8,
    pub summary: SimSummary,
    pub snapshot: SimSnapshot,
}

impl SimulationResponse {
    pub fn from_simulation(sim: &Simulation) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            summary: SimSummary::new(sim.stats(), sim.world().registry.boid_count()),
            snapshot: sim.snapshot(),
        }
    }
}

/// Run a headless simulation described by a JSON request and return the
/// final state as JSON.
///
/// Request:
/// ```json
/// { "schema_version": 1, "ticks": 600, "dt": 0.016, "config": { "seed": 7 } }
/// ```
pub fn simulate_json(request_json: &str) -> Result<String> {
    let request: SimulationRequest = serde_json::from_str(request_json)?;
    if request.schema_version != SCHEMA_VERSION {
        return Err(ConfigError::invalid(
            "schema_version",
            format!("unsupported schema version {}", request.schema_version),
        ));
    }
    if !request.dt.is_finite() || request.dt < 0.0 {
        return Err(ConfigError::invalid("dt", "must be finite and >= 0"));
    }

    let config = request.config.unwrap_or_default();
    config.validate()?;

    let mut sim = Simulation::new(config);
    sim.drain_events();
    for _ in 0..request.ticks {
        sim.tick(request.dt);
        sim.drain_events();
    }

    Ok(serde_json::to_string(&SimulationResponse::from_simulation(&sim))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_matches_world() {
        let sim = Simulation::new(SimConfig::default());
        let snap = sim.snapshot();
        assert_eq!(snap.tick, 0);
        assert_eq!(snap.boids.len(), 20);
        assert_eq!(snap.foods.len(), 5);
        assert_eq!(snap.hunter.state, Some(HunterStateKey::Idle));
        assert!((snap.hunter.energy - 50.0).abs() < 1e-4);
        assert!(snap.boids.iter().all(|b| b.behavior == Some(BoidBehavior::Random)));
    }

    #[test]
    fn test_simulate_json() {
        let out = simulate_json(r#"{"schema_version": 1, "ticks": 20, "dt": 0.05}"#).unwrap();
        let response: SimulationResponse = serde_json::from_str(&out).unwrap();
        assert_eq!(response.snapshot.tick, 20);
        assert!((response.snapshot.elapsed - 1.0).abs() < 1e-4);
        assert_eq!(response.summary.boids_alive, response.snapshot.boids.len());
    }

    #[test]
    fn test_simulate_json_partial_config() {
        let request = r#"{
            "schema_version": 1,
            "ticks": 1,
            "config": { "boid": { "count": 3 }, "food": { "max_food_count": 1 } }
        }"#;
        let response: SimulationResponse =
            serde_json::from_str(&simulate_json(request).unwrap()).unwrap();
        assert_eq!(response.snapshot.boids.len(), 3);
        assert_eq!(response.snapshot.foods.len(), 1);
    }

    #[test]
    fn test_simulate_json_rejects_bad_input() {
        assert!(matches!(
            simulate_json(r#"{"schema_version": 2, "ticks": 1}"#),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            simulate_json(r#"{"schema_version": 1, "ticks": 1, "dt": -0.1}"#),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            simulate_json(r#"{"schema_version": 1, "ticks": 1, "config": {"hunter": {"max_energy": -1}}}"#),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(simulate_json("not json"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_simulate_json_rejects_oversized_spawn_area() {
        let request = r#"{
            "schema_version": 1,
            "ticks": 1,
            "config": { "boid": { "spawn_area": [3.0e38, 1.0] } }
        }"#;
        match simulate_json(request) {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "boid.spawn_area"),
            other => panic!("expected invalid config, got {:?}", other),
        }
    }
}
