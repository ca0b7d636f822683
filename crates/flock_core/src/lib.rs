//! # flock_core - Predator/Prey Flocking Simulation Core
//!
//! Boids flock, forage and flee while a single energy-limited hunter rests,
//! patrols a waypoint route and chases them. The crate is engine-agnostic:
//! hosts construct a [`Simulation`], call [`Simulation::tick`] once per frame
//! and read positions back through snapshots or the event queue.
//!
//! ## Features
//! - Reynolds steering primitives (seek, arrive, pursuit, evade, wander,
//!   separation, alignment, cohesion)
//! - Generic finite state machine driving the hunter
//! - Deterministic runs (same seed = same result)
//! - YAML/JSON configuration with presets
//! - JSON API for headless runs
//!
//! ## Usage
//! ```rust
//! use flock_core::{SimConfig, Simulation};
//!
//! let mut sim = Simulation::new(SimConfig::default());
//! for _ in 0..60 {
//!     sim.tick(1.0 / 60.0);
//! }
//! let events = sim.drain_events();
//! assert!(!events.is_empty());
//! ```

pub mod boid;
pub mod config;
pub mod error;
pub mod events;
pub mod food;
pub mod fsm;
pub mod hunter;
pub mod registry;
pub mod simulation;
pub mod snapshot;
pub mod steering;
pub mod timestep;
pub mod world;

pub use boid::{BoidAgent, BoidBehavior};
pub use config::{BoidConfig, FlockWeights, FoodConfig, HunterConfig, SimConfig};
pub use error::{ConfigError, Result};
pub use events::{EventBus, ObserverId, SimEvent};
pub use food::FoodSpawner;
pub use fsm::{FiniteStateMachine, State, Transition};
pub use hunter::{Hunter, HunterAgent, HunterStateKey};
pub use registry::{AgentRegistry, BoidBody, BoidId, FoodId, HunterView};
pub use simulation::{SimStats, Simulation};
pub use snapshot::{simulate_json, SimSnapshot, SimSummary, SimulationRequest, SimulationResponse};
pub use steering::Vec3;
pub use world::World;
