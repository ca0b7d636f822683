//! Simulation driver
//!
//! Owns the world, the hunter and every boid agent, and advances them with an
//! explicit `tick(dt)`.
//!
//! ## Per-tick order
//! ```text
//! food top-up → hunter (FSM, integrate, publish) → boids (decide, steer,
//! integrate, publish; captured boids culled) → stats → event flush
//! ```

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::boid::BoidAgent;
use crate::config::SimConfig;
use crate::events::{ObserverId, SimEvent};
use crate::food::{symmetric, FoodSpawner};
use crate::hunter::HunterAgent;
use crate::registry::BoidId;
use crate::snapshot::SimSnapshot;
use crate::steering::{clamp_magnitude, Vec3};
use crate::world::World;

/// Running totals since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimStats {
    pub boids_spawned: u64,
    pub captures: u64,
    pub food_spawned: u64,
    pub food_consumed: u64,
    pub hunter_transitions: u64,
}

impl SimStats {
    fn record(&mut self, event: &SimEvent) {
        match event {
            SimEvent::BoidSpawned { .. } => self.boids_spawned += 1,
            SimEvent::BoidCaptured { .. } => self.captures += 1,
            SimEvent::FoodSpawned { .. } => self.food_spawned += 1,
            SimEvent::FoodConsumed { .. } => self.food_consumed += 1,
            SimEvent::HunterStateChanged { .. } => self.hunter_transitions += 1,
        }
    }
}

#[derive(Debug)]
pub struct Simulation {
    config: SimConfig,
    world: World,
    hunter: HunterAgent,
    boids: BTreeMap<BoidId, BoidAgent>,
    food: FoodSpawner,
    rng: ChaCha8Rng,
    elapsed: f64,
    tick_count: u64,
    stats: SimStats,
}

impl Simulation {
    /// Build the world from `config`: boids, hunter and a full food set.
    ///
    /// The configuration is taken as-is; validate it first if it came from
    /// outside (see [`SimConfig::validate`]).
    pub fn new(config: SimConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut world = World::new();

        let mut boids = BTreeMap::new();
        let [half_x, half_z] = config.boid.spawn_area;
        for _ in 0..config.boid.count {
            let position = Vec3::new(symmetric(&mut rng, half_x), 0.0, symmetric(&mut rng, half_z));
            let agent = BoidAgent::spawn(&mut world, position, &config.boid, &mut rng);
            boids.insert(agent.id(), agent);
        }

        let hunter = HunterAgent::new(config.hunter.clone(), &mut world);

        let food = FoodSpawner::new(config.food.clone());
        food.fill(&mut world, &mut rng);

        let mut sim = Self {
            config,
            world,
            hunter,
            boids,
            food,
            rng,
            elapsed: 0.0,
            tick_count: 0,
            stats: SimStats::default(),
        };
        sim.finish_tick();

        log::info!(
            "Simulation ready: seed={} boids={} food={}",
            sim.config.seed,
            sim.boids.len(),
            sim.world.registry.food_count()
        );
        sim
    }

    /// Advance every agent by `dt` seconds.
    ///
    /// Negative or non-finite `dt` is treated as 0.
    pub fn tick(&mut self, dt: f32) {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };

        self.food.top_up(&mut self.world, &mut self.rng);
        self.hunter.tick(&mut self.world, dt);

        let world = &mut self.world;
        let rng = &mut self.rng;
        let boid_config = &self.config.boid;
        self.boids
            .retain(|_, agent| agent.tick(world, boid_config, &mut *rng, dt));

        self.elapsed += f64::from(dt);
        self.tick_count += 1;
        self.finish_tick();
    }

    /// Run `ticks` fixed steps.
    ///
    /// Dispatched events keep queuing until [`Simulation::drain_events`].
    pub fn run(&mut self, ticks: u64, dt: f32) {
        for _ in 0..ticks {
            self.tick(dt);
        }
    }

    fn finish_tick(&mut self) {
        for event in self.world.events.pending() {
            self.stats.record(event);
        }
        self.world.events.flush();
    }

    // ---- accessors ----

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn hunter(&self) -> &HunterAgent {
        &self.hunter
    }

    pub fn boid_agent(&self, id: BoidId) -> Option<&BoidAgent> {
        self.boids.get(&id)
    }

    pub fn boid_agents(&self) -> impl Iterator<Item = &BoidAgent> + '_ {
        self.boids.values()
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn stats(&self) -> SimStats {
        self.stats
    }

    pub fn snapshot(&self) -> SimSnapshot {
        SimSnapshot::capture(self)
    }

    // ---- events ----

    /// Events dispatched since the previous drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.world.events.drain()
    }

    pub fn subscribe<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut(&SimEvent) + Send + 'static,
    {
        self.world.events.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.world.events.unsubscribe(id)
    }

    // ---- host mutation ----

    /// Add a boid at `position`. Its `BoidSpawned` event goes out with the
    /// next tick.
    pub fn spawn_boid(&mut self, position: Vec3) -> BoidId {
        let agent = BoidAgent::spawn(&mut self.world, position, &self.config.boid, &mut self.rng);
        let id = agent.id();
        self.boids.insert(id, agent);
        id
    }

    /// Overwrite a boid's velocity, clamped to its speed cap.
    ///
    /// Returns false if the boid is gone.
    pub fn set_boid_velocity(&mut self, id: BoidId, velocity: Vec3) -> bool {
        let Some(body) = self.world.registry.boid(id).copied() else {
            return false;
        };
        let velocity = clamp_magnitude(velocity, self.config.boid.max_velocity);
        self.world
            .registry
            .update_boid(id, body.moved(body.position, velocity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hunter::HunterStateKey;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_new_populates_world() {
        let sim = Simulation::new(SimConfig::default());
        assert_eq!(sim.world().registry.boid_count(), 20);
        assert_eq!(sim.world().registry.food_count(), 5);
        assert_eq!(sim.hunter().state(), Some(HunterStateKey::Idle));
        assert_eq!(sim.stats().boids_spawned, 20);
        assert_eq!(sim.tick_count(), 0);
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = Simulation::new(SimConfig::default());
        let mut b = Simulation::new(SimConfig::default());
        a.run(50, 0.05);
        b.run(50, 0.05);
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_invalid_dt_is_zero() {
        let mut sim = Simulation::new(SimConfig::default());
        let positions = |s: &Simulation| -> Vec<[f32; 3]> {
            s.snapshot().boids.iter().map(|b| b.position).collect()
        };
        let before = positions(&sim);
        sim.tick(f32::NAN);
        sim.tick(-1.0);
        assert_eq!(sim.elapsed(), 0.0);
        assert_eq!(sim.tick_count(), 2);
        assert_eq!(positions(&sim), before);
    }

    #[test]
    fn test_events_queue_until_drained() {
        let mut sim = Simulation::new(SimConfig::default());
        let initial = sim.drain_events();
        assert!(initial.contains(&SimEvent::HunterStateChanged {
            from: None,
            to: HunterStateKey::Idle
        }));
        assert!(sim.drain_events().is_empty());
    }

    #[test]
    fn test_observer_sees_spawn_on_next_tick() {
        let mut sim = Simulation::new(SimConfig::default());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        sim.subscribe(move |e| sink.lock().unwrap().push(e.clone()));

        let id = sim.spawn_boid(Vec3::new(1.0, 0.0, 1.0));
        assert!(seen.lock().unwrap().is_empty());
        sim.tick(0.1);
        assert!(seen.lock().unwrap().contains(&SimEvent::BoidSpawned { id }));
        assert!(sim.boid_agent(id).is_some());
    }

    #[test]
    fn test_set_boid_velocity_clamps() {
        let mut sim = Simulation::new(SimConfig::default());
        let id = sim.spawn_boid(Vec3::zeros());
        assert!(sim.set_boid_velocity(id, Vec3::new(30.0, 0.0, 0.0)));
        let body = sim.world().registry.boid(id).unwrap();
        assert!((body.velocity.norm() - 3.0).abs() < 1e-4);
        assert!(!sim.set_boid_velocity(BoidId(9_999), Vec3::zeros()));
    }
}
