//! Hunter agent
//!
//! The hunter rests, patrols a cyclic waypoint route and chases boids. Its
//! behavior is an FSM over [`HunterStateKey`]; the [`Hunter`] body carries the
//! data and primitives the states act on (energy, steering, waypoints,
//! target), and [`HunterAgent`] ties body and machine together.
//!
//! ## State transitions
//! ```text
//! Idle    → Patrol   energy full and rest elapsed
//! Patrol  → Hunting  patrol timer elapsed and a boid within detection range
//! Patrol  → Idle     no waypoints, or energy depleted
//! Hunting → Patrol   target lost / out of range / captured
//! Hunting → Idle     energy depleted
//! ```

mod states;

pub use states::{HuntingState, IdleState, PatrolState};

use serde::{Deserialize, Serialize};

use crate::config::HunterConfig;
use crate::events::SimEvent;
use crate::fsm::FiniteStateMachine;
use crate::registry::{default_forward, BoidId, HunterView};
use crate::steering::{self, normalize_or_zero, SteeringLimits, Vec3};
use crate::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HunterStateKey {
    /// Resting: recovers energy
    Idle,
    /// Walking the waypoint route
    Patrol,
    /// Chasing a target boid
    Hunting,
}

/// Hunter body: everything the states read and mutate.
#[derive(Debug, Clone)]
pub struct Hunter {
    config: HunterConfig,
    position: Vec3,
    velocity: Vec3,
    forward: Vec3,
    energy: f32,
    waypoints: Vec<Vec3>,
    waypoint_index: usize,
    target: Option<BoidId>,
    /// Elapsed time of the tick in progress
    dt: f32,
}

impl Hunter {
    pub fn new(config: HunterConfig) -> Self {
        let waypoints = config.waypoints.iter().map(|p| Vec3::from(*p)).collect();
        Self {
            position: Vec3::from(config.spawn_position),
            velocity: Vec3::zeros(),
            forward: default_forward(),
            energy: config.max_energy * config.initial_energy_ratio,
            waypoints,
            waypoint_index: 0,
            target: None,
            dt: 0.0,
            config,
        }
    }

    pub fn config(&self) -> &HunterConfig {
        &self.config
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn energy(&self) -> f32 {
        self.energy
    }

    pub fn max_energy(&self) -> f32 {
        self.config.max_energy
    }

    /// Clamped to [0, max_energy].
    pub fn set_energy(&mut self, energy: f32) {
        self.energy = energy.clamp(0.0, self.config.max_energy);
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn limits(&self) -> SteeringLimits {
        SteeringLimits::new(self.config.max_velocity, self.config.max_force)
    }

    // ---- energy ----

    /// Spend `rate` energy per second. Returns true once energy hits zero.
    pub fn drain_energy(&mut self, rate: f32, dt: f32) -> bool {
        self.energy = (self.energy - rate * dt).max(0.0);
        self.energy <= 0.0
    }

    pub fn recover_energy(&mut self, rate: f32, dt: f32) {
        self.energy = (self.energy + rate * dt).min(self.config.max_energy);
    }

    pub fn has_full_energy(&self) -> bool {
        self.energy >= self.config.max_energy
    }

    // ---- steering ----

    pub fn seek(&self, target: Vec3) -> Vec3 {
        steering::seek(self.position, self.velocity, target, self.limits())
    }

    pub fn pursuit(&self, target_position: Vec3, target_velocity: Vec3) -> Vec3 {
        steering::pursuit(
            self.position,
            self.velocity,
            target_position,
            target_velocity,
            self.limits(),
        )
    }

    pub fn add_force(&mut self, force: Vec3) {
        self.velocity = steering::apply_force(self.velocity, force, self.config.max_velocity);
    }

    pub fn reset_velocity(&mut self) {
        self.velocity = Vec3::zeros();
    }

    // ---- perception ----

    /// Nearest live boid strictly inside the detection range.
    pub fn find_nearest_boid(&self, world: &World) -> Option<BoidId> {
        world
            .registry
            .nearest_boid_within(self.position, self.config.detection_range, None)
            .map(|(id, _)| id)
    }

    pub fn target(&self) -> Option<BoidId> {
        self.target
    }

    pub fn set_target(&mut self, target: Option<BoidId>) {
        self.target = target;
    }

    pub fn clear_target(&mut self) {
        self.target = None;
    }

    // ---- waypoints ----

    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }

    pub fn waypoint_index(&self) -> usize {
        self.waypoint_index
    }

    /// Current patrol waypoint, or `None` without a route.
    pub fn next_waypoint(&self) -> Option<Vec3> {
        self.waypoints.get(self.waypoint_index).copied()
    }

    pub fn move_to_next_waypoint(&mut self) {
        if self.waypoints.is_empty() {
            return;
        }
        self.waypoint_index = (self.waypoint_index + 1) % self.waypoints.len();
    }

    pub fn reset_waypoint_index(&mut self) {
        self.waypoint_index = 0;
    }

    /// Point the cursor at the closest waypoint (linear scan).
    pub fn find_nearest_waypoint(&mut self) {
        let mut min_distance = f32::MAX;
        for (i, waypoint) in self.waypoints.iter().enumerate() {
            let distance = (waypoint - self.position).norm();
            if distance < min_distance {
                min_distance = distance;
                self.waypoint_index = i;
            }
        }
    }

    pub fn is_at_waypoint(&self, waypoint: Vec3) -> bool {
        (waypoint - self.position).norm() < self.config.waypoint_threshold
    }

    pub fn view(&self) -> HunterView {
        HunterView {
            position: self.position,
            velocity: self.velocity,
            forward: self.forward,
        }
    }

    fn integrate(&mut self, dt: f32) {
        self.position = steering::integrate(self.position, self.velocity, dt);
        let heading = normalize_or_zero(self.velocity);
        if heading != Vec3::zeros() {
            self.forward = heading;
        }
    }
}

/// Hunter body plus the state machine that drives it.
#[derive(Debug)]
pub struct HunterAgent {
    hunter: Hunter,
    fsm: FiniteStateMachine<HunterStateKey, Hunter, World>,
}

impl HunterAgent {
    /// Build the hunter, enter Idle and publish it to the world.
    pub fn new(config: HunterConfig, world: &mut World) -> Self {
        let mut fsm: FiniteStateMachine<HunterStateKey, Hunter, World> = FiniteStateMachine::new();
        fsm.add_state(HunterStateKey::Idle, IdleState::default());
        fsm.add_state(HunterStateKey::Patrol, PatrolState::default());
        fsm.add_state(HunterStateKey::Hunting, HuntingState);

        let mut agent = Self {
            hunter: Hunter::new(config),
            fsm,
        };
        agent.change_state(HunterStateKey::Idle, world);
        world.registry.set_hunter(Some(agent.hunter.view()));
        log::info!(
            "Hunter spawned at {:?} with energy {:.1}/{:.1}",
            agent.hunter.position,
            agent.hunter.energy,
            agent.hunter.config.max_energy
        );
        agent
    }

    pub fn hunter(&self) -> &Hunter {
        &self.hunter
    }

    /// Direct body access for hosts and tests (teleport, energy override).
    pub fn hunter_mut(&mut self) -> &mut Hunter {
        &mut self.hunter
    }

    pub fn state(&self) -> Option<HunterStateKey> {
        self.fsm.current()
    }

    pub fn energy(&self) -> f32 {
        self.hunter.energy
    }

    pub fn target(&self) -> Option<BoidId> {
        self.hunter.target
    }

    pub fn position(&self) -> Vec3 {
        self.hunter.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.hunter.velocity
    }

    /// Force a state change (no-op if already active).
    pub fn change_state(&mut self, key: HunterStateKey, world: &mut World) {
        if let Some(t) = self.fsm.change_state(key, &mut self.hunter, world) {
            world.events.emit(SimEvent::HunterStateChanged {
                from: t.from,
                to: t.to,
            });
        }
    }

    /// One simulation step: run the active state, integrate, publish.
    pub fn tick(&mut self, world: &mut World, dt: f32) {
        self.hunter.dt = dt;
        if let Some(t) = self.fsm.execute(&mut self.hunter, world) {
            world.events.emit(SimEvent::HunterStateChanged {
                from: t.from,
                to: t.to,
            });
        }
        self.hunter.integrate(dt);
        world.registry.set_hunter(Some(self.hunter.view()));
    }
}
