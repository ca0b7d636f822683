//! Boid behavior selection
//!
//! A boid re-decides what to do every `behavior_duration` seconds and commits
//! to that behavior in between. Priority on each decision:
//!
//! 1. food within `food_detection_range` → SeekFood
//! 2. hunter within `hunter_detection_range` → EvadeHunter
//! 3. another boid within `flock_detection_range` → Flocking
//! 4. otherwise → Random
//!
//! A fresh boid decides on its first tick. A committed behavior whose trigger
//! has disappeared falls back to Random for the rest of the tick and forces a
//! fresh decision on the next one.
//!
//! Any boid that ends a tick within `food_capture_radius` of a food source
//! eats it, whatever it was doing.

use std::f32::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::BoidConfig;
use crate::registry::{BoidBody, BoidId};
use crate::steering::{self, SteeringLimits, Vec3};
use crate::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoidBehavior {
    Flocking,
    SeekFood,
    EvadeHunter,
    Random,
}

/// Uniform heading on the XZ plane.
fn random_heading<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let angle = rng.gen_range(0.0..TAU);
    Vec3::new(angle.cos(), 0.0, angle.sin())
}

/// Per-boid decision state. Kinematics live in the registry.
#[derive(Debug, Clone)]
pub struct BoidAgent {
    id: BoidId,
    behavior: BoidBehavior,
    behavior_timer: f32,
    wander_direction: Vec3,
    wander_timer: f32,
}

impl BoidAgent {
    /// Register a new boid at `position` heading in a random XZ direction at
    /// full speed.
    pub fn spawn<R: Rng + ?Sized>(
        world: &mut World,
        position: Vec3,
        config: &BoidConfig,
        rng: &mut R,
    ) -> Self {
        let heading = random_heading(rng);
        let id = world.spawn_boid(position, heading * config.max_velocity);
        Self {
            id,
            behavior: BoidBehavior::Random,
            behavior_timer: 0.0,
            wander_direction: heading,
            wander_timer: 0.0,
        }
    }

    pub fn id(&self) -> BoidId {
        self.id
    }

    pub fn behavior(&self) -> BoidBehavior {
        self.behavior
    }

    pub fn behavior_timer(&self) -> f32 {
        self.behavior_timer
    }

    pub fn wander_direction(&self) -> Vec3 {
        self.wander_direction
    }

    /// Advance one tick. Returns false once the boid is no longer registered.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        world: &mut World,
        config: &BoidConfig,
        rng: &mut R,
        dt: f32,
    ) -> bool {
        let Some(body) = world.registry.boid(self.id).copied() else {
            return false;
        };

        self.behavior_timer = (self.behavior_timer - dt).max(0.0);
        self.wander_timer = (self.wander_timer - dt).max(0.0);

        if self.behavior_timer <= 0.0 {
            let next = self.decide(world, config, &body);
            if next != self.behavior {
                log::trace!("Boid {:?}: {:?} -> {:?}", self.id, self.behavior, next);
            }
            self.behavior = next;
            self.behavior_timer = config.behavior_duration;
        }

        let velocity = match self.steer(world, config, &body, &mut *rng) {
            Some(v) => v,
            None => {
                self.behavior = BoidBehavior::Random;
                self.behavior_timer = 0.0;
                self.wander(config, body.velocity, rng)
            }
        };

        let position = steering::integrate(body.position, velocity, dt);
        world.registry.update_boid(self.id, body.moved(position, velocity));

        if let Some((food, _)) = world
            .registry
            .nearest_food_within(position, config.food_capture_radius)
        {
            world.consume_food(food, self.id);
            if self.behavior == BoidBehavior::SeekFood {
                self.behavior_timer = 0.0;
            }
        }
        true
    }

    fn decide(&self, world: &World, config: &BoidConfig, body: &BoidBody) -> BoidBehavior {
        let registry = &world.registry;
        if registry
            .nearest_food_within(body.position, config.food_detection_range)
            .is_some()
        {
            return BoidBehavior::SeekFood;
        }
        if registry
            .hunter()
            .is_some_and(|h| (h.position - body.position).norm() < config.hunter_detection_range)
        {
            return BoidBehavior::EvadeHunter;
        }
        if registry.has_boid_within(body.position, config.flock_detection_range, Some(self.id)) {
            return BoidBehavior::Flocking;
        }
        BoidBehavior::Random
    }

    /// New velocity for the committed behavior, or `None` if its trigger is gone.
    fn steer<R: Rng + ?Sized>(
        &mut self,
        world: &mut World,
        config: &BoidConfig,
        body: &BoidBody,
        rng: &mut R,
    ) -> Option<Vec3> {
        let limits = SteeringLimits::new(config.max_velocity, config.max_force);
        match self.behavior {
            BoidBehavior::SeekFood => {
                let (_, target) = world
                    .registry
                    .nearest_food_within(body.position, config.food_detection_range)?;
                let force = steering::arrive(
                    body.position,
                    body.velocity,
                    target,
                    config.arrive_slow_radius,
                    limits,
                );
                Some(steering::apply_force(body.velocity, force, config.max_velocity))
            }
            BoidBehavior::EvadeHunter => {
                let hunter = world
                    .registry
                    .hunter()
                    .copied()
                    .filter(|h| (h.position - body.position).norm() < config.hunter_detection_range)?;
                let force = steering::evade(
                    body.position,
                    body.velocity,
                    hunter.position,
                    hunter.velocity,
                    limits,
                );
                Some(steering::apply_force(body.velocity, force, config.max_velocity))
            }
            BoidBehavior::Flocking => {
                if !world.registry.has_boid_within(
                    body.position,
                    config.flock_detection_range,
                    Some(self.id),
                ) {
                    return None;
                }
                let neighbors = world.registry.neighbors_of(self.id);
                let weights = config.weights;
                let mut velocity = body.velocity;

                let sep = steering::separation(
                    body.position,
                    velocity,
                    &neighbors,
                    config.separation_radius,
                    limits,
                );
                velocity = steering::apply_force(velocity, sep * weights.separation, config.max_velocity);

                let align = steering::alignment(
                    body.position,
                    velocity,
                    &neighbors,
                    config.flock_detection_range,
                    limits,
                );
                velocity = steering::apply_force(velocity, align * weights.alignment, config.max_velocity);

                let coh = steering::cohesion(
                    body.position,
                    velocity,
                    &neighbors,
                    config.flock_detection_range,
                    limits,
                );
                velocity = steering::apply_force(velocity, coh * weights.cohesion, config.max_velocity);
                Some(velocity)
            }
            BoidBehavior::Random => Some(self.wander(config, body.velocity, rng)),
        }
    }

    fn wander<R: Rng + ?Sized>(&mut self, config: &BoidConfig, velocity: Vec3, rng: &mut R) -> Vec3 {
        if self.wander_timer <= 0.0 {
            self.wander_direction = random_heading(rng);
            self.wander_timer = config.wander_interval;
        }
        let limits = SteeringLimits::new(config.max_velocity, config.max_force);
        let force = steering::wander(velocity, self.wander_direction, limits);
        steering::apply_force(velocity, force, config.max_velocity)
    }
}
