//! Food spawning

use rand::Rng;

use crate::config::FoodConfig;
use crate::registry::FoodId;
use crate::steering::Vec3;
use crate::world::World;

/// Keeps up to `max_food_count` food sources alive on the ground plane.
#[derive(Debug, Clone)]
pub struct FoodSpawner {
    config: FoodConfig,
}

impl FoodSpawner {
    pub fn new(config: FoodConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FoodConfig {
        &self.config
    }

    /// Spawn until the world holds `max_food_count` food sources.
    pub fn fill<R: Rng + ?Sized>(&self, world: &mut World, rng: &mut R) -> Vec<FoodId> {
        let mut spawned = Vec::new();
        while let Some(id) = self.top_up(world, &mut *rng) {
            spawned.push(id);
        }
        spawned
    }

    /// Spawn a single food source if under capacity.
    pub fn top_up<R: Rng + ?Sized>(&self, world: &mut World, rng: &mut R) -> Option<FoodId> {
        if world.registry.food_count() >= self.config.max_food_count {
            return None;
        }
        let position = self.random_position(rng);
        Some(world.spawn_food(position))
    }

    fn random_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let [half_x, half_z] = self.config.spawn_area;
        Vec3::new(symmetric(rng, half_x), 0.0, symmetric(rng, half_z))
    }
}

/// Uniform in `[-half, half]`; collapses to 0 for a degenerate extent.
pub(crate) fn symmetric<R: Rng + ?Sized>(rng: &mut R, half: f32) -> f32 {
    if half > 0.0 && half.is_finite() {
        half * rng.gen_range(-1.0f32..=1.0)
    } else {
        0.0
    }
}
