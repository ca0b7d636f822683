//! Agent registry
//!
//! Live boids, food sources and the hunter's published view. Entries are keyed
//! by ids that are never reused, so a stale id simply stops resolving once its
//! agent is removed. Iteration is in ascending id order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::steering::{normalize_or_zero, Neighbor, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BoidId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FoodId(pub u64);

/// Facing used before an agent has ever moved.
pub(crate) fn default_forward() -> Vec3 {
    Vec3::new(0.0, 0.0, 1.0)
}

/// Kinematic state of a boid, readable by every other agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoidBody {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Last non-zero heading
    pub forward: Vec3,
}

impl BoidBody {
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        let forward = normalize_or_zero(velocity);
        Self {
            position,
            velocity,
            forward: if forward == Vec3::zeros() {
                default_forward()
            } else {
                forward
            },
        }
    }

    /// Replace kinematics, keeping the previous heading while stationary.
    pub fn moved(&self, position: Vec3, velocity: Vec3) -> Self {
        let heading = normalize_or_zero(velocity);
        Self {
            position,
            velocity,
            forward: if heading == Vec3::zeros() {
                self.forward
            } else {
                heading
            },
        }
    }

    pub fn as_neighbor(&self) -> Neighbor {
        Neighbor {
            position: self.position,
            velocity: self.velocity,
        }
    }
}

/// What boids can see of the hunter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HunterView {
    pub position: Vec3,
    pub velocity: Vec3,
    pub forward: Vec3,
}

#[derive(Debug, Default, Clone)]
pub struct AgentRegistry {
    boids: BTreeMap<BoidId, BoidBody>,
    foods: BTreeMap<FoodId, Vec3>,
    hunter: Option<HunterView>,
    next_boid: u64,
    next_food: u64,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- boids ----

    pub fn register_boid(&mut self, body: BoidBody) -> BoidId {
        let id = BoidId(self.next_boid);
        self.next_boid += 1;
        self.boids.insert(id, body);
        id
    }

    /// Removes the boid. Returns `None` if it was already gone.
    pub fn unregister_boid(&mut self, id: BoidId) -> Option<BoidBody> {
        self.boids.remove(&id)
    }

    /// Publish new kinematics. Ignored for ids no longer registered.
    pub fn update_boid(&mut self, id: BoidId, body: BoidBody) -> bool {
        match self.boids.get_mut(&id) {
            Some(slot) => {
                *slot = body;
                true
            }
            None => false,
        }
    }

    pub fn boid(&self, id: BoidId) -> Option<&BoidBody> {
        self.boids.get(&id)
    }

    pub fn contains_boid(&self, id: BoidId) -> bool {
        self.boids.contains_key(&id)
    }

    pub fn boids(&self) -> impl Iterator<Item = (BoidId, &BoidBody)> + '_ {
        self.boids.iter().map(|(id, body)| (*id, body))
    }

    pub fn boid_count(&self) -> usize {
        self.boids.len()
    }

    /// Every boid except `exclude`, as steering neighbors.
    pub fn neighbors_of(&self, exclude: BoidId) -> Vec<Neighbor> {
        self.boids
            .iter()
            .filter(|(id, _)| **id != exclude)
            .map(|(_, body)| body.as_neighbor())
            .collect()
    }

    /// Nearest boid strictly closer than `range` to `point`.
    pub fn nearest_boid_within(
        &self,
        point: Vec3,
        range: f32,
        exclude: Option<BoidId>,
    ) -> Option<(BoidId, BoidBody)> {
        let mut nearest = None;
        let mut min_distance = range;
        for (id, body) in &self.boids {
            if Some(*id) == exclude {
                continue;
            }
            let distance = (body.position - point).norm();
            if distance < min_distance {
                min_distance = distance;
                nearest = Some((*id, *body));
            }
        }
        nearest
    }

    pub fn has_boid_within(&self, point: Vec3, range: f32, exclude: Option<BoidId>) -> bool {
        self.boids
            .iter()
            .any(|(id, body)| Some(*id) != exclude && (body.position - point).norm() < range)
    }

    // ---- food ----

    pub fn register_food(&mut self, position: Vec3) -> FoodId {
        let id = FoodId(self.next_food);
        self.next_food += 1;
        self.foods.insert(id, position);
        id
    }

    pub fn unregister_food(&mut self, id: FoodId) -> Option<Vec3> {
        self.foods.remove(&id)
    }

    pub fn food(&self, id: FoodId) -> Option<Vec3> {
        self.foods.get(&id).copied()
    }

    pub fn foods(&self) -> impl Iterator<Item = (FoodId, Vec3)> + '_ {
        self.foods.iter().map(|(id, pos)| (*id, *pos))
    }

    pub fn food_count(&self) -> usize {
        self.foods.len()
    }

    /// Nearest food strictly closer than `range` to `point`.
    pub fn nearest_food_within(&self, point: Vec3, range: f32) -> Option<(FoodId, Vec3)> {
        let mut nearest = None;
        let mut min_distance = range;
        for (id, pos) in &self.foods {
            let distance = (pos - point).norm();
            if distance < min_distance {
                min_distance = distance;
                nearest = Some((*id, *pos));
            }
        }
        nearest
    }

    // ---- hunter ----

    pub fn set_hunter(&mut self, hunter: Option<HunterView>) {
        self.hunter = hunter;
    }

    pub fn hunter(&self) -> Option<&HunterView> {
        self.hunter.as_ref()
    }
}
