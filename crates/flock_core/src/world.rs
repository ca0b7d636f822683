//! The per-simulation world handed to every agent update.

use crate::events::{EventBus, SimEvent};
use crate::registry::{AgentRegistry, BoidBody, BoidId, FoodId};
use crate::steering::Vec3;

#[derive(Debug, Default)]
pub struct World {
    pub registry: AgentRegistry,
    pub events: EventBus,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn_boid(&mut self, position: Vec3, velocity: Vec3) -> BoidId {
        let id = self.registry.register_boid(BoidBody::new(position, velocity));
        self.events.emit(SimEvent::BoidSpawned { id });
        id
    }

    /// Remove a captured boid, then announce it.
    ///
    /// Returns `None` (and emits nothing) if the boid was already gone.
    pub fn capture_boid(&mut self, id: BoidId) -> Option<BoidBody> {
        let body = self.registry.unregister_boid(id)?;
        log::debug!("Boid {:?} captured at {:?}", id, body.position);
        self.events.emit(SimEvent::boid_captured(id, body.position));
        Some(body)
    }

    pub fn spawn_food(&mut self, position: Vec3) -> FoodId {
        let id = self.registry.register_food(position);
        self.events.emit(SimEvent::FoodSpawned { id });
        id
    }

    /// Remove an eaten food source, then announce it.
    pub fn consume_food(&mut self, id: FoodId, by: BoidId) -> Option<Vec3> {
        let position = self.registry.unregister_food(id)?;
        log::debug!("Food {:?} consumed by boid {:?}", id, by);
        self.events.emit(SimEvent::FoodConsumed { id, by });
        Some(position)
    }
}
