//! Simulation events
//!
//! Agents push events while a tick runs. At the end of the tick the bus hands
//! each event to every registered observer, then keeps it queued until the
//! host drains the queue. Collaborators use `BoidCaptured` / `FoodConsumed`
//! to release their visual and physical resources.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hunter::HunterStateKey;
use crate::registry::{BoidId, FoodId};
use crate::steering::Vec3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    BoidSpawned {
        id: BoidId,
    },
    /// Emitted after the boid has left the registry.
    BoidCaptured {
        id: BoidId,
        position: [f32; 3],
    },
    FoodSpawned {
        id: FoodId,
    },
    /// Emitted after the food source has left the registry.
    FoodConsumed {
        id: FoodId,
        by: BoidId,
    },
    HunterStateChanged {
        from: Option<HunterStateKey>,
        to: HunterStateKey,
    },
}

impl SimEvent {
    pub fn boid_captured(id: BoidId, position: Vec3) -> Self {
        SimEvent::BoidCaptured {
            id,
            position: [position.x, position.y, position.z],
        }
    }
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer = Box<dyn FnMut(&SimEvent) + Send>;

#[derive(Default)]
pub struct EventBus {
    /// Events raised during the current tick
    pending: Vec<SimEvent>,
    /// Events already dispatched, waiting for the host
    queue: VecDeque<SimEvent>,
    observers: Vec<(ObserverId, Observer)>,
    next_observer: u64,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("pending", &self.pending.len())
            .field("queue", &self.queue.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: SimEvent) {
        self.pending.push(event);
    }

    /// Events raised since the last flush.
    pub fn pending(&self) -> &[SimEvent] {
        &self.pending
    }

    pub fn subscribe<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut(&SimEvent) + Send + 'static,
    {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns false if the handle was unknown.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(oid, _)| *oid != id);
        self.observers.len() != before
    }

    /// Dispatch pending events to observers and move them to the host queue.
    pub fn flush(&mut self) {
        for event in self.pending.drain(..) {
            for (_, observer) in self.observers.iter_mut() {
                observer(&event);
            }
            self.queue.push_back(event);
        }
    }

    pub fn drain(&mut self) -> Vec<SimEvent> {
        self.queue.drain(..).collect()
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_flush_dispatches_then_queues() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut bus = EventBus::new();
        bus.subscribe(move |e| sink.lock().unwrap().push(e.clone()));

        bus.emit(SimEvent::BoidSpawned { id: BoidId(1) });
        assert_eq!(bus.pending().len(), 1);
        assert!(seen.lock().unwrap().is_empty());

        bus.flush();
        assert!(bus.pending().is_empty());
        assert_eq!(seen.lock().unwrap().len(), 1);
        assert_eq!(bus.drain(), vec![SimEvent::BoidSpawned { id: BoidId(1) }]);
        assert_eq!(bus.queued(), 0);
    }

    #[test]
    fn test_unsubscribe() {
        let count = Arc::new(Mutex::new(0));
        let c = Arc::clone(&count);
        let mut bus = EventBus::new();
        let id = bus.subscribe(move |_| *c.lock().unwrap() += 1);

        bus.emit(SimEvent::FoodSpawned { id: FoodId(0) });
        bus.flush();
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));

        bus.emit(SimEvent::FoodSpawned { id: FoodId(1) });
        bus.flush();
        assert_eq!(*count.lock().unwrap(), 1);
        assert_eq!(bus.drain().len(), 2);
    }
}
