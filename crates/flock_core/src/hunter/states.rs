//! Idle / Patrol / Hunting state handlers

use super::{Hunter, HunterStateKey};
use crate::fsm::State;
use crate::steering;
use crate::world::World;

#[inline]
fn count_down(timer: &mut f32, dt: f32) {
    *timer = (*timer - dt).max(0.0);
}

/// Rest in place until energy is full and the rest period has passed.
#[derive(Debug, Default)]
pub struct IdleState {
    rest_timer: f32,
}

impl State<HunterStateKey, Hunter, World> for IdleState {
    fn on_enter(&mut self, hunter: &mut Hunter, _world: &mut World) {
        hunter.reset_velocity();
        self.rest_timer = hunter.config().rest_duration;
    }

    fn on_update(&mut self, hunter: &mut Hunter, _world: &mut World) -> Option<HunterStateKey> {
        let dt = hunter.dt();
        hunter.recover_energy(hunter.config().energy_recover_rate, dt);
        count_down(&mut self.rest_timer, dt);

        if hunter.has_full_energy() && self.rest_timer <= 0.0 {
            return Some(HunterStateKey::Patrol);
        }
        None
    }
}

/// Walk the waypoint route and watch for prey.
#[derive(Debug, Default)]
pub struct PatrolState {
    patrol_timer: f32,
}

impl State<HunterStateKey, Hunter, World> for PatrolState {
    fn on_enter(&mut self, hunter: &mut Hunter, _world: &mut World) {
        hunter.reset_velocity();
        hunter.find_nearest_waypoint();
        self.patrol_timer = hunter.config().min_patrol_time;
    }

    fn on_update(&mut self, hunter: &mut Hunter, world: &mut World) -> Option<HunterStateKey> {
        let dt = hunter.dt();
        let rate = hunter.config().energy_drain_rate * hunter.config().patrol_drain_multiplier;
        if hunter.drain_energy(rate, dt) {
            return Some(HunterStateKey::Idle);
        }

        let Some(waypoint) = hunter.next_waypoint() else {
            return Some(HunterStateKey::Idle);
        };
        count_down(&mut self.patrol_timer, dt);

        if self.patrol_timer <= 0.0 {
            if let Some(target) = hunter.find_nearest_boid(world) {
                hunter.set_target(Some(target));
                return Some(HunterStateKey::Hunting);
            }
        }

        let force = hunter.seek(waypoint);
        hunter.add_force(force);

        if hunter.is_at_waypoint(waypoint) && self.patrol_timer <= 0.0 {
            hunter.move_to_next_waypoint();
            self.patrol_timer = hunter.config().min_patrol_time;
        }
        None
    }
}

/// Chase the current target until it is caught, lost or energy runs out.
#[derive(Debug, Default)]
pub struct HuntingState;

impl State<HunterStateKey, Hunter, World> for HuntingState {
    fn on_enter(&mut self, hunter: &mut Hunter, _world: &mut World) {
        hunter.reset_velocity();
    }

    fn on_update(&mut self, hunter: &mut Hunter, world: &mut World) -> Option<HunterStateKey> {
        let dt = hunter.dt();
        let rate = hunter.config().energy_drain_rate * hunter.config().hunting_drain_multiplier;
        if hunter.drain_energy(rate, dt) {
            return Some(HunterStateKey::Idle);
        }

        let Some(target) = hunter.target() else {
            return Some(HunterStateKey::Patrol);
        };
        let Some(body) = world.registry.boid(target).copied() else {
            return Some(HunterStateKey::Patrol);
        };

        let distance = (body.position - hunter.position()).norm();
        if distance > hunter.config().detection_range {
            return Some(HunterStateKey::Patrol);
        }
        if distance < hunter.config().capture_distance {
            world.capture_boid(target);
            hunter.clear_target();
            return Some(HunterStateKey::Patrol);
        }

        let force = steering::braking_pursuit(
            hunter.position(),
            hunter.velocity(),
            body.position,
            hunter.config().brake_radius,
            hunter.limits(),
        );
        hunter.add_force(force);
        None
    }

    fn on_exit(&mut self, hunter: &mut Hunter, _world: &mut World) {
        hunter.clear_target();
    }
}
