//! Steering helpers shared by boids and the hunter
//!
//! Every helper returns a steering force (a velocity delta) already clamped to
//! the caller's `max_force`. Forces are summed into velocity through
//! [`apply_force`], which clamps the result to `max_velocity`, and positions
//! advance with explicit Euler through [`integrate`].

use nalgebra::Vector3;

/// World-space vector used throughout the simulation (Y is up, agents move on XZ).
pub type Vec3 = Vector3<f32>;

/// Lengths below this are treated as zero when normalizing.
pub(crate) const SMALL_THRESHOLD: f32 = 0.0001;

/// Offset added to neighbor distance before inverse weighting in separation.
const SEPARATION_EPSILON: f32 = 0.01;

/// Speed and force caps for one agent class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringLimits {
    pub max_velocity: f32,
    pub max_force: f32,
}

impl SteeringLimits {
    pub fn new(max_velocity: f32, max_force: f32) -> Self {
        Self { max_velocity, max_force }
    }
}

/// Position and velocity of another agent as seen by a steering query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub position: Vec3,
    pub velocity: Vec3,
}

/// Normalize, returning zero for (near) zero-length input instead of NaN.
#[inline]
pub fn normalize_or_zero(v: Vec3) -> Vec3 {
    v.try_normalize(SMALL_THRESHOLD).unwrap_or_else(Vec3::zeros)
}

/// Scale `v` down so its length does not exceed `max`.
///
/// A non-positive `max` yields the zero vector.
#[inline]
pub fn clamp_magnitude(v: Vec3, max: f32) -> Vec3 {
    if max <= 0.0 {
        return Vec3::zeros();
    }
    let len = v.norm();
    if len > max {
        v * (max / len)
    } else {
        v
    }
}

/// Add a steering force to a velocity and clamp to `max_velocity`.
#[inline]
pub fn apply_force(velocity: Vec3, force: Vec3, max_velocity: f32) -> Vec3 {
    clamp_magnitude(velocity + force, max_velocity)
}

/// Explicit Euler step.
#[inline]
pub fn integrate(position: Vec3, velocity: Vec3, dt: f32) -> Vec3 {
    position + velocity * dt
}

#[inline]
fn steer_towards(desired: Vec3, velocity: Vec3, max_force: f32) -> Vec3 {
    clamp_magnitude(desired - velocity, max_force)
}

/// Seek: full speed toward `target`.
pub fn seek(position: Vec3, velocity: Vec3, target: Vec3, limits: SteeringLimits) -> Vec3 {
    let desired = normalize_or_zero(target - position) * limits.max_velocity;
    steer_towards(desired, velocity, limits.max_force)
}

/// Arrive: like seek, but the desired speed falls off linearly inside `slow_radius`.
pub fn arrive(
    position: Vec3,
    velocity: Vec3,
    target: Vec3,
    slow_radius: f32,
    limits: SteeringLimits,
) -> Vec3 {
    let to_target = target - position;
    let distance = to_target.norm();
    let speed = if slow_radius > 0.0 && distance < slow_radius {
        limits.max_velocity * (distance / slow_radius)
    } else {
        limits.max_velocity
    };
    let desired = normalize_or_zero(to_target) * speed;
    steer_towards(desired, velocity, limits.max_force)
}

/// Pursuit: seek the target's position one step ahead along its velocity.
pub fn pursuit(
    position: Vec3,
    velocity: Vec3,
    target_position: Vec3,
    target_velocity: Vec3,
    limits: SteeringLimits,
) -> Vec3 {
    seek(position, velocity, target_position + target_velocity, limits)
}

/// Evade: flee the threat's predicted position, blended half-way with the
/// current heading so the agent does not flip direction every frame.
pub fn evade(
    position: Vec3,
    velocity: Vec3,
    threat_position: Vec3,
    threat_velocity: Vec3,
    limits: SteeringLimits,
) -> Vec3 {
    let future = threat_position + threat_velocity;
    let flee = normalize_or_zero(position - future) * limits.max_velocity;
    let heading = normalize_or_zero(velocity) * limits.max_velocity;
    let desired = heading.lerp(&flee, 0.5);
    steer_towards(desired, velocity, limits.max_force)
}

/// Wander: steer toward a heading chosen by the caller.
pub fn wander(velocity: Vec3, direction: Vec3, limits: SteeringLimits) -> Vec3 {
    let desired = normalize_or_zero(direction) * limits.max_velocity;
    steer_towards(desired, velocity, limits.max_force)
}

/// Separation: push away from neighbors strictly inside `radius`, weighting
/// closer neighbors more heavily.
pub fn separation(
    position: Vec3,
    velocity: Vec3,
    neighbors: &[Neighbor],
    radius: f32,
    limits: SteeringLimits,
) -> Vec3 {
    let mut push = Vec3::zeros();
    for neighbor in neighbors {
        let away = position - neighbor.position;
        let distance = away.norm();
        if distance >= radius {
            continue;
        }
        push += normalize_or_zero(away) / (distance + SEPARATION_EPSILON);
    }
    if push.norm() < SMALL_THRESHOLD {
        return Vec3::zeros();
    }
    let desired = normalize_or_zero(push) * limits.max_velocity;
    steer_towards(desired, velocity, limits.max_force)
}

/// Alignment: match the average heading of neighbors strictly inside `radius`.
pub fn alignment(
    position: Vec3,
    velocity: Vec3,
    neighbors: &[Neighbor],
    radius: f32,
    limits: SteeringLimits,
) -> Vec3 {
    let mut sum = Vec3::zeros();
    let mut count = 0usize;
    for neighbor in neighbors {
        if (position - neighbor.position).norm() >= radius {
            continue;
        }
        sum += neighbor.velocity;
        count += 1;
    }
    if count == 0 {
        return Vec3::zeros();
    }
    let average = sum / count as f32;
    let desired = normalize_or_zero(average) * limits.max_velocity;
    steer_towards(desired, velocity, limits.max_force)
}

/// Cohesion: seek the centroid of neighbors strictly inside `radius`.
pub fn cohesion(
    position: Vec3,
    velocity: Vec3,
    neighbors: &[Neighbor],
    radius: f32,
    limits: SteeringLimits,
) -> Vec3 {
    let mut sum = Vec3::zeros();
    let mut count = 0usize;
    for neighbor in neighbors {
        if (position - neighbor.position).norm() >= radius {
            continue;
        }
        sum += neighbor.position;
        count += 1;
    }
    if count == 0 {
        return Vec3::zeros();
    }
    let centroid = sum / count as f32;
    seek(position, velocity, centroid, limits)
}

/// Pursuit with braking near the target.
///
/// Inside `brake_radius` the desired speed drops to `max_velocity * (d / brake_radius + 0.5)`
/// and the force cap doubles, so the chaser can correct its line at short range.
pub fn braking_pursuit(
    position: Vec3,
    velocity: Vec3,
    target: Vec3,
    brake_radius: f32,
    limits: SteeringLimits,
) -> Vec3 {
    let to_target = target - position;
    let distance = to_target.norm();
    let braking = brake_radius > 0.0 && distance < brake_radius;
    let speed = if braking {
        limits.max_velocity * (distance / brake_radius + 0.5)
    } else {
        limits.max_velocity
    };
    let max_force = if braking {
        limits.max_force * 2.0
    } else {
        limits.max_force
    };
    let desired = normalize_or_zero(to_target) * speed;
    steer_towards(desired, velocity, max_force)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMITS: SteeringLimits = SteeringLimits {
        max_velocity: 3.0,
        max_force: 0.3,
    };

    fn v(x: f32, y: f32, z: f32) -> Vec3 {
        Vec3::new(x, y, z)
    }

    fn finite(v: Vec3) -> bool {
        v.iter().all(|c| c.is_finite())
    }

    #[test]
    fn test_seek_direction() {
        let force = seek(Vec3::zeros(), Vec3::zeros(), v(10.0, 0.0, 0.0), LIMITS);
        assert!(force.x > 0.0);
        assert_eq!(force.z, 0.0);
        assert!((force.norm() - LIMITS.max_force).abs() < 1e-5);
    }

    #[test]
    fn test_seek_at_target_is_finite() {
        let force = seek(v(1.0, 0.0, 1.0), Vec3::zeros(), v(1.0, 0.0, 1.0), LIMITS);
        assert!(finite(force));
        assert_eq!(force, Vec3::zeros());
    }

    #[test]
    fn test_arrive_slows_down_near_target() {
        let limits = SteeringLimits::new(10.0, 100.0);
        let near = arrive(Vec3::zeros(), Vec3::zeros(), v(1.0, 0.0, 0.0), 2.0, limits);
        let far = arrive(Vec3::zeros(), Vec3::zeros(), v(10.0, 0.0, 0.0), 2.0, limits);
        assert!((near.x - 5.0).abs() < 1e-4);
        assert!((far.x - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_pursuit_leads_target() {
        let limits = SteeringLimits::new(1.0, 10.0);
        // Target ahead on X moving along Z: lookahead pulls the force toward +Z.
        let force = pursuit(Vec3::zeros(), Vec3::zeros(), v(5.0, 0.0, 0.0), v(0.0, 0.0, 5.0), limits);
        assert!(force.x > 0.0);
        assert!(force.z > 0.0);
    }

    #[test]
    fn test_evade_pushes_away_from_threat() {
        let limits = SteeringLimits::new(2.0, 10.0);
        let force = evade(Vec3::zeros(), Vec3::zeros(), v(3.0, 0.0, 0.0), Vec3::zeros(), limits);
        // Zero heading: blended desired is half the flee velocity.
        assert!((force.x + 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_evade_blends_with_heading() {
        let limits = SteeringLimits::new(2.0, 10.0);
        let velocity = v(0.0, 0.0, 2.0);
        let force = evade(Vec3::zeros(), velocity, v(3.0, 0.0, 0.0), Vec3::zeros(), limits);
        // desired = lerp((0,0,2), (-2,0,0), 0.5) = (-1,0,1)
        assert!((force.x + 1.0).abs() < 1e-4);
        assert!((force.z + 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_flocking_rules_zero_without_neighbors() {
        let pos = v(1.0, 0.0, 1.0);
        let vel = v(1.0, 0.0, 0.0);
        assert_eq!(separation(pos, vel, &[], 2.0, LIMITS), Vec3::zeros());
        assert_eq!(alignment(pos, vel, &[], 5.0, LIMITS), Vec3::zeros());
        assert_eq!(cohesion(pos, vel, &[], 5.0, LIMITS), Vec3::zeros());

        let far = [Neighbor {
            position: v(50.0, 0.0, 0.0),
            velocity: v(0.0, 0.0, 1.0),
        }];
        assert_eq!(separation(pos, vel, &far, 2.0, LIMITS), Vec3::zeros());
        assert_eq!(alignment(pos, vel, &far, 5.0, LIMITS), Vec3::zeros());
        assert_eq!(cohesion(pos, vel, &far, 5.0, LIMITS), Vec3::zeros());
    }

    #[test]
    fn test_neighbor_on_radius_is_excluded() {
        let neighbors = [Neighbor {
            position: v(2.0, 0.0, 0.0),
            velocity: Vec3::zeros(),
        }];
        assert_eq!(separation(Vec3::zeros(), Vec3::zeros(), &neighbors, 2.0, LIMITS), Vec3::zeros());
    }

    #[test]
    fn test_separation_pushes_away() {
        let neighbors = [
            Neighbor { position: v(1.0, 0.0, 0.0), velocity: Vec3::zeros() },
            Neighbor { position: v(3.0, 0.0, 0.0), velocity: Vec3::zeros() },
        ];
        let force = separation(Vec3::zeros(), Vec3::zeros(), &neighbors, 2.0, LIMITS);
        assert!(force.x < 0.0);
    }

    #[test]
    fn test_alignment_matches_heading() {
        let neighbors = [
            Neighbor { position: v(1.0, 0.0, 0.0), velocity: v(0.0, 0.0, 1.0) },
            Neighbor { position: v(-1.0, 0.0, 0.0), velocity: v(0.0, 0.0, 3.0) },
        ];
        let force = alignment(Vec3::zeros(), Vec3::zeros(), &neighbors, 5.0, LIMITS);
        assert!(force.z > 0.0);
        assert!(force.x.abs() < 1e-6);
    }

    #[test]
    fn test_cohesion_seeks_centroid() {
        let neighbors = [
            Neighbor { position: v(2.0, 0.0, 2.0), velocity: Vec3::zeros() },
            Neighbor { position: v(2.0, 0.0, -2.0), velocity: Vec3::zeros() },
        ];
        let force = cohesion(Vec3::zeros(), Vec3::zeros(), &neighbors, 5.0, LIMITS);
        assert!(force.x > 0.0);
        assert!(force.z.abs() < 1e-6);
    }

    #[test]
    fn test_braking_pursuit_doubles_force_cap_in_range() {
        let limits = SteeringLimits::new(5.0, 1.0);
        let near = braking_pursuit(Vec3::zeros(), Vec3::zeros(), v(1.0, 0.0, 0.0), 2.0, limits);
        let far = braking_pursuit(Vec3::zeros(), Vec3::zeros(), v(8.0, 0.0, 0.0), 2.0, limits);
        assert!((near.norm() - 2.0).abs() < 1e-5);
        assert!((far.norm() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_apply_force_clamps_velocity() {
        let vel = apply_force(v(2.5, 0.0, 0.0), v(2.0, 0.0, 0.0), 3.0);
        assert!((vel.norm() - 3.0).abs() < 1e-5);
        assert_eq!(apply_force(v(1.0, 0.0, 0.0), v(1.0, 0.0, 0.0), 0.0), Vec3::zeros());
    }

    #[test]
    fn test_integrate_euler() {
        let pos = integrate(v(1.0, 0.0, 1.0), v(2.0, 0.0, -4.0), 0.5);
        assert_eq!(pos, v(2.0, 0.0, -1.0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn vec3() -> impl Strategy<Value = Vec3> {
            (-50.0f32..50.0, -50.0f32..50.0, -50.0f32..50.0).prop_map(|(x, y, z)| Vec3::new(x, y, z))
        }

        fn neighbors() -> impl Strategy<Value = Vec<Neighbor>> {
            prop::collection::vec(
                (vec3(), vec3()).prop_map(|(position, velocity)| Neighbor { position, velocity }),
                0..8,
            )
        }

        proptest! {
            /// Property: every steering primitive respects the force cap
            #[test]
            fn prop_forces_bounded(
                pos in vec3(),
                vel in vec3(),
                target in vec3(),
                target_vel in vec3(),
                others in neighbors(),
                max_force in 0.0f32..5.0,
                max_velocity in 0.0f32..10.0,
            ) {
                let limits = SteeringLimits::new(max_velocity, max_force);
                let cap = max_force + 1e-4;
                prop_assert!(seek(pos, vel, target, limits).norm() <= cap);
                prop_assert!(arrive(pos, vel, target, 2.0, limits).norm() <= cap);
                prop_assert!(pursuit(pos, vel, target, target_vel, limits).norm() <= cap);
                prop_assert!(evade(pos, vel, target, target_vel, limits).norm() <= cap);
                prop_assert!(wander(vel, target, limits).norm() <= cap);
                prop_assert!(separation(pos, vel, &others, 5.0, limits).norm() <= cap);
                prop_assert!(alignment(pos, vel, &others, 5.0, limits).norm() <= cap);
                prop_assert!(cohesion(pos, vel, &others, 5.0, limits).norm() <= cap);
            }

            /// Property: applying any force keeps speed under the velocity cap
            #[test]
            fn prop_apply_force_bounded(vel in vec3(), force in vec3(), max_velocity in 0.0f32..10.0) {
                let next = apply_force(vel, force, max_velocity);
                prop_assert!(next.norm() <= max_velocity + 1e-4);
                prop_assert!(next.iter().all(|c| c.is_finite()));
            }
        }
    }
}
