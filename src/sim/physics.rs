//! Body simulator
//!
//! One call to [`step`] is one display frame. Held bodies are skipped entirely;
//! the claw pins them after the step.

use super::body::Body;
use super::collision::{clamp_to_bounds, contain, resolve_collisions};
use crate::tuning::PhysicsTuning;

/// Integrate a single free body: gravity, position, rotation, spin decay
#[inline]
pub fn integrate(body: &mut Body, physics: &PhysicsTuning) {
    body.vel.y += physics.gravity;
    body.pos += body.vel;
    body.angle += body.spin;
    // Spin settles once the plush is resting
    body.spin *= physics.spin_decay;
}

/// Advance every free body by one frame
///
/// Integration and bounds run per body, then one in-place all-pairs sweep,
/// then a position clamp so separation can't push anything through a wall.
/// Returns the number of contacts resolved.
pub fn step(bodies: &mut [Body], physics: &PhysicsTuning) -> usize {
    for body in bodies.iter_mut().filter(|b| b.is_free()) {
        integrate(body, physics);
        clamp_to_bounds(body, physics);
    }

    let contacts = resolve_collisions(bodies, physics);

    for body in bodies.iter_mut().filter(|b| b.is_free()) {
        contain(body, physics);
    }
    contacts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use glam::Vec2;
    use proptest::prelude::*;

    fn body_at(id: u32, x: f32, y: f32) -> Body {
        Body::new(id, Vec2::new(x, y), 32.0, Catalog::default().entries()[0].clone())
    }

    #[test]
    fn test_integrate_order() {
        let physics = PhysicsTuning::default();
        let mut body = body_at(1, 200.0, 100.0);
        body.vel = Vec2::new(1.0, 0.0);
        body.spin = 0.02;

        integrate(&mut body, &physics);
        assert!((body.vel.y - 0.38).abs() < 1e-6);
        // Position uses the post-gravity velocity
        assert!((body.pos.y - 100.38).abs() < 1e-4);
        assert!((body.pos.x - 201.0).abs() < 1e-4);
        assert!((body.angle - 0.02).abs() < 1e-6);
        assert!((body.spin - 0.02 * 0.995).abs() < 1e-7);
    }

    #[test]
    fn test_body_falls_and_settles_on_floor() {
        let physics = PhysicsTuning::default();
        let mut bodies = vec![body_at(1, 200.0, 100.0)];
        for _ in 0..600 {
            step(&mut bodies, &physics);
        }
        let body = &bodies[0];
        assert!((body.pos.y - (physics.floor_y - body.radius)).abs() < 0.5);
        assert_eq!(body.vel.y, 0.0);
    }

    #[test]
    fn test_held_body_untouched() {
        let physics = PhysicsTuning::default();
        let mut bodies = vec![body_at(1, 200.0, 100.0), body_at(2, 210.0, 100.0)];
        bodies[0].grab();
        bodies[0].spin = 0.5;

        for _ in 0..10 {
            step(&mut bodies, &physics);
        }
        assert_eq!(bodies[0].pos, Vec2::new(200.0, 100.0));
        assert_eq!(bodies[0].vel, Vec2::ZERO);
        assert_eq!(bodies[0].spin, 0.5);
        // The free one fell straight through the held one's space
        assert!(bodies[1].pos.y > 100.0);
    }

    #[test]
    fn test_spin_decays() {
        let physics = PhysicsTuning::default();
        let mut bodies = vec![body_at(1, 200.0, 469.0)];
        bodies[0].spin = 0.1;
        for _ in 0..1000 {
            step(&mut bodies, &physics);
        }
        assert!(bodies[0].spin.abs() < 0.001);
    }

    fn arb_body() -> impl Strategy<Value = (f32, f32, f32, f32)> {
        (50.0f32..420.0, 0.0f32..520.0, -20.0f32..20.0, -20.0f32..20.0)
    }

    proptest! {
        #[test]
        fn prop_bodies_stay_contained(
            layout in prop::collection::vec(arb_body(), 1..12),
            steps in 1usize..200,
        ) {
            let physics = PhysicsTuning::default();
            let mut bodies: Vec<Body> = layout
                .iter()
                .enumerate()
                .map(|(i, &(x, y, vx, vy))| {
                    let mut b = body_at(i as u32 + 1, x, y);
                    b.vel = Vec2::new(vx, vy);
                    b
                })
                .collect();

            for _ in 0..steps {
                step(&mut bodies, &physics);
            }

            let eps = 1e-3;
            for b in &bodies {
                prop_assert!(b.pos.y + b.radius <= physics.floor_y + eps);
                prop_assert!(b.pos.y - b.radius >= -eps);
                prop_assert!(b.pos.x - b.radius >= physics.wall_left - eps);
                prop_assert!(b.pos.x + b.radius <= physics.wall_right + eps);
            }
        }
    }
}
