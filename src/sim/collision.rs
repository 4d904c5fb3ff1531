//! Boundary containment and body-body collision response
//!
//! Bodies are circles inside a box: floor, two walls and a ceiling.
//! Pair resolution is a naive all-pairs sweep with no broad phase.

use glam::Vec2;

use super::body::Body;
use crate::tuning::PhysicsTuning;

/// Velocities below these snap to zero on the floor (kills micro-jitter)
const REST_VY: f32 = 0.4;
const REST_VX: f32 = 0.05;
/// Centers closer than this are treated as coincident
const COINCIDENT_DIST: f32 = 0.01;

/// Result of a circle-circle overlap check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether the pair overlaps past the allowance
    pub hit: bool,
    /// Unit vector from the first body toward the second
    pub normal: Vec2,
    /// Overlap depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check overlap between two circles, tolerating `allowance` of interpenetration
pub fn circle_overlap(a_pos: Vec2, a_r: f32, b_pos: Vec2, b_r: f32, allowance: f32) -> CollisionResult {
    let delta = b_pos - a_pos;
    let dist = delta.length();
    let min_dist = a_r + b_r - allowance;

    if dist >= min_dist {
        return CollisionResult::miss();
    }

    let normal = if dist > COINCIDENT_DIST {
        delta / dist
    } else {
        Vec2::X
    };
    CollisionResult {
        hit: true,
        normal,
        penetration: min_dist - dist,
    }
}

/// Clamp a free body against floor, walls and ceiling, bouncing its velocity
pub fn clamp_to_bounds(body: &mut Body, physics: &PhysicsTuning) {
    let r = body.radius;

    // Floor
    if body.pos.y + r > physics.floor_y {
        body.pos.y = physics.floor_y - r;
        body.vel.y *= -physics.restitution;
        body.vel.x *= physics.floor_friction;
        if body.vel.y.abs() < REST_VY {
            body.vel.y = 0.0;
        }
        if body.vel.x.abs() < REST_VX {
            body.vel.x = 0.0;
        }
    }

    // Walls: velocity always points away from the wall
    if body.pos.x - r < physics.wall_left {
        body.pos.x = physics.wall_left + r;
        body.vel.x = body.vel.x.abs() * physics.restitution;
    }
    if body.pos.x + r > physics.wall_right {
        body.pos.x = physics.wall_right - r;
        body.vel.x = -body.vel.x.abs() * physics.restitution;
    }

    // Ceiling
    if body.pos.y - r < 0.0 {
        body.pos.y = r;
        body.vel.y = body.vel.y.abs() * physics.restitution;
    }
}

/// Position-only clamp, used after pair separation may have pushed a body out
pub fn contain(body: &mut Body, physics: &PhysicsTuning) {
    let r = body.radius;
    let lo_x = physics.wall_left + r;
    let hi_x = (physics.wall_right - r).max(lo_x);
    body.pos.x = body.pos.x.clamp(lo_x, hi_x);
    let hi_y = (physics.floor_y - r).max(r);
    body.pos.y = body.pos.y.clamp(r, hi_y);
}

/// Separate two overlapping bodies and exchange an impulse if they approach
///
/// Returns true if the pair was touching.
pub fn resolve_pair(a: &mut Body, b: &mut Body, physics: &PhysicsTuning) -> bool {
    let contact = circle_overlap(a.pos, a.radius, b.pos, b.radius, physics.overlap_allowance);
    if !contact.hit {
        return false;
    }

    let n = contact.normal;
    let half = contact.penetration / 2.0;
    a.pos -= n * half;
    b.pos += n * half;

    // Closing speed along the normal; positive means approaching
    let closing = (a.vel - b.vel).dot(n);
    if closing > 0.0 {
        let impulse = n * (closing * physics.collision_impulse);
        a.vel -= impulse;
        b.vel += impulse;
    }
    true
}

/// One in-place sweep over every unordered pair of free bodies
///
/// Returns the number of contacts resolved.
pub fn resolve_collisions(bodies: &mut [Body], physics: &PhysicsTuning) -> usize {
    let mut contacts = 0;
    for i in 0..bodies.len() {
        if !bodies[i].is_free() {
            continue;
        }
        let (head, tail) = bodies.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut().filter(|b| b.is_free()) {
            if resolve_pair(a, b, physics) {
                contacts += 1;
            }
        }
    }
    contacts
}
