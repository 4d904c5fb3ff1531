//! Plush bodies and spawning
//!
//! A body is either free (the simulator and resolver own its transform) or
//! held (the claw owns it). Nothing else writes a body's transform.

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::catalog::{Catalog, CatalogEntry};
use crate::tuning::PhysicsTuning;

pub type BodyId = u32;

/// Who owns a body's transform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyState {
    /// Simulated: gravity, bounds and collisions apply
    Free,
    /// Carried by the claw; the simulator must not touch it
    Held,
}

/// A plush in the playfield
#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Rotation (radians)
    pub angle: f32,
    /// Angular velocity (radians per frame)
    pub spin: f32,
    pub item: CatalogEntry,
    pub state: BodyState,
}

impl Body {
    /// Create a resting body (no initial velocity)
    pub fn new(id: BodyId, pos: Vec2, radius: f32, item: CatalogEntry) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            radius,
            angle: 0.0,
            spin: 0.0,
            item,
            state: BodyState::Free,
        }
    }

    /// Create a body with a small random toss and spin
    pub fn tossed<R: Rng>(
        id: BodyId,
        pos: Vec2,
        radius: f32,
        item: CatalogEntry,
        rng: &mut R,
    ) -> Self {
        let mut body = Self::new(id, pos, radius, item);
        body.vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * 1.5,
            rng.random::<f32>() * 1.5,
        );
        body.angle = rng.random::<f32>() * std::f32::consts::TAU;
        body.spin = (rng.random::<f32>() - 0.5) * 0.04;
        body
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        self.state == BodyState::Free
    }

    #[inline]
    pub fn is_held(&self) -> bool {
        self.state == BodyState::Held
    }

    /// Hand the body to the claw
    pub fn grab(&mut self) {
        self.state = BodyState::Held;
        self.vel = Vec2::ZERO;
    }

    /// Return the body to the simulator with a new velocity
    pub fn release(&mut self, vel: Vec2) {
        self.state = BodyState::Free;
        self.vel = vel;
    }

    /// Pin a held body under the claw for this frame
    pub fn follow_claw(&mut self, claw_pos: Vec2, offset: f32, spin: f32) {
        if let BodyState::Held = self.state {
            self.pos = claw_pos + Vec2::new(0.0, offset);
            self.vel = Vec2::ZERO;
            self.angle += spin;
        }
    }
}

/// Hands out body ids; ids are never reused within a session
#[derive(Debug, Clone, Default)]
pub struct BodyIds {
    next: BodyId,
}

impl BodyIds {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> BodyId {
        let id = self.next.max(1);
        self.next = id + 1;
        id
    }
}

/// Stock the playfield: `body_count` bodies packed in rows from mid-height down
///
/// Catalog entries are shuffled and cycled, so duplicate ids show up more often.
pub fn spawn_grid<R: Rng>(
    catalog: &Catalog,
    physics: &PhysicsTuning,
    ids: &mut BodyIds,
    rng: &mut R,
) -> Vec<Body> {
    let mut shuffled: Vec<&CatalogEntry> = catalog.entries().iter().collect();
    shuffled.shuffle(rng);

    let r = physics.body_radius;
    let usable_w = physics.wall_right - physics.wall_left;
    let cols = ((usable_w / (r * 2.0 + 4.0)).floor() as usize).max(1);
    let col_w = usable_w / cols as f32;

    let mut bodies = Vec::with_capacity(physics.body_count);
    for i in 0..physics.body_count {
        let item = shuffled[i % shuffled.len()].clone();
        let col = i % cols;
        let row = i / cols;
        // Staggered so they drop and settle
        let x = physics.wall_left + r + 4.0 + col as f32 * col_w + (rng.random::<f32>() - 0.5) * 10.0;
        let y = physics.height * 0.45 + row as f32 * (r * 2.0 + 6.0) + rng.random::<f32>() * 12.0;
        bodies.push(Body::tossed(ids.next_id(), Vec2::new(x, y), r, item, rng));
    }
    bodies
}

/// A single replacement near the top at a random horizontal offset
pub fn spawn_replacement<R: Rng>(
    catalog: &Catalog,
    physics: &PhysicsTuning,
    ids: &mut BodyIds,
    rng: &mut R,
) -> Body {
    let r = physics.body_radius;
    let span = (physics.wall_right - physics.wall_left - r * 2.0).max(0.0);
    let x = physics.wall_left + r + rng.random::<f32>() * span;
    let item = catalog.pick(rng).clone();
    Body::tossed(ids.next_id(), Vec2::new(x, r + 5.0), r, item, rng)
}
