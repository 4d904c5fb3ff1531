//! Session state
//!
//! A `Session` is one visit to the machine: the live bodies, the claw, pending
//! respawns and the session RNG. Dropping it cancels everything in flight.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::body::{Body, BodyId, BodyIds, spawn_grid, spawn_replacement};
use super::claw::{Claw, ClawEvent};
use super::physics;
use crate::catalog::{Catalog, CatalogEntry};
use crate::consts::PAIR_PASS_WARN_COUNT;
use crate::tuning::Tuning;

/// Something the outside world may want to react to
///
/// Serialized with a `kind` tag, e.g. `{"kind":"won","body":7,"item":{...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SessionEvent {
    /// Claw started dropping toward `depth`
    AttemptStarted { depth: f32 },
    Captured { body: BodyId, item_id: String },
    /// Claw closed on nothing
    Missed,
    /// Grab failed mid-lift
    Fumbled { body: BodyId },
    /// This exact body was carried out of the machine
    Won { body: BodyId, item: CatalogEntry },
    Lost { released: Option<BodyId> },
    Respawned { body: BodyId },
}

/// One live playfield
#[derive(Debug, Clone)]
pub struct Session {
    pub bodies: Vec<Body>,
    pub claw: Claw,
    /// Frames stepped so far
    pub frames: u64,
    catalog: Catalog,
    tuning: Tuning,
    /// Milliseconds until each pending replacement spawn
    respawns: Vec<f32>,
    ids: BodyIds,
    rng: Pcg32,
    events: Vec<SessionEvent>,
}

impl Session {
    /// Start a session with a freshly stocked playfield
    pub fn new(catalog: Catalog, tuning: Tuning, seed: u64) -> Self {
        let mut session = Self::empty(catalog, tuning, seed);
        session.bodies = spawn_grid(
            &session.catalog,
            &session.tuning.physics,
            &mut session.ids,
            &mut session.rng,
        );
        if session.bodies.len() > PAIR_PASS_WARN_COUNT {
            log::warn!(
                "{} bodies in play; collision pass is O(n^2) with no broad phase",
                session.bodies.len()
            );
        }
        session
    }

    /// Start a session with no bodies
    pub fn empty(catalog: Catalog, tuning: Tuning, seed: u64) -> Self {
        let claw = Claw::new(tuning.physics.width / 2.0);
        Self {
            bodies: Vec::new(),
            claw,
            frames: 0,
            catalog,
            tuning,
            respawns: Vec::new(),
            ids: BodyIds::new(),
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Place a resting body (setup and tests)
    pub fn spawn_body(&mut self, pos: Vec2, item: CatalogEntry) -> BodyId {
        let id = self.ids.next_id();
        self.bodies
            .push(Body::new(id, pos, self.tuning.physics.body_radius, item));
        id
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn held_body(&self) -> Option<&Body> {
        self.claw.held.and_then(|id| self.body(id))
    }

    pub fn is_busy(&self) -> bool {
        self.claw.is_busy()
    }

    pub fn pending_respawns(&self) -> usize {
        self.respawns.len()
    }

    /// Point the claw (ignored mid-attempt)
    pub fn aim(&mut self, x: f32) -> bool {
        self.claw.set_target(x, &self.tuning)
    }

    /// Start an attempt. Returns false (and changes nothing) if one is in flight.
    pub fn request_attempt(&mut self) -> bool {
        match self.claw.begin(&self.tuning, &mut self.rng) {
            Some(depth) => {
                log::info!("Claw dropping at x={:.0} toward {:.0}", self.claw.x, depth);
                self.events.push(SessionEvent::AttemptStarted { depth });
                true
            }
            None => false,
        }
    }

    /// One physics frame for every free body
    pub(super) fn step_bodies(&mut self) -> usize {
        physics::step(&mut self.bodies, &self.tuning.physics)
    }

    /// Advance the claw state machine and apply its effects to the world
    pub(super) fn update_claw(&mut self, dt_ms: f32, rigged: bool) {
        let claw_events = self.claw.advance(
            dt_ms,
            &mut self.bodies,
            &self.tuning,
            rigged,
            &mut self.rng,
        );

        for event in claw_events {
            match event {
                ClawEvent::Captured(id) => {
                    let item_id = self
                        .body(id)
                        .map(|b| b.item.id.clone())
                        .unwrap_or_default();
                    self.events.push(SessionEvent::Captured { body: id, item_id });
                }
                ClawEvent::Missed => self.events.push(SessionEvent::Missed),
                ClawEvent::Decided { success } => {
                    log::debug!("Attempt outcome fixed: {}", if success { "win" } else { "lose" });
                }
                ClawEvent::Fumbled(id) => self.events.push(SessionEvent::Fumbled { body: id }),
                ClawEvent::Won(id) => self.win(id),
                ClawEvent::Lost { released } => {
                    log::info!("Attempt lost");
                    self.events.push(SessionEvent::Lost { released });
                }
            }
        }
    }

    /// Remove the won body and queue its replacement
    fn win(&mut self, id: BodyId) {
        let Some(idx) = self.bodies.iter().position(|b| b.id == id) else {
            log::warn!("Won body #{} is no longer in play", id);
            self.events.push(SessionEvent::Lost { released: None });
            return;
        };
        let body = self.bodies.remove(idx);
        self.respawns.push(self.tuning.claw.respawn_delay_ms);
        self.events.push(SessionEvent::Won {
            body: body.id,
            item: body.item,
        });
    }

    pub(super) fn relax_claw(&mut self) {
        self.claw.relax(&self.tuning);
    }

    /// Pin the held body under the claw for this frame
    pub(super) fn carry_held(&mut self) {
        let Some(id) = self.claw.held else {
            return;
        };
        let claw_pos = Vec2::new(self.claw.x, self.claw.y);
        let offset = self.tuning.claw.held_offset;
        let spin = self.tuning.claw.held_spin;
        if let Some(body) = self.bodies.iter_mut().find(|b| b.id == id) {
            body.follow_claw(claw_pos, offset, spin);
        }
    }

    /// Count down replacement spawns and add any that are due
    pub(super) fn update_respawns(&mut self, dt_ms: f32) {
        if self.respawns.is_empty() {
            return;
        }
        for remaining in self.respawns.iter_mut() {
            *remaining -= dt_ms;
        }
        let due = self.respawns.iter().filter(|r| **r <= 0.0).count();
        self.respawns.retain(|r| *r > 0.0);

        for _ in 0..due {
            let body = spawn_replacement(
                &self.catalog,
                &self.tuning.physics,
                &mut self.ids,
                &mut self.rng,
            );
            log::debug!("Respawned #{} {}", body.id, body.item.id);
            self.events.push(SessionEvent::Respawned { body: body.id });
            self.bodies.push(body);
        }
    }

    /// Take everything that happened since the last drain
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_stocks_playfield() {
        let session = Session::new(Catalog::default(), Tuning::default(), 42);
        assert_eq!(session.bodies.len(), 25);
        assert_eq!(session.claw.x, 234.0);
        assert!(!session.is_busy());
        assert_eq!(session.pending_respawns(), 0);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = Session::new(Catalog::default(), Tuning::default(), 7);
        let b = Session::new(Catalog::default(), Tuning::default(), 7);
        for (x, y) in a.bodies.iter().zip(&b.bodies) {
            assert_eq!(x.pos, y.pos);
            assert_eq!(x.item.id, y.item.id);
        }
    }

    #[test]
    fn test_request_attempt_single_flight() {
        let mut session = Session::empty(Catalog::default(), Tuning::default(), 1);
        assert!(session.request_attempt());
        assert!(!session.request_attempt());
        let events = session.drain_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], SessionEvent::AttemptStarted { .. }));
    }

    #[test]
    fn test_step_bodies_moves_only_free_bodies() {
        let mut session = Session::empty(Catalog::default(), Tuning::default(), 1);
        let falling = session.spawn_body(Vec2::new(100.0, 100.0), Catalog::default().entries()[0].clone());
        let held = session.spawn_body(Vec2::new(300.0, 100.0), Catalog::default().entries()[1].clone());
        session.bodies[1].grab();

        for _ in 0..10 {
            session.step_bodies();
        }
        assert!(session.body(falling).unwrap().pos.y > 100.0);
        assert_eq!(session.body(held).unwrap().pos, Vec2::new(300.0, 100.0));
    }
}
