//! Claw controller
//!
//! One attempt at a time, as an explicit state machine advanced by the frame
//! step: Idle -> Descending -> Dwelling -> Ascending -> (resolved) -> Idle.
//! The claw's x is frozen while an attempt is in flight, so the drop column is
//! wherever the claw was when the attempt started.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::body::{Body, BodyId};
use super::outcome;
use crate::tuning::Tuning;

/// Current phase of the claw
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClawPhase {
    /// Raised, tracking the pointer
    Idle,
    /// Lowering toward the chosen depth
    Descending { depth: f32 },
    /// Mechanical settle before lifting
    Dwelling { remaining_ms: f32 },
    /// Lifting; the outcome is already fixed
    Ascending { will_succeed: bool, dropped: bool },
}

/// What happened while advancing the claw
#[derive(Debug, Clone, PartialEq)]
pub enum ClawEvent {
    /// Tip closed on a body
    Captured(BodyId),
    /// Tip closed on nothing
    Missed,
    /// Outcome fixed at the end of the dwell
    Decided { success: bool },
    /// Failed grab let go mid-lift
    Fumbled(BodyId),
    /// Fully raised still holding this body
    Won(BodyId),
    /// Fully raised empty-handed; any body still attached was let go
    Lost { released: Option<BodyId> },
}

#[derive(Debug, Clone)]
pub struct Claw {
    pub x: f32,
    pub target_x: f32,
    /// 0 = fully raised
    pub y: f32,
    pub phase: ClawPhase,
    /// Body currently carried
    pub held: Option<BodyId>,
    /// Time banked toward the next descent/ascent step
    step_timer_ms: f32,
}

impl Claw {
    pub fn new(x: f32) -> Self {
        Self {
            x,
            target_x: x,
            y: 0.0,
            phase: ClawPhase::Idle,
            held: None,
            step_timer_ms: 0.0,
        }
    }

    #[inline]
    pub fn is_busy(&self) -> bool {
        !matches!(self.phase, ClawPhase::Idle)
    }

    /// Where the prongs meet
    pub fn tip(&self, tuning: &Tuning) -> Vec2 {
        Vec2::new(self.x, self.y + tuning.claw.tip_offset)
    }

    /// Point the idle claw at a playfield x (clamped). Ignored while busy.
    pub fn set_target(&mut self, x: f32, tuning: &Tuning) -> bool {
        if self.is_busy() {
            return false;
        }
        self.target_x = tuning.clamp_claw_x(x);
        true
    }

    /// Ease toward the target while idle
    pub fn relax(&mut self, tuning: &Tuning) {
        if !self.is_busy() {
            self.x += (self.target_x - self.x) * tuning.claw.smoothing;
        }
    }

    /// Start an attempt at a randomly chosen depth. No-op while busy.
    pub fn begin<R: Rng>(&mut self, tuning: &Tuning, rng: &mut R) -> Option<f32> {
        if self.is_busy() {
            return None;
        }
        let depth = tuning
            .claw
            .drop_depths
            .choose(rng)
            .copied()
            .unwrap_or(tuning.physics.floor_y - tuning.physics.body_radius * 2.0);
        self.phase = ClawPhase::Descending { depth };
        self.held = None;
        self.step_timer_ms = 0.0;
        Some(depth)
    }

    /// Drop all attempt state without resolving
    pub fn reset(&mut self) {
        self.phase = ClawPhase::Idle;
        self.held = None;
        self.y = 0.0;
        self.step_timer_ms = 0.0;
    }

    /// Advance the attempt by `dt_ms`
    ///
    /// `rigged` only matters at the moment the dwell ends.
    pub fn advance<R: Rng>(
        &mut self,
        dt_ms: f32,
        bodies: &mut [Body],
        tuning: &Tuning,
        rigged: bool,
        rng: &mut R,
    ) -> Vec<ClawEvent> {
        let mut events = Vec::new();
        let claw = &tuning.claw;
        self.step_timer_ms += dt_ms;

        loop {
            match self.phase {
                ClawPhase::Idle => {
                    self.step_timer_ms = 0.0;
                    break;
                }

                ClawPhase::Descending { depth } => {
                    if self.step_timer_ms < claw.step_ms {
                        break;
                    }
                    self.step_timer_ms -= claw.step_ms;
                    self.y += claw.descent_step;
                    if self.y >= depth {
                        events.push(self.capture(bodies, tuning));
                        self.phase = ClawPhase::Dwelling {
                            remaining_ms: claw.dwell_ms,
                        };
                    }
                }

                ClawPhase::Dwelling { remaining_ms } => {
                    if self.step_timer_ms < remaining_ms {
                        self.phase = ClawPhase::Dwelling {
                            remaining_ms: remaining_ms - self.step_timer_ms,
                        };
                        self.step_timer_ms = 0.0;
                        break;
                    }
                    self.step_timer_ms -= remaining_ms;
                    let success = outcome::decide(self.held.is_some(), rigged, &tuning.outcome, rng);
                    events.push(ClawEvent::Decided { success });
                    self.phase = ClawPhase::Ascending {
                        will_succeed: success,
                        dropped: false,
                    };
                }

                ClawPhase::Ascending {
                    will_succeed,
                    mut dropped,
                } => {
                    if self.step_timer_ms < claw.step_ms {
                        break;
                    }
                    self.step_timer_ms -= claw.step_ms;
                    self.y = (self.y - claw.ascent_step).max(0.0);

                    if !will_succeed && !dropped && self.y < claw.release_y {
                        if let Some(id) = self.held.take() {
                            fumble(bodies, id, rng);
                            events.push(ClawEvent::Fumbled(id));
                        }
                        dropped = true;
                    }
                    self.phase = ClawPhase::Ascending {
                        will_succeed,
                        dropped,
                    };

                    if self.y <= 0.0 {
                        events.push(self.resolve(bodies, will_succeed));
                        break;
                    }
                }
            }
        }
        events
    }

    /// Grab the nearest body within reach of the tip
    fn capture(&mut self, bodies: &mut [Body], tuning: &Tuning) -> ClawEvent {
        let tip = self.tip(tuning);
        match nearest_within(bodies, tip, tuning.claw.capture_radius) {
            Some(idx) => {
                let body = &mut bodies[idx];
                body.grab();
                self.held = Some(body.id);
                log::debug!(
                    "Claw captured #{} {} at depth {:.0}",
                    body.id,
                    body.item.id,
                    self.y
                );
                ClawEvent::Captured(body.id)
            }
            None => {
                log::debug!("Claw came up empty at depth {:.0}", self.y);
                ClawEvent::Missed
            }
        }
    }

    /// Fully raised: settle the attempt and go idle
    fn resolve(&mut self, bodies: &mut [Body], will_succeed: bool) -> ClawEvent {
        self.y = 0.0;
        self.phase = ClawPhase::Idle;
        self.step_timer_ms = 0.0;

        match (will_succeed, self.held.take()) {
            (true, Some(id)) => ClawEvent::Won(id),
            (_, released) => {
                if let Some(id) = released
                    && let Some(body) = bodies.iter_mut().find(|b| b.id == id)
                {
                    body.release(Vec2::new(0.0, 2.0));
                }
                ClawEvent::Lost { released }
            }
        }
    }
}

/// Index of the body nearest to `tip` with center distance under `radius`
pub fn nearest_within(bodies: &[Body], tip: Vec2, radius: f32) -> Option<usize> {
    bodies
        .iter()
        .enumerate()
        .map(|(i, b)| (i, b.pos.distance(tip)))
        .filter(|&(_, d)| d < radius)
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
}

/// Let go of a held body with a random toss
fn fumble<R: Rng>(bodies: &mut [Body], id: BodyId, rng: &mut R) {
    if let Some(body) = bodies.iter_mut().find(|b| b.id == id) {
        let vx = (rng.random::<f32>() - 0.5) * 5.0;
        body.release(Vec2::new(vx, 3.0));
        body.spin = (rng.random::<f32>() - 0.5) * 0.14;
        log::debug!("Claw fumbled #{} {}", body.id, body.item.id);
    }
}
