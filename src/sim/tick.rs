//! Per-frame simulation step and the fixed-cadence frame clock

use super::state::Session;
use crate::consts::{FRAME_MS, MAX_SUBSTEPS};

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Claw target in playfield coordinates (from pointer position)
    pub pointer_x: Option<f32>,
    /// Drop the claw (click/tap)
    pub activate: bool,
    /// Hidden hard mode - lowers the grab odds
    pub rigged: bool,
}

/// Advance the session by one frame of `dt_ms`
///
/// Order: input, body physics, claw state machine, held-body carry, idle
/// smoothing, respawn timers.
pub fn tick(session: &mut Session, input: &TickInput, dt_ms: f32) {
    if let Some(x) = input.pointer_x {
        session.aim(x);
    }
    if input.activate {
        session.request_attempt();
    }

    session.step_bodies();

    session.update_claw(dt_ms, input.rigged);
    session.carry_held();

    session.relax_claw();

    session.update_respawns(dt_ms);
    session.frames += 1;
}

/// Turns wall-clock timestamps into a whole number of fixed frames
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
    accumulator: f32,
}

impl FrameClock {
    /// Longest gap honored between two timestamps (tab switches, debugger pauses)
    pub const MAX_GAP_MS: f32 = 100.0;

    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous timestamp (next call starts fresh)
    pub fn reset(&mut self) {
        self.last_ms = None;
        self.accumulator = 0.0;
    }

    /// Feed the current time, get back how many frames to step
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        let Some(last) = self.last_ms.replace(now_ms) else {
            // First timestamp only establishes the baseline
            return 0;
        };
        let dt = ((now_ms - last).max(0.0) as f32).min(Self::MAX_GAP_MS);
        self.accumulator += dt;

        let mut steps = 0;
        while self.accumulator >= FRAME_MS && steps < MAX_SUBSTEPS {
            self.accumulator -= FRAME_MS;
            steps += 1;
        }
        // Drop backlog we refuse to simulate
        if steps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(FRAME_MS);
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::sim::state::SessionEvent;
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn claw_session(success: f32) -> Session {
        let mut tuning = Tuning::default();
        tuning.claw.drop_depths = vec![430.0];
        tuning.outcome.success_probability = success;
        let mut session = Session::empty(Catalog::default(), tuning, 99);
        session.claw.x = 200.0;
        session.claw.target_x = 200.0;
        session
    }

    fn run_attempt(session: &mut Session) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        tick(
            session,
            &TickInput {
                activate: true,
                ..Default::default()
            },
            FRAME_MS,
        );
        for _ in 0..600 {
            if !session.is_busy() {
                break;
            }
            tick(session, &TickInput::default(), FRAME_MS);
        }
        events.extend(session.drain_events());
        events
    }

    #[test]
    fn test_win_awards_the_captured_body() {
        let mut session = claw_session(1.0);
        let catalog = Catalog::default();
        // Nearer: the fox, right under the tip. Farther but in reach: the peach.
        let fox = catalog.entries().iter().find(|e| e.id == "fox").unwrap().clone();
        let peach = catalog.entries()[0].clone();
        let peach_id = session.spawn_body(Vec2::new(160.0, 469.0), peach);
        let fox_id = session.spawn_body(Vec2::new(200.0, 469.0), fox);

        // Let them settle first
        for _ in 0..30 {
            tick(&mut session, &TickInput::default(), FRAME_MS);
        }

        let events = run_attempt(&mut session);
        let captured: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::Captured { body, .. } => Some(*body),
                _ => None,
            })
            .collect();
        assert_eq!(captured, vec![fox_id]);

        let won: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::Won { body, item } => Some((*body, item.id.clone())),
                _ => None,
            })
            .collect();
        assert_eq!(won, vec![(fox_id, "fox".to_string())]);

        assert!(session.body(fox_id).is_none());
        assert!(session.body(peach_id).is_some());
        assert_eq!(session.pending_respawns(), 1);
    }

    #[test]
    fn test_held_body_tracks_claw_with_zero_velocity() {
        let mut session = claw_session(1.0);
        let id = session.spawn_body(Vec2::new(200.0, 469.0), Catalog::default().entries()[3].clone());

        tick(
            &mut session,
            &TickInput {
                activate: true,
                ..Default::default()
            },
            FRAME_MS,
        );
        let mut carried_frames = 0;
        for _ in 0..600 {
            tick(&mut session, &TickInput::default(), FRAME_MS);
            if let Some(body) = session.held_body() {
                assert_eq!(body.id, id);
                assert_eq!(body.vel, Vec2::ZERO);
                assert_eq!(body.pos.x, session.claw.x);
                assert_eq!(body.pos.y, session.claw.y + session.tuning().claw.held_offset);
                carried_frames += 1;
            }
            if !session.is_busy() {
                break;
            }
        }
        assert!(carried_frames > 10);
    }

    #[test]
    fn test_loss_keeps_live_set() {
        let mut session = claw_session(0.0);
        let id = session.spawn_body(Vec2::new(200.0, 469.0), Catalog::default().entries()[2].clone());

        let events = run_attempt(&mut session);
        assert!(events.contains(&SessionEvent::Fumbled { body: id }));
        assert!(events.contains(&SessionEvent::Lost { released: None }));
        assert!(!events.iter().any(|e| matches!(e, SessionEvent::Won { .. })));

        assert_eq!(session.bodies.len(), 1);
        assert!(session.body(id).unwrap().is_free());
        assert_eq!(session.pending_respawns(), 0);

        // The fumbled plush falls back into the pile
        for _ in 0..300 {
            tick(&mut session, &TickInput::default(), FRAME_MS);
        }
        let body = session.body(id).unwrap();
        assert!((body.pos.y - (session.tuning().physics.floor_y - body.radius)).abs() < 1.0);
    }

    #[test]
    fn test_replacement_spawns_after_delay() {
        let mut session = claw_session(1.0);
        session.spawn_body(Vec2::new(200.0, 469.0), Catalog::default().entries()[0].clone());
        run_attempt(&mut session);
        assert!(session.bodies.is_empty());

        // 600ms is 36 frames; the winning frame already counted one
        for _ in 0..34 {
            tick(&mut session, &TickInput::default(), FRAME_MS);
        }
        assert!(session.bodies.is_empty());
        for _ in 0..2 {
            tick(&mut session, &TickInput::default(), FRAME_MS);
        }
        assert_eq!(session.bodies.len(), 1);
        assert!(
            session
                .drain_events()
                .iter()
                .any(|e| matches!(e, SessionEvent::Respawned { .. }))
        );
    }

    #[test]
    fn test_second_activation_mid_attempt_is_ignored() {
        let mut session = claw_session(1.0);
        session.spawn_body(Vec2::new(200.0, 469.0), Catalog::default().entries()[0].clone());
        let mut twin = session.clone();

        let activate = TickInput {
            activate: true,
            ..Default::default()
        };
        tick(&mut session, &activate, FRAME_MS);
        tick(&mut twin, &activate, FRAME_MS);
        for _ in 0..10 {
            tick(&mut session, &TickInput::default(), FRAME_MS);
            tick(&mut twin, &TickInput::default(), FRAME_MS);
        }

        // Spam activation on one of them
        for _ in 0..40 {
            tick(&mut session, &activate, FRAME_MS);
            tick(&mut twin, &TickInput::default(), FRAME_MS);
            assert_eq!(session.claw.y, twin.claw.y);
            assert_eq!(session.claw.held, twin.claw.held);
            assert_eq!(session.claw.phase, twin.claw.phase);
        }
        let starts = session
            .drain_events()
            .iter()
            .filter(|e| matches!(e, SessionEvent::AttemptStarted { .. }))
            .count();
        assert_eq!(starts, 1);
    }

    #[test]
    fn test_pointer_ignored_while_busy() {
        let mut session = claw_session(1.0);
        tick(
            &mut session,
            &TickInput {
                pointer_x: Some(300.0),
                ..Default::default()
            },
            FRAME_MS,
        );
        assert_eq!(session.claw.target_x, 300.0);
        assert!(session.claw.x > 200.0);

        let x = session.claw.x;
        tick(
            &mut session,
            &TickInput {
                activate: true,
                ..Default::default()
            },
            FRAME_MS,
        );
        tick(
            &mut session,
            &TickInput {
                pointer_x: Some(60.0),
                ..Default::default()
            },
            FRAME_MS,
        );
        assert_eq!(session.claw.target_x, 300.0);
        assert_eq!(session.claw.x, x);
    }

    #[test]
    fn test_frame_clock_cadence() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(1000.0), 0);
        assert_eq!(clock.advance(1000.0 + FRAME_MS as f64 + 0.1), 1);
        // Half a frame banks without stepping
        assert_eq!(clock.advance(1000.0 + FRAME_MS as f64 * 1.5), 0);
        assert_eq!(clock.advance(1000.0 + FRAME_MS as f64 * 3.0 + 0.1), 2);
    }

    #[test]
    fn test_frame_clock_caps_substeps() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        // A long stall is clamped to MAX_GAP_MS worth of frames
        let steps = clock.advance(10_000.0);
        assert!((5..=MAX_SUBSTEPS).contains(&steps), "steps = {steps}");
        assert!(clock.advance(10_000.0 + FRAME_MS as f64) <= 2);
        clock.reset();
        assert_eq!(clock.advance(50.0), 0);
    }
}
