//! Claw machine facade
//!
//! Owns the catalog, tuning, the persisted collection record and (while one is
//! running) the live session. Everything the UI does goes through here: it
//! buffers pointer input, steps the session on a fixed cadence and commits
//! wins to the store.

use crate::catalog::Catalog;
use crate::collection::{CollectionRecord, CollectionSlot};
use crate::consts::FRAME_MS;
use crate::persistence::{Persistence, load_or_default};
use crate::renderer::{FrameReport, RenderSnapshot};
use crate::sim::{FrameClock, Session, SessionEvent, TickInput, commit_win, tick};
use crate::theme::Theme;
use crate::tuning::{Tuning, TuningError};

pub struct ClawMachine<P: Persistence> {
    catalog: Catalog,
    tuning: Tuning,
    store: P,
    record: CollectionRecord,
    /// Hidden hard mode
    rigged: bool,
    session: Option<Session>,
    clock: FrameClock,
    input: TickInput,
}

impl<P: Persistence> ClawMachine<P> {
    /// Build a machine, loading whatever collection the store holds
    ///
    /// Fails before anything runs if the tuning could stall the claw.
    pub fn new(catalog: Catalog, tuning: Tuning, store: P) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::build(catalog, tuning, store))
    }

    /// Default catalog and tuning
    pub fn with_store(store: P) -> Self {
        Self::build(Catalog::default(), Tuning::default(), store)
    }

    fn build(catalog: Catalog, tuning: Tuning, store: P) -> Self {
        let record = load_or_default(&store);
        Self {
            catalog,
            tuning,
            store,
            record,
            rigged: false,
            session: None,
            clock: FrameClock::new(),
            input: TickInput::default(),
        }
    }

    /// Start a fresh session, replacing any running one
    pub fn start_session(&mut self) {
        self.start_session_seeded(rand::random());
    }

    pub fn start_session_seeded(&mut self, seed: u64) {
        if self.session.is_some() {
            log::info!("Replacing running session");
        }
        let session = Session::new(self.catalog.clone(), self.tuning.clone(), seed);
        log::info!(
            "Session started: {} bodies (seed {:#x})",
            session.bodies.len(),
            seed
        );
        self.session = Some(session);
        self.clock.reset();
        self.input = TickInput::default();
    }

    /// Drop the session. Any attempt in flight and any pending respawn die with it.
    pub fn end_session(&mut self) {
        if let Some(session) = self.session.take() {
            log::info!(
                "Session ended after {} frames ({} respawns cancelled)",
                session.frames,
                session.pending_respawns()
            );
        }
        self.clock.reset();
        self.input = TickInput::default();
    }

    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    /// Is an attempt in flight?
    pub fn is_busy(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_busy)
    }

    /// Pointer moved to playfield `x`; applied on the next frame
    pub fn pointer_moved(&mut self, x: f32) {
        if self.session.is_some() {
            self.input.pointer_x = Some(x);
        }
    }

    /// Drop the claw. Returns false if there is no session or an attempt is
    /// already in flight.
    pub fn request_attempt(&mut self) -> bool {
        self.session
            .as_mut()
            .is_some_and(|session| session.request_attempt())
    }

    /// Next theme, persisted immediately
    pub fn cycle_theme(&mut self) -> Theme {
        let theme = self.record.cycle_theme();
        log::info!("Theme -> {}", theme.as_str());
        if let Err(e) = self.store.save(&self.record) {
            log::warn!("Failed to save theme: {}", e);
        }
        theme
    }

    /// Flip hidden mode, returning the new state
    pub fn toggle_rigged(&mut self) -> bool {
        self.rigged = !self.rigged;
        log::debug!("Rigged mode {}", if self.rigged { "on" } else { "off" });
        self.rigged
    }

    pub fn is_rigged(&self) -> bool {
        self.rigged
    }

    /// Feed a wall-clock timestamp and run however many frames are due
    pub fn frame(&mut self, now_ms: f64) -> Vec<SessionEvent> {
        if self.session.is_none() {
            return Vec::new();
        }
        let steps = self.clock.advance(now_ms);
        let mut events = Vec::new();
        for _ in 0..steps {
            events.extend(self.step_frame());
        }
        events
    }

    /// `frame` plus the snapshot to draw afterwards
    pub fn frame_report(&mut self, now_ms: f64) -> FrameReport {
        let events = self.frame(now_ms);
        FrameReport {
            snapshot: self.snapshot(),
            events,
        }
    }

    /// Run exactly one frame, independent of the clock
    pub fn step_frame(&mut self) -> Vec<SessionEvent> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        self.input.rigged = self.rigged;
        tick(session, &self.input, FRAME_MS);

        // Clear one-shot inputs after processing
        self.input.pointer_x = None;
        self.input.activate = false;

        let events = session.drain_events();
        for event in &events {
            if let SessionEvent::Won { item, .. } = event {
                commit_win(&mut self.record, item, &self.store);
            }
        }
        events
    }

    pub fn total_wins(&self) -> u32 {
        self.record.total_wins
    }

    pub fn theme(&self) -> Theme {
        self.record.theme()
    }

    /// Collection browser rows
    pub fn collection(&self) -> Vec<CollectionSlot> {
        self.record.browse(&self.catalog)
    }

    /// (owned, total, percent)
    pub fn progress(&self) -> (usize, usize, u32) {
        self.record.progress(&self.catalog)
    }

    pub fn record(&self) -> &CollectionRecord {
        &self.record
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    /// What to draw this frame, if a session is running
    pub fn snapshot(&self) -> Option<RenderSnapshot> {
        self.session
            .as_ref()
            .map(|s| RenderSnapshot::capture(s, self.theme(), self.record.total_wins))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn machine() -> ClawMachine<MemoryStore> {
        ClawMachine::with_store(MemoryStore::new())
    }

    #[test]
    fn test_no_session_is_inert() {
        let mut m = machine();
        assert!(!m.is_running());
        assert!(!m.request_attempt());
        m.pointer_moved(100.0);
        assert!(m.step_frame().is_empty());
        assert!(m.frame(1000.0).is_empty());
        assert!(m.snapshot().is_none());
    }

    #[test]
    fn test_start_replaces_session() {
        let mut m = machine();
        m.start_session_seeded(1);
        m.request_attempt();
        assert!(m.is_busy());

        m.start_session_seeded(2);
        assert!(m.is_running());
        assert!(!m.is_busy());
        assert_eq!(m.session().unwrap().frames, 0);
    }

    #[test]
    fn test_request_attempt_single_flight() {
        let mut m = machine();
        m.start_session_seeded(5);
        assert!(m.request_attempt());
        assert!(!m.request_attempt());
        m.step_frame();
        assert!(!m.request_attempt());
    }

    #[test]
    fn test_pointer_ignored_mid_attempt() {
        let mut m = machine();
        m.start_session_seeded(5);
        let x = m.session().unwrap().claw.x;
        assert!(m.request_attempt());
        m.pointer_moved(120.0);
        m.step_frame();
        let claw = &m.session().unwrap().claw;
        assert_eq!(claw.x, x);
        assert_eq!(claw.target_x, x);
    }

    #[test]
    fn test_pointer_clamped() {
        let mut m = machine();
        m.start_session_seeded(5);
        m.pointer_moved(-500.0);
        m.step_frame();
        let min = m.tuning().physics.wall_left + m.tuning().claw.pointer_inset;
        assert_eq!(m.session().unwrap().claw.target_x, min);
    }

    #[test]
    fn test_frame_uses_clock() {
        let mut m = machine();
        m.start_session_seeded(5);
        assert!(m.frame(0.0).is_empty());
        assert_eq!(m.session().unwrap().frames, 0);
        m.frame(FRAME_MS as f64 * 2.0 + 0.5);
        assert_eq!(m.session().unwrap().frames, 2);
    }

    #[test]
    fn test_new_rejects_stalling_tuning() {
        let mut tuning = Tuning::default();
        tuning.claw.ascent_step = 0.0;
        assert!(matches!(
            ClawMachine::new(Catalog::default(), tuning, MemoryStore::new()),
            Err(TuningError::OutOfRange {
                field: "claw.ascent_step",
                ..
            })
        ));
        assert!(ClawMachine::new(Catalog::default(), Tuning::default(), MemoryStore::new()).is_ok());
    }

    #[test]
    fn test_frame_report_carries_snapshot() {
        let mut m = machine();
        assert!(m.frame_report(0.0).snapshot.is_none());
        m.start_session_seeded(5);
        m.request_attempt();
        m.frame_report(0.0);
        let report = m.frame_report(FRAME_MS as f64 + 0.5);
        assert!(report.snapshot.unwrap().claw.busy);
    }

    #[test]
    fn test_cycle_theme_persists() {
        let mut m = machine();
        assert_eq!(m.theme(), Theme::Pink);
        assert_eq!(m.cycle_theme(), Theme::Lavender);
        assert_eq!(m.cycle_theme(), Theme::Blue);
        assert_eq!(m.cycle_theme(), Theme::Pink);
        assert_eq!(m.cycle_theme(), Theme::Lavender);

        let saved = m.store().load().unwrap().unwrap();
        assert_eq!(saved.theme(), Theme::Lavender);
    }

    #[test]
    fn test_toggle_rigged() {
        let mut m = machine();
        assert!(!m.is_rigged());
        assert!(m.toggle_rigged());
        assert!(!m.toggle_rigged());
    }

    #[test]
    fn test_snapshot_tracks_session() {
        let mut m = machine();
        m.start_session_seeded(9);
        let snap = m.snapshot().unwrap();
        assert_eq!(snap.bodies.len(), 25);
        assert_eq!(snap.theme, "theme-pink");
    }
}
