//! Simulation module
//!
//! All gameplay logic lives here:
//! - Per-frame body physics with bounds and pair collisions
//! - The claw attempt state machine
//! - Outcome resolution
//! - No rendering or platform dependencies

pub mod body;
pub mod claw;
pub mod collision;
pub mod outcome;
pub mod physics;
pub mod state;
pub mod tick;

pub use body::{Body, BodyId, BodyState};
pub use claw::{Claw, ClawEvent, ClawPhase, nearest_within};
pub use collision::{CollisionResult, circle_overlap, resolve_collisions, resolve_pair};
pub use outcome::{commit_win, decide, decide_with_draw};
pub use state::{Session, SessionEvent};
pub use tick::{FrameClock, TickInput, tick};
