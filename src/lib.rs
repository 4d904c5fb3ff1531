//! Claw Machine - a carnival claw game
//!
//! Core modules:
//! - `sim`: Per-frame physics, the claw state machine, and outcome resolution
//! - `catalog`: Collectible item entries and rarity odds
//! - `collection`: Persisted ledger of won items
//! - `persistence`: Load/save adapters for the collection record
//! - `machine`: Outward command/query facade over a live session
//! - `renderer`: Read-only world snapshot for drawing
//! - `platform`: Pointer mapping and browser bindings
//! - `tuning`: Data-driven physics and claw balance

pub mod catalog;
pub mod collection;
pub mod machine;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod theme;
pub mod tuning;

pub use catalog::{Catalog, CatalogEntry, Rarity, RarityOdds};
pub use collection::{CollectionRecord, CollectionSlot};
pub use machine::ClawMachine;
pub use theme::Theme;
pub use tuning::{Tuning, TuningError};

/// Playfield and timing constants (defaults for `Tuning`)
pub mod consts {
    /// Nominal display frame length (60 Hz). All per-frame physics quantities assume it.
    pub const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 468.0;
    pub const PLAYFIELD_HEIGHT: f32 = 545.0;
    pub const FLOOR_Y: f32 = PLAYFIELD_HEIGHT - 44.0;
    /// Inside edge of the wall graphics
    pub const WALL_LEFT: f32 = 38.0;
    pub const WALL_RIGHT: f32 = PLAYFIELD_WIDTH - 38.0;

    /// Body defaults
    pub const BODY_RADIUS: f32 = 32.0;
    pub const BODY_COUNT: usize = 25;
    pub const GRAVITY: f32 = 0.38;
    /// Bounce energy kept on floor/wall/ceiling contact
    pub const RESTITUTION: f32 = 0.32;
    /// Horizontal damping on floor contact
    pub const FLOOR_FRICTION: f32 = 0.91;
    pub const SPIN_DECAY: f32 = 0.995;
    /// Bodies may interpenetrate this much before the resolver pushes them apart
    pub const OVERLAP_ALLOWANCE: f32 = 2.0;
    pub const COLLISION_IMPULSE: f32 = 0.6;

    /// Claw defaults
    pub const CLAW_SMOOTHING: f32 = 0.14;
    pub const POINTER_INSET: f32 = 20.0;
    pub const CLAW_STEP_MS: f32 = 14.0;
    pub const DESCENT_STEP: f32 = 10.0;
    pub const ASCENT_STEP: f32 = 9.0;
    pub const CLAW_TIP_OFFSET: f32 = 38.0;
    pub const CAPTURE_RADIUS: f32 = BODY_RADIUS + 30.0;
    pub const DWELL_MS: f32 = 160.0;
    /// Fumbles happen once the claw rises above this height
    pub const RELEASE_Y: f32 = PLAYFIELD_HEIGHT * 0.40;
    pub const HELD_OFFSET: f32 = BODY_RADIUS + 26.0;
    pub const HELD_SPIN: f32 = 0.015;
    pub const RESPAWN_DELAY_MS: f32 = 600.0;

    /// Grab odds
    pub const SUCCESS_PROBABILITY: f32 = 0.65;
    pub const RIGGED_SUCCESS_PROBABILITY: f32 = 0.05;

    /// Above this many live bodies the O(n²) pair pass gets expensive
    pub const PAIR_PASS_WARN_COUNT: usize = 64;
}
