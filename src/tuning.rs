//! Data-driven game balance
//!
//! Every field defaults to the matching constant in [`crate::consts`], so a
//! partial JSON document only overrides what it names.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("{field} = {value} is out of range (expected {expected})")]
    OutOfRange {
        field: &'static str,
        value: f32,
        expected: &'static str,
    },
    #[error("walls {left}..{right} leave no room for a body of radius {radius}")]
    TooNarrow { left: f32, right: f32, radius: f32 },
    #[error("invalid tuning json: {0}")]
    Json(#[from] serde_json::Error),
}

fn finite(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            field,
            value,
            expected: "finite",
        })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            field,
            value,
            expected: "> 0",
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            field,
            value,
            expected: ">= 0",
        })
    }
}

fn probability(field: &'static str, value: f32) -> Result<(), TuningError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            field,
            value,
            expected: "0..=1",
        })
    }
}

/// Playfield bounds and body physics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    pub width: f32,
    pub height: f32,
    pub floor_y: f32,
    pub wall_left: f32,
    pub wall_right: f32,
    pub body_radius: f32,
    pub body_count: usize,
    pub gravity: f32,
    pub restitution: f32,
    pub floor_friction: f32,
    pub spin_decay: f32,
    pub overlap_allowance: f32,
    pub collision_impulse: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
            floor_y: FLOOR_Y,
            wall_left: WALL_LEFT,
            wall_right: WALL_RIGHT,
            body_radius: BODY_RADIUS,
            body_count: BODY_COUNT,
            gravity: GRAVITY,
            restitution: RESTITUTION,
            floor_friction: FLOOR_FRICTION,
            spin_decay: SPIN_DECAY,
            overlap_allowance: OVERLAP_ALLOWANCE,
            collision_impulse: COLLISION_IMPULSE,
        }
    }
}

/// Claw motion and timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClawTuning {
    pub smoothing: f32,
    pub pointer_inset: f32,
    /// Interval between descent/ascent steps
    pub step_ms: f32,
    pub descent_step: f32,
    pub ascent_step: f32,
    /// Candidate drop depths; one is picked uniformly per attempt
    pub drop_depths: Vec<f32>,
    pub tip_offset: f32,
    pub capture_radius: f32,
    pub dwell_ms: f32,
    pub release_y: f32,
    pub held_offset: f32,
    pub held_spin: f32,
    pub respawn_delay_ms: f32,
}

impl PhysicsTuning {
    pub fn validate(&self) -> Result<(), TuningError> {
        positive("physics.width", self.width)?;
        positive("physics.height", self.height)?;
        positive("physics.floor_y", self.floor_y)?;
        positive("physics.body_radius", self.body_radius)?;
        finite("physics.wall_left", self.wall_left)?;
        finite("physics.wall_right", self.wall_right)?;
        if self.wall_right - self.wall_left < self.body_radius * 2.0 {
            return Err(TuningError::TooNarrow {
                left: self.wall_left,
                right: self.wall_right,
                radius: self.body_radius,
            });
        }
        finite("physics.gravity", self.gravity)?;
        non_negative("physics.restitution", self.restitution)?;
        non_negative("physics.floor_friction", self.floor_friction)?;
        non_negative("physics.spin_decay", self.spin_decay)?;
        non_negative("physics.overlap_allowance", self.overlap_allowance)?;
        non_negative("physics.collision_impulse", self.collision_impulse)?;
        Ok(())
    }
}

impl Default for ClawTuning {
    fn default() -> Self {
        Self {
            smoothing: CLAW_SMOOTHING,
            pointer_inset: POINTER_INSET,
            step_ms: CLAW_STEP_MS,
            descent_step: DESCENT_STEP,
            ascent_step: ASCENT_STEP,
            // Top of the pile, middle layer, near the floor
            drop_depths: vec![FLOOR_Y - 180.0, FLOOR_Y - 120.0, FLOOR_Y - 58.0],
            tip_offset: CLAW_TIP_OFFSET,
            capture_radius: CAPTURE_RADIUS,
            dwell_ms: DWELL_MS,
            release_y: RELEASE_Y,
            held_offset: HELD_OFFSET,
            held_spin: HELD_SPIN,
            respawn_delay_ms: RESPAWN_DELAY_MS,
        }
    }
}

impl ClawTuning {
    /// Steps must be positive or an attempt never finishes
    pub fn validate(&self) -> Result<(), TuningError> {
        positive("claw.step_ms", self.step_ms)?;
        positive("claw.descent_step", self.descent_step)?;
        positive("claw.ascent_step", self.ascent_step)?;
        for &depth in &self.drop_depths {
            positive("claw.drop_depths", depth)?;
        }
        non_negative("claw.smoothing", self.smoothing)?;
        non_negative("claw.pointer_inset", self.pointer_inset)?;
        finite("claw.tip_offset", self.tip_offset)?;
        non_negative("claw.capture_radius", self.capture_radius)?;
        non_negative("claw.dwell_ms", self.dwell_ms)?;
        finite("claw.release_y", self.release_y)?;
        finite("claw.held_offset", self.held_offset)?;
        finite("claw.held_spin", self.held_spin)?;
        non_negative("claw.respawn_delay_ms", self.respawn_delay_ms)?;
        Ok(())
    }
}

/// Grab odds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutcomeTuning {
    pub success_probability: f32,
    /// Used while the hidden rigged mode is on
    pub rigged_success_probability: f32,
}

impl Default for OutcomeTuning {
    fn default() -> Self {
        Self {
            success_probability: SUCCESS_PROBABILITY,
            rigged_success_probability: RIGGED_SUCCESS_PROBABILITY,
        }
    }
}

impl OutcomeTuning {
    pub fn validate(&self) -> Result<(), TuningError> {
        probability("outcome.success_probability", self.success_probability)?;
        probability(
            "outcome.rigged_success_probability",
            self.rigged_success_probability,
        )
    }

    pub fn probability(&self, rigged: bool) -> f32 {
        if rigged {
            self.rigged_success_probability
        } else {
            self.success_probability
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub physics: PhysicsTuning,
    pub claw: ClawTuning,
    pub outcome: OutcomeTuning,
}

impl Tuning {
    /// Parse and validate; fields left out keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        self.physics.validate()?;
        self.claw.validate()?;
        self.outcome.validate()
    }

    /// Clamp a playfield x into the band the claw may travel
    pub fn clamp_claw_x(&self, x: f32) -> f32 {
        let lo = self.physics.wall_left + self.claw.pointer_inset;
        let hi = self.physics.wall_right - self.claw.pointer_inset;
        x.clamp(lo, hi.max(lo))
    }
}
