//! Render snapshot
//!
//! A flat, serializable view of one session frame. The core never draws; the
//! front end (canvas, DOM, terminal) reads this and paints whatever it likes.

use serde::Serialize;

use crate::catalog::Rarity;
use crate::sim::{Session, SessionEvent};
use crate::theme::Theme;

/// Prong half-spread (px) when open / closed on a plush
const PRONG_OPEN: f32 = 18.0;
const PRONG_CLOSED: f32 = 4.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodySprite {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub angle: f32,
    pub glyph: String,
    pub color: String,
    pub rarity: Rarity,
    pub held: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClawSprite {
    pub x: f32,
    pub y: f32,
    /// Where the prongs meet
    pub tip_y: f32,
    pub prong_spread: f32,
    pub busy: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSnapshot {
    pub width: f32,
    pub height: f32,
    pub floor_y: f32,
    pub wall_left: f32,
    pub wall_right: f32,
    /// Free bodies first, the held one (if any) last so it draws on top
    pub bodies: Vec<BodySprite>,
    pub claw: ClawSprite,
    pub theme: &'static str,
    pub total_wins: u32,
    pub frame: u64,
}

impl RenderSnapshot {
    pub fn capture(session: &Session, theme: Theme, total_wins: u32) -> Self {
        let tuning = session.tuning();
        let physics = &tuning.physics;

        let mut bodies: Vec<BodySprite> = session
            .bodies
            .iter()
            .map(|b| BodySprite {
                id: b.id,
                x: b.pos.x,
                y: b.pos.y,
                radius: b.radius,
                angle: b.angle,
                glyph: b.item.glyph.clone(),
                color: b.item.color.clone(),
                rarity: b.item.rarity,
                held: b.is_held(),
            })
            .collect();
        // Stable, so free bodies keep simulation order
        bodies.sort_by_key(|b| b.held);

        let claw = &session.claw;
        let claw_sprite = ClawSprite {
            x: claw.x,
            y: claw.y,
            tip_y: claw.tip(tuning).y,
            prong_spread: if claw.held.is_some() {
                PRONG_CLOSED
            } else {
                PRONG_OPEN
            },
            busy: claw.is_busy(),
        };

        Self {
            width: physics.width,
            height: physics.height,
            floor_y: physics.floor_y,
            wall_left: physics.wall_left,
            wall_right: physics.wall_right,
            bodies,
            claw: claw_sprite,
            theme: theme.as_str(),
            total_wins,
            frame: session.frames,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Everything the front end needs after one `frame` call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    /// `None` once the session has ended
    pub snapshot: Option<RenderSnapshot>,
    /// In order; a `won` entry names the exact plush carried out
    pub events: Vec<SessionEvent>,
}

impl FrameReport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
