//! Collectible item catalog and rarity odds
//!
//! The catalog is an ordered list. Duplicate ids are kept as separate entries
//! so they weigh more heavily when the playfield is stocked.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rarity tiers, in the order odds are accumulated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    UltraRare,
}

impl Rarity {
    pub const ALL: [Rarity; 4] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::UltraRare,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::UltraRare => "ultra-rare",
        }
    }

    /// Human label ("ULTRA RARE")
    pub fn label(&self) -> String {
        self.as_str().replace('-', " ").to_uppercase()
    }
}

/// A single collectible
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    /// Emoji drawn on the plush
    #[serde(alias = "emoji")]
    pub glyph: String,
    /// CSS color string for the plush backdrop
    pub color: String,
    pub rarity: Rarity,
}

impl CatalogEntry {
    pub fn new(id: &str, name: &str, glyph: &str, color: &str, rarity: Rarity) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            glyph: glyph.to_string(),
            color: color.to_string(),
            rarity,
        }
    }
}

/// Probability of each rarity tier (must sum to 1.0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RarityOdds {
    pub common: f32,
    pub uncommon: f32,
    pub rare: f32,
    pub ultra_rare: f32,
}

impl Default for RarityOdds {
    fn default() -> Self {
        Self {
            common: 0.45,
            uncommon: 0.30,
            rare: 0.18,
            ultra_rare: 0.07,
        }
    }
}

impl RarityOdds {
    /// Allowed drift when checking that the table sums to one
    pub const SUM_TOLERANCE: f32 = 1e-6;

    pub fn chance(&self, rarity: Rarity) -> f32 {
        match rarity {
            Rarity::Common => self.common,
            Rarity::Uncommon => self.uncommon,
            Rarity::Rare => self.rare,
            Rarity::UltraRare => self.ultra_rare,
        }
    }

    pub fn total(&self) -> f32 {
        Rarity::ALL.iter().map(|r| self.chance(*r)).sum()
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if Rarity::ALL.iter().any(|r| self.chance(*r) < 0.0) {
            return Err(CatalogError::NegativeOdds);
        }
        let total = self.total();
        if (total - 1.0).abs() > Self::SUM_TOLERANCE {
            return Err(CatalogError::OddsSum(total));
        }
        Ok(())
    }

    /// Tier whose cumulative bucket contains `draw`, or None on float drift
    pub fn tier_for_draw(&self, draw: f32) -> Option<Rarity> {
        let mut acc = 0.0;
        for rarity in Rarity::ALL {
            acc += self.chance(rarity);
            if draw < acc {
                return Some(rarity);
            }
        }
        None
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog has no entries")]
    Empty,
    #[error("rarity odds sum to {0}, expected 1.0")]
    OddsSum(f32),
    #[error("rarity odds must not be negative")]
    NegativeOdds,
    #[error("catalog json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Ordered item list plus rarity odds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawCatalog")]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    odds: RarityOdds,
}

#[derive(Deserialize)]
struct RawCatalog {
    entries: Vec<CatalogEntry>,
    #[serde(default)]
    odds: RarityOdds,
}

impl TryFrom<RawCatalog> for Catalog {
    type Error = CatalogError;

    fn try_from(raw: RawCatalog) -> Result<Self, Self::Error> {
        Catalog::new(raw.entries, raw.odds)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            entries: default_entries(),
            odds: RarityOdds::default(),
        }
    }
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>, odds: RarityOdds) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }
        odds.validate()?;
        Ok(Self { entries, odds })
    }

    /// Parse `{"entries": [...], "odds": {...}}`
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn odds(&self) -> &RarityOdds {
        &self.odds
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry for each distinct id, in catalog order
    pub fn distinct(&self) -> Vec<&CatalogEntry> {
        let mut seen: Vec<&CatalogEntry> = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            if !seen.iter().any(|e| e.id == entry.id) {
                seen.push(entry);
            }
        }
        seen
    }

    /// Uniform pick over entries; duplicate ids get proportionally more weight
    pub fn pick<R: Rng>(&self, rng: &mut R) -> &CatalogEntry {
        self.entries.choose(rng).unwrap_or(&self.entries[0])
    }

    /// Roll a random prize by rarity tier
    pub fn roll_prize<R: Rng>(&self, rng: &mut R) -> &CatalogEntry {
        let draw: f32 = rng.random();
        self.prize_for_draw(draw, rng)
    }

    /// Rarity roll with the tier draw supplied by the caller
    ///
    /// Falls back to the first entry when no tier bucket matches or the
    /// matched tier has nothing in it.
    pub fn prize_for_draw<R: Rng>(&self, draw: f32, rng: &mut R) -> &CatalogEntry {
        let Some(rarity) = self.odds.tier_for_draw(draw) else {
            return &self.entries[0];
        };
        let pool: Vec<&CatalogEntry> = self.entries.iter().filter(|e| e.rarity == rarity).collect();
        pool.choose(rng).copied().unwrap_or(&self.entries[0])
    }
}

fn default_entries() -> Vec<CatalogEntry> {
    use Rarity::*;
    vec![
        CatalogEntry::new("peach", "Peach Bun", "🍑", "#fec69e", Common),
        CatalogEntry::new("penguin", "Waddle Penguin", "🐧", "#baddf5", Uncommon),
        CatalogEntry::new("chick", "Baby Chick", "🐥", "#f5e8a9", Common),
        CatalogEntry::new("panda", "Panda Baby", "🐼", "#cab4f8", Uncommon),
        CatalogEntry::new("bunny", "Pink Bunny", "🐰", "#ffd4e7", Common),
        CatalogEntry::new("bear", "Teddy Bear", "🧸", "#fbe2cb", Uncommon),
        CatalogEntry::new("ghost", "Boo Ghost", "👻", "#fcbfbf", Common),
        CatalogEntry::new("star", "Twinkle Star", "⭐", "#fff9c6", Common),
        CatalogEntry::new("parrot", "Rainbow Parrot", "🦜", "#ccf8d8", UltraRare),
        CatalogEntry::new("penguin", "Waddle Penguin", "🐧", "#baddf5", Uncommon),
        CatalogEntry::new("hamster", "Hammy", "🐹", "#f8dbc5", Common),
        CatalogEntry::new("pig", "Pinky Pig", "🐷", "#feb9d7", Common),
        CatalogEntry::new("dog", "Puppy", "🐶", "#fff0db", Common),
        CatalogEntry::new("koala", "Sleepy Koala", "🐨", "#cacaca", Uncommon),
        CatalogEntry::new("frog", "Hoppy Frog", "🐸", "#c3fdc3", Common),
        CatalogEntry::new("cat", "Kitty", "🐱", "#fddd91", Common),
        CatalogEntry::new("fox", "Foxy", "🦊", "#f9c28c", Rare),
    ]
}
