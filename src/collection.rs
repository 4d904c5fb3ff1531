//! Persisted collection ledger
//!
//! Tracks every plush the player has won and how many times.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CatalogEntry};
use crate::theme::Theme;

/// One owned item: a snapshot of the catalog entry plus how many were won
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionEntry {
    #[serde(flatten)]
    pub entry: CatalogEntry,
    pub count: u32,
}

/// The record handed to the persistence adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRecord {
    #[serde(default)]
    pub collection: BTreeMap<String, CollectionEntry>,
    #[serde(default)]
    pub total_wins: u32,
    /// 1-based theme index
    #[serde(default = "default_theme")]
    pub theme: u8,
}

fn default_theme() -> u8 {
    Theme::default().index()
}

impl Default for CollectionRecord {
    fn default() -> Self {
        Self {
            collection: BTreeMap::new(),
            total_wins: 0,
            theme: default_theme(),
        }
    }
}

/// Collection browser row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionSlot {
    pub entry: CatalogEntry,
    pub owned: bool,
    pub count: u32,
}

impl CollectionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one win of `entry`. Returns the new count for its id.
    pub fn add(&mut self, entry: &CatalogEntry) -> u32 {
        let slot = self
            .collection
            .entry(entry.id.clone())
            .or_insert_with(|| CollectionEntry {
                entry: entry.clone(),
                count: 0,
            });
        slot.count += 1;
        self.total_wins += 1;
        slot.count
    }

    pub fn count(&self, id: &str) -> u32 {
        self.collection.get(id).map(|e| e.count).unwrap_or(0)
    }

    pub fn owns(&self, id: &str) -> bool {
        self.count(id) > 0
    }

    /// Number of distinct ids owned
    pub fn owned_count(&self) -> usize {
        self.collection.len()
    }

    pub fn theme(&self) -> Theme {
        Theme::from_index(self.theme).unwrap_or_default()
    }

    /// Advance to the next theme, returning it
    pub fn cycle_theme(&mut self) -> Theme {
        let next = self.theme().next();
        self.theme = next.index();
        next
    }

    /// One row per distinct catalog id, in catalog order
    pub fn browse(&self, catalog: &Catalog) -> Vec<CollectionSlot> {
        catalog
            .distinct()
            .into_iter()
            .map(|entry| {
                let count = self.count(&entry.id);
                CollectionSlot {
                    entry: entry.clone(),
                    owned: count > 0,
                    count,
                }
            })
            .collect()
    }

    /// (owned, total, percent) for the browser header
    pub fn progress(&self, catalog: &Catalog) -> (usize, usize, u32) {
        let total = catalog.distinct().len();
        let owned = catalog
            .distinct()
            .iter()
            .filter(|e| self.owns(&e.id))
            .count();
        let percent = if total == 0 {
            0
        } else {
            (owned as f32 / total as f32 * 100.0).round() as u32
        };
        (owned, total, percent)
    }

    /// Restore the ledger invariants after loading untrusted data
    ///
    /// Zero-count entries are dropped, total-wins is recomputed from the counts
    /// and an unknown theme falls back to the default. Returns true if anything
    /// was changed.
    pub fn sanitize(&mut self) -> bool {
        let before = self.collection.len();
        self.collection.retain(|_, e| e.count > 0);
        let mut changed = self.collection.len() != before;

        let sum: u32 = self.collection.values().map(|e| e.count).sum();
        if sum != self.total_wins {
            self.total_wins = sum;
            changed = true;
        }
        if Theme::from_index(self.theme).is_none() {
            self.theme = default_theme();
            changed = true;
        }
        changed
    }
}
