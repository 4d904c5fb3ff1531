//! Outcome resolver
//!
//! Decides whether a grab holds, and commits wins to the collection record.

use rand::Rng;

use crate::catalog::CatalogEntry;
use crate::collection::CollectionRecord;
use crate::persistence::Persistence;
use crate::tuning::OutcomeTuning;

/// Success iff something was grabbed and `draw < probability`
#[inline]
pub fn decide_with_draw(has_grabbed_body: bool, draw: f32, probability: f32) -> bool {
    has_grabbed_body && draw < probability
}

/// Decide one attempt. No draw is taken when nothing was grabbed.
pub fn decide<R: Rng>(
    has_grabbed_body: bool,
    rigged: bool,
    tuning: &OutcomeTuning,
    rng: &mut R,
) -> bool {
    if !has_grabbed_body {
        return false;
    }
    let draw: f32 = rng.random();
    decide_with_draw(true, draw, tuning.probability(rigged))
}

/// Record a win and persist the ledger
///
/// Save failures are logged and dropped; the in-memory record is still updated.
pub fn commit_win<P: Persistence + ?Sized>(
    record: &mut CollectionRecord,
    entry: &CatalogEntry,
    store: &P,
) -> u32 {
    let count = record.add(entry);
    log::info!(
        "Won {} ({}), now x{} - {} total",
        entry.name,
        entry.rarity.as_str(),
        count,
        record.total_wins
    );
    if let Err(e) = store.save(record) {
        log::warn!("Failed to save collection: {}", e);
    }
    count
}
