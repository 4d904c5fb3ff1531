//! Save/load for the collection record
//!
//! The core only needs `load` and `save`. Every failure is recovered here or
//! at the call site: a bad load yields an empty record, a bad save is logged
//! and dropped.

mod file;
#[cfg(target_arch = "wasm32")]
mod local;
mod memory;

pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStore;
pub use memory::MemoryStore;

use thiserror::Error;

use crate::collection::CollectionRecord;

/// Storage key / default file stem
pub const SAVE_KEY: &str = "clawSave3";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage unavailable")]
    Unavailable,
}

/// Opaque key-value style persistence for a single record
pub trait Persistence {
    /// `Ok(None)` when nothing has been saved yet
    fn load(&self) -> Result<Option<CollectionRecord>, PersistError>;
    fn save(&self, record: &CollectionRecord) -> Result<(), PersistError>;
}

impl<P: Persistence + ?Sized> Persistence for Box<P> {
    fn load(&self) -> Result<Option<CollectionRecord>, PersistError> {
        (**self).load()
    }

    fn save(&self, record: &CollectionRecord) -> Result<(), PersistError> {
        (**self).save(record)
    }
}

/// Load the record, falling back to an empty one on any failure
pub fn load_or_default<P: Persistence + ?Sized>(store: &P) -> CollectionRecord {
    match store.load() {
        Ok(Some(mut record)) => {
            if record.sanitize() {
                log::warn!("Saved collection was inconsistent, repaired");
            }
            log::info!(
                "Loaded collection: {} owned, {} wins",
                record.owned_count(),
                record.total_wins
            );
            record
        }
        Ok(None) => {
            log::info!("No saved collection found, starting fresh");
            CollectionRecord::default()
        }
        Err(e) => {
            log::warn!("Failed to load collection ({}), starting fresh", e);
            CollectionRecord::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogEntry, Rarity};

    #[test]
    fn test_load_or_default_on_corrupt() {
        let store = MemoryStore::with_raw("{not json");
        let record = load_or_default(&store);
        assert_eq!(record, CollectionRecord::default());
    }

    #[test]
    fn test_load_or_default_on_missing() {
        let store = MemoryStore::new();
        assert_eq!(load_or_default(&store), CollectionRecord::default());
    }

    #[test]
    fn test_load_or_default_sanitizes() {
        let store = MemoryStore::with_raw(
            r##"{"collection":{"cat":{"id":"cat","name":"Kitty","glyph":"🐱","color":"#fff","rarity":"common","count":2}},"totalWins":7,"theme":5}"##,
        );
        let record = load_or_default(&store);
        assert_eq!(record.total_wins, 2);
        assert_eq!(record.theme, 1);
    }

    #[test]
    fn test_boxed_store_roundtrip() {
        let store: Box<dyn Persistence> = Box::new(MemoryStore::new());
        let mut record = CollectionRecord::new();
        record.add(&CatalogEntry::new("fox", "Foxy", "🦊", "#f9c28c", Rarity::Rare));
        store.save(&record).unwrap();
        assert_eq!(load_or_default(&store), record);
    }
}
