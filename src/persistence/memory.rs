use std::cell::RefCell;

use super::{PersistError, Persistence};
use crate::collection::CollectionRecord;

/// In-process store holding the serialized JSON, for tests and headless runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    json: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with raw (possibly corrupt) contents
    pub fn with_raw(json: &str) -> Self {
        Self {
            json: RefCell::new(Some(json.to_string())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.json.borrow().clone()
    }
}

impl Persistence for MemoryStore {
    fn load(&self) -> Result<Option<CollectionRecord>, PersistError> {
        match self.json.borrow().as_deref() {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    fn save(&self, record: &CollectionRecord) -> Result<(), PersistError> {
        let json = serde_json::to_string(record)?;
        *self.json.borrow_mut() = Some(json);
        Ok(())
    }
}
