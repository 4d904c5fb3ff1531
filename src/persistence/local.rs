use super::{PersistError, Persistence, SAVE_KEY};
use crate::collection::CollectionRecord;

/// Browser LocalStorage under a single key
#[derive(Debug, Clone)]
pub struct LocalStore {
    key: String,
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::new(SAVE_KEY)
    }
}

impl LocalStore {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
        }
    }

    fn storage() -> Result<web_sys::Storage, PersistError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(PersistError::Unavailable)
    }
}

impl Persistence for LocalStore {
    fn load(&self) -> Result<Option<CollectionRecord>, PersistError> {
        let storage = Self::storage()?;
        match storage.get_item(&self.key) {
            Ok(Some(json)) => Ok(Some(serde_json::from_str(&json)?)),
            Ok(None) => Ok(None),
            Err(_) => Err(PersistError::Unavailable),
        }
    }

    fn save(&self, record: &CollectionRecord) -> Result<(), PersistError> {
        let storage = Self::storage()?;
        let json = serde_json::to_string(record)?;
        storage
            .set_item(&self.key, &json)
            .map_err(|_| PersistError::Unavailable)
    }
}
