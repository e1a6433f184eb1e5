//! In-memory storage, used by tests and tooling.

use std::collections::BTreeMap;

use super::{KeyValueStorage, StorageError};

/// A [`KeyValueStorage`] backed by a map. Nothing outlives the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: BTreeMap<String, String>,
}

impl MemoryStorage {
    /// An empty medium.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: BTreeMap::new(),
        }
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.slots.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.slots.keys().cloned().collect())
    }
}
