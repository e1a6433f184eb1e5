//! Persistent store adapter.
//!
//! A [`KeyValueStorage`] is a durable string-keyed medium scoped to one
//! origin (one visitor), the server-side counterpart of a browser's local
//! storage. [`PersistentStore`] layers typed, whole-collection JSON
//! load/save on top of it and knows nothing about cart semantics.
//!
//! # Layout
//!
//! ```text
//! cart        [{ "name": "...", "price": 60, "image": "...", "quantity": 2 }]
//! likedItems  [{ "name": "...", "price": 40, "image": "..." }]
//! ```

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Storage slot holding the cart collection.
pub const CART_KEY: &str = "cart";

/// Storage slot holding the liked-items collection.
pub const LIKED_ITEMS_KEY: &str = "likedItems";

/// Errors raised by a storage medium.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the medium failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A collection could not be serialized.
    #[error("failed to encode {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The key (or origin) is not a safe slot name.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// A synchronous, string-keyed durable medium.
pub trait KeyValueStorage {
    /// Read a slot. `Ok(None)` when the slot was never written.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the contents of a slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be written.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a slot. Deleting an absent slot is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be written.
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;

    /// Names of all written slots, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be listed.
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// Slot names are restricted to `[A-Za-z0-9_-]` so they are safe file names.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

/// Typed full-snapshot persistence of named collections.
#[derive(Debug)]
pub struct PersistentStore<S> {
    storage: S,
}

impl<S: KeyValueStorage> PersistentStore<S> {
    /// Wrap a storage medium.
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Load the collection stored under `key`.
    ///
    /// Fails open: an absent slot, an unreadable medium or malformed content
    /// all yield an empty collection.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let raw = match self.storage.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(key, error = %e, "Could not read stored collection");
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(key, error = %e, "Discarding malformed stored collection");
            Vec::new()
        })
    }

    /// Replace the collection stored under `key` with `records`.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or the medium rejects the write.
    pub fn save<T: Serialize>(&mut self, key: &str, records: &[T]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(records).map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.storage.set_item(key, &raw)
    }

    /// Borrow the underlying medium.
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Unwrap the underlying medium.
    pub fn into_inner(self) -> S {
        self.storage
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use edairy_core::{Cart, CartLineItem, LikedItem, Price, ProductRef, Quantity};

    use super::*;

    fn milk_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add_item(
            ProductRef::new("Organic Milk", Price::from_rupees(60), "/static/images/product-3.jpg"),
            Quantity::new(2).unwrap(),
        );
        cart.add_item(
            ProductRef::new("Fresh Curd", Price::coerce("40.5"), "/static/images/product-5.jpg"),
            Quantity::ONE,
        );
        cart
    }

    #[test]
    fn test_save_then_load_reproduces_cart() {
        let mut store = PersistentStore::new(MemoryStorage::new());
        let cart = milk_cart();

        store.save(CART_KEY, cart.lines()).unwrap();
        let loaded: Vec<CartLineItem> = store.load(CART_KEY);

        assert_eq!(loaded, cart.lines());
    }

    #[test]
    fn test_save_then_load_empty_collection() {
        let mut store = PersistentStore::new(MemoryStorage::new());
        store.save::<LikedItem>(LIKED_ITEMS_KEY, &[]).unwrap();

        assert_eq!(store.storage().get_item(LIKED_ITEMS_KEY).unwrap().as_deref(), Some("[]"));
        assert!(store.load::<LikedItem>(LIKED_ITEMS_KEY).is_empty());
    }

    #[test]
    fn test_absent_slot_loads_empty() {
        let store = PersistentStore::new(MemoryStorage::new());
        assert!(store.load::<CartLineItem>(CART_KEY).is_empty());
    }

    #[test]
    fn test_malformed_slot_loads_empty() {
        for raw in ["not json", "{\"name\":\"x\"}", "null", "[{\"price\":1}]", "[1,2]"] {
            let mut storage = MemoryStorage::new();
            storage.set_item(CART_KEY, raw).unwrap();
            let store = PersistentStore::new(storage);
            assert!(store.load::<CartLineItem>(CART_KEY).is_empty(), "input: {raw}");
        }
    }

    #[test]
    fn test_save_replaces_previous_snapshot() {
        let mut store = PersistentStore::new(MemoryStorage::new());
        store.save(CART_KEY, milk_cart().lines()).unwrap();
        store.save::<CartLineItem>(CART_KEY, &[]).unwrap();

        assert!(store.load::<CartLineItem>(CART_KEY).is_empty());
    }

    #[test]
    fn test_reads_records_written_by_other_clients() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(
                CART_KEY,
                r#"[{"name":"Pure Ghee","price":"700","image":"g.jpg","quantity":"3"}]"#,
            )
            .unwrap();
        let store = PersistentStore::new(storage);

        let loaded: Vec<CartLineItem> = store.load(CART_KEY);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].price, Price::from_rupees(700));
        assert_eq!(loaded[0].quantity.get(), 3);
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("likedItems").is_ok());
        assert!(validate_key("cart").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("../etc").is_err());
        assert!(validate_key("a/b").is_err());
    }
}
