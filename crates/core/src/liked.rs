//! The liked-items set: favorites kept independently of the cart.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductRef};

/// A liked product. Persisted as `{ "name", "price", "image" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikedItem {
    pub name: String,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub image: String,
}

impl LikedItem {
    /// The product reference used to add this item to the cart.
    #[must_use]
    pub fn to_product(&self) -> ProductRef {
        ProductRef::new(self.name.clone(), self.price, self.image.clone())
    }
}

impl From<ProductRef> for LikedItem {
    fn from(product: ProductRef) -> Self {
        Self {
            name: product.name,
            price: product.price,
            image: product.image,
        }
    }
}

/// Insertion-ordered set of liked items, unique by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LikedSet {
    items: Vec<LikedItem>,
}

impl LikedSet {
    /// An empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a set from stored items; later duplicates of a name are dropped.
    #[must_use]
    pub fn from_items(items: Vec<LikedItem>) -> Self {
        let mut set = Self::new();
        for item in items {
            set.add(item);
        }
        set
    }

    /// All items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LikedItem] {
        &self.items
    }

    /// The item named `name`, if liked.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&LikedItem> {
        self.items.iter().find(|item| item.name == name)
    }

    /// Whether `name` is liked.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of liked items.
    #[must_use]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is liked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add an item. Returns `false` (and changes nothing, not even the
    /// stored price or image) when the name is already present.
    pub fn add(&mut self, item: LikedItem) -> bool {
        if self.contains(&item.name) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Remove the item named `name`. No-op when absent.
    pub fn remove(&mut self, name: &str) -> Option<LikedItem> {
        let pos = self.items.iter().position(|item| item.name == name)?;
        Some(self.items.remove(pos))
    }

    /// Flip membership of `product`; returns whether it is liked afterwards.
    pub fn toggle(&mut self, product: ProductRef) -> bool {
        if self.remove(&product.name).is_some() {
            return false;
        }
        self.items.push(product.into());
        true
    }

    /// Remove every item, returning what was removed.
    pub fn clear(&mut self) -> Vec<LikedItem> {
        std::mem::take(&mut self.items)
    }

    /// Sum of liked prices.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.items.iter().map(|item| item.price).sum()
    }
}
