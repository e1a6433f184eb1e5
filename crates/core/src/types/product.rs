//! Structured product references carried by storefront controls.

use serde::{Deserialize, Serialize};

use super::Price;

/// The identity, price and image of a product as seen by the cart.
///
/// Products are keyed by `name`: two references with the same name refer to
/// the same cart line or liked entry, whatever their price or image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductRef {
    pub name: String,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub image: String,
}

impl ProductRef {
    /// Create a product reference.
    pub fn new(name: impl Into<String>, price: Price, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price,
            image: image.into(),
        }
    }

    /// URL/DOM-safe handle derived from the name (`"Fresh Curd"` → `"fresh-curd"`).
    #[must_use]
    pub fn handle(&self) -> String {
        handle_for(&self.name)
    }
}

/// Derive a lower-case, dash-separated handle from a product name.
#[must_use]
pub fn handle_for(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}
