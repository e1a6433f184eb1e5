//! The shopping cart: an insertion-ordered list of line items unique by name.
//!
//! # Invariants
//!
//! - At most one line per product name.
//! - Every line has a quantity of at least one; a change that would take a
//!   line to zero or below removes it.
//! - Lines keep the position of their first add across quantity changes.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductRef, Quantity};

/// One (product, quantity) entry in the cart.
///
/// This is also the persisted record shape:
/// `{ "name", "price", "image", "quantity" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub name: String,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub quantity: Quantity,
}

impl CartLineItem {
    /// Create a line for `quantity` units of `product`.
    #[must_use]
    pub fn new(product: ProductRef, quantity: Quantity) -> Self {
        Self {
            name: product.name,
            price: product.price,
            image: product.image,
            quantity,
        }
    }

    /// Unit price × quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price * self.quantity
    }
}

/// Result of a quantity adjustment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Adjustment {
    /// The line now holds this quantity.
    Updated(Quantity),
    /// The quantity reached zero and the line was removed.
    Removed(CartLineItem),
    /// No such line.
    Missing,
}

/// The cart aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLineItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build a cart from stored lines.
    ///
    /// Lines sharing a name are merged into the first occurrence so a
    /// hand-edited or corrupted snapshot cannot break the uniqueness invariant.
    #[must_use]
    pub fn from_lines(lines: Vec<CartLineItem>) -> Self {
        let mut cart = Self::new();
        for line in lines {
            match cart.position(&line.name) {
                Some(pos) => {
                    if let Some(existing) = cart.lines.get_mut(pos) {
                        existing.quantity = existing.quantity.saturating_add(line.quantity);
                    }
                }
                None => cart.lines.push(line),
            }
        }
        cart
    }

    /// All lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLineItem] {
        &self.lines
    }

    /// The line for `name`, if any.
    #[must_use]
    pub fn line(&self, name: &str) -> Option<&CartLineItem> {
        self.lines.iter().find(|line| line.name == name)
    }

    /// The position of the line for `name`, if any.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.lines.iter().position(|line| line.name == name)
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add `quantity` units of `product`.
    ///
    /// Increments the existing line with the same name (keeping its stored
    /// price and image) or appends a new line. Returns the line's new quantity.
    pub fn add_item(&mut self, product: ProductRef, quantity: Quantity) -> Quantity {
        if let Some(existing) = self.lines.iter_mut().find(|l| l.name == product.name) {
            existing.quantity = existing.quantity.saturating_add(quantity);
            return existing.quantity;
        }

        self.lines.push(CartLineItem::new(product, quantity));
        quantity
    }

    /// Remove the line for `name`. No-op when absent.
    pub fn remove_item(&mut self, name: &str) -> Option<CartLineItem> {
        let pos = self.position(name)?;
        Some(self.lines.remove(pos))
    }

    /// Remove the line at `position`. No-op when out of range.
    pub fn remove_at(&mut self, position: usize) -> Option<CartLineItem> {
        (position < self.lines.len()).then(|| self.lines.remove(position))
    }

    /// Change the quantity of the line for `name` by `delta`.
    pub fn adjust_quantity(&mut self, name: &str, delta: i64) -> Adjustment {
        match self.position(name) {
            Some(pos) => self.adjust_at(pos, delta),
            None => Adjustment::Missing,
        }
    }

    /// Change the quantity of the line at `position` by `delta`.
    pub fn adjust_at(&mut self, position: usize, delta: i64) -> Adjustment {
        let Some(line) = self.lines.get_mut(position) else {
            return Adjustment::Missing;
        };

        match line.quantity.offset(delta) {
            Some(quantity) => {
                line.quantity = quantity;
                Adjustment::Updated(quantity)
            }
            None => Adjustment::Removed(self.lines.remove(position)),
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity.get())).sum()
    }

    /// Σ unit price × quantity.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.lines.iter().map(CartLineItem::line_total).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn product(name: &str, rupees: u32) -> ProductRef {
        ProductRef::new(name, Price::from_rupees(rupees), format!("images/{name}.jpg"))
    }

    fn qty(n: u32) -> Quantity {
        Quantity::new(n).unwrap()
    }

    #[test]
    fn test_repeated_adds_merge_into_one_line() {
        let mut cart = Cart::new();
        for n in [1, 2, 3, 4] {
            cart.add_item(product("Organic Milk", 60), qty(n));
        }

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.line("Organic Milk").unwrap().quantity.get(), 10);
    }

    #[test]
    fn test_add_keeps_first_price_and_image() {
        let mut cart = Cart::new();
        cart.add_item(product("Pure Ghee", 700), Quantity::ONE);
        cart.add_item(
            ProductRef::new("Pure Ghee", Price::from_rupees(1), "other.jpg"),
            Quantity::ONE,
        );

        let line = cart.line("Pure Ghee").unwrap();
        assert_eq!(line.price, Price::from_rupees(700));
        assert_eq!(line.image, "images/Pure Ghee.jpg");
    }

    #[test]
    fn test_insertion_order_survives_quantity_changes() {
        let mut cart = Cart::new();
        cart.add_item(product("Fresh Cheese", 450), Quantity::ONE);
        cart.add_item(product("Pure Butter", 320), Quantity::ONE);
        cart.add_item(product("Fresh Cheese", 450), qty(2));
        cart.adjust_quantity("Pure Butter", 4);

        let names: Vec<_> = cart.lines().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Fresh Cheese", "Pure Butter"]);
    }

    #[test]
    fn test_adjust_to_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add_item(product("Fresh Curd", 40), qty(3));

        let result = cart.adjust_quantity("Fresh Curd", -3);
        assert!(matches!(result, Adjustment::Removed(ref line) if line.name == "Fresh Curd"));
        assert!(cart.line("Fresh Curd").is_none());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_adjust_below_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add_item(product("Fresh Curd", 40), Quantity::ONE);
        cart.adjust_quantity("Fresh Curd", -5);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_adjust_updates_in_place() {
        let mut cart = Cart::new();
        cart.add_item(product("Almond Milk", 120), qty(2));
        assert_eq!(cart.adjust_at(0, 1), Adjustment::Updated(qty(3)));
        assert_eq!(cart.adjust_at(0, -1), Adjustment::Updated(qty(2)));
    }

    #[test]
    fn test_missing_lines_are_noops() {
        let mut cart = Cart::new();
        cart.add_item(product("Almond Milk", 120), Quantity::ONE);

        assert!(cart.remove_item("Nope").is_none());
        assert!(cart.remove_at(5).is_none());
        assert_eq!(cart.adjust_quantity("Nope", 1), Adjustment::Missing);
        assert_eq!(cart.adjust_at(9, -1), Adjustment::Missing);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_remove_by_position() {
        let mut cart = Cart::new();
        cart.add_item(product("Fresh Cheese", 450), Quantity::ONE);
        cart.add_item(product("Pure Butter", 320), Quantity::ONE);

        let removed = cart.remove_at(0).unwrap();
        assert_eq!(removed.name, "Fresh Cheese");
        assert_eq!(cart.lines()[0].name, "Pure Butter");
    }

    #[test]
    fn test_aggregates() {
        let mut cart = Cart::new();
        cart.add_item(product("Organic Milk", 60), qty(2));
        cart.add_item(product("Fresh Curd", 40), qty(3));
        cart.add_item(product("Free Sample", 0), qty(5));

        assert_eq!(cart.item_count(), 10);
        assert_eq!(cart.subtotal(), Price::from_rupees(240));
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_item(product("Organic Milk", 60), qty(2));
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.subtotal(), Price::ZERO);
    }

    #[test]
    fn test_from_lines_merges_duplicates() {
        let lines = vec![
            CartLineItem::new(product("Organic Milk", 60), qty(1)),
            CartLineItem::new(product("Fresh Curd", 40), qty(1)),
            CartLineItem::new(product("Organic Milk", 99), qty(2)),
        ];
        let cart = Cart::from_lines(lines);

        assert_eq!(cart.len(), 2);
        let milk = cart.line("Organic Milk").unwrap();
        assert_eq!(milk.quantity.get(), 3);
        assert_eq!(milk.price, Price::from_rupees(60));
    }

    #[test]
    fn test_serialized_record_shape() {
        let mut cart = Cart::new();
        cart.add_item(product("Organic Milk", 60), qty(2));

        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                { "name": "Organic Milk", "price": 60, "image": "images/Organic Milk.jpg", "quantity": 2 }
            ])
        );
    }

    #[test]
    fn test_record_with_missing_fields_is_coerced() {
        let line: CartLineItem = serde_json::from_str(r#"{"name":"Fresh Curd"}"#).unwrap();
        assert_eq!(line.price, Price::ZERO);
        assert_eq!(line.quantity, Quantity::ONE);
        assert!(line.image.is_empty());
    }
}
