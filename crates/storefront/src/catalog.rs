//! The dairy product catalog, plus search and category filtering.
//!
//! The catalog is static. Product cards carry their identity, price and
//! image so the cart can be driven from card controls alone.

use edairy_core::{Price, ProductRef, handle_for};

/// A product shown on the storefront.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub name: String,
    pub price: Price,
    /// Maximum retail price, struck through on the card when present.
    pub mrp: Option<Price>,
    pub image: String,
    pub category: &'static str,
    /// Star rating out of five.
    pub rating: u8,
}

impl Product {
    fn new(name: &str, rupees: u32, mrp: Option<u32>, number: u8, category: &'static str, rating: u8) -> Self {
        Self {
            name: name.to_string(),
            price: Price::from_rupees(rupees),
            mrp: mrp.map(Price::from_rupees),
            image: format!("/static/images/product-{number}.jpg"),
            category,
            rating,
        }
    }

    /// DOM-safe handle for the card.
    #[must_use]
    pub fn handle(&self) -> String {
        handle_for(&self.name)
    }

    /// The reference carried by the card's cart and like controls.
    #[must_use]
    pub fn to_ref(&self) -> ProductRef {
        ProductRef::new(self.name.clone(), self.price, self.image.clone())
    }

    /// Text offered when the product is shared.
    #[must_use]
    pub fn share_text(&self) -> String {
        format!(
            "Check out this amazing product: {} for {} at eDairy!",
            self.name,
            self.price.display()
        )
    }

    /// Whole-percent discount off the MRP, if any.
    #[must_use]
    pub fn discount_percent(&self) -> Option<u32> {
        use rust_decimal::prelude::ToPrimitive;

        let mrp = self.mrp?.amount();
        if mrp <= self.price.amount() {
            return None;
        }
        let saved = (mrp - self.price.amount()) * rust_decimal::Decimal::ONE_HUNDRED / mrp;
        saved.floor().to_u32()
    }
}

/// Which products a category filter selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    /// Products whose name contains this (lower-cased) term.
    Named(String),
}

impl CategoryFilter {
    /// Parse a filter button value; `"all"` (any case) selects everything.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let value = value.trim().to_lowercase();
        if value == "all" {
            Self::All
        } else {
            Self::Named(value)
        }
    }

    /// Label for notices and the active filter button.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Named(term) => term,
        }
    }

    fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Named(term) => product.name.to_lowercase().contains(term.as_str()),
        }
    }
}

/// Description shown in every product preview.
pub const PREVIEW_DESCRIPTION: &str = "Fresh and pure dairy product, carefully selected for quality and taste. \
     Perfect for your daily needs and family consumption.";

/// Category buttons shown above the grid.
pub const FILTER_CATEGORIES: [&str; 6] = ["all", "cheese", "butter", "milk", "curd", "ghee"];

/// The product catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// The eDairy product range.
    #[must_use]
    pub fn dairy() -> Self {
        Self {
            products: vec![
                Product::new("Fresh Cheese", 450, Some(500), 1, "cheese", 5),
                Product::new("Pure Butter", 320, Some(350), 2, "butter", 4),
                Product::new("Organic Milk", 60, None, 3, "milk", 5),
                Product::new("Almond Milk", 120, Some(150), 4, "milk", 4),
                Product::new("Fresh Curd", 40, None, 5, "curd", 4),
                Product::new("Pure Ghee", 700, Some(800), 6, "ghee", 5),
            ],
        }
    }

    /// Build a catalog from explicit products.
    #[must_use]
    pub const fn from_products(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// All products in display order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by exact name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.name == name)
    }

    /// Look up a product by its card handle, e.g. `fresh-curd`.
    #[must_use]
    pub fn by_handle(&self, handle: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.handle() == handle)
    }

    /// Case-insensitive name substring search. A blank term matches everything.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<&Product> {
        let term = term.trim().to_lowercase();
        self.products
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&term))
            .collect()
    }

    /// Products selected by `filter`.
    #[must_use]
    pub fn filter(&self, filter: &CategoryFilter) -> Vec<&Product> {
        self.products.iter().filter(|p| filter.matches(p)).collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::dairy()
    }
}
