//! Visitor storage inspection and cleanup.
//!
//! Reads the same per-visitor slots the storefront writes, so records are
//! decoded with the storefront's lenient loader: a corrupt slot shows as
//! empty rather than failing the command.

use std::path::Path;

use tracing::info;

use edairy_core::{Cart, CartLineItem, LikedItem, LikedSet, OrderTotals, compute_totals};
use edairy_storefront::storage::{
    CART_KEY, FileStorage, KeyValueStorage, LIKED_ITEMS_KEY, PersistentStore,
};

/// Errors specific to storage commands.
#[derive(Debug, thiserror::Error)]
pub enum StorageCommandError {
    #[error("no stored data for visitor {0}")]
    UnknownVisitor(String),
}

/// Which slots `clear` empties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearTarget {
    Cart,
    Liked,
    Both,
}

impl ClearTarget {
    /// Target selected by the `--cart` / `--liked` flags. Neither means both.
    #[must_use]
    pub const fn from_flags(cart: bool, liked: bool) -> Self {
        match (cart, liked) {
            (true, false) => Self::Cart,
            (false, true) => Self::Liked,
            _ => Self::Both,
        }
    }
}

/// A visitor's stored state.
#[derive(Debug)]
pub struct VisitorSummary {
    pub cart: Cart,
    pub liked: LikedSet,
    pub totals: OrderTotals,
}

fn open_visitor(data_dir: &Path, visitor: &str) -> Result<FileStorage, Box<dyn std::error::Error>> {
    if !FileStorage::origins(data_dir)?.iter().any(|o| o == visitor) {
        return Err(StorageCommandError::UnknownVisitor(visitor.to_string()).into());
    }
    Ok(FileStorage::for_origin(data_dir, visitor)?)
}

/// Load a visitor's cart, liked items and order totals.
///
/// # Errors
///
/// Returns an error if the visitor has no storage directory.
pub fn summarize(data_dir: &Path, visitor: &str) -> Result<VisitorSummary, Box<dyn std::error::Error>> {
    let store = PersistentStore::new(open_visitor(data_dir, visitor)?);
    let cart = Cart::from_lines(store.load::<CartLineItem>(CART_KEY));
    let liked = LikedSet::from_items(store.load::<LikedItem>(LIKED_ITEMS_KEY));
    let totals = compute_totals(cart.lines());

    Ok(VisitorSummary {
        cart,
        liked,
        totals,
    })
}

/// List visitors with stored data.
///
/// # Errors
///
/// Returns an error if the storage root cannot be read.
pub fn list(data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let origins = FileStorage::origins(data_dir)?;
    info!(data_dir = %data_dir.display(), visitors = origins.len(), "Visitor storage");

    for origin in &origins {
        let storage = FileStorage::for_origin(data_dir, origin)?;
        let slots = storage.keys()?;
        info!(visitor = %origin, slots = ?slots, "Visitor");
    }
    Ok(())
}

/// Show a visitor's cart, liked items and order totals.
///
/// # Errors
///
/// Returns an error if the visitor has no storage directory.
pub fn show(data_dir: &Path, visitor: &str) -> Result<(), Box<dyn std::error::Error>> {
    let summary = summarize(data_dir, visitor)?;

    info!(visitor = %visitor, lines = summary.cart.len(), items = summary.cart.item_count(), "Cart");
    for line in summary.cart.lines() {
        info!(
            "  {} x{} @ {} = {}",
            line.name,
            line.quantity,
            line.price.display(),
            line.line_total().display()
        );
    }
    info!(
        subtotal = %summary.totals.subtotal.display(),
        delivery = %summary.totals.delivery.display(),
        tax = %summary.totals.tax.display(),
        total = %summary.totals.total.display(),
        "Order totals"
    );

    info!(count = summary.liked.count(), "Liked items");
    for item in summary.liked.items() {
        info!("  {} ({})", item.name, item.price.display());
    }
    Ok(())
}

/// Clear a visitor's stored cart and/or liked items.
///
/// # Errors
///
/// Returns an error if the visitor has no storage directory or a slot cannot
/// be removed.
pub fn clear(data_dir: &Path, visitor: &str, target: ClearTarget) -> Result<(), Box<dyn std::error::Error>> {
    let mut storage = open_visitor(data_dir, visitor)?;

    if matches!(target, ClearTarget::Cart | ClearTarget::Both) {
        storage.remove_item(CART_KEY)?;
    }
    if matches!(target, ClearTarget::Liked | ClearTarget::Both) {
        storage.remove_item(LIKED_ITEMS_KEY)?;
    }

    info!(visitor = %visitor, target = ?target, "Visitor storage cleared");
    Ok(())
}
