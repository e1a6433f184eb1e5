//! Render synchronizer: turns cart and liked-set state into page content.
//!
//! [`RenderSynchronizer::sync`] is the only writer of display surfaces. It
//! runs once when a session opens and after every mutation, rewriting every
//! surface the [`Document`] exposes from the current models. Rendering is a
//! pure function of state, so repeated syncs are idempotent.

mod document;

pub use document::{Anchor, Document, Fragment, LikeIcon, like_icon_id};

use askama::Template;
use edairy_core::{Cart, LikedSet, ProductRef, compute_totals};

// =============================================================================
// View Types
// =============================================================================

/// A cart sidebar row. Controls address the line by position.
pub struct CartRow {
    pub position: usize,
    pub name: String,
    pub image: String,
    pub price: String,
    pub quantity: u32,
}

/// A liked sidebar row. Controls address the item by name.
pub struct LikedRow {
    pub name: String,
    pub image: String,
    pub price: String,
    /// `hx-vals` payload naming the item.
    pub vals: String,
}

/// A checkout order summary row.
pub struct OrderRow {
    pub name: String,
    pub image: String,
    pub price: String,
    pub quantity: u32,
}

// =============================================================================
// Templates
// =============================================================================

#[derive(Template)]
#[template(path = "partials/cart_items.html")]
struct CartItemsTemplate {
    rows: Vec<CartRow>,
}

#[derive(Template)]
#[template(path = "partials/liked_items.html")]
struct LikedItemsTemplate {
    rows: Vec<LikedRow>,
}

#[derive(Template)]
#[template(path = "partials/order_items.html")]
struct OrderItemsTemplate {
    rows: Vec<OrderRow>,
}

#[derive(Template)]
#[template(path = "partials/like_icon.html")]
struct LikeIconTemplate<'a> {
    name: &'a str,
    liked: bool,
    vals: String,
}

fn name_vals(name: &str) -> String {
    serde_json::json!({ "name": name }).to_string()
}

fn product_vals(product: &ProductRef) -> String {
    serde_json::to_string(product).unwrap_or_else(|_| name_vals(&product.name))
}

// =============================================================================
// Synchronizer
// =============================================================================

/// Rewrites every display surface from model state.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderSynchronizer;

impl RenderSynchronizer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Bring every surface of `document` in line with `cart` and `liked`.
    pub fn sync(&self, cart: &Cart, liked: &LikedSet, document: &mut Document) {
        Self::sync_cart(cart, document);
        Self::sync_liked(liked, document);
        Self::sync_order_summary(cart, document);
        Self::sync_like_icons(liked, document);
    }

    fn sync_cart(cart: &Cart, document: &mut Document) {
        document.fill(Anchor::CartCount, cart.item_count().to_string());
        document.fill(Anchor::CartTotal, cart.subtotal().display());

        if document.has_anchor(Anchor::CartItems) {
            let rows = cart
                .lines()
                .iter()
                .enumerate()
                .map(|(position, line)| CartRow {
                    position,
                    name: line.name.clone(),
                    image: line.image.clone(),
                    price: line.price.display(),
                    quantity: line.quantity.get(),
                })
                .collect();
            render_into(document, Anchor::CartItems, &CartItemsTemplate { rows });
        }
    }

    fn sync_liked(liked: &LikedSet, document: &mut Document) {
        document.fill(Anchor::LikedCount, liked.count().to_string());
        document.fill(Anchor::LikedTotal, liked.count().to_string());

        if document.has_anchor(Anchor::LikedItems) {
            let rows = liked
                .items()
                .iter()
                .map(|item| LikedRow {
                    name: item.name.clone(),
                    image: item.image.clone(),
                    price: item.price.display(),
                    vals: name_vals(&item.name),
                })
                .collect();
            render_into(document, Anchor::LikedItems, &LikedItemsTemplate { rows });
        }
    }

    fn sync_order_summary(cart: &Cart, document: &mut Document) {
        if document.has_anchor(Anchor::OrderItems) {
            let rows = cart
                .lines()
                .iter()
                .map(|line| OrderRow {
                    name: line.name.clone(),
                    image: line.image.clone(),
                    price: line.price.display(),
                    quantity: line.quantity.get(),
                })
                .collect();
            render_into(document, Anchor::OrderItems, &OrderItemsTemplate { rows });
        }

        let totals = compute_totals(cart.lines());
        document.fill(Anchor::Subtotal, totals.subtotal.display());
        let delivery = if totals.free_delivery() {
            "Free".to_string()
        } else {
            totals.delivery.display()
        };
        document.fill(Anchor::Delivery, delivery);
        document.fill(Anchor::Tax, totals.tax.display());
        document.fill(Anchor::Total, totals.total.display());
    }

    /// Reconcile every card icon with liked-set membership, whichever
    /// surface caused the change.
    fn sync_like_icons(liked: &LikedSet, document: &mut Document) {
        let icons: Vec<(String, String)> = document
            .like_icons()
            .map(|icon| (icon.product.name.clone(), product_vals(&icon.product)))
            .collect();

        for (name, vals) in icons {
            let is_liked = liked.contains(&name);
            let template = LikeIconTemplate {
                name: &name,
                liked: is_liked,
                vals,
            };
            match template.render() {
                Ok(html) => {
                    document.set_like_icon(&name, is_liked, html);
                }
                Err(e) => tracing::warn!(product = %name, error = %e, "Failed to render like icon"),
            }
        }
    }
}

/// Render `template` into `anchor`, leaving the slot untouched on failure.
fn render_into(document: &mut Document, anchor: Anchor, template: &impl Template) {
    match template.render() {
        Ok(html) => {
            document.fill(anchor, html);
        }
        Err(e) => tracing::warn!(anchor = anchor.id(), error = %e, "Failed to render surface"),
    }
}
