//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Each handler turns the request into a [`Command`] for the visitor's shop
//! session and answers with the re-rendered surfaces.

use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use edairy_core::{Price, ProductRef, Quantity};
use serde::Deserialize;
use tracing::instrument;

use super::{SurfaceUpdate, dispatch_home};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::Visitor;
use crate::notice::Notice;
use crate::render::Document;
use crate::session::Command;
use crate::state::AppState;

/// Add to cart form data, as carried by a product card.
///
/// Price and quantity are taken as text and coerced: an unparseable price
/// becomes zero and an unparseable or non-positive quantity becomes one.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub name: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub quantity: String,
}

impl AddToCartForm {
    fn product(&self) -> Result<ProductRef> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest("product name is required".to_string()));
        }
        Ok(ProductRef::new(name, Price::coerce(&self.price), self.image.trim()))
    }
}

/// Adjust quantity form data.
#[derive(Debug, Deserialize)]
pub struct AdjustLineForm {
    pub position: usize,
    pub delta: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveLineForm {
    pub position: usize,
}

/// Add item to cart (HTMX).
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Visitor(visitor): Visitor,
    Form(form): Form<AddToCartForm>,
) -> Result<SurfaceUpdate> {
    let product = form.product()?;
    let quantity = Quantity::coerce(&form.quantity);

    add_breadcrumb("cart", "Added to cart", Some(&[("product", product.name.as_str())]));
    dispatch_home(&state, visitor, Command::AddToCart { product, quantity }).await
}

/// Change a cart line's quantity by a delta (HTMX).
///
/// A line reaching zero is removed.
#[instrument(skip(state))]
pub async fn adjust(
    State(state): State<AppState>,
    Visitor(visitor): Visitor,
    Form(form): Form<AdjustLineForm>,
) -> Result<SurfaceUpdate> {
    let command = Command::AdjustLine {
        position: form.position,
        delta: form.delta,
    };
    dispatch_home(&state, visitor, command).await
}

/// Remove a cart line (HTMX).
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Visitor(visitor): Visitor,
    Form(form): Form<RemoveLineForm>,
) -> Result<SurfaceUpdate> {
    let command = Command::RemoveLine {
        position: form.position,
    };
    dispatch_home(&state, visitor, command).await
}

/// Proceed to checkout (HTMX).
///
/// Redirects to the checkout page, or shows an error notice when the cart is
/// empty.
#[instrument(skip(state))]
pub async fn checkout(State(state): State<AppState>, Visitor(visitor): Visitor) -> Result<Response> {
    let is_empty = state
        .with_session(visitor, Document::new(), |session| session.cart().is_empty())
        .await?;

    if is_empty {
        return Ok(SurfaceUpdate::notice(Notice::error("Your cart is empty!")).into_response());
    }

    Ok((AppendHeaders([("HX-Redirect", "/checkout")]), ()).into_response())
}
