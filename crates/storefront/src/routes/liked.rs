//! Liked items route handlers (HTMX).

use axum::{Form, extract::State};
use edairy_core::{Price, ProductRef};
use serde::Deserialize;
use tracing::instrument;

use super::{SurfaceUpdate, dispatch_home};
use crate::error::{AppError, Result};
use crate::middleware::Visitor;
use crate::session::Command;
use crate::state::AppState;

/// Like toggle form data, as carried by a card's like icon.
#[derive(Debug, Deserialize)]
pub struct ToggleLikeForm {
    pub name: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub image: String,
}

/// A liked item named by a sidebar control.
#[derive(Debug, Deserialize)]
pub struct LikedItemForm {
    pub name: String,
}

fn required_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("product name is required".to_string()));
    }
    Ok(name.to_string())
}

/// Like or unlike a product.
#[instrument(skip(state))]
pub async fn toggle(
    State(state): State<AppState>,
    Visitor(visitor): Visitor,
    Form(form): Form<ToggleLikeForm>,
) -> Result<SurfaceUpdate> {
    let product = ProductRef::new(
        required_name(&form.name)?,
        Price::coerce(&form.price),
        form.image.trim(),
    );
    dispatch_home(&state, visitor, Command::ToggleLike { product }).await
}

/// Unlike a product by name. Resets its card icon.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Visitor(visitor): Visitor,
    Form(form): Form<LikedItemForm>,
) -> Result<SurfaceUpdate> {
    let name = required_name(&form.name)?;
    dispatch_home(&state, visitor, Command::RemoveLiked { name }).await
}

/// Unlike everything. Resets every card icon.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>, Visitor(visitor): Visitor) -> Result<SurfaceUpdate> {
    dispatch_home(&state, visitor, Command::ClearLiked).await
}

/// Add one unit of a liked item to the cart. The item stays liked.
#[instrument(skip(state))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Visitor(visitor): Visitor,
    Form(form): Form<LikedItemForm>,
) -> Result<SurfaceUpdate> {
    let name = required_name(&form.name)?;
    dispatch_home(&state, visitor, Command::AddLikedToCart { name }).await
}
