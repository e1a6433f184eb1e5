//! Checkout route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse},
};
use tracing::instrument;

use super::SurfaceUpdate;
use super::home::PageSurfaces;
use crate::checkout::{CheckoutError, CheckoutForm};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::Visitor;
use crate::notice::Notice;
use crate::panel::PanelState;
use crate::render::Document;
use crate::session::Command;
use crate::state::AppState;

/// Element holding the checkout form, replaced with a blank form after an
/// order is placed.
pub const CHECKOUT_FORM_ID: &str = "checkout-form";

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate {
    pub surfaces: PageSurfaces,
    pub panel: PanelState,
}

/// Blank checkout form after an order, sending the visitor back to the shop
/// after a short pause.
#[derive(Template)]
#[template(path = "partials/order_placed.html")]
pub struct OrderPlacedTemplate;

/// Display the checkout page with the order summary.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Visitor(visitor): Visitor) -> Result<CheckoutTemplate> {
    let document = state
        .with_session(visitor, Document::checkout(), |session| session.document().clone())
        .await?;

    Ok(CheckoutTemplate {
        surfaces: PageSurfaces::from(&document),
        panel: PanelState::Closed,
    })
}

/// Place an order (HTMX).
///
/// The form is validated first, then the cart. While an order is processing a
/// second submit from the same visitor is rejected. After the processing delay
/// the cart is cleared and the form is reset, and a few seconds later the page
/// returns to the shop.
#[instrument(skip(state, form))]
pub async fn place_order(
    State(state): State<AppState>,
    Visitor(visitor): Visitor,
    Form(form): Form<CheckoutForm>,
) -> Result<SurfaceUpdate> {
    let order = match form.validate() {
        Ok(order) => order,
        Err(e) => {
            tracing::debug!(field = ?e.field(), "Checkout form rejected");
            return Ok(rejected(&e));
        }
    };

    let _permit = match state.checkout_gate().begin(visitor) {
        Ok(permit) => permit,
        Err(e) => return Ok(rejected(&e)),
    };

    let is_empty = state
        .with_session(visitor, Document::new(), |session| session.cart().is_empty())
        .await?;
    if is_empty {
        return Ok(rejected(&CheckoutError::EmptyCart));
    }

    tokio::time::sleep(state.config().checkout_delay).await;

    // The cart may have been emptied elsewhere during the delay.
    let placed = state
        .with_session(visitor, Document::checkout(), |session| {
            if session.cart().is_empty() {
                return None;
            }
            let totals = session.totals();
            session.dispatch(Command::ClearCart);
            session.notify(Notice::success(format!(
                "🎉 Order placed successfully! Total: {}. Thank you for your purchase!",
                totals.total.display()
            )));
            session.notify(Notice::success(
                "📧 Order confirmation will be sent to your email shortly!",
            ));
            Some((totals, SurfaceUpdate::from_session(session)))
        })
        .await?;

    let Some((totals, update)) = placed else {
        return Ok(rejected(&CheckoutError::EmptyCart));
    };

    tracing::info!(
        visitor = %visitor,
        total = %totals.total,
        payment = ?order.payment,
        "Order placed"
    );
    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("total", totals.total.display().as_str())]),
    );

    let blank_form = OrderPlacedTemplate
        .render()
        .map_err(|e| AppError::Internal(format!("checkout form render failed: {e}")))?;
    Ok(update.with_fragment(CHECKOUT_FORM_ID, blank_form))
}

/// Return to the shop once an order has been placed (HTMX).
pub async fn complete() -> impl IntoResponse {
    AppendHeaders([("HX-Redirect", "/")])
}

fn rejected(error: &CheckoutError) -> SurfaceUpdate {
    SurfaceUpdate::notice(Notice::error(error.to_string()))
}
