//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::catalog::{FILTER_CATEGORIES, Product};
use crate::error::Result;
use crate::filters;
use crate::middleware::Visitor;
use crate::panel::PanelState;
use crate::render::{Anchor, Document, like_icon_id};
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductCard {
    pub name: String,
    pub handle: String,
    pub image: String,
    pub price: String,
    pub mrp: Option<String>,
    pub discount: Option<u32>,
    pub rating: u8,
    /// `hx-vals` payload for the add-to-cart control.
    pub vals: String,
    pub like_id: String,
    /// Rendered like icon.
    pub like_icon: String,
}

impl ProductCard {
    /// Card for `product`, with its like icon as rendered in `document`.
    #[must_use]
    pub fn new(product: &Product, document: &Document) -> Self {
        let product_ref = product.to_ref();
        Self {
            name: product.name.clone(),
            handle: product.handle(),
            image: product.image.clone(),
            price: product.price.display(),
            mrp: product.mrp.map(|mrp| mrp.display()),
            discount: product.discount_percent(),
            rating: product.rating,
            vals: serde_json::to_string(&product_ref).unwrap_or_default(),
            like_id: like_icon_id(&product.name),
            like_icon: document.like_icon_html(&product.name).to_string(),
        }
    }

    /// Cards for `products`.
    #[must_use]
    pub fn all<'a>(products: impl IntoIterator<Item = &'a Product>, document: &Document) -> Vec<Self> {
        products
            .into_iter()
            .map(|product| Self::new(product, document))
            .collect()
    }
}

/// Rendered content of every page surface, for full-page templates.
#[derive(Clone, Default)]
pub struct PageSurfaces {
    pub cart_count: String,
    pub cart_items: String,
    pub cart_total: String,
    pub liked_count: String,
    pub liked_items: String,
    pub liked_total: String,
    pub order_items: String,
    pub subtotal: String,
    pub delivery: String,
    pub tax: String,
    pub total: String,
}

impl From<&Document> for PageSurfaces {
    fn from(document: &Document) -> Self {
        let slot = |anchor| document.slot(anchor).to_string();
        Self {
            cart_count: slot(Anchor::CartCount),
            cart_items: slot(Anchor::CartItems),
            cart_total: slot(Anchor::CartTotal),
            liked_count: slot(Anchor::LikedCount),
            liked_items: slot(Anchor::LikedItems),
            liked_total: slot(Anchor::LikedTotal),
            order_items: slot(Anchor::OrderItems),
            subtotal: slot(Anchor::Subtotal),
            delivery: slot(Anchor::Delivery),
            tax: slot(Anchor::Tax),
            total: slot(Anchor::Total),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub cards: Vec<ProductCard>,
    pub categories: &'static [&'static str],
    pub surfaces: PageSurfaces,
    pub panel: PanelState,
}

/// Display the home page.
///
/// Rehydrates the visitor's cart and liked items and renders every surface.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>, Visitor(visitor): Visitor) -> Result<HomeTemplate> {
    let document = state
        .with_session(visitor, state.home_document(), |session| {
            session.document().clone()
        })
        .await?;

    Ok(HomeTemplate {
        cards: ProductCard::all(state.catalog().products(), &document),
        categories: &FILTER_CATEGORIES,
        surfaces: PageSurfaces::from(&document),
        panel: PanelState::Closed,
    })
}
