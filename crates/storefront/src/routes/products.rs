//! Product route handlers.
//!
//! Search and category filters swap the product grid. Cards keep the
//! visitor's like state. A card can also be opened in the preview pane,
//! added to the cart from there, or shared.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use edairy_core::Quantity;
use serde::Deserialize;
use tracing::instrument;

use super::{SurfaceUpdate, dispatch_home};
use super::home::ProductCard;
use crate::catalog::{CategoryFilter, PREVIEW_DESCRIPTION, Product};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::Visitor;
use crate::notice::Notice;
use crate::session::Command;
use crate::state::AppState;

/// Element the product preview is rendered into.
pub const PREVIEW_ID: &str = "product-preview";

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Product grid fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub cards: Vec<ProductCard>,
}

/// Product preview fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_preview.html")]
pub struct ProductPreviewTemplate {
    pub card: ProductCard,
    pub description: &'static str,
}

/// Share panel fragment template.
#[derive(Template)]
#[template(path = "partials/share_panel.html")]
pub struct SharePanelTemplate {
    pub name: String,
    pub text: String,
    pub url: String,
}

async fn home_document(state: &AppState, visitor: uuid::Uuid) -> Result<crate::render::Document> {
    state
        .with_session(visitor, state.home_document(), |session| {
            session.document().clone()
        })
        .await
}

async fn grid(state: &AppState, visitor: uuid::Uuid, products: Vec<&Product>) -> Result<ProductGridTemplate> {
    let document = home_document(state, visitor).await?;

    Ok(ProductGridTemplate {
        cards: ProductCard::all(products, &document),
    })
}

fn product<'a>(state: &'a AppState, handle: &str) -> Result<&'a Product> {
    state
        .catalog()
        .by_handle(handle)
        .ok_or_else(|| AppError::NotFound(format!("product {handle}")))
}

/// Product grid filtered by a case-insensitive name match.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Visitor(visitor): Visitor,
    Query(query): Query<SearchQuery>,
) -> Result<ProductGridTemplate> {
    let products = state.catalog().search(&query.q);
    tracing::debug!(term = %query.q, matches = products.len(), "Product search");
    grid(&state, visitor, products).await
}

/// Product grid filtered by category. `all` shows everything.
#[instrument(skip(state))]
pub async fn filter(
    State(state): State<AppState>,
    Visitor(visitor): Visitor,
    Path(category): Path<String>,
) -> Result<ProductGridTemplate> {
    let filter = CategoryFilter::parse(&category);
    let products = state.catalog().filter(&filter);
    grid(&state, visitor, products).await
}

/// "Shop now" on a category banner.
#[instrument]
pub async fn browse(Path(category): Path<String>) -> SurfaceUpdate {
    let category = CategoryFilter::parse(&category);
    SurfaceUpdate::notice(Notice::success(format!(
        "Browsing {} products!",
        category.label()
    )))
}

/// Product preview: details, discount, rating and description.
#[instrument(skip(state))]
pub async fn preview(
    State(state): State<AppState>,
    Visitor(visitor): Visitor,
    Path(handle): Path<String>,
) -> Result<ProductPreviewTemplate> {
    let product = product(&state, &handle)?;
    let document = home_document(&state, visitor).await?;

    Ok(ProductPreviewTemplate {
        card: ProductCard::new(product, &document),
        description: PREVIEW_DESCRIPTION,
    })
}

/// Add one unit of a previewed product to the cart and close the preview.
#[instrument(skip(state))]
pub async fn add_from_preview(
    State(state): State<AppState>,
    Visitor(visitor): Visitor,
    Path(handle): Path<String>,
) -> Result<SurfaceUpdate> {
    let product = product(&state, &handle)?.to_ref();

    add_breadcrumb("cart", "Added to cart", Some(&[("product", product.name.as_str())]));
    let command = Command::AddToCart {
        product,
        quantity: Quantity::ONE,
    };
    Ok(dispatch_home(&state, visitor, command)
        .await?
        .with_fragment(PREVIEW_ID, String::new()))
}

/// Share a product: show its share text and link in the preview pane.
///
/// The link is the page the visitor shared from (`HX-Current-URL`), else the
/// storefront root.
#[instrument(skip(state, headers))]
pub async fn share(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    headers: HeaderMap,
) -> Result<SurfaceUpdate> {
    let product = product(&state, &handle)?;
    let url = headers
        .get("HX-Current-URL")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("/")
        .to_string();

    let panel = SharePanelTemplate {
        name: product.name.clone(),
        text: product.share_text(),
        url,
    }
    .render()
    .map_err(|e| AppError::Internal(format!("share panel render failed: {e}")))?;

    Ok(SurfaceUpdate::notice(Notice::success(format!(
        "{} link ready to share!",
        product.name
    )))
    .with_fragment(PREVIEW_ID, panel))
}

/// Close the preview pane.
pub async fn close_preview() -> SurfaceUpdate {
    SurfaceUpdate::default().with_fragment(PREVIEW_ID, String::new())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::render::Document;

    #[test]
    fn test_preview_shows_discount_and_description() {
        let catalog = Catalog::dairy();
        let butter = catalog.by_handle("pure-butter").unwrap();
        let document = Document::home(catalog.products().iter().map(Product::to_ref));

        let html = ProductPreviewTemplate {
            card: ProductCard::new(butter, &document),
            description: PREVIEW_DESCRIPTION,
        }
        .render()
        .unwrap();

        assert!(html.contains("Pure Butter"));
        assert!(html.contains("-8%"));
        assert!(html.contains("₹350"));
        assert!(html.contains("carefully selected for quality and taste"));
        assert!(html.contains(r#"hx-post="/products/pure-butter/add""#));
        assert!(html.contains(r#"hx-post="/products/pure-butter/share""#));
    }

    #[test]
    fn test_share_panel_carries_text_and_link() {
        let html = SharePanelTemplate {
            name: "Fresh Curd".to_string(),
            text: "Check out this amazing product: Fresh Curd for ₹40 at eDairy!".to_string(),
            url: "http://localhost:3000/".to_string(),
        }
        .render()
        .unwrap();

        assert!(html.contains("Fresh Curd for ₹40 at eDairy!"));
        assert!(html.contains(r#"id="share-link""#));
        assert!(html.contains("localhost:3000"));
    }
}
