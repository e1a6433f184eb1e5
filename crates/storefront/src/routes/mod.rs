//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Home page (products, sidebars, header counts)
//! GET  /health                  - Health check
//!
//! # Products (HTMX fragments)
//! GET  /products/search?q=      - Product grid filtered by name
//! GET  /products/filter/{cat}   - Product grid filtered by category
//! POST /products/browse/{cat}   - "Shop now" notice
//! GET  /products/{handle}       - Product preview
//! POST /products/{handle}/add   - Add one unit from the preview
//! POST /products/{handle}/share - Share panel
//! POST /products/preview/close  - Close the preview
//!
//! # Cart (HTMX out-of-band updates)
//! POST /cart/add                - Add product (name, price, image, quantity)
//! POST /cart/adjust             - Adjust line quantity (position, delta)
//! POST /cart/remove             - Remove line (position)
//! POST /cart/checkout           - Go to checkout, unless the cart is empty
//!
//! # Liked items (HTMX out-of-band updates)
//! POST /liked/toggle            - Like or unlike a product
//! POST /liked/remove            - Unlike by name
//! POST /liked/clear             - Unlike everything
//! POST /liked/add-to-cart       - Add a liked item to the cart
//!
//! # Checkout
//! GET  /checkout                - Checkout page with order summary
//! POST /checkout                - Place order
//! GET  /checkout/complete       - Back to the shop after an order
//!
//! # Misc
//! POST /panel/{action}          - Login panel fragment
//! POST /contact                 - Contact form
//! POST /newsletter              - Newsletter signup
//! ```
//!
//! Mutations respond with a [`SurfaceUpdate`]: every re-rendered surface as an
//! out-of-band swap, plus any notices appended to the toast stack.

pub mod cart;
pub mod checkout;
pub mod home;
pub mod liked;
pub mod misc;
pub mod products;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    routing::{get, post},
};

use crate::notice::Notice;
use crate::render::Fragment;
use crate::session::{Command, ShopSession};
use crate::state::AppState;
use crate::storage::KeyValueStorage;

/// Out-of-band surface swaps and toasts (for HTMX).
#[derive(Debug, Default, Template, WebTemplate)]
#[template(path = "partials/update.html")]
pub struct SurfaceUpdate {
    pub fragments: Vec<Fragment>,
    pub notices: Vec<Notice>,
}

impl SurfaceUpdate {
    /// Every surface of the session's page plus its queued notices.
    pub fn from_session<S: KeyValueStorage>(session: &mut ShopSession<S>) -> Self {
        Self {
            fragments: session.document().fragments(),
            notices: session.take_notices(),
        }
    }

    /// Only notices, no surface changes.
    #[must_use]
    pub fn notice(notice: Notice) -> Self {
        Self {
            fragments: Vec::new(),
            notices: vec![notice],
        }
    }

    /// Also replace the content of element `id`.
    #[must_use]
    pub fn with_fragment(mut self, id: impl Into<String>, html: String) -> Self {
        self.fragments.push(Fragment {
            id: id.into(),
            html,
        });
        self
    }
}

/// Run `command` against the visitor's home-page session.
pub(crate) async fn dispatch_home(
    state: &AppState,
    visitor: uuid::Uuid,
    command: Command,
) -> crate::error::Result<SurfaceUpdate> {
    state
        .with_session(visitor, state.home_document(), move |session| {
            session.dispatch(command);
            SurfaceUpdate::from_session(session)
        })
        .await
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(products::search))
        .route("/filter/{category}", get(products::filter))
        .route("/browse/{category}", post(products::browse))
        .route("/preview/close", post(products::close_preview))
        .route("/{handle}", get(products::preview))
        .route("/{handle}/add", post(products::add_from_preview))
        .route("/{handle}/share", post(products::share))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(cart::add))
        .route("/adjust", post(cart::adjust))
        .route("/remove", post(cart::remove))
        .route("/checkout", post(cart::checkout))
}

/// Create the liked items routes router.
pub fn liked_routes() -> Router<AppState> {
    Router::new()
        .route("/toggle", post(liked::toggle))
        .route("/remove", post(liked::remove))
        .route("/clear", post(liked::clear))
        .route("/add-to-cart", post(liked::add_to_cart))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/liked", liked_routes())
        .route("/checkout", get(checkout::show).post(checkout::place_order))
        .route("/checkout/complete", get(checkout::complete))
        .route("/panel/{action}", post(misc::panel))
        .route("/contact", post(misc::contact))
        .route("/newsletter", post(misc::newsletter))
        .fallback(not_found)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

async fn not_found(uri: axum::http::Uri) -> crate::error::AppError {
    crate::error::AppError::NotFound(uri.path().to_string())
}
