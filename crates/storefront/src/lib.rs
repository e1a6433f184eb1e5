//! eDairy storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod notice;
pub mod panel;
pub mod render;
pub mod routes;
pub mod session;
pub mod state;
pub mod storage;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use state::AppState;

/// Directory of static assets served under `/static`.
pub const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Build the storefront application router with its middleware stack.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(middleware::request_id_middleware))
                .layer(axum::middleware::from_fn(middleware::security_headers_middleware))
                .layer(session_layer),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
