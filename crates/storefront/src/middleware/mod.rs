//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (CSP, frame and referrer policies)
//! 5. Session layer (tower-sessions with in-memory store)
//!
//! The [`Visitor`] extractor reads the visitor ID from the session.

pub mod request_id;
pub mod security_headers;
pub mod session;
pub mod visitor;

pub use request_id::{RequestId, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
pub use visitor::Visitor;
