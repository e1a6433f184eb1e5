//! Security headers middleware.
//!
//! Adds restrictive headers to every response. The only third-party origin
//! allowed is the htmx script CDN.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

/// Content Security Policy for storefront pages.
pub const CONTENT_SECURITY_POLICY: &str = "default-src 'none'; \
     script-src 'self' https://unpkg.com; \
     style-src 'self'; \
     font-src 'self'; \
     img-src 'self' data:; \
     connect-src 'self'; \
     frame-src 'none'; \
     object-src 'none'; \
     base-uri 'self'; \
     form-action 'self'; \
     frame-ancestors 'none'";

/// Deny every powerful browser feature the shop does not use.
const PERMISSIONS_POLICY: &str = "accelerometer=(), \
     camera=(), \
     display-capture=(), \
     geolocation=(), \
     gyroscope=(), \
     magnetometer=(), \
     microphone=(), \
     payment=(), \
     usb=()";

const SECURITY_HEADERS: [(&str, &str); 8] = [
    ("x-frame-options", "DENY"),
    ("x-content-type-options", "nosniff"),
    ("referrer-policy", "same-origin"),
    ("content-security-policy", CONTENT_SECURITY_POLICY),
    ("permissions-policy", PERMISSIONS_POLICY),
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-resource-policy", "same-origin"),
    ("x-dns-prefetch-control", "off"),
];

/// Add security headers to all responses.
///
/// Cart state changes with every request, so responses are also marked
/// `Cache-Control: no-store` unless a handler already chose a policy.
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    for (name, value) in SECURITY_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }

    headers
        .entry(axum::http::header::CACHE_CONTROL)
        .or_insert(HeaderValue::from_static("no-store, max-age=0"));

    response
}
