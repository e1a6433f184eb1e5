//! Anonymous visitor identity.
//!
//! Each browser session gets a UUID the first time it is seen. The UUID names
//! the visitor's storage directory, so it plays the role of a storage origin.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;
use uuid::Uuid;

use crate::error::{AppError, set_sentry_visitor};

/// Session key holding the visitor ID.
pub const VISITOR_ID_KEY: &str = "visitor_id";

/// Extractor yielding the current visitor's ID, assigning one if needed.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(Visitor(visitor): Visitor) -> impl IntoResponse {
///     format!("Hello, visitor {visitor}!")
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visitor(pub Uuid);

impl<S> FromRequestParts<S> for Visitor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let visitor = match session.get::<Uuid>(VISITOR_ID_KEY).await? {
            Some(id) => id,
            None => {
                let id = Uuid::new_v4();
                session.insert(VISITOR_ID_KEY, id).await?;
                tracing::debug!(visitor = %id, "New visitor");
                id
            }
        };

        set_sentry_visitor(&visitor);
        Ok(Self(visitor))
    }
}
