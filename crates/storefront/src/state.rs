//! Application state shared across handlers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::Mutex as AsyncMutex;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::checkout::CheckoutGate;
use crate::config::StorefrontConfig;
use crate::error::{AppError, Result};
use crate::render::Document;
use crate::session::ShopSession;
use crate::storage::FileStorage;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// configuration, the catalog, the checkout gate and the per-visitor session
/// locks.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    checkout_gate: CheckoutGate,
    session_locks: SessionLocks,
}

/// One lock per visitor. A session loads, mutates and saves the visitor's
/// whole state, so two sessions for the same visitor must not overlap.
#[derive(Debug, Default)]
struct SessionLocks {
    locks: Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>,
}

impl SessionLocks {
    /// The lock for `visitor`. Idle locks of other visitors are dropped.
    fn get(&self, visitor: Uuid) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.retain(|id, lock| *id == visitor || Arc::strong_count(lock) > 1);
        Arc::clone(locks.entry(visitor).or_default())
    }
}

impl AppState {
    /// Create a new application state serving the dairy catalog.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        Self::with_catalog(config, Catalog::dairy())
    }

    /// Create a new application state with an explicit catalog.
    #[must_use]
    pub fn with_catalog(config: StorefrontConfig, catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                checkout_gate: CheckoutGate::new(),
                session_locks: SessionLocks::default(),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the per-visitor checkout gate.
    #[must_use]
    pub fn checkout_gate(&self) -> &CheckoutGate {
        &self.inner.checkout_gate
    }

    /// The surfaces of the home page.
    #[must_use]
    pub fn home_document(&self) -> Document {
        Document::home(self.catalog().products().iter().map(|p| p.to_ref()))
    }

    /// Storage for `visitor`.
    ///
    /// # Errors
    ///
    /// Returns an error if the visitor ID is not a valid storage origin.
    pub fn visitor_storage(&self, visitor: Uuid) -> Result<FileStorage> {
        Ok(FileStorage::for_origin(
            &self.config().data_dir,
            &visitor.to_string(),
        )?)
    }

    /// Open the visitor's shop session over `document` and run `f` with it.
    ///
    /// Sessions for one visitor run one at a time: the visitor's lock is held
    /// from load to the last save. Storage is file-backed, so the session runs
    /// on the blocking pool.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be opened or the task panics.
    pub async fn with_session<F, T>(&self, visitor: Uuid, document: Document, f: F) -> Result<T>
    where
        F: FnOnce(&mut ShopSession<FileStorage>) -> T + Send + 'static,
        T: Send + 'static,
    {
        let storage = self.visitor_storage(visitor)?;
        let guard = self.inner.session_locks.get(visitor).lock_owned().await;
        tokio::task::spawn_blocking(move || {
            let _guard = guard;
            let mut session = ShopSession::open(storage, document);
            f(&mut session)
        })
        .await
        .map_err(|e| AppError::Internal(format!("shop session task failed: {e}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use edairy_core::{Price, ProductRef, Quantity};

    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_sessions_for_one_visitor_do_not_lose_updates() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(StorefrontConfig::for_data_dir(dir.path()));
        let visitor = Uuid::new_v4();

        let adds: Vec<_> = (0..20)
            .map(|_| {
                let state = state.clone();
                tokio::spawn(async move {
                    state
                        .with_session(visitor, Document::checkout(), |session| {
                            let milk = ProductRef::new("Organic Milk", Price::from_rupees(60), "milk.jpg");
                            session.add_item(milk, Quantity::ONE)
                        })
                        .await
                })
            })
            .collect();
        for add in adds {
            add.await.unwrap().unwrap();
        }

        let quantity = state
            .with_session(visitor, Document::checkout(), |session| {
                session.cart().line("Organic Milk").map(|line| line.quantity.get())
            })
            .await
            .unwrap();
        assert_eq!(quantity, Some(20));
    }

    #[test]
    fn test_idle_session_locks_are_dropped() {
        let locks = SessionLocks::default();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        let held = locks.get(a);
        drop(locks.get(b));
        locks.get(Uuid::new_v4());

        let map = locks.locks.lock().unwrap();
        assert!(map.contains_key(&a));
        assert!(!map.contains_key(&b));
        drop(held);
    }
}
