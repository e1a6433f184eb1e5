//! A visitor's shop session: cart, liked set, persistence and rendering.
//!
//! [`ShopSession`] is the single owner of the visitor's state for the
//! duration of one request. Opening it rehydrates both collections from the
//! persistent store and renders the page once; every mutating operation then
//! saves the changed collection and re-renders before returning, so the
//! models, the store and the [`Document`] never drift apart.
//!
//! User actions arrive as [`Command`]s through [`ShopSession::dispatch`],
//! which also queues the toast [`Notice`]s each action raises.

use edairy_core::{
    Adjustment, Cart, CartLineItem, LikedItem, LikedSet, OrderTotals, ProductRef, Quantity,
    compute_totals,
};

use crate::notice::Notice;
use crate::render::{Document, RenderSynchronizer};
use crate::storage::{CART_KEY, KeyValueStorage, LIKED_ITEMS_KEY, PersistentStore};

/// A user action addressed to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add units of a product to the cart.
    AddToCart {
        product: ProductRef,
        quantity: Quantity,
    },
    /// Change the quantity of the cart line at `position`.
    AdjustLine { position: usize, delta: i64 },
    /// Remove the cart line at `position`.
    RemoveLine { position: usize },
    /// Flip whether a product is liked.
    ToggleLike { product: ProductRef },
    /// Remove a liked item by name.
    RemoveLiked { name: String },
    /// Remove every liked item.
    ClearLiked,
    /// Add one unit of a liked item to the cart. The item stays liked.
    AddLikedToCart { name: String },
    /// Empty the cart.
    ClearCart,
}

/// What a dispatched command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The cart line now holds this quantity.
    Added(Quantity),
    Adjusted(Adjustment),
    Removed(Option<CartLineItem>),
    /// Whether the product is liked after the toggle.
    Toggled(bool),
    Unliked(Option<LikedItem>),
    LikesCleared(usize),
    CartCleared,
    /// The command named something that does not exist.
    NotFound,
}

/// The visitor's cart and liked set, bound to storage and a rendered page.
#[derive(Debug)]
pub struct ShopSession<S> {
    cart: Cart,
    liked: LikedSet,
    store: PersistentStore<S>,
    renderer: RenderSynchronizer,
    document: Document,
    notices: Vec<Notice>,
}

impl<S: KeyValueStorage> ShopSession<S> {
    /// Rehydrate state from `storage` and render `document` once.
    ///
    /// Unreadable or malformed stored data is treated as empty.
    pub fn open(storage: S, document: Document) -> Self {
        let store = PersistentStore::new(storage);
        let cart = Cart::from_lines(store.load(CART_KEY));
        let liked = LikedSet::from_items(store.load(LIKED_ITEMS_KEY));

        let mut session = Self {
            cart,
            liked,
            store,
            renderer: RenderSynchronizer::new(),
            document,
            notices: Vec::new(),
        };
        session.render();
        session
    }

    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    pub const fn liked(&self) -> &LikedSet {
        &self.liked
    }

    /// The rendered page.
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// The underlying storage medium.
    pub const fn storage(&self) -> &S {
        self.store.storage()
    }

    /// Checkout totals for the current cart.
    #[must_use]
    pub fn totals(&self) -> OrderTotals {
        compute_totals(self.cart.lines())
    }

    /// Queue a notice for the visitor.
    pub fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    /// Drain queued notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // =========================================================================
    // Command Dispatch
    // =========================================================================

    /// Apply a user action, queueing the notices it raises.
    pub fn dispatch(&mut self, command: Command) -> Outcome {
        match command {
            Command::AddToCart { product, quantity } => {
                let name = product.name.clone();
                let quantity = self.add_item(product, quantity);
                self.notify(Notice::success(format!("{name} added to cart!")));
                Outcome::Added(quantity)
            }
            Command::AdjustLine { position, delta } => {
                let adjustment = self.adjust_line(position, delta);
                if matches!(adjustment, Adjustment::Removed(_)) {
                    self.notify(Notice::success("Item removed from cart"));
                }
                Outcome::Adjusted(adjustment)
            }
            Command::RemoveLine { position } => {
                let removed = self.remove_line(position);
                if removed.is_some() {
                    self.notify(Notice::success("Item removed from cart"));
                }
                Outcome::Removed(removed)
            }
            Command::ToggleLike { product } => {
                let name = product.name.clone();
                let liked = self.toggle_like(product);
                let message = if liked {
                    format!("{name} added to favorites!")
                } else {
                    format!("{name} removed from favorites!")
                };
                self.notify(Notice::success(message));
                Outcome::Toggled(liked)
            }
            Command::RemoveLiked { name } => {
                let removed = self.remove_liked(&name);
                if removed.is_some() {
                    self.notify(Notice::success(format!("{name} removed from favorites!")));
                }
                Outcome::Unliked(removed)
            }
            Command::ClearLiked => {
                let cleared = self.clear_liked();
                self.notify(Notice::success("All favorites cleared!"));
                Outcome::LikesCleared(cleared)
            }
            Command::AddLikedToCart { name } => match self.add_liked_to_cart(&name) {
                Some(quantity) => {
                    self.notify(Notice::success(format!("{name} added to cart!")));
                    Outcome::Added(quantity)
                }
                None => Outcome::NotFound,
            },
            Command::ClearCart => {
                self.clear_cart();
                Outcome::CartCleared
            }
        }
    }

    // =========================================================================
    // Cart Operations
    // =========================================================================

    /// Add `quantity` units of `product`; returns the line's new quantity.
    pub fn add_item(&mut self, product: ProductRef, quantity: Quantity) -> Quantity {
        let quantity = self.cart.add_item(product, quantity);
        self.commit_cart();
        quantity
    }

    /// Remove the line for `name`. Saves and re-renders even when absent.
    pub fn remove_item(&mut self, name: &str) -> Option<CartLineItem> {
        let removed = self.cart.remove_item(name);
        self.commit_cart();
        removed
    }

    /// Remove the line at `position`. Saves and re-renders even when absent.
    pub fn remove_line(&mut self, position: usize) -> Option<CartLineItem> {
        let removed = self.cart.remove_at(position);
        self.commit_cart();
        removed
    }

    pub fn adjust_quantity(&mut self, name: &str, delta: i64) -> Adjustment {
        let adjustment = self.cart.adjust_quantity(name, delta);
        self.commit_cart();
        adjustment
    }

    pub fn adjust_line(&mut self, position: usize, delta: i64) -> Adjustment {
        let adjustment = self.cart.adjust_at(position, delta);
        self.commit_cart();
        adjustment
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.commit_cart();
    }

    // =========================================================================
    // Liked Operations
    // =========================================================================

    /// Flip whether `product` is liked; returns the new membership.
    pub fn toggle_like(&mut self, product: ProductRef) -> bool {
        let liked = self.liked.toggle(product);
        self.commit_liked();
        liked
    }

    /// Remove a liked item by name. Every like icon for it is reset by the
    /// re-render, whichever surface issued the removal.
    pub fn remove_liked(&mut self, name: &str) -> Option<LikedItem> {
        let removed = self.liked.remove(name);
        self.commit_liked();
        removed
    }

    /// Remove every liked item; returns how many were removed.
    pub fn clear_liked(&mut self) -> usize {
        let cleared = self.liked.clear().len();
        self.commit_liked();
        cleared
    }

    /// Add one unit of the liked item `name` to the cart, keeping it liked.
    ///
    /// Returns `None` (and changes nothing) when `name` is not liked.
    pub fn add_liked_to_cart(&mut self, name: &str) -> Option<Quantity> {
        let product = self.liked.get(name)?.to_product();
        Some(self.add_item(product, Quantity::ONE))
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    fn commit_cart(&mut self) {
        if let Err(e) = self.store.save(CART_KEY, self.cart.lines()) {
            tracing::warn!(error = %e, "Failed to persist cart");
        }
        self.render();
    }

    fn commit_liked(&mut self) {
        if let Err(e) = self.store.save(LIKED_ITEMS_KEY, self.liked.items()) {
            tracing::warn!(error = %e, "Failed to persist liked items");
        }
        self.render();
    }

    fn render(&mut self) {
        self.renderer
            .sync(&self.cart, &self.liked, &mut self.document);
    }
}
