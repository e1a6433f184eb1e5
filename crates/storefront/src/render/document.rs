//! The set of display surfaces a rendered page exposes.
//!
//! A [`Document`] mirrors the anchors present on one page. Surfaces that a
//! page does not have are simply absent, and the synchronizer skips them.

use std::collections::BTreeMap;

use edairy_core::ProductRef;

/// A named display slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Anchor {
    CartCount,
    CartItems,
    CartTotal,
    LikedCount,
    LikedItems,
    LikedTotal,
    OrderItems,
    Subtotal,
    Delivery,
    Tax,
    Total,
}

impl Anchor {
    /// Header badges, present on every page.
    pub const HEADER: [Self; 2] = [Self::CartCount, Self::LikedCount];

    /// Cart sidebar.
    pub const CART_SIDEBAR: [Self; 2] = [Self::CartItems, Self::CartTotal];

    /// Liked-items sidebar.
    pub const LIKED_SIDEBAR: [Self; 2] = [Self::LikedItems, Self::LikedTotal];

    /// Checkout order summary.
    pub const ORDER_SUMMARY: [Self; 5] = [
        Self::OrderItems,
        Self::Subtotal,
        Self::Delivery,
        Self::Tax,
        Self::Total,
    ];

    /// Element id of the slot in the page.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::CartCount => "cart-count",
            Self::CartItems => "cart-items",
            Self::CartTotal => "cart-total",
            Self::LikedCount => "liked-count",
            Self::LikedItems => "liked-items",
            Self::LikedTotal => "liked-total",
            Self::OrderItems => "order-items",
            Self::Subtotal => "subtotal",
            Self::Delivery => "delivery",
            Self::Tax => "tax",
            Self::Total => "total",
        }
    }
}

/// A product card's like toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeIcon {
    pub product: ProductRef,
    pub liked: bool,
    pub html: String,
}

impl LikeIcon {
    /// Element id of the icon slot.
    #[must_use]
    pub fn id(&self) -> String {
        like_icon_id(&self.product.name)
    }
}

/// Element id of the like icon slot for `name`.
#[must_use]
pub fn like_icon_id(name: &str) -> String {
    format!("like-{}", edairy_core::handle_for(name))
}

/// One slot's rendered content, addressed by element id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub id: String,
    pub html: String,
}

/// Rendered content of every surface on a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    surfaces: BTreeMap<Anchor, String>,
    like_icons: BTreeMap<String, LikeIcon>,
}

impl Document {
    /// A page with no surfaces.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The storefront home page: header, both sidebars and a like icon per card.
    #[must_use]
    pub fn home(products: impl IntoIterator<Item = ProductRef>) -> Self {
        let anchors = Anchor::HEADER
            .into_iter()
            .chain(Anchor::CART_SIDEBAR)
            .chain(Anchor::LIKED_SIDEBAR);
        products
            .into_iter()
            .fold(Self::new().with_anchors(anchors), Self::with_like_icon)
    }

    /// The checkout page: header and order summary.
    #[must_use]
    pub fn checkout() -> Self {
        Self::new().with_anchors(Anchor::HEADER.into_iter().chain(Anchor::ORDER_SUMMARY))
    }

    /// Add a surface.
    #[must_use]
    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.surfaces.entry(anchor).or_default();
        self
    }

    /// Add several surfaces.
    #[must_use]
    pub fn with_anchors(self, anchors: impl IntoIterator<Item = Anchor>) -> Self {
        anchors.into_iter().fold(self, Self::with_anchor)
    }

    /// Register a like icon for a product card.
    #[must_use]
    pub fn with_like_icon(mut self, product: ProductRef) -> Self {
        self.like_icons
            .entry(product.name.clone())
            .or_insert_with(|| LikeIcon {
                product,
                liked: false,
                html: String::new(),
            });
        self
    }

    /// Whether the page has `anchor`.
    #[must_use]
    pub fn has_anchor(&self, anchor: Anchor) -> bool {
        self.surfaces.contains_key(&anchor)
    }

    /// Replace the content of `anchor`. Returns `false` when the page has no
    /// such surface.
    pub fn fill(&mut self, anchor: Anchor, html: String) -> bool {
        match self.surfaces.get_mut(&anchor) {
            Some(slot) => {
                *slot = html;
                true
            }
            None => false,
        }
    }

    /// Current content of `anchor`; empty when absent or never rendered.
    #[must_use]
    pub fn slot(&self, anchor: Anchor) -> &str {
        self.surfaces.get(&anchor).map_or("", String::as_str)
    }

    /// All registered like icons, by product name.
    pub fn like_icons(&self) -> impl Iterator<Item = &LikeIcon> {
        self.like_icons.values()
    }

    /// The like icon for `name`, if the page shows one.
    #[must_use]
    pub fn like_icon(&self, name: &str) -> Option<&LikeIcon> {
        self.like_icons.get(name)
    }

    /// Whether the icon for `name` currently shows "liked".
    #[must_use]
    pub fn is_liked(&self, name: &str) -> bool {
        self.like_icon(name).is_some_and(|icon| icon.liked)
    }

    /// Rendered content of the like icon for `name`.
    #[must_use]
    pub fn like_icon_html(&self, name: &str) -> &str {
        self.like_icon(name).map_or("", |icon| icon.html.as_str())
    }

    /// Update the icon for `name`. Returns `false` when the page has no such icon.
    pub fn set_like_icon(&mut self, name: &str, liked: bool, html: String) -> bool {
        match self.like_icons.get_mut(name) {
            Some(icon) => {
                icon.liked = liked;
                icon.html = html;
                true
            }
            None => false,
        }
    }

    /// Every slot on the page, surfaces first, in a stable order.
    #[must_use]
    pub fn fragments(&self) -> Vec<Fragment> {
        let surfaces = self.surfaces.iter().map(|(anchor, html)| Fragment {
            id: anchor.id().to_string(),
            html: html.clone(),
        });
        let icons = self.like_icons.values().map(|icon| Fragment {
            id: icon.id(),
            html: icon.html.clone(),
        });
        surfaces.chain(icons).collect()
    }
}

#[cfg(test)]
mod tests {
    use edairy_core::Price;

    use super::*;

    #[test]
    fn test_checkout_page_has_no_sidebars() {
        let doc = Document::checkout();
        assert!(doc.has_anchor(Anchor::Total));
        assert!(doc.has_anchor(Anchor::CartCount));
        assert!(!doc.has_anchor(Anchor::CartItems));
        assert_eq!(doc.like_icons().count(), 0);
    }

    #[test]
    fn test_fill_missing_anchor_is_rejected() {
        let mut doc = Document::new().with_anchor(Anchor::CartCount);
        assert!(doc.fill(Anchor::CartCount, "3".to_string()));
        assert!(!doc.fill(Anchor::Total, "₹1".to_string()));
        assert_eq!(doc.slot(Anchor::CartCount), "3");
        assert_eq!(doc.slot(Anchor::Total), "");
    }

    #[test]
    fn test_like_icon_ids() {
        let doc = Document::home([ProductRef::new("Fresh Curd", Price::from_rupees(40), "")]);
        let ids: Vec<_> = doc.fragments().into_iter().map(|f| f.id).collect();
        assert!(ids.contains(&"like-fresh-curd".to_string()));
        assert!(ids.contains(&"cart-items".to_string()));
        assert!(!ids.contains(&"order-items".to_string()));
    }
}
