//! eDairy Core - cart and liked-items state, shared types and pricing.
//!
//! This crate is used by:
//! - `storefront` - the public shop (HTTP, templates, persistence)
//! - `cli` - visitor storage inspection tools
//!
//! # Architecture
//!
//! The core crate contains only types and pure state transitions - no I/O,
//! no storage access, no HTTP. Persistence and rendering are collaborators
//! that live in the storefront crate and drive these models.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for prices, quantities, products and emails
//! - [`cart`] - The ordered cart of line items
//! - [`liked`] - The liked-items set
//! - [`pricing`] - Checkout totals (subtotal, delivery, tax, total)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod liked;
pub mod pricing;
pub mod types;

pub use cart::{Adjustment, Cart, CartLineItem};
pub use liked::{LikedItem, LikedSet};
pub use pricing::{OrderTotals, compute_totals};
pub use types::*;
