//! Core types for eDairy.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod price;
pub mod product;
pub mod quantity;

pub use email::{Email, EmailError};
pub use price::Price;
pub use product::{ProductRef, handle_for};
pub use quantity::Quantity;
