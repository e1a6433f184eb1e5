//! Checkout pricing.
//!
//! ```text
//! subtotal = Σ unit_price × quantity
//! delivery = 0 when subtotal >= 500, else 50
//! tax      = round_half_up(subtotal × 5%)
//! total    = subtotal + delivery + tax
//! ```

use rust_decimal::Decimal;
use serde::Serialize;

use crate::cart::CartLineItem;
use crate::types::Price;

/// Subtotal at or above which delivery is free.
pub const FREE_DELIVERY_THRESHOLD: u32 = 500;

/// Flat delivery fee below the threshold.
pub const DELIVERY_FEE: u32 = 50;

/// Tax rate in percent.
pub const TAX_PERCENT: i64 = 5;

/// Totals shown in the checkout order summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderTotals {
    pub subtotal: Price,
    pub delivery: Price,
    pub tax: Price,
    pub total: Price,
}

impl OrderTotals {
    /// Whether delivery is free for this order.
    #[must_use]
    pub const fn free_delivery(&self) -> bool {
        self.delivery.is_zero()
    }
}

/// Compute order totals for a cart snapshot. Pure.
#[must_use]
pub fn compute_totals(lines: &[CartLineItem]) -> OrderTotals {
    let subtotal: Price = lines.iter().map(CartLineItem::line_total).sum();

    let delivery = if subtotal >= Price::from_rupees(FREE_DELIVERY_THRESHOLD) {
        Price::ZERO
    } else {
        Price::from_rupees(DELIVERY_FEE)
    };

    let tax = subtotal.scale(Decimal::new(TAX_PERCENT, 2)).round_half_up();

    OrderTotals {
        subtotal,
        delivery,
        tax,
        total: subtotal + delivery + tax,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{ProductRef, Quantity};

    fn line(name: &str, price: Price, quantity: u32) -> CartLineItem {
        CartLineItem::new(
            ProductRef::new(name, price, ""),
            Quantity::new(quantity).unwrap(),
        )
    }

    #[test]
    fn test_organic_milk_scenario() {
        let totals = compute_totals(&[line("Organic Milk", Price::from_rupees(60), 2)]);

        assert_eq!(totals.subtotal, Price::from_rupees(120));
        assert_eq!(totals.delivery, Price::from_rupees(50));
        assert_eq!(totals.tax, Price::from_rupees(6));
        assert_eq!(totals.total, Price::from_rupees(176));
    }

    #[test]
    fn test_free_delivery_at_exactly_threshold() {
        let totals = compute_totals(&[line("Pure Butter", Price::from_rupees(250), 2)]);

        assert_eq!(totals.subtotal, Price::from_rupees(500));
        assert!(totals.free_delivery());
        assert_eq!(totals.tax, Price::from_rupees(25));
        assert_eq!(totals.total, Price::from_rupees(525));
    }

    #[test]
    fn test_just_below_threshold_pays_delivery() {
        let totals = compute_totals(&[line("Pure Ghee", Price::from_rupees(499), 1)]);
        assert_eq!(totals.delivery, Price::from_rupees(50));
    }

    #[test]
    fn test_tax_rounds_half_up() {
        // 5% of 50 = 2.5 → 3
        let totals = compute_totals(&[line("Curd", Price::from_rupees(50), 1)]);
        assert_eq!(totals.tax, Price::from_rupees(3));

        // 5% of 90 = 4.5 → 5
        let totals = compute_totals(&[line("Curd", Price::from_rupees(90), 1)]);
        assert_eq!(totals.tax, Price::from_rupees(5));
    }

    #[test]
    fn test_fractional_prices() {
        let totals = compute_totals(&[line("Paneer", Price::coerce("12.5"), 2)]);
        assert_eq!(totals.subtotal, Price::from_rupees(25));
        assert_eq!(totals.tax, Price::from_rupees(1));
        assert_eq!(totals.total, Price::from_rupees(76));
    }

    #[test]
    fn test_empty_cart() {
        let totals = compute_totals(&[]);
        assert_eq!(totals.subtotal, Price::ZERO);
        assert_eq!(totals.delivery, Price::from_rupees(50));
        assert_eq!(totals.tax, Price::ZERO);
        assert_eq!(totals.total, Price::from_rupees(50));
    }

    #[test]
    fn test_huge_price_does_not_overflow() {
        let huge = Price::coerce("79228162514264337593543950335");
        let totals = compute_totals(&[line("Organic Milk", huge, 2), line("Fresh Curd", huge, 1)]);

        assert_eq!(totals.subtotal.amount(), Decimal::MAX);
        assert!(totals.free_delivery());
        assert_eq!(totals.total.amount(), Decimal::MAX);
    }
}
