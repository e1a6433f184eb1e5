//! Non-negative rupee amounts using decimal arithmetic.
//!
//! Prices come from two places: structured product references carried on
//! storefront controls, and JSON records read back from visitor storage.
//! Neither source is trusted to be well-formed, so construction never fails:
//! anything unparseable or negative becomes zero.
//!
//! Arithmetic saturates at [`Decimal::MAX`] instead of overflowing.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};
use core::str::FromStr;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Quantity;

/// Currency symbol used for every displayed amount.
pub const CURRENCY_SYMBOL: &str = "₹";

/// A price in rupees. Always `>= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// Zero rupees.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price, clamping negative amounts to zero.
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        if amount.is_sign_negative() {
            Self::ZERO
        } else {
            Self(amount.normalize())
        }
    }

    /// Create a price from a whole number of rupees.
    #[must_use]
    pub fn from_rupees(rupees: u32) -> Self {
        Self(Decimal::from(rupees))
    }

    /// Leniently parse user or markup input.
    ///
    /// Reads the longest numeric prefix (`"450"`, `" 12.5kg"` → 12.5) and
    /// falls back to zero when there is none.
    #[must_use]
    pub fn coerce(input: &str) -> Self {
        let trimmed = input.trim_start();
        let mut end = 0;
        let mut seen_dot = false;
        for (idx, ch) in trimmed.char_indices() {
            let accepted = match ch {
                '+' | '-' => idx == 0,
                '.' if !seen_dot => {
                    seen_dot = true;
                    true
                }
                c => c.is_ascii_digit(),
            };
            if !accepted {
                break;
            }
            end = idx + ch.len_utf8();
        }

        let prefix = trimmed.get(..end).unwrap_or_default().trim_end_matches('.');
        Decimal::from_str(prefix).map_or(Self::ZERO, Self::new)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether this price is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Round to a whole rupee, halves away from zero.
    #[must_use]
    pub fn round_half_up(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .normalize(),
        )
    }

    /// Multiply by a rate (e.g. a tax rate), keeping full precision.
    #[must_use]
    pub fn scale(self, rate: Decimal) -> Self {
        Self::new(self.0.checked_mul(rate).unwrap_or(Decimal::MAX))
    }

    /// Format for display, e.g. `₹450` or `₹12.5`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{CURRENCY_SYMBOL}{}", self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.0.checked_add(rhs.0).unwrap_or(Decimal::MAX))
    }
}

impl Mul<Quantity> for Price {
    type Output = Self;

    fn mul(self, rhs: Quantity) -> Self::Output {
        Self::new(
            self.0
                .checked_mul(Decimal::from(rhs.get()))
                .unwrap_or(Decimal::MAX),
        )
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<u32> for Price {
    fn from(rupees: u32) -> Self {
        Self::from_rupees(rupees)
    }
}

// Stored as a plain JSON number: integers stay integers, fractions become floats.
impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.fract().is_zero() {
            if let Some(whole) = self.0.to_i64() {
                return serializer.serialize_i64(whole);
            }
        }
        serializer.serialize_f64(self.0.to_f64().unwrap_or_default())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PriceVisitor)
    }
}

/// Accepts numbers, numeric strings and `null`; anything non-numeric is zero.
struct PriceVisitor;

impl<'de> Visitor<'de> for PriceVisitor {
    type Value = Price;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a price as a number or numeric string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Price::new(Decimal::from(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Price::new(Decimal::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Decimal::from_f64(v).map_or(Price::ZERO, Price::new))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Price::coerce(v))
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Self::Value, E> {
        Ok(Price::ZERO)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Price::ZERO)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Price::ZERO)
    }
}
