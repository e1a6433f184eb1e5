//! Positive line-item quantities.

use core::fmt;
use core::num::NonZeroU32;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A quantity of at least one.
///
/// A cart line can never hold zero or a negative amount; operations that
/// would produce one remove the line instead (see [`Quantity::offset`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Create a quantity, returning `None` for zero.
    #[must_use]
    pub const fn new(value: u32) -> Option<Self> {
        match NonZeroU32::new(value) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Coerce a signed count to a positive quantity; anything below one is one.
    #[must_use]
    pub fn coerce_signed(value: i64) -> Self {
        u32::try_from(value.clamp(1, i64::from(u32::MAX)))
            .ok()
            .and_then(Self::new)
            .unwrap_or(Self::ONE)
    }

    /// Leniently parse form input.
    ///
    /// Reads the leading integer (`"3"`, `"2 packs"` → 2). Missing, zero,
    /// negative or unparseable input yields one.
    #[must_use]
    pub fn coerce(input: &str) -> Self {
        let trimmed = input.trim_start();
        let digits_start = usize::from(trimmed.starts_with(['+', '-']));
        let digits_len = trimmed
            .get(digits_start..)
            .unwrap_or_default()
            .bytes()
            .take_while(u8::is_ascii_digit)
            .count();

        trimmed
            .get(..digits_start + digits_len)
            .and_then(|s| s.parse::<i64>().ok())
            .map_or(Self::ONE, Self::coerce_signed)
    }

    /// The quantity as a plain integer.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Add units, saturating at `u32::MAX`.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.get()))
    }

    /// Apply a signed change. Returns `None` when the result would be `<= 0`.
    #[must_use]
    pub fn offset(self, delta: i64) -> Option<Self> {
        let next = i64::from(self.get()).saturating_add(delta);
        if next <= 0 {
            return None;
        }
        Some(Self::coerce_signed(next))
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.get())
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(QuantityVisitor)
    }
}

/// Accepts integers, floats (truncated), numeric strings and `null`.
struct QuantityVisitor;

impl<'de> Visitor<'de> for QuantityVisitor {
    type Value = Quantity;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a quantity as a number or numeric string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Quantity::coerce_signed(i64::try_from(v).unwrap_or(i64::MAX)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Quantity::coerce_signed(v))
    }

    #[allow(clippy::cast_possible_truncation)] // saturating float-to-int cast is the intent
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Quantity::coerce_signed(v as i64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Quantity::coerce(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Quantity::ONE)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Quantity::ONE)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_parses_leading_integer() {
        assert_eq!(Quantity::coerce("3").get(), 3);
        assert_eq!(Quantity::coerce("2 packs").get(), 2);
        assert_eq!(Quantity::coerce("  7").get(), 7);
    }

    #[test]
    fn test_coerce_defaults_to_one() {
        assert_eq!(Quantity::coerce("").get(), 1);
        assert_eq!(Quantity::coerce("abc").get(), 1);
        assert_eq!(Quantity::coerce("0").get(), 1);
        assert_eq!(Quantity::coerce("-4").get(), 1);
    }

    #[test]
    fn test_offset_removes_at_zero() {
        let qty = Quantity::new(2).unwrap();
        assert_eq!(qty.offset(1).unwrap().get(), 3);
        assert_eq!(qty.offset(-1).unwrap().get(), 1);
        assert!(qty.offset(-2).is_none());
        assert!(qty.offset(-10).is_none());
    }

    #[test]
    fn test_saturating_add() {
        let max = Quantity::new(u32::MAX).unwrap();
        assert_eq!(max.saturating_add(Quantity::ONE).get(), u32::MAX);
    }

    #[test]
    fn test_deserialize_is_lenient() {
        let q: Quantity = serde_json::from_str("4").unwrap();
        assert_eq!(q.get(), 4);
        let q: Quantity = serde_json::from_str("0").unwrap();
        assert_eq!(q.get(), 1);
        let q: Quantity = serde_json::from_str("\"5\"").unwrap();
        assert_eq!(q.get(), 5);
        let q: Quantity = serde_json::from_str("2.9").unwrap();
        assert_eq!(q.get(), 2);
    }
}
