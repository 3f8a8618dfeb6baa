//! Amount type for displaying monetary values.
//!
//! Amounts are kept at full precision. Rounding to cents only happens when an `Amount` is
//! formatted, so repeated recalculation never compounds rounding error.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};
use std::fmt;

/// Represents a dollar amount.
///
/// `Display` renders a leading `$` and exactly two decimal places, with the sign in front of the
/// dollar sign for negative values.
///
/// ```
/// # use invoicer::model::Amount;
/// # use rust_decimal::Decimal;
/// let amount = Amount::new(Decimal::new(-5, 0));
/// assert_eq!(amount.to_string(), "-$5.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    value: Decimal,
}

impl Amount {
    pub const ZERO: Amount = Amount::new(Decimal::ZERO);

    /// Creates a new Amount from a Decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Returns the unrounded Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Returns the value rounded to cents, half away from zero.
    pub fn cents(&self) -> Decimal {
        self.value
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.cents();
        // Values that round to zero, like -0.001, print without a sign.
        let sign = if rounded.is_zero() || rounded.is_sign_positive() {
            ""
        } else {
            "-"
        };
        write!(f, "{sign}${:.2}", rounded.abs())
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn amount(s: &str) -> Amount {
        Amount::new(Decimal::from_str(s).unwrap())
    }

    #[test]
    fn test_display_positive() {
        assert_eq!(amount("50").to_string(), "$50.00");
    }

    #[test]
    fn test_display_negative() {
        assert_eq!(amount("-50.5").to_string(), "-$50.50");
    }

    #[test]
    fn test_display_zero() {
        assert_eq!(Amount::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_display_rounds_half_away_from_zero() {
        assert_eq!(amount("2.345").to_string(), "$2.35");
        assert_eq!(amount("2.344").to_string(), "$2.34");
        assert_eq!(amount("-2.345").to_string(), "-$2.35");
    }

    #[test]
    fn test_display_tiny_negative_has_no_sign() {
        assert_eq!(amount("-0.001").to_string(), "$0.00");
    }

    #[test]
    fn test_display_does_not_group_thousands() {
        assert_eq!(amount("1234567.891").to_string(), "$1234567.89");
    }

    #[test]
    fn test_value_is_not_rounded() {
        let a = amount("0.125");
        assert_eq!(a.value(), Decimal::from_str("0.125").unwrap());
        assert_eq!(a.cents(), Decimal::from_str("0.13").unwrap());
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&amount("27.5")).unwrap();
        assert_eq!(json, "\"$27.50\"");
    }
}
