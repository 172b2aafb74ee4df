//! Amount type
//!
//! Domain primitive for monetary amounts with business rule validation.
//! Amounts are signed fixed-point values: a ledger records money moving
//! in both directions, so negative values are valid. Construction
//! canonicalizes to four decimal places.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum decimal places
const MAX_SCALE: u32 = 4;

/// Maximum digits before the decimal point (19 significant digits total,
/// 4 of them fractional)
const MAX_WHOLE_DIGITS: u32 = 15;

/// Amount represents a validated monetary value.
///
/// # Invariants
/// - At most 4 decimal places as supplied
/// - Absolute value below 10^15
/// - Stored canonically rescaled to 4 decimal places
///
/// # Example
/// ```
/// use rust_decimal::Decimal;
/// use funds_api::domain::Amount;
///
/// let amount = Amount::new(Decimal::new(-1005, 1)).unwrap();
/// assert_eq!(amount.to_string(), "-100.5000");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(Decimal);

/// Errors that can occur when creating an Amount
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Amount has too many decimal places (max {MAX_SCALE}, got {0})")]
    TooManyDecimals(u32),

    #[error("Amount has too many digits before the decimal point (max {MAX_WHOLE_DIGITS})")]
    TooManyDigits,

    #[error("Invalid amount format: {0}")]
    ParseError(String),
}

impl Amount {
    /// Create a new Amount with validation.
    ///
    /// # Errors
    /// - `AmountError::TooManyDecimals` if more than 4 decimal places
    /// - `AmountError::TooManyDigits` if the absolute value reaches 10^15
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value.scale() > MAX_SCALE {
            return Err(AmountError::TooManyDecimals(value.scale()));
        }

        let limit = Decimal::from(10_u64.pow(MAX_WHOLE_DIGITS));
        if value.abs() >= limit {
            return Err(AmountError::TooManyDigits);
        }

        let mut canonical = value;
        canonical.rescale(MAX_SCALE);
        Ok(Self(canonical))
    }

    /// Get the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s).map_err(|e| AmountError::ParseError(e.to_string()))?;
        Amount::new(decimal)
    }
}

impl TryFrom<String> for Amount {
    type Error = AmountError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Amount::from_str(&value)
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        format!("{:.4}", amount.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_positive() {
        let amount = Amount::new(dec!(100));
        assert!(amount.is_ok());
        assert_eq!(amount.unwrap().value(), dec!(100.0000));
    }

    #[test]
    fn test_amount_negative_allowed() {
        let amount = Amount::new(dec!(-42.50));
        assert!(amount.is_ok());
        assert_eq!(amount.unwrap().to_string(), "-42.5000");
    }

    #[test]
    fn test_amount_zero_allowed() {
        let amount = Amount::new(Decimal::ZERO);
        assert!(amount.is_ok());
    }

    #[test]
    fn test_amount_too_many_decimals() {
        // 0.12345 has 5 decimal places
        let amount = Amount::new(Decimal::new(12345, 5));
        assert!(matches!(amount, Err(AmountError::TooManyDecimals(5))));
    }

    #[test]
    fn test_amount_max_decimals_ok() {
        let amount = Amount::new(dec!(0.1234));
        assert!(amount.is_ok());
    }

    #[test]
    fn test_amount_trailing_zeros_count_as_decimals() {
        // "100.50000" carries scale 5 even though the value fits in 4
        let amount: Result<Amount, _> = "100.50000".parse();
        assert!(matches!(amount, Err(AmountError::TooManyDecimals(5))));
    }

    #[test]
    fn test_amount_too_many_digits() {
        let amount = Amount::new(dec!(1000000000000000));
        assert!(matches!(amount, Err(AmountError::TooManyDigits)));
    }

    #[test]
    fn test_amount_max_value_ok() {
        let amount = Amount::new(dec!(999999999999999.9999));
        assert!(amount.is_ok());
    }

    #[test]
    fn test_amount_negative_overflow_rejected() {
        let amount = Amount::new(dec!(-1000000000000000));
        assert!(matches!(amount, Err(AmountError::TooManyDigits)));
    }

    #[test]
    fn test_amount_from_str() {
        let amount: Result<Amount, _> = "123.456".parse();
        assert!(amount.is_ok());
        assert_eq!(amount.unwrap().value(), dec!(123.4560));
    }

    #[test]
    fn test_amount_from_str_garbage() {
        let amount: Result<Amount, _> = "not-a-number".parse();
        assert!(matches!(amount, Err(AmountError::ParseError(_))));
    }

    #[test]
    fn test_amount_canonical_string() {
        let amount = Amount::new(dec!(7)).unwrap();
        assert_eq!(String::from(amount), "7.0000");
    }
}
