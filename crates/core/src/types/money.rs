//! Monetary amounts using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount in a specific currency.
///
/// The currency code is kept as the ISO 4217 string the backend reports,
/// since a shop's presentment currencies are not known at compile time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: String,
}

impl Money {
    /// Create a new monetary amount.
    #[must_use]
    pub fn new(amount: Decimal, currency_code: impl Into<String>) -> Self {
        Self {
            amount,
            currency_code: currency_code.into(),
        }
    }
}

/// Two decimal places then the currency code (e.g., "70.00 USD").
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.amount, self.currency_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_to_cents() {
        let money = Money::new(Decimal::new(70, 0), "USD");
        assert_eq!(money.to_string(), "70.00 USD");
    }

    #[test]
    fn test_display_keeps_cents() {
        let money = Money::new(Decimal::new(1999, 2), "CAD");
        assert_eq!(money.to_string(), "19.99 CAD");
    }
}
