//! Type-safe price representation using decimal arithmetic.
//!
//! Currency amounts never go through binary floats; display totals are
//! rounded to two decimal places at the formatting boundary only.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., euros, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price from the smallest currency unit (e.g., cents).
    #[must_use]
    pub fn from_minor_units(minor: i64, currency_code: CurrencyCode) -> Self {
        Self {
            amount: Decimal::new(minor, 2),
            currency_code,
        }
    }

    /// Format for display (e.g., "€19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency_code.symbol(), self.amount)
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    EUR,
    USD,
    GBP,
    CHF,
}

impl CurrencyCode {
    /// Currency symbol for display.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::EUR => "€",
            Self::USD => "$",
            Self::GBP => "£",
            Self::CHF => "CHF ",
        }
    }

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EUR => "EUR",
            Self::USD => "USD",
            Self::GBP => "GBP",
            Self::CHF => "CHF",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minor_units() {
        let price = Price::from_minor_units(1250, CurrencyCode::EUR);
        assert_eq!(price.amount, Decimal::new(125, 1));
    }

    #[test]
    fn test_display_two_decimals() {
        let price = Price::new(Decimal::new(35, 1), CurrencyCode::EUR);
        assert_eq!(price.display(), "€3.50");

        let price = Price::new(Decimal::new(10, 0), CurrencyCode::USD);
        assert_eq!(price.display(), "$10.00");
    }

    #[test]
    fn test_currency_code() {
        assert_eq!(CurrencyCode::EUR.code(), "EUR");
        assert_eq!(CurrencyCode::GBP.symbol(), "£");
    }
}
