//! Type-safe price representation using decimal arithmetic.

use core::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when reading a price out of display text.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The text contains no digits at all.
    #[error("price text contains no digits: {0:?}")]
    NoDigits(String),
    /// The digits could not be read as a decimal number.
    #[error("price text is not a number: {0:?}")]
    Invalid(String),
    /// The currency code is not one the storefront knows.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., cedis, not pesewas).
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

    /// A zero amount in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Format for display with exactly two decimal places (e.g., "GHS 50.00").
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{} {rounded:.2}", self.currency_code.code())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    /// Ghanaian cedi, the storefront's home currency.
    #[default]
    GHS,
    USD,
    EUR,
    GBP,
    NGN,
}

impl CurrencyCode {
    /// The three-letter code used as the display label.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::GHS => "GHS",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::NGN => "NGN",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CurrencyCode {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GHS" => Ok(Self::GHS),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "NGN" => Ok(Self::NGN),
            _ => Err(PriceError::UnknownCurrency(s.to_owned())),
        }
    }
}

/// Read an amount out of price text shown on a product card.
///
/// Every character other than ASCII digits and `.` is discarded (currency
/// labels, thousands separators, whitespace). Reading stops at a second
/// decimal point, so `"1.2.3"` reads as `1.2`.
///
/// # Errors
///
/// Returns [`PriceError::NoDigits`] when nothing numeric remains and
/// [`PriceError::Invalid`] when the remainder is not a number (e.g. `"."`).
///
/// ```
/// use outcast_core::parse_display_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_display_amount("GHS 1,250.00").unwrap(), Decimal::new(125_000, 2));
/// assert!(parse_display_amount("Sold out").is_err());
/// ```
pub fn parse_display_amount(text: &str) -> Result<Decimal, PriceError> {
    let mut digits = String::with_capacity(text.len());
    let mut seen_point = false;
    for c in text.chars() {
        match c {
            '0'..='9' => digits.push(c),
            '.' if seen_point => break,
            '.' => {
                seen_point = true;
                digits.push(c);
            }
            _ => {}
        }
    }

    if !digits.chars().any(|c| c.is_ascii_digit()) {
        return Err(PriceError::NoDigits(text.to_owned()));
    }

    Decimal::from_str(digits.trim_end_matches('.'))
        .map_err(|_| PriceError::Invalid(text.to_owned()))
}
