//! Monetary amounts as returned by Shopify.
//!
//! Amounts stay in their decimal string form so nothing is lost across
//! currencies with unusual minor units. Arithmetic goes through
//! [`rust_decimal::Decimal`], never `f64`.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when interpreting a [`Money`] amount.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is not a decimal number.
    #[error("invalid decimal amount: {0}")]
    InvalidAmount(String),
}

/// An amount with its ISO 4217 currency code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    /// Decimal amount as string (preserves precision).
    pub amount: String,
    /// ISO 4217 currency code.
    pub currency_code: String,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub fn new(amount: impl Into<String>, currency_code: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            currency_code: currency_code.into(),
        }
    }

    /// Parse the amount as a decimal.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::InvalidAmount`] if the amount string is not a
    /// decimal number.
    pub fn decimal(&self) -> Result<Decimal, PriceError> {
        Decimal::from_str(self.amount.trim())
            .map_err(|_| PriceError::InvalidAmount(self.amount.clone()))
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency_code)
    }
}
