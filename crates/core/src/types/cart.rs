//! Cart types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CheckoutId, LineItemId};
use super::price::Money;

/// A reconciled line in a cart.
///
/// Built fresh from every fetch; never cached between fetches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Cart line ID. Unique within one fetched sequence.
    pub line_item_id: LineItemId,
    /// Title of the product the variant belongs to.
    pub product_title: String,
    /// Title of the variant (e.g. "Large / Blue").
    pub variant_title: String,
    /// Quantity, always at least 1.
    pub quantity: u32,
    /// Price of a single unit.
    pub unit_price: Money,
}

impl LineItem {
    /// Price of the whole line (`unit_price * quantity`).
    ///
    /// Returns `None` if the unit price is not a decimal.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.unit_price
            .decimal()
            .ok()
            .map(|unit| unit * Decimal::from(self.quantity))
    }
}

impl std::fmt::Display for LineItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (Variant: {}) | ID: {} | Quantity: {} | Price: {}",
            self.product_title, self.variant_title, self.line_item_id, self.quantity, self.unit_price
        )
    }
}

/// Sum the lines of a cart.
///
/// Returns `None` for an empty cart, when lines disagree on currency, or when
/// any unit price fails to parse.
#[must_use]
pub fn subtotal(lines: &[LineItem]) -> Option<Money> {
    let currency = &lines.first()?.unit_price.currency_code;
    let mut total = Decimal::ZERO;
    for line in lines {
        if &line.unit_price.currency_code != currency {
            return None;
        }
        total += line.line_total()?;
    }
    Some(Money::new(total.to_string(), currency.clone()))
}

/// A checkout created from a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkout {
    /// Checkout ID.
    pub id: CheckoutId,
    /// URL the buyer completes the purchase at.
    pub web_url: String,
}
