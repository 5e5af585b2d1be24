//! Catalog product types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{ProductId, VariantId};

/// A purchasable configuration of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    /// Variant ID as returned by the admin API (usually a bare number).
    pub id: VariantId,
    /// Variant title (e.g. "Default Title", "Small").
    pub title: String,
    /// Variant price in the shop currency.
    pub price: Decimal,
}

/// A product from the admin catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// Product title.
    pub title: String,
    /// Variants in catalog order.
    pub variants: Vec<ProductVariant>,
}

impl Product {
    /// Display price of the product: the price of its last priced variant.
    #[must_use]
    pub fn price(&self) -> Option<Decimal> {
        self.variants.last().map(|v| v.price)
    }

    /// Variant title by variant ID.
    ///
    /// Accepts either the bare or the namespaced form of the ID.
    #[must_use]
    pub fn variant_title(&self, id: &VariantId) -> Option<&str> {
        let wanted = id.normalized();
        self.variants
            .iter()
            .find(|v| v.id.normalized() == wanted)
            .map(|v| v.title.as_str())
    }

    /// Variants keyed by the ID form cart mutations accept.
    pub fn cart_variants(&self) -> impl Iterator<Item = (VariantId, &str)> {
        self.variants
            .iter()
            .map(|v| (v.id.normalized(), v.title.as_str()))
    }
}
