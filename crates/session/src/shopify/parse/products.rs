//! Admin REST product listing.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use shopcart_core::{Product, ProductId, ProductVariant, VariantId};
use tracing::warn;

use super::{Lenient, Text};
use crate::error::ResponseError;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProductsResponse {
    products: Lenient<Vec<Lenient<RestProduct>>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RestProduct {
    id: Lenient<Text>,
    title: Lenient<String>,
    variants: Lenient<Vec<Lenient<RestVariant>>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RestVariant {
    id: Lenient<Text>,
    title: Lenient<String>,
    price: Lenient<Text>,
}

/// Parse a `GET /products.json` body.
///
/// Products without an `id` are skipped, as are variants without an `id`
/// or a parseable `price`.
///
/// # Errors
///
/// Returns `ResponseError::Malformed` if the body is not a JSON object or
/// has no `products` array.
pub fn parse_products(body: &str) -> Result<Vec<Product>, ResponseError> {
    let response: ProductsResponse =
        serde_json::from_str(body).map_err(|e| ResponseError::Malformed(e.to_string()))?;
    let products = response
        .products
        .into_inner()
        .ok_or_else(|| ResponseError::missing("products"))?;

    Ok(products
        .into_iter()
        .filter_map(Lenient::into_inner)
        .filter_map(parse_product)
        .collect())
}

fn parse_product(product: RestProduct) -> Option<Product> {
    let Some(id) = product.id.non_empty() else {
        warn!(title = ?product.title.get(), "Skipping product without id");
        return None;
    };

    let variants = product
        .variants
        .into_inner()
        .unwrap_or_default()
        .into_iter()
        .filter_map(Lenient::into_inner)
        .filter_map(|variant| parse_variant(&id, variant))
        .collect();

    Some(Product {
        id: ProductId::new(id),
        title: product.title.into_inner().unwrap_or_default(),
        variants,
    })
}

fn parse_variant(product_id: &str, variant: RestVariant) -> Option<ProductVariant> {
    let Some(id) = variant.id.non_empty() else {
        warn!(product_id, "Skipping variant without id");
        return None;
    };
    let Some(price) = variant
        .price
        .non_empty()
        .and_then(|price| Decimal::from_str(&price).ok())
    else {
        warn!(product_id, variant_id = %id, "Skipping variant without a valid price");
        return None;
    };

    Some(ProductVariant {
        id: VariantId::new(id),
        title: variant.title.into_inner().unwrap_or_default(),
        price,
    })
}
