//! Catalog commands.
//!
//! # Usage
//!
//! ```bash
//! shopcart products
//! shopcart product 632910392
//! ```

#![allow(clippy::print_stdout)] // command results are the program's output

use shopcart_core::{Product, ProductId};
use shopcart_session::ShopState;

use super::CommandError;

fn price_label(product: &Product) -> String {
    product
        .price()
        .map_or_else(|| "-".to_string(), |price| price.to_string())
}

/// Print every product with its display price.
pub async fn list(state: &ShopState) -> Result<(), CommandError> {
    let count = state.catalog().fetch_all().await?;
    tracing::info!(count, "Fetched products");

    for product in state.catalog().products() {
        println!("{}\t{}\t{}", product.id, product.title, price_label(&product));
    }
    Ok(())
}

/// Print one product and the variant IDs cart commands accept.
pub async fn show(state: &ShopState, id: &str) -> Result<(), CommandError> {
    state.catalog().fetch_all().await?;
    let product = state
        .catalog()
        .product(&ProductId::new(id))
        .ok_or_else(|| CommandError::ProductNotFound(id.to_owned()))?;

    println!("{} ({})", product.title, product.id);
    println!("Price: {}", price_label(&product));
    for (variant_id, title) in product.cart_variants() {
        println!("  {variant_id}\t{title}");
    }
    Ok(())
}
