//! Cart commands.
//!
//! Each invocation is a fresh session, so commands other than `create` and
//! `buy` take the cart ID explicitly.

#![allow(clippy::print_stdout)] // command results are the program's output

use shopcart_core::{CartId, LineItem, LineItemId, VariantId, subtotal};
use shopcart_session::ShopState;

use super::CommandError;

/// Create a cart and print its ID.
pub async fn create(state: &ShopState) -> Result<CartId, CommandError> {
    let creation = state.cart().create_cart().await?;
    println!("{}", creation.cart_id());
    Ok(creation.into_cart_id())
}

/// Add one unit of `variant` to `cart`.
pub async fn add(state: &ShopState, cart: &str, variant: &str) -> Result<(), CommandError> {
    state
        .cart()
        .add_line_item(&CartId::new(cart), &VariantId::new(variant))
        .await?;
    println!("Added {variant}");
    Ok(())
}

/// Remove line `line` from `cart`.
pub async fn remove(state: &ShopState, cart: &str, line: &str) -> Result<(), CommandError> {
    state
        .cart()
        .remove_line_item(&CartId::new(cart), &LineItemId::new(line))
        .await?;
    println!("Removed {line}");
    Ok(())
}

fn print_lines(lines: &[LineItem]) {
    if lines.is_empty() {
        println!("Cart is empty");
        return;
    }
    for line in lines {
        println!("{line}");
    }
    if let Some(total) = subtotal(lines) {
        println!("Subtotal: {total}");
    }
}

/// Print the lines of `cart`.
pub async fn show(state: &ShopState, cart: &str) -> Result<(), CommandError> {
    let lines = state
        .cart()
        .try_fetch_line_items(&CartId::new(cart))
        .await?;
    print_lines(&lines);
    Ok(())
}

/// Create a checkout for `cart`.
pub async fn checkout(state: &ShopState, cart: &str) -> Result<(), CommandError> {
    let checkout = state.cart().create_checkout(&CartId::new(cart)).await?;
    println!("Checkout {} created", checkout.id);
    Ok(())
}

/// Create a cart, add one unit of each variant, and check out.
pub async fn buy(state: &ShopState, variants: &[String]) -> Result<(), CommandError> {
    let cart_id = create(state).await?;
    for variant in variants {
        add(state, cart_id.as_str(), variant).await?;
    }

    let lines = state.cart().try_fetch_line_items(&cart_id).await?;
    print_lines(&lines);
    checkout(state, cart_id.as_str()).await
}
