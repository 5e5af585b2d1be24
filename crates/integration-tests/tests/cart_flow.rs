//! Cart lifecycle against a scripted Storefront API.

#![allow(clippy::unwrap_used)]

use serde_json::Value;
use shopcart_core::{CartId, LineItemId, VariantId, subtotal};
use shopcart_integration_tests::{
    TestContext, cart_created, checkout_created, line_edge, lines_mutated, lines_page,
};
use shopcart_session::{CartCreation, PreconditionViolation, SessionError};

const CART: &str = "gid://shopify/Cart/1";

#[tokio::test]
async fn test_create_add_fetch_checkout() {
    let ctx = TestContext::new();
    ctx.http.push_ok(cart_created(CART));
    ctx.http.push_ok(lines_mutated("cartLinesAdd", CART));
    ctx.http.push_ok(lines_mutated("cartLinesAdd", CART));
    ctx.http.push_ok(lines_page(
        vec![
            line_edge("L1", 1, "gid://shopify/ProductVariant/1", "Tee", "20.00"),
            line_edge("L2", 1, "gid://shopify/ProductVariant/2", "Hat", "5.50"),
        ],
        None,
    ));
    ctx.http.push_ok(lines_page(
        vec![
            line_edge("L1", 1, "gid://shopify/ProductVariant/1", "Tee", "20.00"),
            line_edge("L2", 1, "gid://shopify/ProductVariant/2", "Hat", "5.50"),
        ],
        None,
    ));
    ctx.http
        .push_ok(checkout_created("gid://shopify/Checkout/1", "https://shop.example/c/1"));

    let cart = ctx.state.cart();
    let cart_id = cart.create_cart().await.unwrap().into_cart_id();
    assert_eq!(cart.stored_cart_id(), Some(cart_id.clone()));

    cart.add_line_item(&cart_id, &VariantId::new("1")).await.unwrap();
    cart.add_line_item(&cart_id, &VariantId::new("2")).await.unwrap();

    let lines = cart.fetch_line_items(&cart_id).await;
    assert_eq!(lines.len(), 2);
    let total = subtotal(&lines).unwrap();
    assert_eq!(total.to_string(), "25.50 USD");

    let checkout = cart.create_checkout(&cart_id).await.unwrap();
    assert_eq!(checkout.web_url, "https://shop.example/c/1");
    assert_eq!(ctx.opener.opened(), vec!["https://shop.example/c/1"]);
    assert_eq!(ctx.http.request_count(), 6);
}

#[tokio::test]
async fn test_second_create_reuses_cart() {
    let ctx = TestContext::new();
    ctx.http.push_ok(cart_created(CART));

    let first = ctx.state.cart().create_cart().await.unwrap();
    let second = ctx.state.cart().create_cart().await.unwrap();

    assert!(first.is_new());
    assert_eq!(second, CartCreation::Existing(CartId::new(CART)));
    assert_eq!(ctx.http.request_count(), 1);
}

#[tokio::test]
async fn test_duplicate_lines_reported_once() {
    let ctx = TestContext::new();
    ctx.http.push_ok(lines_page(
        vec![
            line_edge("L1", 2, "gid://shopify/ProductVariant/1", "Tee", "10.00"),
            line_edge("L1", 3, "gid://shopify/ProductVariant/1", "Other", "99.00"),
        ],
        None,
    ));

    let lines = ctx.state.cart().fetch_line_items(&CartId::new(CART)).await;
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity, 5);
    assert_eq!(lines[0].product_title, "Tee");
    assert_eq!(
        lines[0].to_string(),
        "Tee (Variant: Default Title) | ID: L1 | Quantity: 5 | Price: 10.00 USD"
    );
}

#[tokio::test]
async fn test_remove_then_fetch() {
    let ctx = TestContext::new();
    ctx.http.push_ok(lines_mutated("cartLinesRemove", CART));
    ctx.http.push_ok(lines_page(vec![], None));

    let cart_id = CartId::new(CART);
    ctx.state
        .cart()
        .remove_line_item(&cart_id, &LineItemId::new("L1"))
        .await
        .unwrap();
    assert!(ctx.state.cart().fetch_line_items(&cart_id).await.is_empty());

    let requests = ctx.http.requests();
    let body: Value = serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
    assert_eq!(body["variables"]["lineIds"][0], "L1");
}

#[tokio::test]
async fn test_invalid_json_has_no_side_effects() {
    let ctx = TestContext::new();
    for _ in 0..3 {
        ctx.http.push_ok("{\"data\": ");
    }

    let cart_id = CartId::new(CART);
    assert!(matches!(
        ctx.state.cart().create_cart().await,
        Err(SessionError::MalformedResponse(_))
    ));
    assert!(ctx.state.cart().fetch_line_items(&cart_id).await.is_empty());
    assert!(matches!(
        ctx.state.cart().create_checkout(&cart_id).await,
        Err(SessionError::MalformedResponse(_))
    ));

    assert_eq!(ctx.state.cart().stored_cart_id(), None);
    assert!(ctx.opener.opened().is_empty());
}

#[tokio::test]
async fn test_malformed_mutation_responses_keep_cart() {
    let ctx = TestContext::new();
    ctx.http.push_ok(cart_created(CART));
    ctx.http.push_ok("not json");
    ctx.http.push_ok("not json");

    let cart = ctx.state.cart();
    let cart_id = cart.create_cart().await.unwrap().into_cart_id();

    assert!(matches!(
        cart.add_line_item(&cart_id, &VariantId::new("7")).await,
        Err(SessionError::MalformedResponse(_))
    ));
    assert_eq!(cart.stored_cart_id(), Some(cart_id.clone()));

    assert!(matches!(
        cart.remove_line_item(&cart_id, &LineItemId::new("L1")).await,
        Err(SessionError::MalformedResponse(_))
    ));
    assert_eq!(cart.stored_cart_id(), Some(cart_id));
    assert_eq!(ctx.http.request_count(), 3);
}

#[tokio::test]
async fn test_checkout_of_empty_cart_is_refused() {
    let ctx = TestContext::new();
    ctx.http.push_ok(lines_page(vec![], None));

    assert_eq!(
        ctx.state.cart().create_checkout(&CartId::new(CART)).await,
        Err(SessionError::Precondition(PreconditionViolation::EmptyCart))
    );
    assert_eq!(ctx.http.request_count(), 1);
}
