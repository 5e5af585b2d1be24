//! Product catalog fetched over the scripted Admin API.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use serde_json::Value;
use shopcart_core::ProductId;
use shopcart_integration_tests::{TestContext, lines_mutated, two_products};

#[tokio::test]
async fn test_catalog_variant_goes_into_cart() {
    let ctx = TestContext::new();
    ctx.http.push_ok(two_products());
    ctx.http
        .push_ok(lines_mutated("cartLinesAdd", "gid://shopify/Cart/1"));

    assert_eq!(ctx.state.catalog().fetch_all().await.unwrap(), 2);
    let product = ctx
        .state
        .catalog()
        .product(&ProductId::new("632910392"))
        .unwrap();
    assert_eq!(product.variant_title(&"49148385".into()), Some("Red"));

    let (variant_id, title) = product.cart_variants().next().unwrap();
    assert_eq!(variant_id.as_str(), "gid://shopify/ProductVariant/808950810");
    assert_eq!(title, "Pink");

    ctx.state
        .cart()
        .add_line_item(&"gid://shopify/Cart/1".into(), &variant_id)
        .await
        .unwrap();

    let requests = ctx.http.requests();
    assert!(requests[0].url.ends_with("/products.json"));
    let body: Value = serde_json::from_str(requests[1].body.as_deref().unwrap()).unwrap();
    assert_eq!(
        body["variables"]["lines"][0]["merchandiseId"],
        "gid://shopify/ProductVariant/808950810"
    );
}

#[tokio::test]
async fn test_waiters_see_fetched_catalog() {
    let ctx = Arc::new(TestContext::new());
    ctx.http.push_ok(two_products());

    let waiters: Vec<_> = (0..3)
        .map(|_| {
            let ctx = ctx.clone();
            tokio::spawn(async move {
                ctx.state.catalog().wait_until_fetched().await;
                ctx.state.catalog().products().len()
            })
        })
        .collect();

    ctx.state.catalog().fetch_all().await.unwrap();
    for waiter in waiters {
        assert_eq!(waiter.await.unwrap(), 2);
    }
    assert_eq!(ctx.http.request_count(), 1);
}

#[tokio::test]
async fn test_failed_fetch_can_be_retried() {
    let ctx = TestContext::new();
    ctx.http.push_transport_error("dns failure");
    ctx.http.push_ok(two_products());

    assert!(ctx.state.catalog().fetch_all().await.is_err());
    assert!(!ctx.state.catalog().is_fetched());
    assert!(ctx.state.catalog().product(&ProductId::new("632910392")).is_none());

    ctx.state.catalog().fetch_all().await.unwrap();
    assert!(ctx.state.catalog().is_fetched());
}
