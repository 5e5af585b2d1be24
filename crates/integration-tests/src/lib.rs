//! Integration tests for shopcart.
//!
//! The tests drive a fully wired [`ShopState`] over the scripted transport
//! from `shopcart_session::testing`, so they need no network or shop.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopcart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - Cart creation through checkout
//! - `catalog` - Product fetch and catalog-driven cart operations
//! - `bridge` - Callback-style access through `SessionHandle`

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use serde_json::{Value, json};
use shopcart_session::ShopState;
use shopcart_session::testing::{FakeHttpClient, RecordingOpener, test_config};

/// A session wired to a scripted transport and a recording opener.
pub struct TestContext {
    pub http: Arc<FakeHttpClient>,
    pub opener: Arc<RecordingOpener>,
    pub state: ShopState,
}

impl TestContext {
    #[must_use]
    pub fn new() -> Self {
        let http = Arc::new(FakeHttpClient::new());
        let opener = Arc::new(RecordingOpener::new());
        let state = ShopState::new(test_config(), http.clone(), opener.clone());
        Self {
            http,
            opener,
            state,
        }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// `cartCreate` response.
#[must_use]
pub fn cart_created(cart_id: &str) -> String {
    json!({"data": {"cartCreate": {"cart": {"id": cart_id}}}}).to_string()
}

/// `cartLinesAdd` or `cartLinesRemove` success response.
#[must_use]
pub fn lines_mutated(root: &str, cart_id: &str) -> String {
    json!({"data": {root: {"cart": {"id": cart_id}, "userErrors": []}}}).to_string()
}

/// A `cart.lines` edge for one unit price in USD.
#[must_use]
pub fn line_edge(line_id: &str, quantity: u32, variant_id: &str, product: &str, amount: &str) -> Value {
    json!({"node": {
        "id": line_id,
        "quantity": quantity,
        "merchandise": {
            "id": variant_id,
            "title": "Default Title",
            "product": {"id": "gid://shopify/Product/1", "title": product},
            "priceV2": {"amount": amount, "currencyCode": "USD"}
        }
    }})
}

/// A `cart.lines` page. `next` is the end cursor when more pages follow.
#[must_use]
pub fn lines_page(edges: Vec<Value>, next: Option<&str>) -> String {
    json!({"data": {"cart": {"id": "gid://shopify/Cart/1", "lines": {
        "pageInfo": {"hasNextPage": next.is_some(), "endCursor": next},
        "edges": edges
    }}}})
    .to_string()
}

/// `checkoutCreate` success response.
#[must_use]
pub fn checkout_created(checkout_id: &str, web_url: &str) -> String {
    json!({"data": {"checkoutCreate": {
        "checkout": {"id": checkout_id, "webUrl": web_url},
        "checkoutUserErrors": []
    }}})
    .to_string()
}

/// Admin `products.json` body with two products.
#[must_use]
pub fn two_products() -> String {
    json!({"products": [
        {
            "id": 632_910_392,
            "title": "IPod Nano - 8GB",
            "variants": [
                {"id": 808_950_810, "title": "Pink", "price": "199.00"},
                {"id": 49_148_385, "title": "Red", "price": "199.00"}
            ]
        },
        {
            "id": 921_728_736,
            "title": "IPod Touch 8GB",
            "variants": [{"id": 447_654_529, "title": "Black", "price": "199.00"}]
        }
    ]})
    .to_string()
}
