//! Storefront cart responses.

use std::collections::HashMap;

use serde::Deserialize;
use shopcart_core::{CartId, Checkout, CheckoutId, LineItem, LineItemId, Money, VariantId};
use tracing::warn;

use super::{Lenient, Text, UserErrors, check_user_errors, graphql_data};
use crate::error::ResponseError;

/// Variant title used when the merchandise has none.
pub const UNKNOWN_VARIANT: &str = "Unknown Variant";
/// Product title used when the merchandise has none.
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";

// Response shapes. Every field is optional; required ones are checked by
// the functions that read them.

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CartLinesData {
    cart: Lenient<CartLines>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CartLines {
    lines: Lenient<CartLineConnection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CartLineConnection {
    page_info: Lenient<PageInfo>,
    edges: Lenient<Vec<Lenient<CartLineEdge>>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PageInfo {
    has_next_page: Lenient<bool>,
    end_cursor: Lenient<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CartLineEdge {
    node: Lenient<CartLineNode>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CartLineNode {
    id: Lenient<String>,
    quantity: Lenient<u32>,
    merchandise: Lenient<Merchandise>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Merchandise {
    id: Lenient<String>,
    title: Lenient<String>,
    product: Lenient<MerchandiseProduct>,
    price_v2: Lenient<PriceV2>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MerchandiseProduct {
    title: Lenient<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PriceV2 {
    amount: Lenient<Text>,
    currency_code: Lenient<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CartPayload {
    cart: Lenient<CartRef>,
    user_errors: UserErrors,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CartRef {
    id: Lenient<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CheckoutCreateData {
    checkout_create: Lenient<CheckoutCreatePayload>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CheckoutCreatePayload {
    checkout: Lenient<CheckoutNode>,
    checkout_user_errors: UserErrors,
    user_errors: UserErrors,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CheckoutNode {
    id: Lenient<String>,
    web_url: Lenient<String>,
}

/// Paging state of one `cart.lines` response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CartLinesPage {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
    pub edge_count: usize,
}

/// Reconciles cart line edges into unique line items.
///
/// Edges that share a line ID collapse into the first emitted item; their
/// quantities are summed and the first edge's description is kept. Survives
/// across pages so duplicates split by pagination still merge.
#[derive(Debug, Default)]
pub struct LineItemAccumulator {
    items: Vec<LineItem>,
    seen: HashMap<LineItemId, usize>,
}

impl LineItemAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct line items so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The reconciled items in first-seen order.
    #[must_use]
    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }

    fn push_edge(&mut self, node: &CartLineNode) {
        let Some((id, quantity)) = line_identity(node) else {
            return;
        };
        let id = LineItemId::new(id);

        if let Some(item) = self
            .seen
            .get(&id)
            .and_then(|&index| self.items.get_mut(index))
        {
            item.quantity = item.quantity.saturating_add(quantity);
            return;
        }

        let merchandise = node.merchandise.get();
        let variant_title = merchandise
            .and_then(|m| m.title.get())
            .map_or(UNKNOWN_VARIANT, String::as_str);
        let product_title = merchandise
            .and_then(|m| m.product.get())
            .and_then(|p| p.title.get())
            .map_or(UNKNOWN_PRODUCT, String::as_str);
        let price = merchandise.and_then(|m| m.price_v2.get());
        let (Some(amount), Some(currency_code)) = (
            price.and_then(|p| p.amount.non_empty()),
            price.and_then(|p| p.currency_code.get()),
        ) else {
            warn!(line_item_id = %id, "Skipping cart line without price");
            return;
        };

        self.seen.insert(id.clone(), self.items.len());
        self.items.push(LineItem {
            line_item_id: id,
            product_title: product_title.to_string(),
            variant_title: variant_title.to_string(),
            quantity,
            unit_price: Money::new(amount, currency_code.as_str()),
        });
    }
}

/// `(id, quantity)` of a line node, or `None` if either is unusable.
fn line_identity(node: &CartLineNode) -> Option<(&str, u32)> {
    let id = node.id.non_empty();
    let quantity = node.quantity.get().copied().filter(|&q| q >= 1);

    match (id, quantity) {
        (Some(id), Some(quantity)) => Some((id, quantity)),
        _ => {
            warn!(line_item_id = ?id, "Skipping cart line without id or quantity");
            None
        }
    }
}

/// Split a `cart.lines` response into its edge nodes and paging state.
fn cart_lines_page(body: &str) -> Result<(Vec<CartLineNode>, CartLinesPage), ResponseError> {
    let data: CartLinesData = graphql_data(body)?;
    let cart = data
        .cart
        .into_inner()
        .ok_or_else(|| ResponseError::missing("data.cart"))?;
    let lines = cart.lines.into_inner().unwrap_or_default();
    let edges = lines
        .edges
        .into_inner()
        .ok_or_else(|| ResponseError::missing("data.cart.lines.edges"))?;
    let page_info = lines.page_info.into_inner().unwrap_or_default();

    let page = CartLinesPage {
        has_next_page: page_info.has_next_page.get().copied().unwrap_or(false),
        end_cursor: page_info.end_cursor.into_inner(),
        edge_count: edges.len(),
    };
    let nodes = edges
        .into_iter()
        .filter_map(|edge| edge.into_inner()?.node.into_inner())
        .collect();

    Ok((nodes, page))
}

/// Parse one page of cart lines into `accumulator`.
///
/// # Errors
///
/// Returns `ResponseError` if the body is not valid JSON, carries GraphQL
/// errors, or lacks `data.cart.lines.edges`.
pub fn parse_cart_lines(
    body: &str,
    accumulator: &mut LineItemAccumulator,
) -> Result<CartLinesPage, ResponseError> {
    let (nodes, page) = cart_lines_page(body)?;
    for node in &nodes {
        accumulator.push_edge(node);
    }
    Ok(page)
}

/// Parse a single cart lines response into reconciled line items.
///
/// # Errors
///
/// Same as [`parse_cart_lines`].
pub fn reconcile_cart_lines(body: &str) -> Result<Vec<LineItem>, ResponseError> {
    let mut accumulator = LineItemAccumulator::new();
    parse_cart_lines(body, &mut accumulator)?;
    Ok(accumulator.into_items())
}

/// Parse one page of cart lines into `(variant, quantity)` pairs.
///
/// Lines are not merged; each edge with a variant and quantity yields one
/// pair.
///
/// # Errors
///
/// Same as [`parse_cart_lines`].
pub fn parse_checkout_lines(
    body: &str,
    lines: &mut Vec<(VariantId, u32)>,
) -> Result<CartLinesPage, ResponseError> {
    let (nodes, page) = cart_lines_page(body)?;
    for node in &nodes {
        let Some((line_item_id, quantity)) = line_identity(node) else {
            continue;
        };
        match node.merchandise.get().and_then(|m| m.id.non_empty()) {
            Some(variant_id) => lines.push((VariantId::new(variant_id), quantity)),
            None => warn!(line_item_id, "Skipping cart line without merchandise id"),
        }
    }
    Ok(page)
}

/// Parse a cart mutation payload found under `data.{root}`.
fn parse_cart_payload(body: &str, root: &str) -> Result<CartId, ResponseError> {
    let mut data: HashMap<String, Lenient<CartPayload>> = graphql_data(body)?;
    let missing_id = || ResponseError::missing(&format!("data.{root}.cart.id"));
    let payload = data
        .remove(root)
        .and_then(Lenient::into_inner)
        .ok_or_else(missing_id)?;

    check_user_errors(payload.user_errors)?;
    payload
        .cart
        .get()
        .and_then(|cart| cart.id.non_empty())
        .map(CartId::new)
        .ok_or_else(missing_id)
}

/// Parse a `cartCreate` response.
///
/// # Errors
///
/// Returns `ResponseError` if `data.cartCreate.cart.id` is absent or empty.
pub fn parse_cart_create(body: &str) -> Result<CartId, ResponseError> {
    parse_cart_payload(body, "cartCreate")
}

/// Parse a `cartLinesAdd` or `cartLinesRemove` response.
///
/// `root` is the mutation field name.
///
/// # Errors
///
/// Returns `ResponseError` on GraphQL or user errors, or if
/// `data.{root}.cart.id` is absent.
pub fn parse_lines_mutation(body: &str, root: &str) -> Result<CartId, ResponseError> {
    parse_cart_payload(body, root)
}

/// Parse a `checkoutCreate` response.
///
/// # Errors
///
/// Returns `ResponseError` on GraphQL or checkout user errors, or if the
/// checkout ID or web URL is absent or empty.
pub fn parse_checkout_create(body: &str) -> Result<Checkout, ResponseError> {
    let data: CheckoutCreateData = graphql_data(body)?;
    let payload = data.checkout_create.into_inner().unwrap_or_default();
    check_user_errors(payload.checkout_user_errors)?;
    check_user_errors(payload.user_errors)?;

    let checkout = payload.checkout.into_inner().unwrap_or_default();
    let id = checkout
        .id
        .non_empty()
        .ok_or_else(|| ResponseError::missing("data.checkoutCreate.checkout.id"))?;
    let web_url = checkout
        .web_url
        .non_empty()
        .ok_or_else(|| ResponseError::missing("data.checkoutCreate.checkout.webUrl"))?;

    Ok(Checkout {
        id: CheckoutId::new(id),
        web_url: web_url.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn edge(id: &str, quantity: u32, variant: &str, product: &str, amount: &str) -> Value {
        json!({"node": {
            "id": id,
            "quantity": quantity,
            "merchandise": {
                "id": "gid://shopify/ProductVariant/1",
                "title": variant,
                "product": {"id": "gid://shopify/Product/1", "title": product},
                "priceV2": {"amount": amount, "currencyCode": "USD"}
            }
        }})
    }

    fn lines_body(edges: Vec<Value>, has_next_page: bool, cursor: Option<&str>) -> String {
        json!({"data": {"cart": {"id": "C", "lines": {
            "pageInfo": {"hasNextPage": has_next_page, "endCursor": cursor},
            "edges": edges
        }}}})
        .to_string()
    }

    #[test]
    fn test_duplicate_lines_reconcile() {
        let body = lines_body(
            vec![
                edge("L1", 2, "Small", "Tee", "10.00"),
                edge("L2", 1, "Large", "Hat", "5.00"),
                edge("L1", 3, "Renamed", "Other", "99.00"),
            ],
            false,
            None,
        );
        let items = reconcile_cart_lines(&body).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].line_item_id.as_str(), "L1");
        assert_eq!(items[0].quantity, 5);
        assert_eq!(items[0].variant_title, "Small");
        assert_eq!(items[0].product_title, "Tee");
        assert_eq!(items[0].unit_price, Money::new("10.00", "USD"));
        assert_eq!(items[1].line_item_id.as_str(), "L2");
    }

    #[test]
    fn test_duplicates_merge_across_pages() {
        let mut accumulator = LineItemAccumulator::new();
        let first = lines_body(vec![edge("L1", 1, "S", "Tee", "1.00")], true, Some("c1"));
        let page = parse_cart_lines(&first, &mut accumulator).unwrap();
        assert!(page.has_next_page);
        assert_eq!(page.end_cursor.as_deref(), Some("c1"));

        let second = lines_body(vec![edge("L1", 4, "S", "Tee", "1.00")], false, None);
        parse_cart_lines(&second, &mut accumulator).unwrap();

        let items = accumulator.into_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 5);
    }

    #[test]
    fn test_missing_titles_use_placeholders() {
        let body = json!({"data": {"cart": {"lines": {"edges": [{"node": {
            "id": "L1",
            "quantity": 1,
            "merchandise": {"priceV2": {"amount": "3.50", "currencyCode": "EUR"}}
        }}]}}}})
        .to_string();
        let items = reconcile_cart_lines(&body).unwrap();
        assert_eq!(items[0].variant_title, UNKNOWN_VARIANT);
        assert_eq!(items[0].product_title, UNKNOWN_PRODUCT);
    }

    #[test]
    fn test_edges_without_price_are_skipped() {
        let body = json!({"data": {"cart": {"lines": {"edges": [
            {"node": {"id": "L1", "quantity": 1, "merchandise": {"title": "S"}}},
            {"node": {"id": "L2", "quantity": 1, "merchandise": {
                "priceV2": {"amount": "1.00"}
            }}}
        ]}}}})
        .to_string();
        assert!(reconcile_cart_lines(&body).unwrap().is_empty());
    }

    #[test]
    fn test_edges_without_id_or_quantity_are_skipped() {
        let mut missing_id = edge("L1", 1, "S", "Tee", "1.00");
        missing_id["node"].as_object_mut().unwrap().remove("id");
        let mut zero_quantity = edge("L2", 1, "S", "Tee", "1.00");
        zero_quantity["node"]["quantity"] = json!(0);
        let mut text_quantity = edge("L3", 1, "S", "Tee", "1.00");
        text_quantity["node"]["quantity"] = json!("2");

        let body = lines_body(vec![missing_id, zero_quantity, text_quantity], false, None);
        assert!(reconcile_cart_lines(&body).unwrap().is_empty());
    }

    #[test]
    fn test_zero_edges_is_empty() {
        let body = lines_body(vec![], false, None);
        let mut accumulator = LineItemAccumulator::new();
        let page = parse_cart_lines(&body, &mut accumulator).unwrap();
        assert_eq!(page.edge_count, 0);
        assert!(accumulator.is_empty());
    }

    #[test]
    fn test_missing_cart_is_malformed() {
        assert_eq!(
            reconcile_cart_lines(r#"{"data": {"cart": null}}"#),
            Err(ResponseError::missing("data.cart"))
        );
        assert_eq!(
            reconcile_cart_lines(r#"{"data": {"cart": {"id": "C"}}}"#),
            Err(ResponseError::missing("data.cart.lines.edges"))
        );
    }

    #[test]
    fn test_checkout_lines_keep_duplicates() {
        let body = lines_body(
            vec![
                edge("L1", 2, "S", "Tee", "1.00"),
                edge("L1", 1, "S", "Tee", "1.00"),
            ],
            false,
            None,
        );
        let mut lines = Vec::new();
        parse_checkout_lines(&body, &mut lines).unwrap();
        assert_eq!(
            lines,
            vec![
                (VariantId::new("gid://shopify/ProductVariant/1"), 2),
                (VariantId::new("gid://shopify/ProductVariant/1"), 1),
            ]
        );
    }

    #[test]
    fn test_parse_cart_create() {
        let body = r#"{"data": {"cartCreate": {"cart": {"id": "gid://shopify/Cart/abc"}}}}"#;
        assert_eq!(
            parse_cart_create(body).unwrap(),
            CartId::new("gid://shopify/Cart/abc")
        );
    }

    #[test]
    fn test_parse_cart_create_rejects_empty_id() {
        let body = r#"{"data": {"cartCreate": {"cart": {"id": ""}}}}"#;
        assert_eq!(
            parse_cart_create(body),
            Err(ResponseError::missing("data.cartCreate.cart.id"))
        );
    }

    #[test]
    fn test_parse_lines_mutation() {
        let body = r#"{"data": {"cartLinesRemove": {"cart": {"id": "C"}, "userErrors": []}}}"#;
        assert_eq!(
            parse_lines_mutation(body, "cartLinesRemove").unwrap(),
            CartId::new("C")
        );
        assert!(parse_lines_mutation(body, "cartLinesAdd").is_err());
    }

    #[test]
    fn test_parse_lines_mutation_user_errors() {
        let body = r#"{"data": {"cartLinesAdd": {"cart": null, "userErrors": [
            {"field": ["lines"], "message": "Merchandise does not exist"}
        ]}}}"#;
        let Err(ResponseError::GraphQl(errors)) = parse_lines_mutation(body, "cartLinesAdd") else {
            panic!("expected user errors");
        };
        assert_eq!(errors[0].message, "Merchandise does not exist");
    }

    #[test]
    fn test_parse_checkout_create() {
        let body = r#"{"data": {"checkoutCreate": {
            "checkout": {"id": "gid://shopify/Checkout/1", "webUrl": "https://shop.example/c/1"},
            "checkoutUserErrors": []
        }}}"#;
        let checkout = parse_checkout_create(body).unwrap();
        assert_eq!(checkout.id.as_str(), "gid://shopify/Checkout/1");
        assert_eq!(checkout.web_url, "https://shop.example/c/1");
    }

    #[test]
    fn test_parse_checkout_create_requires_web_url() {
        let body = r#"{"data": {"checkoutCreate": {"checkout": {"id": "X", "webUrl": ""}}}}"#;
        assert_eq!(
            parse_checkout_create(body),
            Err(ResponseError::missing("data.checkoutCreate.checkout.webUrl"))
        );
    }

    #[test]
    fn test_wrong_shaped_fields_fall_back() {
        let body = json!({"data": {"cart": {"lines": {
            "pageInfo": {"hasNextPage": "yes", "endCursor": 3},
            "edges": [
                "not an edge",
                {"node": {
                    "id": "L1",
                    "quantity": 2,
                    "merchandise": {
                        "title": 7,
                        "product": "Tee",
                        "priceV2": {"amount": 4.5, "currencyCode": "USD"}
                    }
                }}
            ]
        }}}})
        .to_string();
        let mut accumulator = LineItemAccumulator::new();
        let page = parse_cart_lines(&body, &mut accumulator).unwrap();
        assert!(!page.has_next_page);
        assert_eq!(page.end_cursor, None);
        assert_eq!(page.edge_count, 2);

        let items = accumulator.into_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].variant_title, UNKNOWN_VARIANT);
        assert_eq!(items[0].product_title, UNKNOWN_PRODUCT);
        assert_eq!(items[0].unit_price, Money::new("4.5", "USD"));
    }
}
