//! GraphQL documents for the Shopify Storefront API.
//!
//! Mutations that take caller-supplied IDs send them as variables in a
//! JSON body (`application/json`). The line listings and the checkout
//! mutation are sent as raw documents (`application/graphql`), so every
//! string spliced into them goes through [`string_literal`].

use graphql_client::QueryBody;
use serde::Serialize;
use shopcart_core::{CartId, LineItemId, VariantId};

/// Number of cart lines requested per page.
pub const LINE_PAGE_SIZE: usize = 10;

/// Cart creation. Sent verbatim as `{"query": ...}`.
pub const CART_CREATE: &str = "mutation { cartCreate { cart { id } } }";

const CART_LINES_ADD: &str = "mutation cartLinesAdd($cartId: ID!, $lines: [CartLineInput!]!) { \
cartLinesAdd(cartId: $cartId, lines: $lines) { cart { id } userErrors { field message } } }";

const CART_LINES_REMOVE: &str = "mutation cartLinesRemove($cartId: ID!, $lineIds: [ID!]!) { \
cartLinesRemove(cartId: $cartId, lineIds: $lineIds) { cart { id } userErrors { field message } } }";

/// Variables for `cartLinesAdd`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLinesAddVariables {
    pub cart_id: String,
    pub lines: Vec<CartLineInput>,
}

/// One line to add.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    pub quantity: u32,
    pub merchandise_id: String,
}

/// Variables for `cartLinesRemove`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLinesRemoveVariables {
    pub cart_id: String,
    pub line_ids: Vec<String>,
}

/// JSON body for the cart creation mutation.
#[must_use]
pub fn cart_create_body() -> String {
    serde_json::json!({ "query": CART_CREATE }).to_string()
}

/// `cartLinesAdd` adding one unit of `variant_id`.
#[must_use]
pub fn cart_lines_add(cart_id: &CartId, variant_id: &VariantId) -> QueryBody<CartLinesAddVariables> {
    QueryBody {
        variables: CartLinesAddVariables {
            cart_id: cart_id.to_string(),
            lines: vec![CartLineInput {
                quantity: 1,
                merchandise_id: variant_id.to_string(),
            }],
        },
        query: CART_LINES_ADD,
        operation_name: "cartLinesAdd",
    }
}

/// `cartLinesRemove` removing exactly `line_item_id`.
#[must_use]
pub fn cart_lines_remove(
    cart_id: &CartId,
    line_item_id: &LineItemId,
) -> QueryBody<CartLinesRemoveVariables> {
    QueryBody {
        variables: CartLinesRemoveVariables {
            cart_id: cart_id.to_string(),
            line_ids: vec![line_item_id.to_string()],
        },
        query: CART_LINES_REMOVE,
        operation_name: "cartLinesRemove",
    }
}

/// Quote a value as a GraphQL string literal.
///
/// GraphQL string escapes are a superset of what JSON emits, so the JSON
/// encoding of the value is a valid literal.
#[must_use]
pub fn string_literal(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

fn lines_arguments(after: Option<&str>) -> String {
    after.map_or_else(
        || format!("first: {LINE_PAGE_SIZE}"),
        |cursor| format!("first: {LINE_PAGE_SIZE}, after: {}", string_literal(cursor)),
    )
}

/// Cart lines with product, variant and price details.
#[must_use]
pub fn cart_lines_query(cart_id: &CartId, after: Option<&str>) -> String {
    format!(
        "{{ cart(id: {id}) {{ id lines({args}) {{ pageInfo {{ hasNextPage endCursor }} edges {{ node {{ \
id merchandise {{ ... on ProductVariant {{ id title product {{ id title }} priceV2 {{ amount currencyCode }} }} }} \
quantity }} }} }} }} }}",
        id = string_literal(cart_id.as_str()),
        args = lines_arguments(after),
    )
}

/// Cart lines reduced to variant ID and quantity, for building a checkout.
#[must_use]
pub fn checkout_lines_query(cart_id: &CartId, after: Option<&str>) -> String {
    format!(
        "{{ cart(id: {id}) {{ id lines({args}) {{ pageInfo {{ hasNextPage endCursor }} edges {{ node {{ \
id merchandise {{ ... on ProductVariant {{ id title }} }} quantity }} }} }} }} }}",
        id = string_literal(cart_id.as_str()),
        args = lines_arguments(after),
    )
}

/// Format `(variant, quantity)` pairs as a `lineItems` list body.
///
/// Produces `{ variantId: "...", quantity: N }` entries joined by `", "`.
#[must_use]
pub fn format_checkout_line_items(lines: &[(VariantId, u32)]) -> String {
    lines
        .iter()
        .map(|(variant_id, quantity)| {
            format!(
                "{{ variantId: {}, quantity: {quantity} }}",
                string_literal(variant_id.as_str())
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// `checkoutCreate` for the given lines.
#[must_use]
pub fn checkout_create_mutation(lines: &[(VariantId, u32)]) -> String {
    format!(
        "mutation {{ checkoutCreate(input: {{ lineItems: [{}] }}) {{ checkout {{ id webUrl }} \
checkoutUserErrors {{ field message }} }} }}",
        format_checkout_line_items(lines)
    )
}
