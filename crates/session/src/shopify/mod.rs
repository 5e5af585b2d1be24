//! Shopify Storefront and Admin API wire formats.
//!
//! # Architecture
//!
//! - Request documents and bodies live in [`queries`]
//! - Response bodies are interpreted by the pure functions in [`parse`]
//! - Shopify is source of truth - NO local cart mirror beyond the cart ID
//!
//! # APIs
//!
//! ## Storefront API (GraphQL)
//! - Cart create, line add/remove, line listing, checkout create
//! - Authenticated with `X-Shopify-Storefront-Access-Token`
//!
//! ## Admin API (REST)
//! - Product listing (`GET {admin}/products.json`)
//! - Authenticated with `X-Shopify-Access-Token`

pub mod parse;
pub mod queries;

/// Header carrying the storefront access token.
pub const STOREFRONT_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";
/// Header carrying the admin access token.
pub const ADMIN_TOKEN_HEADER: &str = "X-Shopify-Access-Token";
