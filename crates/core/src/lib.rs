//! Shopcart Core - Shared types library.
//!
//! This crate provides the types shared by the shopcart components:
//! - `session` - Cart session and product catalog backed by Shopify
//! - `cli` - Host application driving the session from a terminal
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere,
//! including from renderers that only read product and cart data.
//!
//! # Modules
//!
//! - [`types`] - Global ID newtypes, money, line items, products

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
