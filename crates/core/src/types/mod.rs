//! Core types for shopcart.
//!
//! This module provides type-safe wrappers for cart and catalog concepts.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;

pub use cart::{Checkout, LineItem, subtotal};
pub use id::*;
pub use price::{Money, PriceError};
pub use product::{Product, ProductVariant};
