//! Shopcart session library.
//!
//! Cart and product catalog state for a Shopify store. Talks to the
//! Storefront API (GraphQL) for carts and checkouts and to the Admin API
//! (REST) for products.
//!
//! # Example
//!
//! ```no_run
//! use shopcart_session::{ShopConfig, ShopState};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let state = ShopState::with_defaults(ShopConfig::from_env()?);
//! let cart_id = state.cart().create_cart().await?.into_cart_id();
//! state.catalog().fetch_all().await?;
//! for product in state.catalog().products() {
//!     if let Some((variant_id, _)) = product.cart_variants().next() {
//!         state.cart().add_line_item(&cart_id, &variant_id).await?;
//!     }
//! }
//! for line in state.cart().fetch_line_items(&cart_id).await {
//!     println!("{line}");
//! }
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod bridge;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod http;
pub mod opener;
pub mod shopify;
pub mod state;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use bridge::{CompletionQueue, SessionHandle};
pub use cart::{CartCreation, CartSession, MAX_LINE_PAGES};
pub use catalog::ProductCatalog;
pub use config::{ConfigError, DEFAULT_CONFIG_PATH, ShopConfig};
pub use error::{
    GraphQlError, GraphQlErrorLocation, PreconditionViolation, ResponseError, SessionError,
    TransportError,
};
pub use http::{HttpClient, HttpRequest, HttpResponse, Method, ReqwestHttpClient};
pub use opener::{OpenError, SystemBrowser, UrlOpener};
pub use state::ShopState;
