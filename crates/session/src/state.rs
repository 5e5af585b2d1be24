//! Composition root for a shop session.

use std::sync::Arc;

use crate::cart::CartSession;
use crate::catalog::ProductCatalog;
use crate::config::ShopConfig;
use crate::http::{HttpClient, ReqwestHttpClient};
use crate::opener::{SystemBrowser, UrlOpener};

/// Cart session and product catalog sharing one config and transport.
///
/// This struct is cheaply cloneable via `Arc`; clones share the same cart
/// and catalog.
#[derive(Clone)]
pub struct ShopState {
    inner: Arc<ShopStateInner>,
}

struct ShopStateInner {
    config: Arc<ShopConfig>,
    cart: CartSession,
    catalog: ProductCatalog,
}

impl ShopState {
    /// Wire a session from explicit collaborators.
    #[must_use]
    pub fn new(
        config: ShopConfig,
        http: Arc<dyn HttpClient>,
        opener: Arc<dyn UrlOpener>,
    ) -> Self {
        let config = Arc::new(config);
        let cart = CartSession::new(config.clone(), http.clone(), opener);
        let catalog = ProductCatalog::new(config.clone(), http);

        Self {
            inner: Arc::new(ShopStateInner {
                config,
                cart,
                catalog,
            }),
        }
    }

    /// Wire a session over `reqwest` that opens checkouts in the system
    /// browser.
    #[must_use]
    pub fn with_defaults(config: ShopConfig) -> Self {
        Self::new(
            config,
            Arc::new(ReqwestHttpClient::new()),
            Arc::new(SystemBrowser::new()),
        )
    }

    /// Get a reference to the shop configuration.
    #[must_use]
    pub fn config(&self) -> &ShopConfig {
        &self.inner.config
    }

    /// Get a reference to the cart session.
    #[must_use]
    pub fn cart(&self) -> &CartSession {
        &self.inner.cart
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &ProductCatalog {
        &self.inner.catalog
    }
}
