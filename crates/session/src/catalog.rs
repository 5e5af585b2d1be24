//! Product catalog fetched from the Admin API.
//!
//! The catalog is fetched at most once per process and never refreshed.
//! Readers that need it can check [`ProductCatalog::is_fetched`] or wait on
//! [`ProductCatalog::wait_until_fetched`].

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use shopcart_core::{Product, ProductId};
use tokio::sync::{Mutex, watch};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::config::ShopConfig;
use crate::error::{PreconditionViolation, SessionError};
use crate::http::{CONTENT_TYPE_JSON, HttpClient, HttpRequest, excerpt, send};
use crate::shopify::ADMIN_TOKEN_HEADER;
use crate::shopify::parse::parse_products;

/// All products of the shop, keyed by ID.
pub struct ProductCatalog {
    config: Arc<ShopConfig>,
    http: Arc<dyn HttpClient>,
    products: RwLock<HashMap<ProductId, Product>>,
    fetched: watch::Sender<bool>,
    fetch_lock: Mutex<()>,
}

impl ProductCatalog {
    #[must_use]
    pub fn new(config: Arc<ShopConfig>, http: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            http,
            products: RwLock::new(HashMap::new()),
            fetched: watch::Sender::new(false),
            fetch_lock: Mutex::new(()),
        }
    }

    /// Fetch every product and open the fetched gate.
    ///
    /// Returns the number of products held. Once a fetch has succeeded,
    /// later calls return immediately without a request. Concurrent calls
    /// share a single request.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the admin API is not configured, the
    /// request fails, or the body has no `products` array. The gate stays
    /// closed.
    #[instrument(skip(self), fields(op_id = %Uuid::new_v4()))]
    pub async fn fetch_all(&self) -> Result<usize, SessionError> {
        let _guard = self.fetch_lock.lock().await;
        if self.is_fetched() {
            debug!("Product catalog already fetched");
            return Ok(self.len());
        }

        if !self.config.has_admin() {
            warn!("Admin API is not configured, cannot fetch products");
            return Err(PreconditionViolation::MissingConfig("admin API").into());
        }

        let request = HttpRequest::get(self.config.admin_products_url())
            .header("Content-Type", CONTENT_TYPE_JSON)
            .header(ADMIN_TOKEN_HEADER, self.config.admin_access_token());
        let body = send(
            self.http.as_ref(),
            "fetch_products",
            request,
            self.config.request_timeout(),
        )
        .await?;

        let products = parse_products(&body).map_err(|e| {
            error!(error = %e, body = %excerpt(&body), "Failed to parse product listing");
            SessionError::from(e)
        })?;
        let count = products.len();

        *self.products.write().unwrap_or_else(PoisonError::into_inner) = products
            .into_iter()
            .map(|product| (product.id.clone(), product))
            .collect();
        self.fetched.send_replace(true);

        info!(count, "Product catalog fetched");
        Ok(count)
    }

    /// Whether a fetch has succeeded.
    #[must_use]
    pub fn is_fetched(&self) -> bool {
        *self.fetched.borrow()
    }

    /// Wait until a fetch has succeeded. Returns at once if one already has.
    pub async fn wait_until_fetched(&self) {
        let mut rx = self.fetched.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = rx.wait_for(|fetched| *fetched).await;
    }

    /// A product by ID. `None` if unknown or not fetched yet.
    #[must_use]
    pub fn product(&self, id: &ProductId) -> Option<Product> {
        self.products
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// All products, ordered by title.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        let mut products: Vec<Product> = self
            .products
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        products.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));
        products
    }

    /// Number of products held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
