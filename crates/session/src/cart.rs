//! Cart session against the Storefront API.
//!
//! # Architecture
//!
//! - Holds at most one cart ID for its lifetime; nothing else is cached
//! - Every line listing is fetched fresh and reconciled
//! - Each operation completes exactly once with a `Result`
//!
//! Operations against the same cart are not ordered with each other.
//! Callers that need ordering await one operation before starting the
//! next.

use std::sync::{Arc, PoisonError, RwLock};

use shopcart_core::{CartId, Checkout, LineItem, LineItemId, VariantId};
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::config::ShopConfig;
use crate::error::{PreconditionViolation, ResponseError, SessionError, TransportError};
use crate::http::{
    CONTENT_TYPE_GRAPHQL, CONTENT_TYPE_JSON, HttpClient, HttpRequest, excerpt, send,
};
use crate::opener::UrlOpener;
use crate::shopify::STOREFRONT_TOKEN_HEADER;
use crate::shopify::parse::{
    CartLinesPage, LineItemAccumulator, parse_cart_create, parse_cart_lines,
    parse_checkout_create, parse_checkout_lines, parse_lines_mutation,
};
use crate::shopify::queries;

/// Most `cart.lines` pages read by one listing.
pub const MAX_LINE_PAGES: usize = 25;

/// Outcome of [`CartSession::create_cart`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartCreation {
    /// A new cart was created and stored.
    Created(CartId),
    /// A cart was already stored; no request was sent.
    Existing(CartId),
}

impl CartCreation {
    #[must_use]
    pub const fn cart_id(&self) -> &CartId {
        match self {
            Self::Created(id) | Self::Existing(id) => id,
        }
    }

    #[must_use]
    pub fn into_cart_id(self) -> CartId {
        match self {
            Self::Created(id) | Self::Existing(id) => id,
        }
    }

    /// Whether this call created the cart.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// The stateful cart client.
pub struct CartSession {
    config: Arc<ShopConfig>,
    http: Arc<dyn HttpClient>,
    opener: Arc<dyn UrlOpener>,
    cart_id: RwLock<Option<CartId>>,
    create_lock: Mutex<()>,
}

fn parse_failure(operation: &'static str, body: &str, err: ResponseError) -> SessionError {
    error!(operation, error = %err, body = %excerpt(body), "Failed to interpret Shopify response");
    err.into()
}

fn refuse(operation: &'static str, violation: PreconditionViolation) -> SessionError {
    warn!(operation, reason = %violation, "Refusing cart operation");
    violation.into()
}

fn encode<T: serde::Serialize>(body: &T) -> Result<String, SessionError> {
    serde_json::to_string(body)
        .map_err(|e| TransportError(format!("failed to encode request: {e}")).into())
}

impl CartSession {
    #[must_use]
    pub fn new(
        config: Arc<ShopConfig>,
        http: Arc<dyn HttpClient>,
        opener: Arc<dyn UrlOpener>,
    ) -> Self {
        Self {
            config,
            http,
            opener,
            cart_id: RwLock::new(None),
            create_lock: Mutex::new(()),
        }
    }

    /// The cart ID stored by a successful [`create_cart`](Self::create_cart).
    #[must_use]
    pub fn stored_cart_id(&self) -> Option<CartId> {
        self.cart_id
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn storefront_request(
        &self,
        operation: &'static str,
        body: String,
        content_type: &str,
    ) -> Result<HttpRequest, SessionError> {
        if !self.config.has_storefront() {
            return Err(refuse(
                operation,
                PreconditionViolation::MissingConfig("storefront API"),
            ));
        }
        Ok(HttpRequest::post(self.config.storefront_api_link(), body)
            .header("Content-Type", content_type)
            .header(STOREFRONT_TOKEN_HEADER, self.config.storefront_access_token()))
    }

    async fn post(
        &self,
        operation: &'static str,
        body: String,
        content_type: &str,
    ) -> Result<String, SessionError> {
        let request = self.storefront_request(operation, body, content_type)?;
        send(
            self.http.as_ref(),
            operation,
            request,
            self.config.request_timeout(),
        )
        .await
    }

    /// Create the session's cart.
    ///
    /// If a cart is already stored, returns it as
    /// [`CartCreation::Existing`] without sending a request. Concurrent
    /// calls send at most one request.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the request fails or the response has no
    /// cart ID. No ID is stored in that case.
    #[instrument(skip(self), fields(op_id = %Uuid::new_v4()))]
    pub async fn create_cart(&self) -> Result<CartCreation, SessionError> {
        let _guard = self.create_lock.lock().await;
        if let Some(existing) = self.stored_cart_id() {
            warn!(cart_id = %existing, "Cart already exists, not creating another");
            return Ok(CartCreation::Existing(existing));
        }

        let body = self
            .post("create_cart", queries::cart_create_body(), CONTENT_TYPE_JSON)
            .await?;
        let cart_id =
            parse_cart_create(&body).map_err(|e| parse_failure("create_cart", &body, e))?;

        *self.cart_id.write().unwrap_or_else(PoisonError::into_inner) = Some(cart_id.clone());
        info!(cart_id = %cart_id, "Cart created");
        Ok(CartCreation::Created(cart_id))
    }

    /// Add one unit of a variant to a cart.
    ///
    /// Bare admin variant IDs are namespaced before sending.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Precondition` without sending a request if
    /// either ID is empty, otherwise any transport, status or GraphQL
    /// failure.
    #[instrument(skip(self), fields(cart_id = %cart_id, variant_id = %variant_id, op_id = %Uuid::new_v4()))]
    pub async fn add_line_item(
        &self,
        cart_id: &CartId,
        variant_id: &VariantId,
    ) -> Result<(), SessionError> {
        if cart_id.is_empty() {
            return Err(refuse("add_line_item", PreconditionViolation::EmptyCartId));
        }
        if variant_id.is_empty() {
            return Err(refuse("add_line_item", PreconditionViolation::EmptyVariantId));
        }

        let variant_id = variant_id.normalized();
        let request = encode(&queries::cart_lines_add(cart_id, &variant_id))?;
        let body = self
            .post("add_line_item", request, CONTENT_TYPE_JSON)
            .await?;
        parse_lines_mutation(&body, "cartLinesAdd")
            .map_err(|e| parse_failure("add_line_item", &body, e))?;

        info!(merchandise_id = %variant_id, "Line item added");
        Ok(())
    }

    /// Remove a line from a cart.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Precondition` without sending a request if
    /// either ID is empty, otherwise any transport, status or GraphQL
    /// failure.
    #[instrument(skip(self), fields(cart_id = %cart_id, line_item_id = %line_item_id, op_id = %Uuid::new_v4()))]
    pub async fn remove_line_item(
        &self,
        cart_id: &CartId,
        line_item_id: &LineItemId,
    ) -> Result<(), SessionError> {
        if cart_id.is_empty() {
            return Err(refuse("remove_line_item", PreconditionViolation::EmptyCartId));
        }
        if line_item_id.is_empty() {
            return Err(refuse(
                "remove_line_item",
                PreconditionViolation::EmptyLineItemId,
            ));
        }

        let request = encode(&queries::cart_lines_remove(cart_id, line_item_id))?;
        let body = self
            .post("remove_line_item", request, CONTENT_TYPE_JSON)
            .await?;
        parse_lines_mutation(&body, "cartLinesRemove")
            .map_err(|e| parse_failure("remove_line_item", &body, e))?;

        info!("Line item removed");
        Ok(())
    }

    /// List a cart's lines, or an empty list on any failure.
    ///
    /// Failures are logged. Use [`try_fetch_line_items`](Self::try_fetch_line_items)
    /// to see them.
    pub async fn fetch_line_items(&self, cart_id: &CartId) -> Vec<LineItem> {
        self.try_fetch_line_items(cart_id).await.unwrap_or_default()
    }

    /// List a cart's lines with duplicate lines merged.
    ///
    /// Follows pagination up to [`MAX_LINE_PAGES`] pages.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the cart ID is empty, any page request
    /// fails, or a page lacks `data.cart.lines.edges`.
    #[instrument(skip(self), fields(cart_id = %cart_id, op_id = %Uuid::new_v4()))]
    pub async fn try_fetch_line_items(
        &self,
        cart_id: &CartId,
    ) -> Result<Vec<LineItem>, SessionError> {
        if cart_id.is_empty() {
            return Err(refuse("fetch_line_items", PreconditionViolation::EmptyCartId));
        }

        let mut accumulator = LineItemAccumulator::new();
        self.read_line_pages(
            "fetch_line_items",
            cart_id,
            queries::cart_lines_query,
            |body| parse_cart_lines(body, &mut accumulator),
        )
        .await?;

        info!(count = accumulator.len(), "Cart lines fetched");
        Ok(accumulator.into_items())
    }

    /// Create a checkout for a cart's contents and open its URL.
    ///
    /// Reads the cart's lines, then creates the checkout from them. Lines
    /// added or removed between the two requests are not reflected. A URL
    /// that fails to open is logged and does not fail the checkout.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the cart ID is empty, the cart has no
    /// lines, or either request fails.
    #[instrument(skip(self), fields(cart_id = %cart_id, op_id = %Uuid::new_v4()))]
    pub async fn create_checkout(&self, cart_id: &CartId) -> Result<Checkout, SessionError> {
        if cart_id.is_empty() {
            return Err(refuse("create_checkout", PreconditionViolation::EmptyCartId));
        }

        let mut lines = Vec::new();
        self.read_line_pages(
            "create_checkout",
            cart_id,
            queries::checkout_lines_query,
            |body| parse_checkout_lines(body, &mut lines),
        )
        .await?;
        if lines.is_empty() {
            return Err(refuse("create_checkout", PreconditionViolation::EmptyCart));
        }

        let body = self
            .post(
                "create_checkout",
                queries::checkout_create_mutation(&lines),
                CONTENT_TYPE_GRAPHQL,
            )
            .await?;
        let checkout = parse_checkout_create(&body)
            .map_err(|e| parse_failure("create_checkout", &body, e))?;
        info!(checkout_id = %checkout.id, lines = lines.len(), "Checkout created");

        if let Err(e) = self.opener.open(&checkout.web_url) {
            error!(error = %e, "Failed to open checkout URL");
        }
        Ok(checkout)
    }

    /// Request `cart.lines` pages until the server reports no more, feeding
    /// each body to `parse`. Returns the number of pages read.
    async fn read_line_pages<F>(
        &self,
        operation: &'static str,
        cart_id: &CartId,
        query: fn(&CartId, Option<&str>) -> String,
        mut parse: F,
    ) -> Result<usize, SessionError>
    where
        F: FnMut(&str) -> Result<CartLinesPage, ResponseError>,
    {
        let mut after: Option<String> = None;
        for page_number in 1..=MAX_LINE_PAGES {
            let body = self
                .post(
                    operation,
                    query(cart_id, after.as_deref()),
                    CONTENT_TYPE_GRAPHQL,
                )
                .await?;
            let page = parse(&body).map_err(|e| parse_failure(operation, &body, e))?;

            match page.end_cursor {
                Some(cursor) if page.has_next_page => after = Some(cursor),
                _ => return Ok(page_number),
            }
        }

        warn!(operation, pages = MAX_LINE_PAGES, "Cart line listing truncated at page limit");
        Ok(MAX_LINE_PAGES)
    }
}
