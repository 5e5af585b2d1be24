//! Callback-style access for hosts that are not async.
//!
//! [`SessionHandle`] starts each operation on a tokio runtime and returns at
//! once. When the operation finishes, its callback is posted to a
//! [`CompletionQueue`], and the host runs it on its own thread by calling
//! [`CompletionQueue::drain`] (for example once per frame).

use std::future::Future;

use shopcart_core::{CartId, Checkout, LineItem, LineItemId, Product, ProductId, VariantId};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::warn;

use crate::cart::CartCreation;
use crate::error::SessionError;
use crate::state::ShopState;

type Completion = Box<dyn FnOnce() + Send + 'static>;

/// Completions waiting to run on the host thread.
pub struct CompletionQueue {
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl CompletionQueue {
    /// Run every completion that has arrived. Returns how many ran.
    pub fn drain(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(completion) = self.rx.try_recv() {
            completion();
            ran += 1;
        }
        ran
    }

    /// Wait for the next completion and run it.
    ///
    /// Returns `false` once every [`SessionHandle`] is gone and the queue
    /// is empty.
    pub async fn next(&mut self) -> bool {
        match self.rx.recv().await {
            Some(completion) => {
                completion();
                true
            }
            None => false,
        }
    }
}

/// Callback-style front for a [`ShopState`].
///
/// Every operation invokes its callback exactly once, from
/// [`CompletionQueue::drain`] or [`CompletionQueue::next`], as long as the
/// queue is still alive.
#[derive(Clone)]
pub struct SessionHandle {
    state: ShopState,
    runtime: Handle,
    completions: mpsc::UnboundedSender<Completion>,
}

impl SessionHandle {
    /// Create a handle that runs operations on `runtime`, and the queue its
    /// completions arrive on.
    #[must_use]
    pub fn new(state: ShopState, runtime: Handle) -> (Self, CompletionQueue) {
        let (completions, rx) = mpsc::unbounded_channel();
        (
            Self {
                state,
                runtime,
                completions,
            },
            CompletionQueue { rx },
        )
    }

    /// The state operations run against.
    #[must_use]
    pub const fn state(&self) -> &ShopState {
        &self.state
    }

    fn dispatch<T, Fut, F>(&self, operation: &'static str, future: Fut, callback: F)
    where
        T: Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        F: FnOnce(T) + Send + 'static,
    {
        let completions = self.completions.clone();
        self.runtime.spawn(async move {
            let result = future.await;
            if completions
                .send(Box::new(move || callback(result)))
                .is_err()
            {
                warn!(operation, "Completion queue dropped, discarding result");
            }
        });
    }

    /// See [`CartSession::create_cart`](crate::CartSession::create_cart).
    pub fn create_cart<F>(&self, callback: F)
    where
        F: FnOnce(Result<CartCreation, SessionError>) + Send + 'static,
    {
        let state = self.state.clone();
        self.dispatch(
            "create_cart",
            async move { state.cart().create_cart().await },
            callback,
        );
    }

    /// See [`CartSession::add_line_item`](crate::CartSession::add_line_item).
    pub fn add_line_item<F>(&self, cart_id: CartId, variant_id: VariantId, callback: F)
    where
        F: FnOnce(Result<(), SessionError>) + Send + 'static,
    {
        let state = self.state.clone();
        self.dispatch(
            "add_line_item",
            async move { state.cart().add_line_item(&cart_id, &variant_id).await },
            callback,
        );
    }

    /// See [`CartSession::remove_line_item`](crate::CartSession::remove_line_item).
    pub fn remove_line_item<F>(&self, cart_id: CartId, line_item_id: LineItemId, callback: F)
    where
        F: FnOnce(Result<(), SessionError>) + Send + 'static,
    {
        let state = self.state.clone();
        self.dispatch(
            "remove_line_item",
            async move { state.cart().remove_line_item(&cart_id, &line_item_id).await },
            callback,
        );
    }

    /// See [`CartSession::fetch_line_items`](crate::CartSession::fetch_line_items).
    pub fn fetch_line_items<F>(&self, cart_id: CartId, callback: F)
    where
        F: FnOnce(Vec<LineItem>) + Send + 'static,
    {
        let state = self.state.clone();
        self.dispatch(
            "fetch_line_items",
            async move { state.cart().fetch_line_items(&cart_id).await },
            callback,
        );
    }

    /// See [`CartSession::create_checkout`](crate::CartSession::create_checkout).
    pub fn create_checkout<F>(&self, cart_id: CartId, callback: F)
    where
        F: FnOnce(Result<Checkout, SessionError>) + Send + 'static,
    {
        let state = self.state.clone();
        self.dispatch(
            "create_checkout",
            async move { state.cart().create_checkout(&cart_id).await },
            callback,
        );
    }

    /// See [`ProductCatalog::fetch_all`](crate::ProductCatalog::fetch_all).
    pub fn fetch_products<F>(&self, callback: F)
    where
        F: FnOnce(Result<usize, SessionError>) + Send + 'static,
    {
        let state = self.state.clone();
        self.dispatch(
            "fetch_products",
            async move { state.catalog().fetch_all().await },
            callback,
        );
    }

    #[must_use]
    pub fn stored_cart_id(&self) -> Option<CartId> {
        self.state.cart().stored_cart_id()
    }

    #[must_use]
    pub fn is_catalog_fetched(&self) -> bool {
        self.state.catalog().is_fetched()
    }

    #[must_use]
    pub fn product(&self, id: &ProductId) -> Option<Product> {
        self.state.catalog().product(id)
    }
}
