//! Test doubles for the transport and URL opener.
//!
//! Available to this crate's tests and, with the `testing` feature, to
//! other crates.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::config::ShopConfig;
use crate::error::TransportError;
use crate::http::{HttpClient, HttpRequest, HttpResponse};
use crate::opener::{OpenError, UrlOpener};

/// Storefront endpoint used by [`test_config`].
pub const TEST_STOREFRONT_URL: &str = "https://shop.example/api/2024-07/graphql.json";
/// Admin base URL used by [`test_config`].
pub const TEST_ADMIN_URL: &str = "https://shop.example/admin/api/2024-07";

/// A fully populated config pointing at `shop.example`.
#[must_use]
pub fn test_config() -> ShopConfig {
    ShopConfig::new(TEST_STOREFRONT_URL, "sf-token", TEST_ADMIN_URL, "admin-token")
}

enum Scripted {
    Respond(HttpResponse),
    Delayed(Duration, HttpResponse),
    Fail(TransportError),
    Hang,
}

/// An [`HttpClient`] that replays scripted outcomes in order and records
/// every request it receives.
///
/// A request arriving after the script is exhausted fails with a
/// transport error.
#[derive(Default)]
pub struct FakeHttpClient {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl FakeHttpClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, outcome: Scripted) -> &Self {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(outcome);
        self
    }

    /// Respond 200 with `body`.
    pub fn push_ok(&self, body: impl Into<String>) -> &Self {
        self.push(Scripted::Respond(HttpResponse {
            status: 200,
            body: body.into(),
        }))
    }

    /// Respond 200 with `body` after `delay`.
    pub fn push_ok_after(&self, delay: Duration, body: impl Into<String>) -> &Self {
        self.push(Scripted::Delayed(
            delay,
            HttpResponse {
                status: 200,
                body: body.into(),
            },
        ))
    }

    /// Respond with `status` and `body`.
    pub fn push_status(&self, status: u16, body: impl Into<String>) -> &Self {
        self.push(Scripted::Respond(HttpResponse {
            status,
            body: body.into(),
        }))
    }

    /// Fail at the transport level.
    pub fn push_transport_error(&self, message: impl Into<String>) -> &Self {
        self.push(Scripted::Fail(TransportError(message.into())))
    }

    /// Never respond.
    pub fn push_hang(&self) -> &Self {
        self.push(Scripted::Hang)
    }

    /// Requests received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl HttpClient for FakeHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        let next = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        match next {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Delayed(delay, response)) => {
                tokio::time::sleep(delay).await;
                Ok(response)
            }
            Some(Scripted::Fail(err)) => Err(err),
            Some(Scripted::Hang) => std::future::pending().await,
            None => Err(TransportError("no scripted response".to_string())),
        }
    }
}

/// A [`UrlOpener`] that records URLs instead of opening them.
#[derive(Default)]
pub struct RecordingOpener {
    opened: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingOpener {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An opener that records the URL and then reports failure.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            opened: Mutex::default(),
            fail: true,
        }
    }

    /// URLs passed to `open`, in order.
    #[must_use]
    pub fn opened(&self) -> Vec<String> {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl UrlOpener for RecordingOpener {
    fn open(&self, url: &str) -> Result<(), OpenError> {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());
        if self.fail {
            return Err(OpenError {
                url: url.to_string(),
                reason: "no browser available".to_string(),
            });
        }
        Ok(())
    }
}
