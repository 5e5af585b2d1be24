//! HTTP transport boundary.
//!
//! The session never talks to `reqwest` directly. It builds an
//! [`HttpRequest`], hands it to an [`HttpClient`], and interprets the
//! [`HttpResponse`]. The trait is object-safe so the composition root can
//! hold any transport behind `Arc<dyn HttpClient>`.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::error::{SessionError, TransportError};

/// Content type for JSON-encoded GraphQL requests.
pub const CONTENT_TYPE_JSON: &str = "application/json";
/// Content type for raw GraphQL documents.
pub const CONTENT_TYPE_GRAPHQL: &str = "application/graphql";

/// Longest body prefix written to logs and error messages.
const LOGGED_BODY_CHARS: usize = 500;

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    /// Upper-case method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// A request for the transport to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// A GET request without headers.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    /// A POST request carrying `body`.
    #[must_use]
    pub fn post(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            headers: BTreeMap::new(),
            body: Some(body.into()),
        }
    }

    /// Add a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// A completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Executes HTTP requests asynchronously.
///
/// Implementations report a connection-level failure as `Err` and any
/// response that arrived, whatever its status, as `Ok`.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// [`HttpClient`] backed by `reqwest`.
#[derive(Clone, Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Create a client with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing `reqwest` client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}

/// Truncate a body for logging.
pub(crate) fn excerpt(body: &str) -> String {
    body.chars().take(LOGGED_BODY_CHARS).collect()
}

/// Send a request and return the body of a 200 response.
///
/// Applies the per-call deadline. Transport failures, timeouts and non-200
/// statuses are logged here with the operation name.
pub(crate) async fn send(
    http: &dyn HttpClient,
    operation: &'static str,
    request: HttpRequest,
    timeout: Duration,
) -> Result<String, SessionError> {
    debug!(
        operation,
        method = request.method.as_str(),
        url = %request.url,
        body = %request.body.as_deref().map(excerpt).unwrap_or_default(),
        "Sending Shopify request"
    );

    let response = match tokio::time::timeout(timeout, http.execute(request)).await {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            error!(operation, error = %e, "HTTP request failed");
            return Err(SessionError::Transport(e));
        }
        Err(_) => {
            error!(operation, ?timeout, "HTTP request timed out");
            return Err(SessionError::Timeout(timeout));
        }
    };

    debug!(
        operation,
        status = response.status,
        body = %excerpt(&response.body),
        "Shopify response received"
    );

    if response.status != 200 {
        error!(
            operation,
            status = response.status,
            body = %excerpt(&response.body),
            "Shopify API returned unexpected status"
        );
        return Err(SessionError::UnexpectedStatus {
            status: response.status,
            body: excerpt(&response.body),
        });
    }

    Ok(response.body)
}
