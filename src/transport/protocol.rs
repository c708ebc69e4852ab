//! Transport protocol abstraction trait.
//!
//! This module defines the `HttpTransport` trait that abstracts the HTTP client
//! used to reach the query service, together with the request and response
//! types that cross that seam. Connections receive an explicitly constructed
//! transport instead of reaching for a process-wide client.

use crate::error::TransportError;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Total request timeout
    pub request_timeout: Duration,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl TransportConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(5),
            user_agent: format!("yql-rs/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the total request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// An outbound GET request.
///
/// Query parameters are kept as ordered pairs so that the exact parameter set
/// can be inspected before it is encoded into a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Base URL without query string
    pub base_url: String,
    /// Query parameters in insertion order
    pub query: Vec<(String, String)>,
    /// Extra request headers
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// Create a GET request for the given base URL.
    pub fn get(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            query: Vec::new(),
            headers: Vec::new(),
        }
    }

    /// Append a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Look up a query parameter by name.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Look up a header by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Build the full URL with the form-encoded query string.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::InvalidUrl` if the base URL cannot be parsed.
    pub fn url(&self) -> Result<Url, TransportError> {
        if self.query.is_empty() {
            return Ok(Url::parse(&self.base_url)?);
        }
        Ok(Url::parse_with_params(&self.base_url, &self.query)?)
    }
}

/// A fully received HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a response.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Check for a 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as lossy UTF-8 text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Transport trait for reaching the query service.
///
/// Each call performs exactly one request and resolves once the full body has
/// been received. Implementations must not retry.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send a GET request and read the whole response.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` for connection, timeout or protocol failures.
    /// A non-success status is not an error at this layer.
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}
