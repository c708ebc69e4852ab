//! HTTP transport implementation backed by `reqwest`.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::TransportError;

use super::protocol::{HttpRequest, HttpResponse, HttpTransport, TransportConfig};

/// HTTP transport implementation.
///
/// Owns one `reqwest::Client`, which pools its own sockets. Clone the `Arc`
/// holding the transport to share it between drivers.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    config: TransportConfig,
}

impl ReqwestTransport {
    /// Create a new transport from configuration.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Configuration` if the client cannot be built
    /// (for example when no TLS backend is available).
    pub fn new(config: TransportConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| TransportError::Configuration(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Get the transport configuration.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url()?;
        debug!(host = url.host_str().unwrap_or(""), path = url.path(), "sending GET");

        let mut builder = self.client.get(url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        debug!(status, bytes = body.len(), "response received");
        Ok(HttpResponse::new(status, body.to_vec()))
    }
}
