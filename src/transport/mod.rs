//! Transport layer for reaching the YQL web service.
//!
//! This module provides the transport abstraction, its `reqwest`-backed
//! implementation, and the OAuth 1.0a signing used in secure mode.
//!
//! # Architecture
//!
//! The transport layer is organized into:
//! - `protocol` - `HttpTransport` trait plus request/response types
//! - `http` - `reqwest` implementation of the trait
//! - `oauth` - HMAC-SHA1 request signing
//!
//! # Example
//!
//! ```no_run
//! use yql_rs::transport::{HttpRequest, HttpTransport, ReqwestTransport, TransportConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = ReqwestTransport::new(TransportConfig::default())?;
//!
//! let request = HttpRequest::get("https://query.yahooapis.com/v1/public/yql")
//!     .with_query("q", "select * from weather.forecast where woeid = 2502265")
//!     .with_query("format", "json");
//!
//! let response = transport.send(&request).await?;
//! println!("HTTP {}", response.status);
//! # Ok(())
//! # }
//! ```

pub mod http;
pub mod oauth;
pub mod protocol;

// Re-export commonly used types
pub use http::ReqwestTransport;
pub use oauth::{OAuthSigner, OAuthToken};
pub use protocol::{HttpRequest, HttpResponse, HttpTransport, TransportConfig};
