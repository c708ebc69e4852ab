//! Connection configuration and secure-mode authorization.
//!
//! This module provides descriptor parsing, service endpoint configuration,
//! and the OAuth exchange used by secure-mode statements.
//!
//! # Example
//!
//! ```
//! use yql_rs::connection::{ConnectionParams, TransportMode};
//!
//! // Parse from a descriptor
//! let params = ConnectionParams::parse("consumer-key|consumer-secret");
//! assert_eq!(params.mode(), TransportMode::Secure);
//!
//! // Or build programmatically
//! let params = ConnectionParams::builder()
//!     .environment("store://datatables.org/alltableswithkeys")
//!     .build();
//! assert_eq!(params.mode(), TransportMode::Public);
//! ```

pub mod auth;
pub mod params;

pub use auth::{ConsolePinProvider, OAuthSession, PinProvider, StaticPinProvider};
pub use params::{
    ConnectionParams, ConnectionParamsBuilder, Credentials, ServiceEndpoints, TransportMode,
};
