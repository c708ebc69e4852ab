//! Driver implementation.
//!
//! This module provides the `Driver` type which carries metadata about the
//! yql-rs driver, owns the shared transport and PIN collaborator, and serves
//! as a factory for `Connection` instances.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::client::Connection;
use crate::connection::auth::{ConsolePinProvider, PinProvider};
use crate::connection::params::{ConnectionParams, ServiceEndpoints};
use crate::error::TransportError;
use crate::transport::{HttpTransport, ReqwestTransport, TransportConfig};

/// Registration name of the driver.
pub const DRIVER_NAME: &str = "yql";

/// Driver for the YQL query service.
///
/// The transport is constructed by the caller and handed in explicitly;
/// every connection opened from this driver shares it.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use yql_rs::transport::{ReqwestTransport, TransportConfig};
/// use yql_rs::Driver;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = Arc::new(ReqwestTransport::new(TransportConfig::default())?);
/// let driver = Driver::new(transport);
/// println!("Driver: {} v{}", driver.name(), driver.version());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Driver {
    /// Driver name
    name: String,
    /// Driver version
    version: String,
    /// Vendor name
    vendor: String,
    /// Driver description
    description: String,
    /// Shared HTTP transport
    transport: Arc<dyn HttpTransport>,
    /// Source of OAuth verifiers in secure mode
    pin_provider: Arc<dyn PinProvider>,
    /// Service URLs
    endpoints: ServiceEndpoints,
}

impl Driver {
    /// Create a driver over the given transport.
    ///
    /// Secure-mode PINs are read from the console unless another provider is
    /// set with [`Driver::with_pin_provider`].
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            name: DRIVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            vendor: "yql-rs contributors".to_string(),
            description: "Relational-client driver for the YQL HTTP query service".to_string(),
            transport,
            pin_provider: Arc::new(ConsolePinProvider),
            endpoints: ServiceEndpoints::default(),
        }
    }

    /// Create a driver over a `ReqwestTransport` with default configuration.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Configuration` if the HTTP client cannot be
    /// built.
    pub fn with_default_transport() -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new(TransportConfig::default())?;
        Ok(Self::new(Arc::new(transport)))
    }

    /// Replace the PIN collaborator used in secure mode.
    pub fn with_pin_provider(mut self, pin_provider: Arc<dyn PinProvider>) -> Self {
        self.pin_provider = pin_provider;
        self
    }

    /// Replace the service URLs.
    pub fn with_endpoints(mut self, endpoints: ServiceEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Get the driver name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the driver version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Get the vendor name.
    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    /// Get the driver description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Get the configured service URLs.
    pub fn endpoints(&self) -> &ServiceEndpoints {
        &self.endpoints
    }

    /// Open a connection from a descriptor.
    ///
    /// The descriptor is `""`, `"<env>"`, `"<key>|<secret>"` or
    /// `"<key>|<secret>|<env>"`. Parsing never fails and nothing is sent
    /// over the network; invalid credentials only surface at execution time.
    pub fn open(&self, descriptor: &str) -> Connection {
        self.connect(ConnectionParams::parse(descriptor))
    }

    /// Open a connection from already-built parameters.
    pub fn connect(&self, params: ConnectionParams) -> Connection {
        debug!(mode = ?params.mode(), "opening connection");
        Connection::new(
            Arc::clone(&self.transport),
            params,
            self.endpoints.clone(),
            Arc::clone(&self.pin_provider),
        )
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} v{} ({})", self.name, self.version, self.vendor)
    }
}

impl fmt::Debug for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("endpoints", &self.endpoints)
            .finish()
    }
}
