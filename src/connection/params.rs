//! Connection descriptor parsing and service endpoint configuration.
//!
//! A descriptor is one pipe-delimited string:
//! `"" | "<env>" | "<key>|<secret>" | "<key>|<secret>|<env>"`.
//! Parsing never fails; credential validity is only discovered when a
//! statement executes.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Separator between descriptor fields.
pub const DESCRIPTOR_SEPARATOR: char = '|';

/// Public query endpoint.
pub const DEFAULT_QUERY_URL: &str = "https://query.yahooapis.com/v1/public/yql";

/// OAuth request-token endpoint.
pub const DEFAULT_REQUEST_TOKEN_URL: &str = "https://api.login.yahoo.com/oauth/v2/get_request_token";

/// OAuth access-token endpoint.
pub const DEFAULT_ACCESS_TOKEN_URL: &str = "https://api.login.yahoo.com/oauth/v2/get_token";

/// OAuth user authorization page.
pub const DEFAULT_AUTHORIZE_URL: &str = "https://api.login.yahoo.com/oauth/v2/request_auth";

/// How statements reach the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    /// Plain query-string GET without authentication
    Public,
    /// OAuth-signed GET after an interactive token exchange
    Secure,
}

/// Consumer credentials for secure mode.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Consumer key
    pub key: String,
    /// Consumer secret (never logged)
    secret: String,
}

impl Credentials {
    /// Create new credentials.
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }

    /// Get the consumer secret (for internal use only, never logged).
    pub(crate) fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

// Clear the secret from memory on drop.
impl Drop for Credentials {
    fn drop(&mut self) {
        self.secret.clear();
    }
}

/// Parsed connection descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionParams {
    /// Consumer credentials, present for `key|secret[|env]` descriptors
    pub credentials: Option<Credentials>,
    /// Environment qualifier sent as `env` in public mode
    pub environment: Option<String>,
}

impl ConnectionParams {
    /// Parse a descriptor string.
    ///
    /// # Examples
    ///
    /// ```
    /// use yql_rs::connection::ConnectionParams;
    ///
    /// let params = ConnectionParams::parse("key|secret|store://datatables.org/alltableswithkeys");
    /// assert_eq!(params.credentials.as_ref().map(|c| c.key.as_str()), Some("key"));
    ///
    /// let params = ConnectionParams::parse("store://datatables.org/alltableswithkeys");
    /// assert!(params.credentials.is_none());
    /// ```
    pub fn parse(descriptor: &str) -> Self {
        let parts: Vec<&str> = descriptor.split(DESCRIPTOR_SEPARATOR).collect();
        match parts.as_slice() {
            [key, secret] => Self {
                credentials: Some(Credentials::new(*key, *secret)),
                environment: None,
            },
            [key, secret, environment] => Self {
                credentials: Some(Credentials::new(*key, *secret)),
                environment: non_empty(environment),
            },
            _ => Self {
                credentials: None,
                environment: non_empty(descriptor),
            },
        }
    }

    /// Create a new builder.
    pub fn builder() -> ConnectionParamsBuilder {
        ConnectionParamsBuilder::new()
    }

    /// Transport mode selected by these parameters.
    ///
    /// Secure mode requires a non-empty consumer key.
    pub fn mode(&self) -> TransportMode {
        match &self.credentials {
            Some(credentials) if !credentials.key.is_empty() => TransportMode::Secure,
            _ => TransportMode::Public,
        }
    }

    /// Environment qualifier, if configured.
    pub fn environment(&self) -> Option<&str> {
        self.environment.as_deref()
    }
}

impl FromStr for ConnectionParams {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = self
            .credentials
            .as_ref()
            .map(|c| c.key.as_str())
            .unwrap_or("");
        write!(
            f,
            "ConnectionParams {{ mode: {:?}, key: {}, environment: {:?} }}",
            self.mode(),
            key,
            self.environment
        )
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Builder for constructing ConnectionParams.
#[derive(Debug, Clone, Default)]
pub struct ConnectionParamsBuilder {
    credentials: Option<Credentials>,
    environment: Option<String>,
}

impl ConnectionParamsBuilder {
    /// Create a new builder with no credentials and no environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the consumer credentials.
    pub fn credentials(mut self, key: &str, secret: &str) -> Self {
        self.credentials = Some(Credentials::new(key, secret));
        self
    }

    /// Set the environment qualifier.
    pub fn environment(mut self, environment: &str) -> Self {
        self.environment = non_empty(environment);
        self
    }

    /// Build the parameters.
    pub fn build(self) -> ConnectionParams {
        ConnectionParams {
            credentials: self.credentials,
            environment: self.environment,
        }
    }
}

/// Service URLs used by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoints {
    /// Query endpoint for both modes
    pub query_url: String,
    /// OAuth request-token endpoint
    pub request_token_url: String,
    /// OAuth access-token endpoint
    pub access_token_url: String,
    /// Authorization page, used when the service does not return one
    pub authorize_url: String,
}

impl ServiceEndpoints {
    /// Override the query endpoint.
    pub fn with_query_url(mut self, url: impl Into<String>) -> Self {
        self.query_url = url.into();
        self
    }

    /// Override the request-token endpoint.
    pub fn with_request_token_url(mut self, url: impl Into<String>) -> Self {
        self.request_token_url = url.into();
        self
    }

    /// Override the access-token endpoint.
    pub fn with_access_token_url(mut self, url: impl Into<String>) -> Self {
        self.access_token_url = url.into();
        self
    }

    /// Override the authorization page.
    pub fn with_authorize_url(mut self, url: impl Into<String>) -> Self {
        self.authorize_url = url.into();
        self
    }
}

impl Default for ServiceEndpoints {
    fn default() -> Self {
        Self {
            query_url: DEFAULT_QUERY_URL.to_string(),
            request_token_url: DEFAULT_REQUEST_TOKEN_URL.to_string(),
            access_token_url: DEFAULT_ACCESS_TOKEN_URL.to_string(),
            authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_secret() {
        let params = ConnectionParams::parse("k|s");
        let credentials = params.credentials.as_ref().unwrap();
        assert_eq!(credentials.key, "k");
        assert_eq!(credentials.secret(), "s");
        assert_eq!(params.environment(), None);
        assert_eq!(params.mode(), TransportMode::Secure);
    }

    #[test]
    fn test_parse_key_secret_env() {
        let params = ConnectionParams::parse("k|s|env1");
        let credentials = params.credentials.as_ref().unwrap();
        assert_eq!(credentials.key, "k");
        assert_eq!(credentials.secret(), "s");
        assert_eq!(params.environment(), Some("env1"));
    }

    #[test]
    fn test_parse_environment_only() {
        let params = ConnectionParams::parse("env1");
        assert!(params.credentials.is_none());
        assert_eq!(params.environment(), Some("env1"));
        assert_eq!(params.mode(), TransportMode::Public);
    }

    #[test]
    fn test_parse_empty() {
        let params = ConnectionParams::parse("");
        assert!(params.credentials.is_none());
        assert_eq!(params.environment(), None);
        assert_eq!(params, ConnectionParams::default());
    }

    #[test]
    fn test_parse_too_many_separators_is_environment() {
        let params = ConnectionParams::parse("a|b|c|d");
        assert!(params.credentials.is_none());
        assert_eq!(params.environment(), Some("a|b|c|d"));
    }

    #[test]
    fn test_parse_empty_environment_field() {
        let params = ConnectionParams::parse("k|s|");
        assert!(params.credentials.is_some());
        assert_eq!(params.environment(), None);
    }

    #[test]
    fn test_empty_key_selects_public_mode() {
        let params = ConnectionParams::parse("|s");
        assert!(params.credentials.is_some());
        assert_eq!(params.mode(), TransportMode::Public);
    }

    #[test]
    fn test_from_str() {
        let params: ConnectionParams = "k|s|env1".parse().unwrap();
        assert_eq!(params.environment(), Some("env1"));
    }

    #[test]
    fn test_builder() {
        let params = ConnectionParams::builder()
            .credentials("key", "secret")
            .environment("store://datatables.org/alltableswithkeys")
            .build();

        assert_eq!(params.mode(), TransportMode::Secure);
        assert_eq!(
            params.environment(),
            Some("store://datatables.org/alltableswithkeys")
        );
        assert_eq!(params, ConnectionParams::parse("key|secret|store://datatables.org/alltableswithkeys"));
    }

    #[test]
    fn test_secret_not_in_debug_or_display() {
        let params = ConnectionParams::parse("key|hunter2|env");
        assert!(!format!("{:?}", params).contains("hunter2"));
        assert!(!format!("{}", params).contains("hunter2"));
        assert!(format!("{}", params).contains("key"));
    }

    #[test]
    fn test_default_endpoints() {
        let endpoints = ServiceEndpoints::default();
        assert_eq!(endpoints.query_url, DEFAULT_QUERY_URL);
        assert_eq!(endpoints.request_token_url, DEFAULT_REQUEST_TOKEN_URL);
        assert_eq!(endpoints.access_token_url, DEFAULT_ACCESS_TOKEN_URL);
    }

    #[test]
    fn test_endpoint_overrides() {
        let endpoints = ServiceEndpoints::default()
            .with_query_url("http://localhost:8080/yql")
            .with_authorize_url("http://localhost:8080/auth");
        assert_eq!(endpoints.query_url, "http://localhost:8080/yql");
        assert_eq!(endpoints.authorize_url, "http://localhost:8080/auth");
        assert_eq!(endpoints.access_token_url, DEFAULT_ACCESS_TOKEN_URL);
    }
}
