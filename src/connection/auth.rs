//! Secure-mode authorization.
//!
//! Secure mode performs the OAuth 1.0a out-of-band flow on every execution:
//!
//! 1. fetch a request token (`oauth_callback=oob`)
//! 2. hand the authorization URL to a [`PinProvider`] and wait for the PIN
//! 3. exchange the request token and PIN for an access token
//!
//! The access token signs exactly one query request and is then dropped.
//!
//! Step 2 is an unbounded wait on a human when [`ConsolePinProvider`] is used.
//! Nothing else in the call chain makes progress while it waits.

use std::io::{BufRead, Write};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::connection::params::{Credentials, ServiceEndpoints};
use crate::error::{ConnectionError, QueryError, TransportError};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, OAuthSigner, OAuthToken};

/// Source of the one-time verification code shown to the user after they
/// approve access at the authorization URL.
#[async_trait]
pub trait PinProvider: Send + Sync {
    /// Obtain the verifier for `authorization_url`.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError::PinUnavailable` if no code can be produced.
    async fn request_pin(&self, authorization_url: &str) -> Result<String, ConnectionError>;
}

/// Prompts on stdout and reads the PIN from stdin.
///
/// The read runs on the blocking pool and waits until a line is entered.
/// Reads go through the process-wide stdin buffer, so PINs piped in
/// one per line are consumed one per execution.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsolePinProvider;

#[async_trait]
impl PinProvider for ConsolePinProvider {
    async fn request_pin(&self, authorization_url: &str) -> Result<String, ConnectionError> {
        let prompt = format!(
            "Open {} in your browser.\nAllow access and then enter the PIN number\nPIN Number: ",
            authorization_url
        );

        tokio::task::spawn_blocking(move || {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(prompt.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(|e| ConnectionError::PinUnavailable(e.to_string()))?;
            read_pin(&mut std::io::stdin().lock())
        })
        .await
        .map_err(|e| ConnectionError::PinUnavailable(e.to_string()))?
    }
}

/// Read one line from `reader` and return it trimmed as the PIN.
fn read_pin<R: BufRead>(reader: &mut R) -> Result<String, ConnectionError> {
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .map_err(|e| ConnectionError::PinUnavailable(e.to_string()))?;

    let pin = line.trim();
    if pin.is_empty() {
        return Err(ConnectionError::PinUnavailable("no PIN entered".to_string()));
    }
    Ok(pin.to_string())
}

/// Returns a fixed PIN. Useful for automation where the code was obtained
/// out of band.
#[derive(Debug, Clone)]
pub struct StaticPinProvider {
    pin: String,
}

impl StaticPinProvider {
    /// Create a provider that always answers `pin`.
    pub fn new(pin: impl Into<String>) -> Self {
        Self { pin: pin.into() }
    }
}

#[async_trait]
impl PinProvider for StaticPinProvider {
    async fn request_pin(&self, _authorization_url: &str) -> Result<String, ConnectionError> {
        Ok(self.pin.clone())
    }
}

/// A request token together with the page the user must visit.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    /// Request token issued by the service
    pub token: OAuthToken,
    /// Page that shows the PIN after the user approves
    pub authorization_url: String,
}

/// Performs the out-of-band OAuth exchange for one set of consumer
/// credentials.
pub struct OAuthSession<'a> {
    signer: OAuthSigner,
    endpoints: &'a ServiceEndpoints,
    transport: &'a dyn HttpTransport,
}

impl<'a> OAuthSession<'a> {
    /// Create a session for the given credentials.
    pub fn new(
        credentials: &Credentials,
        endpoints: &'a ServiceEndpoints,
        transport: &'a dyn HttpTransport,
    ) -> Self {
        Self {
            signer: OAuthSigner::new(credentials.key.clone(), credentials.secret()),
            endpoints,
            transport,
        }
    }

    /// Run the full exchange and return an access token.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::Transport` for network or token endpoint failures
    /// and `QueryError::Connection` when no PIN is available.
    pub async fn authorize(&self, pins: &dyn PinProvider) -> Result<OAuthToken, QueryError> {
        info!(consumer_key = self.signer.consumer_key(), "starting OAuth exchange");

        let authorization = self.request_authorization().await?;
        let pin = pins.request_pin(&authorization.authorization_url).await?;
        let access = self.access_token(&authorization.token, &pin).await?;

        info!("OAuth exchange complete");
        Ok(access)
    }

    /// Sign a request with an access token.
    pub fn sign(
        &self,
        request: HttpRequest,
        access: &OAuthToken,
    ) -> Result<HttpRequest, TransportError> {
        self.signer.sign(request, Some(access), &[])
    }

    /// Fetch a request token and build its authorization URL.
    pub async fn request_authorization(&self) -> Result<AuthorizationRequest, TransportError> {
        let request = self.signer.sign(
            HttpRequest::get(&self.endpoints.request_token_url),
            None,
            &[("oauth_callback", "oob")],
        )?;
        let response = self.transport.send(&request).await?;
        let fields = token_response_fields(&self.endpoints.request_token_url, &response)?;

        let token = token_from_fields(&fields)?;
        let authorization_url = match field(&fields, "xoauth_request_auth_url") {
            Some(url) => url.to_string(),
            None => {
                let mut url = url::Url::parse(&self.endpoints.authorize_url)?;
                url.query_pairs_mut().append_pair("oauth_token", &token.token);
                url.to_string()
            }
        };

        debug!(%authorization_url, "request token issued");
        Ok(AuthorizationRequest {
            token,
            authorization_url,
        })
    }

    /// Exchange a request token and PIN for an access token.
    pub async fn access_token(
        &self,
        request_token: &OAuthToken,
        pin: &str,
    ) -> Result<OAuthToken, TransportError> {
        let request = self.signer.sign(
            HttpRequest::get(&self.endpoints.access_token_url),
            Some(request_token),
            &[("oauth_verifier", pin)],
        )?;
        let response = self.transport.send(&request).await?;
        let fields = token_response_fields(&self.endpoints.access_token_url, &response)?;
        token_from_fields(&fields)
    }
}

/// Decode a form-encoded token response, rejecting non-success statuses.
fn token_response_fields(
    url: &str,
    response: &HttpResponse,
) -> Result<Vec<(String, String)>, TransportError> {
    if !response.is_success() {
        return Err(TransportError::HttpStatus {
            status: response.status,
            url: url.to_string(),
            body: response.text(),
        });
    }
    Ok(url::form_urlencoded::parse(&response.body)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect())
}

fn field<'f>(fields: &'f [(String, String)], name: &str) -> Option<&'f str> {
    fields
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

fn token_from_fields(fields: &[(String, String)]) -> Result<OAuthToken, TransportError> {
    let token = field(fields, "oauth_token").ok_or_else(|| {
        TransportError::InvalidResponse("token response has no oauth_token".to_string())
    })?;
    let secret = field(fields, "oauth_token_secret").ok_or_else(|| {
        TransportError::InvalidResponse("token response has no oauth_token_secret".to_string())
    })?;
    Ok(OAuthToken::new(token, secret))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::mock;
    use mockall::predicate::always;

    mock! {
        pub Transport {}

        #[async_trait]
        impl HttpTransport for Transport {
            async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
        }
    }

    mock! {
        pub Pins {}

        #[async_trait]
        impl PinProvider for Pins {
            async fn request_pin(&self, authorization_url: &str) -> Result<String, ConnectionError>;
        }
    }

    fn credentials() -> Credentials {
        Credentials::new("consumer-key", "consumer-secret")
    }

    #[tokio::test]
    async fn test_static_pin_provider() {
        let provider = StaticPinProvider::new("123456");
        assert_eq!(
            provider.request_pin("https://example.com").await.unwrap(),
            "123456"
        );
    }

    #[test]
    fn test_read_pin_consumes_one_line_per_call() {
        let mut input = std::io::Cursor::new(b"111\n  222 \n".to_vec());

        assert_eq!(read_pin(&mut input).unwrap(), "111");
        assert_eq!(read_pin(&mut input).unwrap(), "222");

        let err = read_pin(&mut input).unwrap_err();
        assert!(matches!(err, ConnectionError::PinUnavailable(_)));
    }

    #[test]
    fn test_read_pin_rejects_blank_line() {
        let mut input = std::io::Cursor::new(b"\n".to_vec());
        let err = read_pin(&mut input).unwrap_err();
        assert!(matches!(err, ConnectionError::PinUnavailable(_)));
    }

    #[tokio::test]
    async fn test_request_authorization_uses_service_url() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|r| {
                r.base_url == crate::connection::params::DEFAULT_REQUEST_TOKEN_URL
                    && r.header("Authorization")
                        .map(|h| h.contains("oauth_callback=\"oob\""))
                        .unwrap_or(false)
            })
            .times(1)
            .returning(|_| {
                Ok(HttpResponse::new(
                    200,
                    "oauth_token=rt&oauth_token_secret=rts&xoauth_request_auth_url=https%3A%2F%2Fapi.login.yahoo.com%2Foauth%2Fv2%2Frequest_auth%3Foauth_token%3Drt",
                ))
            });

        let endpoints = ServiceEndpoints::default();
        let creds = credentials();
        let session = OAuthSession::new(&creds, &endpoints, &transport);

        let authorization = session.request_authorization().await.unwrap();
        assert_eq!(authorization.token.token, "rt");
        assert_eq!(authorization.token.secret(), "rts");
        assert_eq!(
            authorization.authorization_url,
            "https://api.login.yahoo.com/oauth/v2/request_auth?oauth_token=rt"
        );
    }

    #[tokio::test]
    async fn test_request_authorization_builds_url_when_missing() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, "oauth_token=abc&oauth_token_secret=def")));

        let endpoints = ServiceEndpoints::default().with_authorize_url("https://auth.example.com/approve");
        let creds = credentials();
        let session = OAuthSession::new(&creds, &endpoints, &transport);

        let authorization = session.request_authorization().await.unwrap();
        assert_eq!(
            authorization.authorization_url,
            "https://auth.example.com/approve?oauth_token=abc"
        );
    }

    #[tokio::test]
    async fn test_request_token_rejected() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(401, "oauth_problem=consumer_key_rejected")));

        let endpoints = ServiceEndpoints::default();
        let creds = credentials();
        let session = OAuthSession::new(&creds, &endpoints, &transport);

        let err = session.request_authorization().await.unwrap_err();
        assert!(matches!(err, TransportError::HttpStatus { status: 401, .. }));
        assert!(err.to_string().contains("consumer_key_rejected"));
    }

    #[tokio::test]
    async fn test_token_response_missing_secret() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, "oauth_token=only")));

        let endpoints = ServiceEndpoints::default();
        let creds = credentials();
        let session = OAuthSession::new(&creds, &endpoints, &transport);

        let err = session.request_authorization().await.unwrap_err();
        assert!(matches!(err, TransportError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_access_token_sends_verifier() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|r| {
                let header = r.header("Authorization").unwrap_or("");
                r.base_url == crate::connection::params::DEFAULT_ACCESS_TOKEN_URL
                    && header.contains("oauth_verifier=\"98765\"")
                    && header.contains("oauth_token=\"rt\"")
            })
            .times(1)
            .returning(|_| {
                Ok(HttpResponse::new(
                    200,
                    "oauth_token=at&oauth_token_secret=ats&oauth_expires_in=3600",
                ))
            });

        let endpoints = ServiceEndpoints::default();
        let creds = credentials();
        let session = OAuthSession::new(&creds, &endpoints, &transport);

        let access = session
            .access_token(&OAuthToken::new("rt", "rts"), "98765")
            .await
            .unwrap();
        assert_eq!(access.token, "at");
        assert_eq!(access.secret(), "ats");
    }

    #[tokio::test]
    async fn test_authorize_full_exchange() {
        let mut transport = MockTransport::new();
        let mut seq = mockall::Sequence::new();
        transport
            .expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(HttpResponse::new(200, "oauth_token=rt&oauth_token_secret=rts")));
        transport
            .expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(HttpResponse::new(200, "oauth_token=at&oauth_token_secret=ats")));

        let mut pins = MockPins::new();
        pins.expect_request_pin()
            .with(always())
            .times(1)
            .returning(|url| {
                assert!(url.contains("oauth_token=rt"));
                Ok("4242".to_string())
            });

        let endpoints = ServiceEndpoints::default();
        let creds = credentials();
        let session = OAuthSession::new(&creds, &endpoints, &transport);

        let access = session.authorize(&pins).await.unwrap();
        assert_eq!(access.token, "at");
    }

    #[tokio::test]
    async fn test_authorize_pin_failure() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, "oauth_token=rt&oauth_token_secret=rts")));

        let mut pins = MockPins::new();
        pins.expect_request_pin()
            .times(1)
            .returning(|_| Err(ConnectionError::PinUnavailable("closed stdin".to_string())));

        let endpoints = ServiceEndpoints::default();
        let creds = credentials();
        let session = OAuthSession::new(&creds, &endpoints, &transport);

        let err = session.authorize(&pins).await.unwrap_err();
        assert!(matches!(
            err,
            QueryError::Connection(ConnectionError::PinUnavailable(_))
        ));
    }
}
