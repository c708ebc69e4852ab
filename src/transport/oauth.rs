//! OAuth 1.0a request signing (HMAC-SHA1).
//!
//! Signing follows RFC 5849: every query parameter and every `oauth_*`
//! protocol parameter is percent-encoded, sorted, and folded into a signature
//! base string together with the method and the normalized base URL. The
//! signature is carried in an `Authorization: OAuth ...` header so the query
//! string stays exactly the caller's parameters.

use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use hmac::{Hmac, Mac};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha1::Sha1;
use url::Url;

use crate::error::TransportError;

use super::protocol::HttpRequest;

/// Signature method advertised in every signed request.
pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";

/// Protocol version advertised in every signed request.
pub const OAUTH_VERSION: &str = "1.0";

/// Length of the random nonce.
const NONCE_LEN: usize = 32;

/// A token and its secret, as issued by the request-token or access-token
/// endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct OAuthToken {
    /// Public token value
    pub token: String,
    /// Token secret (never logged)
    secret: String,
}

impl OAuthToken {
    /// Create a token.
    pub fn new(token: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            secret: secret.into(),
        }
    }

    /// Get the token secret.
    pub(crate) fn secret(&self) -> &str {
        &self.secret
    }
}

impl std::fmt::Debug for OAuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthToken")
            .field("token", &self.token)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Signs requests on behalf of one consumer.
#[derive(Clone)]
pub struct OAuthSigner {
    consumer_key: String,
    consumer_secret: String,
}

impl OAuthSigner {
    /// Create a signer for the given consumer credentials.
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
        }
    }

    /// Get the consumer key.
    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    /// Sign a GET request with a fresh nonce and the current time.
    ///
    /// # Arguments
    ///
    /// * `request` - The request to sign; its query parameters are signed
    /// * `token` - Request or access token, if the step requires one
    /// * `extra` - Additional protocol parameters such as `oauth_callback`
    ///
    /// # Errors
    ///
    /// Returns `TransportError::InvalidUrl` if the base URL cannot be parsed.
    pub fn sign(
        &self,
        request: HttpRequest,
        token: Option<&OAuthToken>,
        extra: &[(&str, &str)],
    ) -> Result<HttpRequest, TransportError> {
        let nonce = generate_nonce();
        let timestamp = chrono::Utc::now().timestamp();
        self.sign_with(request, token, extra, &nonce, timestamp)
    }

    /// Sign a GET request with an explicit nonce and timestamp.
    pub fn sign_with(
        &self,
        request: HttpRequest,
        token: Option<&OAuthToken>,
        extra: &[(&str, &str)],
        nonce: &str,
        timestamp: i64,
    ) -> Result<HttpRequest, TransportError> {
        let mut oauth_params: Vec<(String, String)> = vec![
            ("oauth_consumer_key".to_string(), self.consumer_key.clone()),
            ("oauth_nonce".to_string(), nonce.to_string()),
            (
                "oauth_signature_method".to_string(),
                SIGNATURE_METHOD.to_string(),
            ),
            ("oauth_timestamp".to_string(), timestamp.to_string()),
            ("oauth_version".to_string(), OAUTH_VERSION.to_string()),
        ];
        if let Some(token) = token {
            oauth_params.push(("oauth_token".to_string(), token.token.clone()));
        }
        for (key, value) in extra {
            oauth_params.push((key.to_string(), value.to_string()));
        }

        let mut signed_params = request.query.clone();
        signed_params.extend(oauth_params.iter().cloned());

        let base_url = normalize_base_url(&request.base_url)?;
        let base_string = signature_base_string("GET", &base_url, &signed_params);
        let signature = hmac_sha1_signature(
            &base_string,
            &self.consumer_secret,
            token.map(OAuthToken::secret).unwrap_or(""),
        );
        oauth_params.push(("oauth_signature".to_string(), signature));

        Ok(request.with_header("Authorization", authorization_header(&oauth_params)))
    }
}

impl std::fmt::Debug for OAuthSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthSigner")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .finish()
    }
}

/// Percent-encode per RFC 3986 (only unreserved characters pass through).
pub fn percent_encode(value: &str) -> String {
    use std::fmt::Write;
    let mut result = String::with_capacity(value.len() * 3);
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                result.push(byte as char);
            }
            _ => {
                let _ = write!(result, "%{:02X}", byte);
            }
        }
    }
    result
}

/// Build the signature base string from a method, a normalized base URL and
/// the complete parameter set.
pub fn signature_base_string(method: &str, base_url: &str, params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();

    let normalized = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        percent_encode(base_url),
        percent_encode(&normalized)
    )
}

/// Compute the base64 HMAC-SHA1 signature of a base string.
pub fn hmac_sha1_signature(base_string: &str, consumer_secret: &str, token_secret: &str) -> String {
    let key = format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    );
    let mut mac =
        Hmac::<Sha1>::new_from_slice(key.as_bytes()).expect("HMAC can take key of any size");
    mac.update(base_string.as_bytes());
    BASE64_STANDARD.encode(mac.finalize().into_bytes())
}

/// Lowercase scheme and host, drop default ports, query and fragment.
fn normalize_base_url(base_url: &str) -> Result<String, TransportError> {
    let url = Url::parse(base_url)?;
    let host = url
        .host_str()
        .ok_or_else(|| TransportError::InvalidUrl(format!("missing host in {}", base_url)))?;

    let port = url.port().map(|p| format!(":{}", p)).unwrap_or_default();
    Ok(format!("{}://{}{}{}", url.scheme(), host, port, url.path()))
}

fn authorization_header(oauth_params: &[(String, String)]) -> String {
    let fields = oauth_params
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("OAuth {}", fields)
}

fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LEN)
        .map(char::from)
        .collect()
}
