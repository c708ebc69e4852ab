//! Prepared statements: placeholder binding and request dispatch.
//!
//! This module provides the `PreparedStatement` type, which substitutes
//! positional `?` placeholders into the query text, sends the query in public
//! or secure mode, and turns the response envelope into a `ResultCursor`.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::connection::auth::{OAuthSession, PinProvider};
use crate::connection::params::{ConnectionParams, ServiceEndpoints, TransportMode};
use crate::error::{ConnectionError, QueryError};
use crate::query::envelope;
use crate::query::results::ResultCursor;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};

/// Placeholder character recognised in query text.
pub const PLACEHOLDER: char = '?';

/// Response format requested from the service.
const RESPONSE_FORMAT: &str = "json";

/// Parameter value for binding.
#[derive(Debug, Clone, PartialEq)]
pub enum Parameter {
    /// NULL value
    Null,
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Integer(i64),
    /// Float value
    Float(f64),
    /// String value
    String(String),
    /// Binary data
    Binary(Vec<u8>),
}

impl Parameter {
    /// Render as a quoted literal for substitution into query text.
    ///
    /// Every value is rendered as its text form inside double quotes, with
    /// quotes, backslashes and control characters escaped. `Null` renders as
    /// the bare keyword `null` and binary data as quoted lowercase hex.
    pub fn to_quoted_literal(&self) -> String {
        match self {
            Parameter::Null => "null".to_string(),
            Parameter::Boolean(b) => quote(&b.to_string()),
            Parameter::Integer(i) => quote(&i.to_string()),
            Parameter::Float(f) => quote(&f.to_string()),
            Parameter::String(s) => quote(s),
            Parameter::Binary(b) => quote(&hex::encode(b)),
        }
    }
}

fn quote(text: &str) -> String {
    format!("{:?}", text)
}

impl From<bool> for Parameter {
    fn from(value: bool) -> Self {
        Parameter::Boolean(value)
    }
}

impl From<i32> for Parameter {
    fn from(value: i32) -> Self {
        Parameter::Integer(value as i64)
    }
}

impl From<i64> for Parameter {
    fn from(value: i64) -> Self {
        Parameter::Integer(value)
    }
}

impl From<f64> for Parameter {
    fn from(value: f64) -> Self {
        Parameter::Float(value)
    }
}

impl From<String> for Parameter {
    fn from(value: String) -> Self {
        Parameter::String(value)
    }
}

impl From<&str> for Parameter {
    fn from(value: &str) -> Self {
        Parameter::String(value.to_string())
    }
}

impl From<Vec<u8>> for Parameter {
    fn from(value: Vec<u8>) -> Self {
        Parameter::Binary(value)
    }
}

impl<T: Into<Parameter>> From<Option<T>> for Parameter {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Parameter::Null)
    }
}

/// Everything a statement needs from its connection to execute.
pub(crate) struct StatementContext {
    pub(crate) params: ConnectionParams,
    pub(crate) endpoints: ServiceEndpoints,
    pub(crate) pin_provider: Arc<dyn PinProvider>,
}

/// A prepared statement bound to one connection.
///
/// Binding rewrites the statement's own query text. Once arguments have been
/// bound, the substituted text is what later executions and `parameter_count`
/// see; prepare a new statement to run the template again with different
/// arguments.
pub struct PreparedStatement {
    /// Transport handle, `None` if the connection was already closed
    transport: Option<Arc<dyn HttpTransport>>,
    /// Connection-level configuration
    context: Arc<StatementContext>,
    /// Query text, rewritten in place by binding
    query: String,
}

impl PreparedStatement {
    pub(crate) fn new(
        transport: Option<Arc<dyn HttpTransport>>,
        context: Arc<StatementContext>,
        query: String,
    ) -> Self {
        Self {
            transport,
            context,
            query,
        }
    }

    /// Get the current query text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Number of `?` occurrences in the current query text.
    ///
    /// This is a plain character count; placeholders inside string literals
    /// are counted too.
    pub fn parameter_count(&self) -> usize {
        self.query.matches(PLACEHOLDER).count()
    }

    /// Replace placeholders left to right with the arguments' quoted literals.
    ///
    /// Each argument replaces the first `?` still present in the text.
    /// Arguments left over once no placeholder remains are ignored.
    pub fn bind(&mut self, args: &[Parameter]) {
        for (i, arg) in args.iter().enumerate() {
            let Some(pos) = self.query.find(PLACEHOLDER) else {
                debug!(surplus = args.len() - i, "no placeholder left, ignoring arguments");
                break;
            };
            let literal = arg.to_quoted_literal();
            self.query
                .replace_range(pos..pos + PLACEHOLDER.len_utf8(), &literal);
        }
    }

    /// Write statements are not supported by the service.
    pub fn execute_write(&mut self, _args: &[Parameter]) -> Result<u64, QueryError> {
        Err(QueryError::WritesUnsupported)
    }

    /// Bind `args`, send the query and return a cursor over the result rows.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the argument count differs from `parameter_count()`
    /// - the connection was closed before this statement was prepared
    /// - the request or the OAuth exchange fails
    /// - the body is not JSON or not a usable result envelope
    pub async fn execute_read(&mut self, args: &[Parameter]) -> Result<ResultCursor, QueryError> {
        let expected = self.parameter_count();
        if args.len() != expected {
            return Err(QueryError::ParameterCountMismatch {
                expected,
                actual: args.len(),
            });
        }

        let transport = self
            .transport
            .clone()
            .ok_or(QueryError::Connection(ConnectionError::ConnectionClosed))?;

        self.bind(args);

        let response = match self.context.params.mode() {
            TransportMode::Secure => self.send_secure(transport.as_ref()).await?,
            TransportMode::Public => {
                let request = public_request(
                    &self.context.endpoints.query_url,
                    &self.query,
                    self.context.params.environment(),
                );
                debug!("sending public query");
                transport.send(&request).await?
            }
        };

        if !response.is_success() {
            warn!(status = response.status, "query endpoint returned non-success status");
        }

        let rows = envelope::extract_rows(&response.body)?;
        Ok(ResultCursor::new(rows))
    }

    /// Close the statement. Always succeeds.
    pub fn close(&mut self) {}

    async fn send_secure(&self, transport: &dyn HttpTransport) -> Result<HttpResponse, QueryError> {
        let credentials = self.context.params.credentials.as_ref().ok_or_else(|| {
            QueryError::InvalidState("secure mode without credentials".to_string())
        })?;

        let session = OAuthSession::new(credentials, &self.context.endpoints, transport);
        let access = session.authorize(self.context.pin_provider.as_ref()).await?;

        let request = HttpRequest::get(&self.context.endpoints.query_url)
            .with_query("format", RESPONSE_FORMAT)
            .with_query("q", &self.query);
        let request = session.sign(request, &access)?;

        debug!("sending signed query");
        Ok(transport.send(&request).await?)
    }
}

impl std::fmt::Debug for PreparedStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedStatement")
            .field("query", &self.query)
            .field("mode", &self.context.params.mode())
            .field("connection_open", &self.transport.is_some())
            .finish()
    }
}

/// Build the unauthenticated query request.
pub fn public_request(query_url: &str, query: &str, environment: Option<&str>) -> HttpRequest {
    let request = HttpRequest::get(query_url)
        .with_query("q", query)
        .with_query("format", RESPONSE_FORMAT);
    match environment {
        Some(env) => request.with_query("env", env),
        None => request,
    }
}
