//! Error types for yql-rs.
//!
//! This module defines domain-specific error types organized by functional area.

use std::fmt;
use thiserror::Error;

/// Top-level error type encompassing all possible errors.
#[derive(Error, Debug)]
pub enum YqlError {
    /// Connection-related errors
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Query execution errors
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Data conversion errors
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// Transport errors
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Errors related to connections and the credential exchange.
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// The connection was closed before the statement was prepared
    #[error("Connection is closed")]
    ConnectionClosed,

    /// The PIN collaborator could not produce a verifier
    #[error("Failed to obtain authorization PIN: {0}")]
    PinUnavailable(String),
}

/// Errors related to statement execution and result iteration.
#[derive(Error, Debug)]
pub enum QueryError {
    /// The backend is a stateless read-only API
    #[error("Transactions are not supported")]
    TransactionsUnsupported,

    /// The backend is read-only
    #[error("Write statements are not supported")]
    WritesUnsupported,

    /// Argument list length does not match the placeholder count
    #[error("Expected {expected} arguments, got {actual}")]
    ParameterCountMismatch { expected: usize, actual: usize },

    /// The response body is not valid JSON
    #[error("Invalid response body: {0}")]
    InvalidResponseBody(String),

    /// The response envelope does not have the `query.results` shape
    #[error("Unsupported result shape: {0}")]
    UnsupportedResultShape(String),

    /// The cursor has no more rows. Not a failure.
    #[error("End of result sequence")]
    EndOfSequence,

    /// Invalid caller-side state
    #[error("Invalid query state: {0}")]
    InvalidState(String),

    /// Connection or authorization failure during execution
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Network or HTTP failure during execution
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Errors related to data conversion.
#[derive(Error, Debug)]
pub enum ConversionError {
    /// Failed to serialize a row value
    #[error("Failed to convert value at row {row}: {message}")]
    ValueConversionFailed { row: usize, message: String },

    /// Arrow error
    #[error("Arrow error: {0}")]
    ArrowError(String),
}

/// Errors related to the HTTP transport.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The request could not be built or sent
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    /// The request did not complete in time
    #[error("HTTP request timed out: {0}")]
    Timeout(String),

    /// The server answered with a non-success status where one is required
    #[error("HTTP status {status} from {url}: {body}")]
    HttpStatus {
        status: u16,
        url: String,
        body: String,
    },

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid response from server
    #[error("Invalid server response: {0}")]
    InvalidResponse(String),

    /// The transport client could not be configured
    #[error("Transport configuration error: {0}")]
    Configuration(String),
}

/// Stable error categories for host integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Unknown error
    Unknown = 0,
    /// Connection error
    Connection = 1,
    /// Query error
    Query = 2,
    /// Invalid argument
    InvalidArgument = 3,
    /// Invalid state
    InvalidState = 4,
    /// Not implemented
    NotImplemented = 5,
    /// Timeout
    Timeout = 6,
    /// Unauthenticated
    Unauthenticated = 7,
    /// No more data
    EndOfData = 8,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Unknown => write!(f, "UNKNOWN"),
            ErrorCode::Connection => write!(f, "CONNECTION"),
            ErrorCode::Query => write!(f, "QUERY"),
            ErrorCode::InvalidArgument => write!(f, "INVALID_ARGUMENT"),
            ErrorCode::InvalidState => write!(f, "INVALID_STATE"),
            ErrorCode::NotImplemented => write!(f, "NOT_IMPLEMENTED"),
            ErrorCode::Timeout => write!(f, "TIMEOUT"),
            ErrorCode::Unauthenticated => write!(f, "UNAUTHENTICATED"),
            ErrorCode::EndOfData => write!(f, "END_OF_DATA"),
        }
    }
}

impl YqlError {
    /// Map to an error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            YqlError::Connection(e) => e.code(),
            YqlError::Query(e) => e.code(),
            YqlError::Conversion(_) => ErrorCode::Query,
            YqlError::Transport(e) => e.code(),
        }
    }
}

impl ConnectionError {
    /// Map to an error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            ConnectionError::ConnectionClosed => ErrorCode::InvalidState,
            ConnectionError::PinUnavailable(_) => ErrorCode::Unauthenticated,
        }
    }
}

impl QueryError {
    /// Map to an error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            QueryError::TransactionsUnsupported | QueryError::WritesUnsupported => {
                ErrorCode::NotImplemented
            }
            QueryError::ParameterCountMismatch { .. } => ErrorCode::InvalidArgument,
            QueryError::InvalidState(_) => ErrorCode::InvalidState,
            QueryError::EndOfSequence => ErrorCode::EndOfData,
            QueryError::Connection(e) => e.code(),
            QueryError::Transport(e) => e.code(),
            QueryError::InvalidResponseBody(_) | QueryError::UnsupportedResultShape(_) => {
                ErrorCode::Query
            }
        }
    }

    /// Returns `true` for the end-of-sequence control signal.
    pub fn is_end_of_sequence(&self) -> bool {
        matches!(self, QueryError::EndOfSequence)
    }
}

impl TransportError {
    /// Map to an error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            TransportError::Timeout(_) => ErrorCode::Timeout,
            TransportError::HttpStatus { status: 401, .. } => ErrorCode::Unauthenticated,
            TransportError::InvalidUrl(_) | TransportError::Configuration(_) => {
                ErrorCode::InvalidArgument
            }
            _ => ErrorCode::Connection,
        }
    }
}

// Conversions from external error types
impl From<arrow::error::ArrowError> for ConversionError {
    fn from(err: arrow::error::ArrowError) -> Self {
        ConversionError::ArrowError(err.to_string())
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else {
            TransportError::RequestFailed(err.to_string())
        }
    }
}

impl From<url::ParseError> for TransportError {
    fn from(err: url::ParseError) -> Self {
        TransportError::InvalidUrl(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_operations_map_to_not_implemented() {
        assert_eq!(
            QueryError::TransactionsUnsupported.code(),
            ErrorCode::NotImplemented
        );
        assert_eq!(
            QueryError::WritesUnsupported.code(),
            ErrorCode::NotImplemented
        );
    }

    #[test]
    fn test_end_of_sequence_is_distinct_from_shape_error() {
        let end = QueryError::EndOfSequence;
        let shape = QueryError::UnsupportedResultShape("empty results".to_string());

        assert!(end.is_end_of_sequence());
        assert!(!shape.is_end_of_sequence());
        assert_ne!(end.code(), shape.code());
    }

    #[test]
    fn test_parameter_count_mismatch_display() {
        let err = QueryError::ParameterCountMismatch {
            expected: 2,
            actual: 1,
        };
        assert_eq!(err.to_string(), "Expected 2 arguments, got 1");
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
    }

    #[test]
    fn test_transport_error_passes_through_query_error() {
        let err: QueryError = TransportError::Timeout("5s elapsed".to_string()).into();
        assert!(err.to_string().contains("timed out"));
        assert_eq!(err.code(), ErrorCode::Timeout);
    }

    #[test]
    fn test_http_status_display() {
        let err = TransportError::HttpStatus {
            status: 401,
            url: "https://api.login.yahoo.com/oauth/v2/get_token".to_string(),
            body: "oauth_problem=token_rejected".to_string(),
        };
        assert!(err.to_string().contains("401"));
        assert!(err.to_string().contains("token_rejected"));
        assert_eq!(err.code(), ErrorCode::Unauthenticated);
    }

    #[test]
    fn test_top_level_code_mapping() {
        let err = YqlError::Connection(ConnectionError::ConnectionClosed);
        assert_eq!(err.code(), ErrorCode::InvalidState);

        let err = YqlError::Query(QueryError::InvalidResponseBody("eof".to_string()));
        assert_eq!(err.code(), ErrorCode::Query);
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::NotImplemented.to_string(), "NOT_IMPLEMENTED");
        assert_eq!(ErrorCode::EndOfData.to_string(), "END_OF_DATA");
    }
}
