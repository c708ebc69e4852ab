//! Response envelope navigation.
//!
//! The service wraps results as `{"query": {"results": {<tag>: <value>}}}`
//! where `<tag>` depends on the query and cannot be known in advance. The
//! document is navigated as a generic `serde_json::Value`.

use serde_json::Value;
use tracing::debug;

use crate::error::QueryError;

/// Decode a response body and extract its row set.
///
/// # Errors
///
/// Returns `QueryError::InvalidResponseBody` if the body is not JSON and
/// `QueryError::UnsupportedResultShape` if it is not a usable envelope.
pub fn extract_rows(body: &[u8]) -> Result<Vec<Value>, QueryError> {
    let document: Value = serde_json::from_slice(body)
        .map_err(|e| QueryError::InvalidResponseBody(format!("Invalid JSON: {}", e)))?;
    unwrap_envelope(document)
}

/// Extract the row set from a decoded envelope.
///
/// The first array-valued entry under `query.results` becomes the row set.
/// If no entry is an array, the last entry's value becomes a single row.
pub fn unwrap_envelope(document: Value) -> Result<Vec<Value>, QueryError> {
    let mut document = match document {
        Value::Object(map) => map,
        other => return Err(shape_error("response is not an object", &other)),
    };

    let mut query = match document.remove("query") {
        Some(Value::Object(map)) => map,
        _ => {
            return Err(shape_error(
                "missing or non-object `query`",
                &Value::Object(document),
            ))
        }
    };

    let results = match query.remove("results") {
        Some(Value::Object(map)) => map,
        _ => {
            return Err(QueryError::UnsupportedResultShape(
                "missing or non-object `query.results`".to_string(),
            ))
        }
    };

    let mut last = None;
    for (tag, value) in results {
        match value {
            Value::Array(rows) => {
                debug!(%tag, rows = rows.len(), "using array result");
                return Ok(rows);
            }
            other => last = Some((tag, other)),
        }
    }

    match last {
        Some((tag, value)) => {
            debug!(%tag, "using single-value result");
            Ok(vec![value])
        }
        None => Err(QueryError::UnsupportedResultShape(
            "empty `query.results`".to_string(),
        )),
    }
}

/// Build a shape error, surfacing the service's own error description when
/// the body carries one.
fn shape_error(reason: &str, document: &Value) -> QueryError {
    match document
        .get("error")
        .and_then(|e| e.get("description"))
        .and_then(Value::as_str)
    {
        Some(description) => {
            QueryError::UnsupportedResultShape(format!("{} (service error: {})", reason, description))
        }
        None => QueryError::UnsupportedResultShape(reason.to_string()),
    }
}
