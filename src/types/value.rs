//! Row values exposed by the result cursor.

use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::fmt;

/// One row of a result cursor.
///
/// The cursor exposes a single column, so every row is one `RowValue`.
/// Strings are surfaced natively; every other JSON kind keeps its decoded
/// form so callers can handle numbers, booleans and nulls downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RowValue {
    /// JSON null
    #[default]
    Null,
    /// JSON boolean
    Bool(bool),
    /// JSON number, kept exact
    Number(Number),
    /// JSON string
    String(String),
    /// JSON array
    Array(Vec<Value>),
    /// JSON object
    Object(Map<String, Value>),
}

impl RowValue {
    /// Check for null.
    pub fn is_null(&self) -> bool {
        matches!(self, RowValue::Null)
    }

    /// Borrow as a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RowValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Read as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RowValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Read as a signed integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            RowValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// Read as a float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RowValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Borrow as an object.
    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        match self {
            RowValue::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a field of an object row.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Convert back to a JSON value.
    pub fn into_json(self) -> Value {
        self.into()
    }
}

impl From<Value> for RowValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => RowValue::Null,
            Value::Bool(b) => RowValue::Bool(b),
            Value::Number(n) => RowValue::Number(n),
            Value::String(s) => RowValue::String(s),
            Value::Array(items) => RowValue::Array(items),
            Value::Object(map) => RowValue::Object(map),
        }
    }
}

impl From<RowValue> for Value {
    fn from(value: RowValue) -> Self {
        match value {
            RowValue::Null => Value::Null,
            RowValue::Bool(b) => Value::Bool(b),
            RowValue::Number(n) => Value::Number(n),
            RowValue::String(s) => Value::String(s),
            RowValue::Array(items) => Value::Array(items),
            RowValue::Object(map) => Value::Object(map),
        }
    }
}

impl fmt::Display for RowValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowValue::String(s) => write!(f, "{}", s),
            other => match serde_json::to_string(other) {
                Ok(text) => write!(f, "{}", text),
                Err(_) => Err(fmt::Error),
            },
        }
    }
}
