//! Converter for turning cursor rows into an Arrow RecordBatch.
//!
//! The cursor exposes a single column named `results`, so the batch always
//! has exactly one nullable Utf8 field.

use crate::error::ConversionError;
use crate::types::RowValue;
use arrow::array::RecordBatch;
use arrow::datatypes::{DataType, Field, Schema};
use std::sync::Arc;

use super::builders::build_string_array;

/// Converter for transforming result rows to Arrow RecordBatch.
#[derive(Debug, Clone)]
pub struct ArrowConverter {
    schema: Arc<Schema>,
}

impl ArrowConverter {
    /// Create a converter whose single column is named `column`.
    pub fn new(column: &str) -> Self {
        let schema = Schema::new(vec![Field::new(column, DataType::Utf8, true)]);
        Self {
            schema: Arc::new(schema),
        }
    }

    /// Get the Arrow schema for this converter.
    pub fn schema(&self) -> Arc<Schema> {
        Arc::clone(&self.schema)
    }

    /// Convert rows to an Arrow RecordBatch.
    ///
    /// # Errors
    /// Returns `ConversionError` if a value cannot be rendered or the batch
    /// cannot be assembled.
    pub fn convert(&self, rows: &[RowValue]) -> Result<RecordBatch, ConversionError> {
        if rows.is_empty() {
            return Ok(RecordBatch::new_empty(Arc::clone(&self.schema)));
        }

        let array = build_string_array(rows)?;
        Ok(RecordBatch::try_new(Arc::clone(&self.schema), vec![array])?)
    }
}
