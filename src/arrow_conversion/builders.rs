//! Array builders for the single-column result layout.

use crate::error::ConversionError;
use crate::types::RowValue;
use arrow::array::{ArrayRef, StringBuilder};
use std::sync::Arc;

/// Estimate the byte capacity needed for a column of rows.
/// Uses a sample of the first few string values.
fn estimate_string_capacity(rows: &[RowValue]) -> usize {
    const SAMPLE_SIZE: usize = 10;
    const DEFAULT_AVG_LEN: usize = 32;

    let mut total_len = 0;
    let mut count = 0;

    for row in rows.iter().take(SAMPLE_SIZE) {
        if let Some(s) = row.as_str() {
            total_len += s.len();
            count += 1;
        }
    }

    if count > 0 {
        let avg_len = total_len / count;
        (avg_len + 8) * rows.len()
    } else {
        DEFAULT_AVG_LEN * rows.len()
    }
}

/// Build a nullable Utf8 array from row values.
///
/// Strings are stored as-is and nulls as null. Every other value is stored
/// as compact JSON text.
pub fn build_string_array(rows: &[RowValue]) -> Result<ArrayRef, ConversionError> {
    let mut builder = StringBuilder::with_capacity(rows.len(), estimate_string_capacity(rows));

    for (row, value) in rows.iter().enumerate() {
        match value {
            RowValue::Null => builder.append_null(),
            RowValue::String(s) => builder.append_value(s),
            other => {
                let text = serde_json::to_string(other).map_err(|e| {
                    ConversionError::ValueConversionFailed {
                        row,
                        message: e.to_string(),
                    }
                })?;
                builder.append_value(text);
            }
        }
    }

    Ok(Arc::new(builder.finish()))
}
