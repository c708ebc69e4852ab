//! Result cursor over decoded rows.
//!
//! A `ResultCursor` owns the row set selected from the response envelope and
//! hands it out one row at a time through a single column named `results`.

use crate::arrow_conversion::ArrowConverter;
use crate::error::{ConversionError, QueryError};
use crate::types::RowValue;
use arrow::array::RecordBatch;
use serde_json::Value;

/// Name of the only column exposed by a cursor.
pub const RESULTS_COLUMN: &str = "results";

/// Forward-only cursor over one response's rows.
#[derive(Debug, Clone, Default)]
pub struct ResultCursor {
    rows: Vec<RowValue>,
    position: usize,
}

impl ResultCursor {
    /// Create a cursor positioned before the first row.
    pub fn new(rows: Vec<Value>) -> Self {
        Self {
            rows: rows.into_iter().map(RowValue::from).collect(),
            position: 0,
        }
    }

    /// Column names. Always `["results"]`.
    pub fn columns(&self) -> Vec<String> {
        vec![RESULTS_COLUMN.to_string()]
    }

    /// Write the current row into `dest[0]` and move forward.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::EndOfSequence` once every row has been consumed,
    /// and keeps returning it on later calls. Returns
    /// `QueryError::InvalidState` if `dest` has no slot.
    pub fn advance(&mut self, dest: &mut [RowValue]) -> Result<(), QueryError> {
        let slot = dest.first_mut().ok_or_else(|| {
            QueryError::InvalidState("destination has no column slot".to_string())
        })?;
        let row = self.next_row().ok_or(QueryError::EndOfSequence)?;
        *slot = row;
        Ok(())
    }

    /// Take the next row, or `None` when exhausted.
    pub fn next_row(&mut self) -> Option<RowValue> {
        let row = self.rows.get_mut(self.position)?;
        self.position += 1;
        Some(std::mem::take(row))
    }

    /// Total number of rows in the result.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the result has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows already consumed.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of rows not yet consumed.
    pub fn remaining(&self) -> usize {
        self.rows.len() - self.position
    }

    /// Check whether every row has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.rows.len()
    }

    /// Close the cursor. Always succeeds.
    pub fn close(&mut self) {}

    /// Drain the remaining rows into a RecordBatch with one nullable Utf8
    /// column named `results`.
    pub fn into_record_batch(mut self) -> Result<RecordBatch, ConversionError> {
        let rows = self.rows.split_off(self.position);
        ArrowConverter::new(RESULTS_COLUMN).convert(&rows)
    }
}

impl Iterator for ResultCursor {
    type Item = RowValue;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ResultCursor {}
