//! Errors of projection, view access and the write path.

use arrow::error::ArrowError;
use thiserror::Error;

use crate::{record::UserKey, schema::SchemaError};

/// Failure of a whole operation; per-record anomalies are diagnostics instead.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The requested schema was refused.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
    /// No row was registered under the key.
    #[error("key not found: {0}")]
    KeyNotFound(UserKey),
    /// The schema has no field of that name.
    #[error("field not found: {0}")]
    FieldNotFound(String),
    /// Row index past the end of the batch.
    #[error("row {index} out of bounds for batch of {len} rows")]
    RowOutOfBounds {
        /// Requested row.
        index: usize,
        /// Rows in the batch.
        len: usize,
    },
    /// A filter mask of the wrong length.
    #[error("mask length {actual} does not match batch length {expected}")]
    MaskLength {
        /// Rows in the batch.
        expected: usize,
        /// Entries in the mask.
        actual: usize,
    },
    /// The row buffer for this many rows does not fit in `usize`.
    #[error("{rows} rows of {row_width} bytes overflow usize")]
    CapacityOverflow {
        /// Requested rows.
        rows: usize,
        /// Bytes per row.
        row_width: usize,
    },
    /// The write path was asked for a key field the schema lacks.
    #[error("key field '{0}' not found in schema")]
    KeyFieldMissing(String),
    /// A key field value that can not key a record.
    #[error("row {row}: {type_name} value can not be used as a user key")]
    InvalidKey {
        /// Offending row.
        row: usize,
        /// Type of the value found.
        type_name: &'static str,
    },
    /// A raw row buffer whose length is not a whole number of rows.
    #[error("row buffer of {len} bytes is not a multiple of row width {row_width}")]
    RowBufferLength {
        /// Buffer length.
        len: usize,
        /// Bytes per row.
        row_width: usize,
    },
    /// Arrow refused to build an array or schema.
    #[error("arrow error: {0}")]
    Arrow(#[from] ArrowError),
}
