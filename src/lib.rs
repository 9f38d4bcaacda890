#![deny(missing_docs)]
//! Columnar projection of key-value batch reads.
//!
//! A batch read returns one dynamically typed record per requested key, each
//! with its own result code. This crate packs those records into a single
//! fixed-schema, row-major buffer so that callers can filter, aggregate or
//! run similarity search over them without touching per-record maps:
//!
//! - [`Schema`] validates the requested layout once per call and rejects
//!   kinds without a fixed width before any record is looked at.
//! - [`RecordProjector`] writes every record into its row, keeping failed
//!   reads as zero rows with their result code.
//! - [`BatchView`] answers point lookups by user key and exposes columns,
//!   masks and an Arrow export.
//!
//! Per-record anomalies never abort a projection. They come back as
//! [`Diagnostics`] next to the view.
//!
//! ```
//! use kvbatch::{project, FieldDesc, ProjectOption, RawRecord, RecordKey, RecordMeta, Value};
//!
//! let fields = vec![
//!     FieldDesc::new("temperature", "f8"),
//!     FieldDesc::new("reading_id", "i4"),
//! ];
//! let records = vec![RawRecord::ok(
//!     RecordKey::new("test", "sensors", "k1"),
//!     RecordMeta::new(1, 3600),
//!     [("temperature", Value::Float64(21.5)), ("reading_id", Value::Int64(7))],
//! )];
//! let projection = project(fields, &records, &ProjectOption::default()).unwrap();
//! let row = projection.view.get("k1").unwrap();
//! assert_eq!(row.get("temperature").unwrap().as_scalar().unwrap().as_f64(), 21.5);
//! assert!(projection.diagnostics.is_empty());
//! ```

mod diagnostic;
pub mod encode;
pub mod error;
mod index;
mod observability;
mod option;
mod projector;
pub mod record;
pub mod schema;
mod store;
pub mod value;
pub mod view;

use std::sync::Arc;

pub use diagnostic::{Diagnostic, DiagnosticKind, Diagnostics};
pub use encode::{encode_rows, WriteKeySpec, WriteRecord};
pub use error::BatchError;
pub use index::{IndexKey, KeyIndex};
pub use option::{BinaryWidthPolicy, ProjectOption};
pub use projector::{Projection, RecordProjector};
pub use record::{result_code, RawRecord, Record, RecordKey, RecordMeta, UserKey};
pub use schema::{ElementKind, Field, FieldDesc, Schema, SchemaError};
pub use store::ColumnarStore;
pub use value::{Scalar, Value};
pub use view::{BatchView, ColumnView, FieldValue, Row, VectorRef};

/// Validates `fields` and projects `records` onto them in one call.
///
/// # Errors
///
/// [`BatchError::Schema`] when validation refuses `fields`, and
/// [`BatchError::CapacityOverflow`] when the rows can not be sized. Per-record
/// problems are reported in [`Projection::diagnostics`].
pub fn project<I>(
    fields: I,
    records: &[RawRecord],
    option: &ProjectOption,
) -> Result<Projection, BatchError>
where
    I: IntoIterator<Item = FieldDesc>,
{
    let schema = Arc::new(Schema::try_new(fields)?);
    RecordProjector::new(schema, option.clone()).project(records)
}
