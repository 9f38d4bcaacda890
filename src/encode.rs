//! Rows back to write records, the reverse of projection.
//!
//! Used by batch writes: a row-major buffer in some [`Schema`] becomes one
//! `(key, bins)` pair per row. Fields whose names start with `_` carry key
//! parts and are never written as bins.

use crate::{
    error::BatchError,
    observability::log_debug,
    record::{RecordKey, UserKey},
    schema::{Field, Schema},
    store::codec,
    value::Value,
};

/// Field holding the user key unless [`WriteKeySpec::key_field`] says otherwise.
pub const DEFAULT_KEY_FIELD: &str = "_key";
/// Optional per-row namespace, NUL-padded.
pub const NAMESPACE_FIELD: &str = "_namespace";
/// Optional per-row set name, NUL-padded.
pub const SET_FIELD: &str = "_set";

/// Where the parts of each row's key come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteKeySpec {
    /// The field holding the user key.
    pub key_field: String,
    /// Used for rows without a `_namespace` field.
    pub namespace: String,
    /// Used for rows without a `_set` field.
    pub set_name: String,
}

impl WriteKeySpec {
    /// Keys from [`DEFAULT_KEY_FIELD`] with the given fallbacks.
    pub fn new(namespace: impl Into<String>, set_name: impl Into<String>) -> Self {
        Self {
            key_field: DEFAULT_KEY_FIELD.to_string(),
            namespace: namespace.into(),
            set_name: set_name.into(),
        }
    }

    /// Reads user keys from `key_field` instead.
    pub fn key_field(self, key_field: impl Into<String>) -> Self {
        WriteKeySpec {
            key_field: key_field.into(),
            ..self
        }
    }
}

/// One record to write.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteRecord {
    /// Full key of the record.
    pub key: RecordKey,
    /// Bins in schema order.
    pub bins: Vec<(String, Value)>,
}

/// Decodes every row of `rows` into a [`WriteRecord`].
///
/// # Errors
///
/// [`BatchError::KeyFieldMissing`] when the schema has no `spec.key_field`,
/// [`BatchError::RowBufferLength`] when `rows` is not a whole number of
/// rows, and [`BatchError::InvalidKey`] when a key value is neither an
/// integer, a string nor binary.
pub fn encode_rows(
    schema: &Schema,
    rows: &[u8],
    spec: &WriteKeySpec,
) -> Result<Vec<WriteRecord>, BatchError> {
    let key_field = schema
        .field(&spec.key_field)
        .ok_or_else(|| BatchError::KeyFieldMissing(spec.key_field.clone()))?;
    let row_width = schema.row_width();
    if rows.len() % row_width != 0 {
        return Err(BatchError::RowBufferLength {
            len: rows.len(),
            row_width,
        });
    }
    let namespace_field = schema.field(NAMESPACE_FIELD);
    let set_field = schema.field(SET_FIELD);
    let bin_fields: Vec<&Field> = schema
        .fields()
        .iter()
        .filter(|field| !field.name().starts_with('_') && field.name() != spec.key_field)
        .collect();

    let records = rows
        .chunks_exact(row_width)
        .enumerate()
        .map(|(i, row)| {
            let user_key = UserKey::try_from(codec::read_value(key_field, row)).map_err(
                |value| BatchError::InvalidKey {
                    row: i,
                    type_name: value.type_name(),
                },
            )?;
            let namespace = key_part(namespace_field, row).unwrap_or_else(|| spec.namespace.clone());
            let set_name = key_part(set_field, row).unwrap_or_else(|| spec.set_name.clone());
            let bins = bin_fields
                .iter()
                .map(|field| (field.name().to_string(), codec::read_value(field, row)))
                .collect();
            Ok(WriteRecord {
                key: RecordKey::new(namespace, set_name, user_key),
                bins,
            })
        })
        .collect::<Result<Vec<_>, BatchError>>()?;

    log_debug!(
        component = "encode",
        event = "rows_encoded",
        rows = records.len(),
        key_field = %spec.key_field
    );
    Ok(records)
}

/// A fixed_bytes key part with trailing NULs trimmed. Other kinds fall back
/// to the default.
fn key_part(field: Option<&Field>, row: &[u8]) -> Option<String> {
    match codec::read_value(field?, row) {
        Value::Binary(bytes) => {
            let end = bytes.iter().rposition(|b| *b != 0).map_or(0, |p| p + 1);
            Some(String::from_utf8_lossy(&bytes[..end]).into_owned())
        }
        _ => None,
    }
}
