//! Projection of raw batch-read results onto a fixed row layout.

use std::sync::Arc;

use crate::{
    diagnostic::{DiagnosticKind, Diagnostics},
    error::BatchError,
    index::{IndexKey, KeyIndex},
    observability::log_debug,
    option::{BinaryWidthPolicy, ProjectOption},
    record::{RawRecord, Record},
    schema::{ElementKind, Field, Schema},
    store::{codec, ColumnarStore},
    value::{Scalar, Value},
    view::BatchView,
};

/// The result of one projection: the view plus the anomalies met on the way.
#[derive(Debug, Clone)]
pub struct Projection {
    /// The projected batch.
    pub view: BatchView,
    /// Per-record anomalies, in record order.
    pub diagnostics: Diagnostics,
}

impl Projection {
    /// Splits the projection into its view and diagnostics.
    pub fn into_parts(self) -> (BatchView, Diagnostics) {
        (self.view, self.diagnostics)
    }
}

/// Maps raw records onto rows of a validated [`Schema`].
#[derive(Debug, Clone)]
pub struct RecordProjector {
    schema: Arc<Schema>,
    option: ProjectOption,
}

impl RecordProjector {
    /// A projector for rows of `schema`.
    pub fn new(schema: Arc<Schema>, option: ProjectOption) -> Self {
        Self { schema, option }
    }

    /// The layout records are projected onto.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Projects `records` in order, one row per record.
    ///
    /// Failed reads become zero rows with their result code kept, and
    /// per-field problems are reported in the returned diagnostics.
    ///
    /// # Errors
    ///
    /// [`BatchError::CapacityOverflow`] when `records.len()` rows of the
    /// schema's width do not fit in one buffer. No record can fail the call.
    pub fn project(&self, records: &[RawRecord]) -> Result<Projection, BatchError> {
        let mut store = ColumnarStore::zeroed(Arc::clone(&self.schema), records.len())?;
        let mut index = KeyIndex::with_capacity(records.len());
        let mut diagnostics = Diagnostics::default();

        for (i, record) in records.iter().enumerate() {
            store.set_result_code(i, record.result_code);

            let key = match record.user_key() {
                Some(user_key) => IndexKey::User(user_key.clone()),
                None => {
                    diagnostics.push(i, DiagnosticKind::MalformedKey);
                    IndexKey::Position(i)
                }
            };
            index.register(key);

            let payload = match &record.record {
                Some(payload) if record.is_ok() => payload,
                _ => continue,
            };
            store.set_meta(i, payload.meta);
            if self.option.strict {
                self.check_bins(i, payload, &mut diagnostics);
            }

            let row = store.row_mut(i);
            for field in self.schema.fields() {
                let Some(value) = payload.bins.get(field.name()) else {
                    continue;
                };
                if let Err(kind) = write_field(row, field, value, self.option.binary_width) {
                    diagnostics.push(i, kind);
                }
            }
        }

        log_debug!(
            component = "projector",
            event = "batch_projected",
            rows = records.len(),
            failed_rows = store.result_codes().iter().filter(|code| **code != 0).count(),
            diagnostics = diagnostics.len()
        );
        Ok(Projection {
            view: BatchView::new(store, index),
            diagnostics,
        })
    }

    fn check_bins(&self, i: usize, payload: &Record, diagnostics: &mut Diagnostics) {
        for field in self.schema.fields() {
            if !payload.bins.contains_key(field.name()) {
                diagnostics.push(
                    i,
                    DiagnosticKind::MissingField {
                        field: field.name().to_string(),
                    },
                );
            }
        }
        let mut ignored: Vec<&String> = payload
            .bins
            .keys()
            .filter(|bin| self.schema.index_of(bin).is_none())
            .collect();
        ignored.sort();
        for bin in ignored {
            diagnostics.push(i, DiagnosticKind::IgnoredBin { bin: bin.clone() });
        }
    }
}

/// Writes one bin value into its field. On error nothing has been written.
fn write_field(
    row: &mut [u8],
    field: &Field,
    value: &Value,
    policy: BinaryWidthPolicy,
) -> Result<(), DiagnosticKind> {
    if value.is_null() {
        return Ok(());
    }
    let dst = &mut row[field.range()];
    let kind = field.kind();

    match (kind, field.vector_length()) {
        (ElementKind::FixedBytes(_), _) => {
            let bytes = value
                .as_binary_opt()
                .or_else(|| value.as_string_opt().map(str::as_bytes))
                .ok_or_else(|| type_mismatch(field, value))?;
            copy_bytes(dst, field, bytes, policy)
        }
        (_, None) => {
            let scalar = value.as_scalar().ok_or_else(|| type_mismatch(field, value))?;
            codec::write_scalar(dst, kind, scalar);
            Ok(())
        }
        (_, Some(len)) => match value {
            Value::List(items) => {
                if items.len() != len {
                    return Err(DiagnosticKind::VectorLengthMismatch {
                        field: field.name().to_string(),
                        expected: len,
                        actual: items.len(),
                    });
                }
                let scalars = items
                    .iter()
                    .map(|item| item.as_scalar().ok_or_else(|| type_mismatch(field, item)))
                    .collect::<Result<Vec<Scalar>, _>>()?;
                for (element, scalar) in dst.chunks_exact_mut(kind.width()).zip(scalars) {
                    codec::write_scalar(element, kind, scalar);
                }
                Ok(())
            }
            // Raw native-endian element bytes, e.g. an embedding stored as a blob.
            Value::Binary(bytes) => copy_bytes(dst, field, bytes, policy),
            other => Err(type_mismatch(field, other)),
        },
    }
}

fn copy_bytes(
    dst: &mut [u8],
    field: &Field,
    bytes: &[u8],
    policy: BinaryWidthPolicy,
) -> Result<(), DiagnosticKind> {
    if bytes.len() == dst.len() {
        dst.copy_from_slice(bytes);
        return Ok(());
    }
    if policy == BinaryWidthPolicy::PadOrTruncate {
        let len = bytes.len().min(dst.len());
        dst[..len].copy_from_slice(&bytes[..len]);
    }
    Err(DiagnosticKind::BinaryWidthMismatch {
        field: field.name().to_string(),
        expected: dst.len(),
        actual: bytes.len(),
    })
}

fn type_mismatch(field: &Field, value: &Value) -> DiagnosticKind {
    DiagnosticKind::TypeMismatch {
        field: field.name().to_string(),
        expected: field.kind(),
        actual: value.type_name(),
    }
}
