//! Read access to a finished projection.

pub mod arrow;
mod column;

use std::sync::Arc;

use ::arrow::{
    array::{Array, BooleanArray},
    record_batch::RecordBatch,
};
pub use column::*;

use crate::{
    encode::{encode_rows, WriteKeySpec, WriteRecord},
    error::BatchError,
    index::{IndexKey, KeyIndex},
    observability::log_trace,
    record::{RecordMeta, UserKey},
    schema::Schema,
    store::{codec, ColumnarStore},
    value::Value,
};

#[derive(Debug)]
struct Inner {
    store: ColumnarStore,
    index: KeyIndex,
}

/// An immutable, projected batch: dense rows plus a key index.
///
/// Cloning is cheap and clones share the buffers.
#[derive(Debug, Clone)]
pub struct BatchView {
    inner: Arc<Inner>,
}

impl BatchView {
    pub(crate) fn new(store: ColumnarStore, index: KeyIndex) -> Self {
        Self {
            inner: Arc::new(Inner { store, index }),
        }
    }

    /// The row layout.
    pub fn schema(&self) -> &Arc<Schema> {
        self.inner.store.schema()
    }

    /// The backing buffers.
    pub fn store(&self) -> &ColumnarStore {
        &self.inner.store
    }

    /// The key → row index.
    pub fn key_index(&self) -> &KeyIndex {
        &self.inner.index
    }

    /// Number of rows, one per input record.
    pub fn len(&self) -> usize {
        self.inner.store.len()
    }

    /// Whether the batch has no rows.
    pub fn is_empty(&self) -> bool {
        self.inner.store.is_empty()
    }

    /// Result code per row.
    pub fn result_codes(&self) -> &[i32] {
        self.inner.store.result_codes()
    }

    /// Generation and ttl per row; zero for failed rows.
    pub fn meta(&self) -> &[RecordMeta] {
        self.inner.store.meta()
    }

    /// Looks up the last row registered under `key`.
    ///
    /// Rows indexed by position because their key was missing are never
    /// returned here; reach them with [`BatchView::row`].
    pub fn get(&self, key: impl Into<UserKey>) -> Result<Row<'_>, BatchError> {
        let key = key.into();
        match self.inner.index.position(&key) {
            Some(row) => self.row(row),
            None => Err(BatchError::KeyNotFound(key)),
        }
    }

    /// Row index of `key`.
    pub fn position(&self, key: &UserKey) -> Option<usize> {
        self.inner.index.position(key)
    }

    /// Whether some row is registered under `key`.
    pub fn contains_key(&self, key: &UserKey) -> bool {
        self.position(key).is_some()
    }

    /// Row `index`, in input order.
    pub fn row(&self, index: usize) -> Result<Row<'_>, BatchError> {
        let len = self.len();
        if index >= len {
            return Err(BatchError::RowOutOfBounds { index, len });
        }
        Ok(Row { view: self, index })
    }

    /// Every row in order.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        (0..self.len()).map(move |index| Row { view: self, index })
    }

    /// The column of field `name`.
    pub fn column(&self, name: &str) -> Result<ColumnView<'_>, BatchError> {
        let field = self
            .schema()
            .field(name)
            .ok_or_else(|| BatchError::FieldNotFound(name.to_string()))?;
        Ok(ColumnView::new(field, &self.inner.store))
    }

    /// Keeps the rows whose mask entry is true, in order. Null entries count
    /// as false.
    ///
    /// The filtered view gets its own key index over the kept rows, so a
    /// key whose last row was dropped resolves to its last kept row.
    pub fn filter(&self, mask: &BooleanArray) -> Result<BatchView, BatchError> {
        if mask.len() != self.len() {
            return Err(BatchError::MaskLength {
                expected: self.len(),
                actual: mask.len(),
            });
        }
        let rows: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(row, keep)| keep.unwrap_or(false).then_some(row))
            .collect();
        Ok(self.select(&rows))
    }

    /// The rows whose result code is 0.
    pub fn successful(&self) -> BatchView {
        let rows: Vec<usize> = self
            .result_codes()
            .iter()
            .enumerate()
            .filter_map(|(row, code)| (*code == 0).then_some(row))
            .collect();
        self.select(&rows)
    }

    /// One mask entry per row, true where `predicate` holds for its code.
    pub fn mask_result_codes(&self, predicate: impl Fn(i32) -> bool) -> BooleanArray {
        self.result_codes()
            .iter()
            .map(|code| predicate(*code))
            .collect::<Vec<_>>()
            .into()
    }

    /// One mask entry per row, true where `predicate` holds for field `name`.
    pub fn mask_field<F>(&self, name: &str, predicate: F) -> Result<BooleanArray, BatchError>
    where
        F: Fn(FieldValue<'_>) -> bool,
    {
        let column = self.column(name)?;
        Ok(column.iter().map(predicate).collect::<Vec<_>>().into())
    }

    /// Copies the batch into an Arrow record batch, see [`arrow`] for the
    /// column layout.
    pub fn to_record_batch(&self) -> Result<RecordBatch, BatchError> {
        arrow::record_batch(&self.inner.store)
    }

    /// Turns every row back into a write record.
    pub fn to_write_records(&self, spec: &WriteKeySpec) -> Result<Vec<WriteRecord>, BatchError> {
        encode_rows(self.schema(), self.inner.store.as_bytes(), spec)
    }

    fn select(&self, rows: &[usize]) -> BatchView {
        let view = BatchView::new(
            self.inner.store.take(rows),
            self.inner.index.select(rows),
        );
        log_trace!(
            component = "view",
            event = "batch_filtered",
            rows = self.len(),
            kept = view.len()
        );
        view
    }
}

/// One row of a [`BatchView`].
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    view: &'a BatchView,
    index: usize,
}

impl<'a> Row<'a> {
    /// Position of the row in its batch.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The key the row was indexed under.
    pub fn key(&self) -> Option<&'a IndexKey> {
        self.view.inner.index.key_of(self.index)
    }

    /// The read's result code.
    pub fn result_code(&self) -> i32 {
        self.view.result_codes()[self.index]
    }

    /// Generation and ttl; zero for failed reads.
    pub fn meta(&self) -> RecordMeta {
        self.view.meta()[self.index]
    }

    /// Whether the read succeeded.
    pub fn is_ok(&self) -> bool {
        self.result_code() == 0
    }

    /// The packed bytes of the row.
    pub fn bytes(&self) -> &'a [u8] {
        let width = self.view.inner.store.row_width();
        &self.view.inner.store.as_bytes()[self.index * width..(self.index + 1) * width]
    }

    /// The value of field `name`.
    pub fn get(&self, name: &str) -> Result<FieldValue<'a>, BatchError> {
        let field = self
            .view
            .schema()
            .field(name)
            .ok_or_else(|| BatchError::FieldNotFound(name.to_string()))?;
        Ok(FieldValue::read(field, &self.bytes()[field.range()]))
    }

    /// The value of the field at schema position `field`.
    pub fn value_at(&self, field: usize) -> Option<FieldValue<'a>> {
        let field = self.view.schema().fields().get(field)?;
        Some(FieldValue::read(field, &self.bytes()[field.range()]))
    }

    /// Reads the row back into dynamic bins, in schema order.
    pub fn to_bins(&self) -> Vec<(String, Value)> {
        let bytes = self.bytes();
        self.view
            .schema()
            .fields()
            .iter()
            .map(|field| (field.name().to_string(), codec::read_value(field, bytes)))
            .collect()
    }
}
