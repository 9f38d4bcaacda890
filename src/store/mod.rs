//! Dense backing buffers of a projected batch.

pub(crate) mod codec;

use std::sync::Arc;

use crate::{
    error::BatchError,
    record::RecordMeta,
    schema::{Field, Schema},
};

/// Row-major storage for one projected batch.
///
/// Three parallel buffers share the row numbering: the packed rows, the
/// per-row metadata and the per-row result codes. All of them are sized once
/// at construction and zero-filled; nothing is resized afterwards.
#[derive(Debug, Clone)]
pub struct ColumnarStore {
    schema: Arc<Schema>,
    rows: Vec<u8>,
    meta: Vec<RecordMeta>,
    result_codes: Vec<i32>,
}

impl ColumnarStore {
    pub(crate) fn zeroed(schema: Arc<Schema>, len: usize) -> Result<Self, BatchError> {
        let row_width = schema.row_width();
        let size = len
            .checked_mul(row_width)
            .ok_or(BatchError::CapacityOverflow { rows: len, row_width })?;
        Ok(Self {
            schema,
            rows: vec![0u8; size],
            meta: vec![RecordMeta::default(); len],
            result_codes: vec![0; len],
        })
    }

    /// The layout every row follows.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.result_codes.len()
    }

    /// Whether the store holds no rows.
    pub fn is_empty(&self) -> bool {
        self.result_codes.is_empty()
    }

    /// Bytes per row.
    pub fn row_width(&self) -> usize {
        self.schema.row_width()
    }

    /// The packed bytes of row `row`.
    pub fn row_bytes(&self, row: usize) -> Option<&[u8]> {
        if row >= self.len() {
            return None;
        }
        let width = self.row_width();
        Some(&self.rows[row * width..(row + 1) * width])
    }

    /// The whole row-major buffer, `len() * row_width()` bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.rows
    }

    /// The bytes of `field` in every row, in row order, borrowed in place.
    pub fn field_slices<'a>(&'a self, field: &Field) -> impl Iterator<Item = &'a [u8]> + 'a {
        let width = self.row_width();
        let range = field.range();
        (0..self.len()).map(move |row| {
            let start = row * width;
            &self.rows[start + range.start..start + range.end]
        })
    }

    /// Generation and ttl per row; zero for failed rows.
    pub fn meta(&self) -> &[RecordMeta] {
        &self.meta
    }

    /// Result code per row.
    pub fn result_codes(&self) -> &[i32] {
        &self.result_codes
    }

    pub(crate) fn row_mut(&mut self, row: usize) -> &mut [u8] {
        let width = self.row_width();
        &mut self.rows[row * width..(row + 1) * width]
    }

    pub(crate) fn set_result_code(&mut self, row: usize, code: i32) {
        self.result_codes[row] = code;
    }

    pub(crate) fn set_meta(&mut self, row: usize, meta: RecordMeta) {
        self.meta[row] = meta;
    }

    /// Gathers the given rows, in the given order, into a new store.
    pub(crate) fn take(&self, rows: &[usize]) -> Self {
        let width = self.row_width();
        let mut taken = Vec::with_capacity(rows.len() * width);
        let mut meta = Vec::with_capacity(rows.len());
        let mut result_codes = Vec::with_capacity(rows.len());
        for &row in rows {
            taken.extend_from_slice(&self.rows[row * width..(row + 1) * width]);
            meta.push(self.meta[row]);
            result_codes.push(self.result_codes[row]);
        }
        Self {
            schema: Arc::clone(&self.schema),
            rows: taken,
            meta,
            result_codes,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::ColumnarStore;
    use crate::{
        error::BatchError,
        record::RecordMeta,
        schema::{FieldDesc, Schema},
    };

    fn schema() -> Arc<Schema> {
        Arc::new(Schema::try_new(vec![FieldDesc::new("a", "i2"), FieldDesc::new("b", "u1")]).unwrap())
    }

    #[test]
    fn zeroed_buffers() {
        let store = ColumnarStore::zeroed(schema(), 4).unwrap();
        assert_eq!(store.len(), 4);
        assert_eq!(store.as_bytes().len(), 4 * 3);
        assert!(store.as_bytes().iter().all(|b| *b == 0));
        assert_eq!(store.meta(), &[RecordMeta::default(); 4]);
        assert_eq!(store.result_codes(), &[0; 4]);
        assert!(store.row_bytes(4).is_none());

        let empty = ColumnarStore::zeroed(schema(), 0).unwrap();
        assert!(empty.is_empty());
        assert!(empty.as_bytes().is_empty());
    }

    #[test]
    fn oversized_buffers_are_refused() {
        let err = ColumnarStore::zeroed(schema(), usize::MAX).unwrap_err();
        assert!(matches!(
            err,
            BatchError::CapacityOverflow { rows: usize::MAX, row_width: 3 }
        ));
    }

    #[test]
    fn take_gathers_rows() {
        let mut store = ColumnarStore::zeroed(schema(), 3).unwrap();
        for row in 0..3 {
            store.row_mut(row).copy_from_slice(&[row as u8; 3]);
            store.set_result_code(row, row as i32);
            store.set_meta(row, RecordMeta::new(row as u32, 0));
        }

        let taken = store.take(&[2, 0]);
        assert_eq!(taken.len(), 2);
        assert_eq!(taken.row_bytes(0), Some(&[2u8, 2, 2][..]));
        assert_eq!(taken.row_bytes(1), Some(&[0u8, 0, 0][..]));
        assert_eq!(taken.result_codes(), &[2, 0]);
        assert_eq!(taken.meta()[0].generation, 2);
    }

    #[test]
    fn field_slices_are_strided() {
        let mut store = ColumnarStore::zeroed(schema(), 2).unwrap();
        store.row_mut(0).copy_from_slice(&[1, 2, 3]);
        store.row_mut(1).copy_from_slice(&[4, 5, 6]);

        let schema = schema();
        let a: Vec<_> = store.field_slices(&schema.fields()[0]).collect();
        let b: Vec<_> = store.field_slices(&schema.fields()[1]).collect();
        assert_eq!(a, vec![&[1u8, 2][..], &[4, 5][..]]);
        assert_eq!(b, vec![&[3u8][..], &[6][..]]);
    }
}
