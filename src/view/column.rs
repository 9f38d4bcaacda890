//! Borrowed, no-copy reads of single fields.

use arrow::array::ArrayRef;

use super::arrow::field_array;
use crate::{
    error::BatchError,
    schema::{ElementKind, Field},
    store::{codec, ColumnarStore},
    value::Scalar,
};

/// One field of one row, borrowed from the row buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    /// A numeric field.
    Scalar(Scalar),
    /// A `fixed_bytes` field, all of its bytes.
    Bytes(&'a [u8]),
    /// A vector field.
    Vector(VectorRef<'a>),
}

impl<'a> FieldValue<'a> {
    pub(crate) fn read(field: &Field, bytes: &'a [u8]) -> Self {
        match (field.kind(), field.vector_length()) {
            (ElementKind::FixedBytes(_), _) => FieldValue::Bytes(bytes),
            (kind, Some(_)) => FieldValue::Vector(VectorRef { kind, bytes }),
            (kind, None) => match codec::read_scalar(bytes, kind) {
                Some(scalar) => FieldValue::Scalar(scalar),
                None => FieldValue::Bytes(bytes),
            },
        }
    }

    /// The value of a numeric field.
    pub fn as_scalar(&self) -> Option<Scalar> {
        match self {
            FieldValue::Scalar(scalar) => Some(*scalar),
            _ => None,
        }
    }

    /// The bytes of a `fixed_bytes` field.
    pub fn as_bytes(&self) -> Option<&'a [u8]> {
        match self {
            FieldValue::Bytes(bytes) => Some(*bytes),
            _ => None,
        }
    }

    /// The elements of a vector field.
    pub fn as_vector(&self) -> Option<VectorRef<'a>> {
        match self {
            FieldValue::Vector(vector) => Some(*vector),
            _ => None,
        }
    }
}

/// The elements of one vector field in one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorRef<'a> {
    kind: ElementKind,
    bytes: &'a [u8],
}

impl<'a> VectorRef<'a> {
    /// Kind of each element.
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.bytes.len() / self.kind.width()
    }

    /// Whether the vector has no elements.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Element `i`.
    pub fn get(&self, i: usize) -> Option<Scalar> {
        let width = self.kind.width();
        let element = self.bytes.get(i * width..(i + 1) * width)?;
        codec::read_scalar(element, self.kind)
    }

    /// Elements in order.
    pub fn iter(&self) -> impl Iterator<Item = Scalar> + 'a {
        let kind = self.kind;
        self.bytes
            .chunks_exact(kind.width())
            .filter_map(move |element| codec::read_scalar(element, kind))
    }

    /// The raw native-endian element bytes.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

/// Every row's value of one field, in row order.
///
/// Reads go straight to the row buffer: the column is a strided walk over
/// it and never copies unless exported with [`ColumnView::to_array`].
#[derive(Debug, Clone, Copy)]
pub struct ColumnView<'a> {
    field: &'a Field,
    store: &'a ColumnarStore,
}

impl<'a> ColumnView<'a> {
    pub(crate) fn new(field: &'a Field, store: &'a ColumnarStore) -> Self {
        Self { field, store }
    }

    /// The field this column reads.
    pub fn field(&self) -> &'a Field {
        self.field
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether the batch has no rows.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// The value in row `row`.
    pub fn get(&self, row: usize) -> Option<FieldValue<'a>> {
        let bytes = self.store.row_bytes(row)?;
        Some(FieldValue::read(self.field, &bytes[self.field.range()]))
    }

    /// Values in row order.
    pub fn iter(&self) -> impl Iterator<Item = FieldValue<'a>> + 'a {
        let field = self.field;
        self.store
            .field_slices(field)
            .map(move |bytes| FieldValue::read(field, bytes))
    }

    /// Scalars of a non-vector numeric column. `None` for binary and
    /// vector columns.
    pub fn scalars(&self) -> Option<impl Iterator<Item = Scalar> + 'a> {
        let field = self.field;
        if field.is_vector() || !field.kind().is_numeric() {
            return None;
        }
        Some(
            self.store
                .field_slices(field)
                .filter_map(move |bytes| codec::read_scalar(bytes, field.kind())),
        )
    }

    /// Copies the column into an Arrow array of the field's Arrow type.
    pub fn to_array(&self) -> Result<ArrayRef, BatchError> {
        field_array(self.store, self.field)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{ColumnView, FieldValue};
    use crate::{
        schema::{FieldDesc, Schema},
        store::ColumnarStore,
        value::Scalar,
    };

    fn store() -> ColumnarStore {
        let schema = Schema::try_new(vec![
            FieldDesc::new("id", "i2"),
            FieldDesc::vector("v", "u1", 3),
            FieldDesc::new("tag", "fixed_bytes(2)"),
        ])
        .unwrap();
        let mut store = ColumnarStore::zeroed(Arc::new(schema), 2).unwrap();
        store
            .row_mut(0)
            .copy_from_slice(&[&7i16.to_ne_bytes()[..], &[1u8, 2, 3][..], &b"ab"[..]].concat());
        store
            .row_mut(1)
            .copy_from_slice(&[&(-1i16).to_ne_bytes()[..], &[4u8, 5, 6][..], &b"cd"[..]].concat());
        store
    }

    #[test]
    fn scalar_column() {
        let store = store();
        let column = ColumnView::new(store.schema().field("id").unwrap(), &store);
        assert_eq!(column.len(), 2);
        assert_eq!(column.get(1), Some(FieldValue::Scalar(Scalar::Int(-1))));
        assert_eq!(column.get(2), None);
        assert_eq!(
            column.scalars().unwrap().collect::<Vec<_>>(),
            vec![Scalar::Int(7), Scalar::Int(-1)]
        );
    }

    #[test]
    fn vector_and_bytes_columns() {
        let store = store();
        let schema = Arc::clone(store.schema());

        let v = ColumnView::new(schema.field("v").unwrap(), &store);
        assert!(v.scalars().is_none());
        let second = v.get(1).unwrap().as_vector().unwrap();
        assert_eq!(second.len(), 3);
        assert_eq!(second.get(2), Some(Scalar::UInt(6)));
        assert_eq!(second.get(3), None);
        assert_eq!(
            v.get(0).unwrap().as_vector().unwrap().iter().collect::<Vec<_>>(),
            vec![Scalar::UInt(1), Scalar::UInt(2), Scalar::UInt(3)]
        );

        let tag = ColumnView::new(schema.field("tag").unwrap(), &store);
        let tags: Vec<_> = tag.iter().map(|value| value.as_bytes().unwrap()).collect();
        assert_eq!(tags, vec![&b"ab"[..], &b"cd"[..]]);
    }
}
