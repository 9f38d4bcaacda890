//! Export of projected batches to Arrow.
//!
//! Every exported array is a copy; the row buffer stays row-major. Columns
//! are non-nullable: failed rows export as zeros, and `_result_code` tells
//! them apart.

use std::sync::Arc;

use arrow::{
    array::{
        ArrayRef, FixedSizeBinaryArray, FixedSizeListArray, Float16Array, Float32Array,
        Float64Array, Int16Array, Int32Array, Int64Array, Int8Array, UInt16Array, UInt32Array,
        UInt64Array, UInt8Array,
    },
    buffer::Buffer,
    datatypes::{DataType, Field as ArrowField, Schema as ArrowSchema},
    error::ArrowError,
    record_batch::RecordBatch,
};
use half::f16;

use crate::{
    error::BatchError,
    schema::{arrow_len, ElementKind, Field},
    store::{codec::array, ColumnarStore},
};

/// Leading `Int32` column with each row's result code.
pub const RESULT_CODE_COLUMN: &str = "_result_code";
/// `UInt32` record generation, zero for failed rows.
pub const GENERATION_COLUMN: &str = "_generation";
/// `UInt32` remaining time to live, zero for failed rows.
pub const TTL_COLUMN: &str = "_ttl";

macro_rules! primitive_array {
    ($array:ty, $native:ty, $elements:expr) => {
        Arc::new(<$array>::from_iter_values(
            $elements.map(|bytes| <$native>::from_ne_bytes(array(bytes))),
        )) as ArrayRef
    };
}

/// Builds one flat array out of equally wide element slices.
fn element_array<'a>(
    kind: ElementKind,
    elements: impl Iterator<Item = &'a [u8]>,
) -> Result<ArrayRef, ArrowError> {
    let array = match kind {
        ElementKind::Int8 => primitive_array!(Int8Array, i8, elements),
        ElementKind::Int16 => primitive_array!(Int16Array, i16, elements),
        ElementKind::Int32 => primitive_array!(Int32Array, i32, elements),
        ElementKind::Int64 => primitive_array!(Int64Array, i64, elements),
        ElementKind::UInt8 => primitive_array!(UInt8Array, u8, elements),
        ElementKind::UInt16 => primitive_array!(UInt16Array, u16, elements),
        ElementKind::UInt32 => primitive_array!(UInt32Array, u32, elements),
        ElementKind::UInt64 => primitive_array!(UInt64Array, u64, elements),
        ElementKind::Float16 => Arc::new(Float16Array::from_iter_values(
            elements.map(|bytes| f16::from_bits(u16::from_ne_bytes(array(bytes)))),
        )) as ArrayRef,
        ElementKind::Float32 => primitive_array!(Float32Array, f32, elements),
        ElementKind::Float64 => primitive_array!(Float64Array, f64, elements),
        ElementKind::FixedBytes(width) => {
            let mut values = Vec::new();
            for bytes in elements {
                values.extend_from_slice(bytes);
            }
            // try_from_iter can not build an empty array, try_new can.
            Arc::new(FixedSizeBinaryArray::try_new(
                arrow_len(width)?,
                Buffer::from_vec(values),
                None,
            )?) as ArrayRef
        }
    };
    Ok(array)
}

/// Copies one field of every row into an array of `field.arrow_field()`'s type.
pub(crate) fn field_array(store: &ColumnarStore, field: &Field) -> Result<ArrayRef, BatchError> {
    let kind = field.kind();
    let slices = store.field_slices(field);
    let array = match field.vector_length() {
        None => element_array(kind, slices)?,
        Some(len) => {
            let values = element_array(
                kind,
                slices.flat_map(|bytes| bytes.chunks_exact(kind.width())),
            )?;
            let item = Arc::new(ArrowField::new("item", kind.arrow_data_type()?, false));
            Arc::new(FixedSizeListArray::try_new(
                item,
                arrow_len(len)?,
                values,
                None,
            )?) as ArrayRef
        }
    };
    Ok(array)
}

/// Arrow schema of an exported batch: the metadata columns, then the fields.
pub fn export_schema(store: &ColumnarStore) -> Result<ArrowSchema, ArrowError> {
    let mut fields = vec![
        ArrowField::new(RESULT_CODE_COLUMN, DataType::Int32, false),
        ArrowField::new(GENERATION_COLUMN, DataType::UInt32, false),
        ArrowField::new(TTL_COLUMN, DataType::UInt32, false),
    ];
    for field in store.schema().fields() {
        fields.push(field.arrow_field()?);
    }
    Ok(ArrowSchema::new(fields))
}

pub(crate) fn record_batch(store: &ColumnarStore) -> Result<RecordBatch, BatchError> {
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(store.schema().len() + 3);
    columns.push(Arc::new(Int32Array::from(store.result_codes().to_vec())));
    columns.push(Arc::new(UInt32Array::from_iter_values(
        store.meta().iter().map(|meta| meta.generation),
    )));
    columns.push(Arc::new(UInt32Array::from_iter_values(
        store.meta().iter().map(|meta| meta.ttl),
    )));
    for field in store.schema().fields() {
        columns.push(field_array(store, field)?);
    }
    Ok(RecordBatch::try_new(Arc::new(export_schema(store)?), columns)?)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::{
        array::{Array, AsArray, FixedSizeListArray},
        datatypes::{DataType, Float16Type, Float32Type, Int32Type, UInt32Type},
    };
    use half::f16;

    use super::{field_array, record_batch};
    use crate::{
        record::RecordMeta,
        schema::{FieldDesc, Schema},
        store::ColumnarStore,
    };

    fn store() -> ColumnarStore {
        let schema = Schema::try_new(vec![
            FieldDesc::new("h", "f2"),
            FieldDesc::vector("v", "f4", 2),
            FieldDesc::new("tag", "fixed_bytes(2)"),
        ])
        .unwrap();
        let mut store = ColumnarStore::zeroed(Arc::new(schema), 2).unwrap();
        let row: Vec<u8> = [
            &f16::from_f32(0.5).to_bits().to_ne_bytes()[..],
            &1.0f32.to_ne_bytes()[..],
            &2.0f32.to_ne_bytes()[..],
            &b"ab"[..],
        ]
        .concat();
        store.row_mut(0).copy_from_slice(&row);
        store.set_meta(0, RecordMeta::new(3, 60));
        store.set_result_code(1, 2);
        store
    }

    #[test]
    fn export_fields() {
        let store = store();
        let schema = Arc::clone(store.schema());

        let h = field_array(&store, schema.field("h").unwrap()).unwrap();
        assert_eq!(h.as_primitive::<Float16Type>().value(0), f16::from_f32(0.5));

        let v = field_array(&store, schema.field("v").unwrap()).unwrap();
        let v = v.as_any().downcast_ref::<FixedSizeListArray>().unwrap();
        assert_eq!(v.value_length(), 2);
        let first = v.value(0);
        assert_eq!(&first.as_primitive::<Float32Type>().values()[..], &[1.0, 2.0]);

        let tag = field_array(&store, schema.field("tag").unwrap()).unwrap();
        let tag = tag.as_fixed_size_binary();
        assert_eq!(tag.value(0), b"ab");
        assert_eq!(tag.value(1), b"\0\0");
    }

    #[test]
    fn export_batch() {
        let batch = record_batch(&store()).unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), 6);
        assert_eq!(batch.schema().field(3).data_type(), &DataType::Float16);

        let codes = batch.column(0).as_primitive::<Int32Type>();
        assert_eq!(&codes.values()[..], &[0, 2]);
        let ttl = batch.column(2).as_primitive::<UInt32Type>();
        assert_eq!(&ttl.values()[..], &[60, 0]);
    }

    #[test]
    fn export_empty_binary_column() {
        let schema = Schema::try_new(vec![FieldDesc::new("tag", "fixed_bytes(4)")]).unwrap();
        let store = ColumnarStore::zeroed(Arc::new(schema), 0).unwrap();
        let batch = record_batch(&store).unwrap();
        assert_eq!(batch.num_rows(), 0);
        assert_eq!(batch.column(3).len(), 0);
    }
}
