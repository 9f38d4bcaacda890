//! Row schema validation.
//!
//! A [`Schema`] is the validated, immutable layout every projected row
//! follows: fields in declaration order, packed without padding, each with a
//! precomputed byte offset. Validation happens once per batch read and
//! rejects the whole request before any record is looked at.

mod kind;

use std::{collections::HashMap, sync::Arc};

use arrow::{
    datatypes::{DataType as ArrowDataType, Field as ArrowField, Schema as ArrowSchema},
    error::ArrowError,
};
pub(crate) use kind::arrow_len;
pub use kind::*;
use thiserror::Error;

use crate::observability::{log_debug, log_warn};

/// Why a requested schema was refused. Always fatal for the whole call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The kind has no fixed width.
    #[error(
        "field '{field_name}' must be numeric (int/uint/float) or fixed_bytes, got '{offending_kind}'"
    )]
    SchemaRejected {
        /// The first field with an unsupported kind.
        field_name: String,
        /// The kind as requested.
        offending_kind: String,
    },
    /// Two fields share a name.
    #[error("duplicate field name '{0}'")]
    DuplicateField(String),
    /// A supported kind with an impossible shape or size.
    #[error("invalid field '{name}': {reason}")]
    InvalidField {
        /// The offending field.
        name: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// A field as requested by the caller, in wire form.
///
/// `kind` is one of `i1|i2|i4|i8|u1|u2|u4|u8|f2|f4|f8|fixed_bytes(N)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDesc {
    /// Bin name the field is read from.
    pub name: String,
    /// Element kind token.
    pub kind: String,
    /// Number of elements for a vector field.
    pub vector_length: Option<usize>,
}

impl FieldDesc {
    /// A scalar field.
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            vector_length: None,
        }
    }

    /// A sub-array field of `vector_length` consecutive scalars.
    pub fn vector(name: impl Into<String>, kind: impl Into<String>, vector_length: usize) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            vector_length: Some(vector_length),
        }
    }
}

/// A validated column of the row layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    name: String,
    kind: ElementKind,
    vector_length: Option<usize>,
    offset: usize,
}

impl Field {
    /// Field name, equal to the bin name it is read from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind of each element.
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// `Some(n)` for a vector of `n` elements.
    pub fn vector_length(&self) -> Option<usize> {
        self.vector_length
    }

    /// Whether the field holds a vector.
    pub fn is_vector(&self) -> bool {
        self.vector_length.is_some()
    }

    /// Number of elements stored for this field in each row.
    pub fn element_count(&self) -> usize {
        self.vector_length.unwrap_or(1)
    }

    /// Byte offset of the field inside a row.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Total byte size of the field inside a row.
    ///
    /// Validation guarantees the product fits in `usize`.
    pub fn size(&self) -> usize {
        self.kind.width() * self.element_count()
    }

    pub(crate) fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.size()
    }

    /// The non-nullable Arrow field this column exports as.
    ///
    /// Fails when a width or vector length exceeds what Arrow can address.
    pub fn arrow_field(&self) -> Result<ArrowField, ArrowError> {
        let data_type = match self.vector_length {
            Some(len) => ArrowDataType::FixedSizeList(
                Arc::new(ArrowField::new("item", self.kind.arrow_data_type()?, false)),
                arrow_len(len)?,
            ),
            None => self.kind.arrow_data_type()?,
        };
        Ok(ArrowField::new(&self.name, data_type, false))
    }
}

/// Validated row layout: fields in order, packed without padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<Field>,
    row_width: usize,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Validate wire field descriptors into a row layout.
    ///
    /// # Errors
    ///
    /// [`SchemaError::SchemaRejected`] for any kind outside [`ElementKind`],
    /// and [`SchemaError::DuplicateField`] or [`SchemaError::InvalidField`]
    /// for structural problems, including a row width that overflows `usize`.
    pub fn try_new<I>(descs: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = FieldDesc>,
    {
        let mut resolved = Vec::new();
        for desc in descs {
            let kind = match desc.kind.parse::<ElementKind>() {
                Ok(kind) => kind,
                Err(UnsupportedKind(offending_kind)) => {
                    return Err(rejected(desc.name, offending_kind));
                }
            };
            resolved.push((desc.name, kind, desc.vector_length));
        }
        Self::from_kinds(resolved)
    }

    /// Validate an Arrow schema into a row layout.
    ///
    /// Primitive integer and float types, `FixedSizeBinary` and
    /// `FixedSizeList` of a numeric type are accepted.
    pub fn try_from_arrow(schema: &ArrowSchema) -> Result<Self, SchemaError> {
        let mut resolved = Vec::with_capacity(schema.fields().len());
        for field in schema.fields() {
            let name = field.name().to_string();
            let (data_type, vector_length) = match field.data_type() {
                ArrowDataType::FixedSizeList(item, len) => {
                    if *len <= 0 {
                        return Err(invalid(name, "vector length must be positive"));
                    }
                    (item.data_type(), Some(*len as usize))
                }
                data_type => (data_type, None),
            };
            let kind = ElementKind::try_from(data_type)
                .map_err(|UnsupportedKind(offending_kind)| rejected(name.clone(), offending_kind))?;
            resolved.push((name, kind, vector_length));
        }
        Self::from_kinds(resolved)
    }

    fn from_kinds(resolved: Vec<(String, ElementKind, Option<usize>)>) -> Result<Self, SchemaError> {
        let mut fields = Vec::with_capacity(resolved.len());
        let mut index = HashMap::with_capacity(resolved.len());
        let mut offset: usize = 0;

        for (name, kind, vector_length) in resolved {
            if index.contains_key(&name) {
                return Err(SchemaError::DuplicateField(name));
            }
            if let ElementKind::FixedBytes(0) = kind {
                return Err(invalid(name, "fixed_bytes width must be positive"));
            }
            match vector_length {
                Some(0) => return Err(invalid(name, "vector length must be positive")),
                Some(_) if !kind.is_numeric() => {
                    return Err(invalid(
                        name,
                        "vectors of fixed_bytes are not supported, widen the fixed_bytes instead",
                    ))
                }
                _ => {}
            }

            let end = kind
                .width()
                .checked_mul(vector_length.unwrap_or(1))
                .and_then(|size| offset.checked_add(size));
            let Some(end) = end else {
                return Err(invalid(name, "row width overflows usize"));
            };

            let field = Field {
                name: name.clone(),
                kind,
                vector_length,
                offset,
            };
            offset = end;
            index.insert(name, fields.len());
            fields.push(field);
        }

        log_debug!(
            component = "schema",
            event = "schema_validated",
            fields = fields.len(),
            row_width = offset
        );
        Ok(Self {
            fields,
            row_width: offset,
            index,
        })
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// The field named `name`.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.index_of(name).map(|idx| &self.fields[idx])
    }

    /// Position of the field named `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Sum of every field's size; the stride between consecutive rows.
    pub fn row_width(&self) -> usize {
        self.row_width
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The Arrow schema of the user columns (no metadata columns).
    pub fn arrow_schema(&self) -> Result<ArrowSchema, ArrowError> {
        let fields = self
            .fields
            .iter()
            .map(Field::arrow_field)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ArrowSchema::new(fields))
    }
}

fn rejected(field_name: String, offending_kind: String) -> SchemaError {
    log_warn!(
        component = "schema",
        event = "schema_rejected",
        field = %field_name,
        kind = %offending_kind
    );
    SchemaError::SchemaRejected {
        field_name,
        offending_kind,
    }
}

fn invalid(name: String, reason: &str) -> SchemaError {
    SchemaError::InvalidField {
        name,
        reason: reason.to_string(),
    }
}

/// Creates a [`Schema`] from literal `(name, kind)` or `(name, kind, vector_length)` tuples.
///
/// ## Example:
///
/// ```
/// use kvbatch::batch_schema;
///
/// let schema = batch_schema!(
///     ("temperature", "f8"),
///     ("reading_id", "i4"),
///     ("embedding", "f4", 4),
/// )
/// .unwrap();
/// assert_eq!(schema.row_width(), 8 + 4 + 16);
/// ```
#[macro_export]
macro_rules! batch_schema {
    ($(($name:expr, $kind:expr $(, $len:expr)?)),* $(,)?) => {
        $crate::Schema::try_new(vec![
            $(
                $crate::FieldDesc {
                    name: $name.into(),
                    kind: $kind.into(),
                    vector_length: None::<usize> $(.or(Some($len)))?,
                },
            )*
        ])
    };
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::datatypes::{DataType, Field as ArrowField, Schema as ArrowSchema};

    use super::{ElementKind, FieldDesc, Schema, SchemaError};

    #[test]
    fn offsets_are_packed_in_order() {
        let schema = Schema::try_new(vec![
            FieldDesc::new("t", "f8"),
            FieldDesc::new("id", "i4"),
            FieldDesc::vector("embedding", "f4", 4),
            FieldDesc::new("tag", "fixed_bytes(3)"),
        ])
        .unwrap();

        let offsets: Vec<_> = schema.fields().iter().map(|f| (f.offset(), f.size())).collect();
        assert_eq!(offsets, vec![(0, 8), (8, 4), (12, 16), (28, 3)]);
        assert_eq!(schema.row_width(), 31);
        assert_eq!(schema.index_of("embedding"), Some(2));
        assert_eq!(schema.field("tag").unwrap().kind(), ElementKind::FixedBytes(3));
        assert!(schema.field("missing").is_none());
    }

    #[test]
    fn rejects_text_kind() {
        let err = Schema::try_new(vec![
            FieldDesc::new("id", "i4"),
            FieldDesc::new("name", "U10"),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            SchemaError::SchemaRejected {
                field_name: "name".into(),
                offending_kind: "U10".into(),
            }
        );
    }

    #[test]
    fn rejects_structural_errors() {
        assert_eq!(
            Schema::try_new(vec![FieldDesc::new("a", "i4"), FieldDesc::new("a", "f8")])
                .unwrap_err(),
            SchemaError::DuplicateField("a".into())
        );
        assert!(matches!(
            Schema::try_new(vec![FieldDesc::vector("v", "f4", 0)]).unwrap_err(),
            SchemaError::InvalidField { .. }
        ));
        assert!(matches!(
            Schema::try_new(vec![FieldDesc::new("b", "fixed_bytes(0)")]).unwrap_err(),
            SchemaError::InvalidField { .. }
        ));
        assert!(matches!(
            Schema::try_new(vec![FieldDesc::vector("b", "fixed_bytes(4)", 2)]).unwrap_err(),
            SchemaError::InvalidField { .. }
        ));
    }

    #[test]
    fn from_arrow_schema() {
        let arrow_schema = ArrowSchema::new(vec![
            ArrowField::new("score", DataType::Float32, false),
            ArrowField::new(
                "embedding",
                DataType::FixedSizeList(Arc::new(ArrowField::new("item", DataType::Float32, false)), 3),
                false,
            ),
            ArrowField::new("digest", DataType::FixedSizeBinary(20), false),
        ]);
        let schema = Schema::try_from_arrow(&arrow_schema).unwrap();
        assert_eq!(schema.row_width(), 4 + 12 + 20);
        assert_eq!(schema.field("embedding").unwrap().vector_length(), Some(3));
        assert_eq!(schema.arrow_schema().unwrap(), arrow_schema);

        let err = Schema::try_from_arrow(&ArrowSchema::new(vec![ArrowField::new(
            "name",
            DataType::Utf8,
            true,
        )]))
        .unwrap_err();
        assert!(matches!(
            err,
            SchemaError::SchemaRejected { ref field_name, .. } if field_name == "name"
        ));
    }

    #[test]
    fn oversized_layouts_are_rejected() {
        let half = usize::MAX / 2 + 1;
        let err = Schema::try_new(vec![
            FieldDesc::new("a", format!("fixed_bytes({half})")),
            FieldDesc::new("b", format!("fixed_bytes({half})")),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            SchemaError::InvalidField {
                name: "b".into(),
                reason: "row width overflows usize".into(),
            }
        );

        let err = Schema::try_new(vec![FieldDesc::vector("v", "f8", usize::MAX)]).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::InvalidField { ref name, ref reason }
                if name == "v" && reason == "row width overflows usize"
        ));
    }

    #[test]
    fn layouts_arrow_can_not_address_fail_export() {
        let schema = Schema::try_new(vec![FieldDesc::vector("v", "u1", i32::MAX as usize + 1)]).unwrap();
        assert_eq!(schema.row_width(), i32::MAX as usize + 1);
        assert!(schema.arrow_schema().is_err());
    }

    #[test]
    fn macro_builds_schema() {
        let schema = crate::batch_schema!(("a", "i4"), ("v", "f8", 2)).unwrap();
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.row_width(), 4 + 16);
        assert!(crate::batch_schema!(("a", "str")).is_err());
    }
}
