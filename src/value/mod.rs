//! Dynamically typed bin values.

mod scalar;

pub use scalar::*;

/// A dynamically typed bin value as returned by a batch read.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value; writes nothing.
    Null,
    /// Stored as 0 or 1.
    Boolean(bool),
    /// `i8`
    Int8(i8),
    /// `i16`
    Int16(i16),
    /// `i32`
    Int32(i32),
    /// `i64`, the wire width of server integers.
    Int64(i64),
    /// `u8`
    UInt8(u8),
    /// `u16`
    UInt16(u16),
    /// `u32`
    UInt32(u32),
    /// `u64`
    UInt64(u64),
    /// `f32`
    Float32(f32),
    /// `f64`, the wire width of server floats.
    Float64(f64),
    /// UTF-8 text.
    String(String),
    /// Raw bytes.
    Binary(Vec<u8>),
    /// Ordered values, used for vector (sub-array) fields.
    List(Vec<Value>),
}

impl Value {
    /// Whether the value is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short, stable name of the value's type for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "bool",
            Value::Int8(_) => "i8",
            Value::Int16(_) => "i16",
            Value::Int32(_) => "i32",
            Value::Int64(_) => "i64",
            Value::UInt8(_) => "u8",
            Value::UInt16(_) => "u16",
            Value::UInt32(_) => "u32",
            Value::UInt64(_) => "u64",
            Value::Float32(_) => "f32",
            Value::Float64(_) => "f64",
            Value::String(_) => "string",
            Value::Binary(_) => "binary",
            Value::List(_) => "list",
        }
    }

    /// The numeric reading of the value. Booleans read as 0 or 1.
    pub fn as_scalar(&self) -> Option<Scalar> {
        match self {
            Value::Boolean(v) => Some(Scalar::Int(*v as i64)),
            Value::Int8(v) => Some(Scalar::Int(*v as i64)),
            Value::Int16(v) => Some(Scalar::Int(*v as i64)),
            Value::Int32(v) => Some(Scalar::Int(*v as i64)),
            Value::Int64(v) => Some(Scalar::Int(*v)),
            Value::UInt8(v) => Some(Scalar::UInt(*v as u64)),
            Value::UInt16(v) => Some(Scalar::UInt(*v as u64)),
            Value::UInt32(v) => Some(Scalar::UInt(*v as u64)),
            Value::UInt64(v) => Some(Scalar::UInt(*v)),
            Value::Float32(v) => Some(Scalar::Float(*v as f64)),
            Value::Float64(v) => Some(Scalar::Float(*v)),
            Value::Null | Value::String(_) | Value::Binary(_) | Value::List(_) => None,
        }
    }

    /// The bytes of a [`Value::Binary`].
    pub fn as_binary_opt(&self) -> Option<&[u8]> {
        match self {
            Value::Binary(v) => Some(v),
            _ => None,
        }
    }

    /// The text of a [`Value::String`].
    pub fn as_string_opt(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    /// The items of a [`Value::List`].
    pub fn as_list_opt(&self) -> Option<&[Value]> {
        match self {
            Value::List(v) => Some(v),
            _ => None,
        }
    }
}

macro_rules! implement_from_primitive {
    ($({ $ty:ty, $variant:ident }),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

implement_from_primitive!(
    { bool, Boolean },
    { i8, Int8 },
    { i16, Int16 },
    { i32, Int32 },
    { i64, Int64 },
    { u8, UInt8 },
    { u16, UInt16 },
    { u32, UInt32 },
    { u64, UInt64 },
    { f32, Float32 },
    { f64, Float64 },
    { String, String },
    { Vec<u8>, Binary },
    { Vec<Value>, List },
);

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Binary(value.to_vec())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<Vec<f32>> for Value {
    fn from(values: Vec<f32>) -> Self {
        Value::List(values.into_iter().map(Value::Float32).collect())
    }
}

impl From<Vec<f64>> for Value {
    fn from(values: Vec<f64>) -> Self {
        Value::List(values.into_iter().map(Value::Float64).collect())
    }
}

impl From<Vec<i64>> for Value {
    fn from(values: Vec<i64>) -> Self {
        Value::List(values.into_iter().map(Value::Int64).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::{Scalar, Value};

    #[test]
    fn scalar_reading() {
        assert_eq!(Value::Boolean(true).as_scalar(), Some(Scalar::Int(1)));
        assert_eq!(Value::Int16(-3).as_scalar(), Some(Scalar::Int(-3)));
        assert_eq!(Value::UInt64(u64::MAX).as_scalar(), Some(Scalar::UInt(u64::MAX)));
        assert_eq!(Value::Float32(1.5).as_scalar(), Some(Scalar::Float(1.5)));
        assert_eq!(Value::String("1".into()).as_scalar(), None);
        assert_eq!(Value::Null.as_scalar(), None);
    }

    #[test]
    fn conversions() {
        assert_eq!(Value::from("k1"), Value::String("k1".into()));
        assert_eq!(Value::from(vec![1u8, 2]), Value::Binary(vec![1, 2]));
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(
            Value::from(vec![1.0f32, 2.0]),
            Value::List(vec![Value::Float32(1.0), Value::Float32(2.0)])
        );
        assert_eq!(Value::from(vec![1.0f32]).type_name(), "list");
    }
}
