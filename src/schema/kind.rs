use std::{fmt, str::FromStr};

use arrow::{datatypes::DataType as ArrowDataType, error::ArrowError};

/// The closed set of element kinds that can be packed into a fixed-width row.
///
/// Anything outside this enum (variable-length text, opaque objects, nested
/// values) has no fixed in-memory width and is rejected during schema
/// validation.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum ElementKind {
    /// `i1`
    Int8,
    /// `i2`
    Int16,
    /// `i4`
    Int32,
    /// `i8`
    Int64,
    /// `u1`
    UInt8,
    /// `u2`
    UInt16,
    /// `u4`
    UInt32,
    /// `u8`
    UInt64,
    /// IEEE 754 half precision.
    Float16,
    /// `f4`
    Float32,
    /// `f8`
    Float64,
    /// Raw bytes of exactly the given width.
    FixedBytes(usize),
}

impl ElementKind {
    /// Width of one element in bytes.
    pub fn width(&self) -> usize {
        match self {
            ElementKind::Int8 | ElementKind::UInt8 => 1,
            ElementKind::Int16 | ElementKind::UInt16 | ElementKind::Float16 => 2,
            ElementKind::Int32 | ElementKind::UInt32 | ElementKind::Float32 => 4,
            ElementKind::Int64 | ElementKind::UInt64 | ElementKind::Float64 => 8,
            ElementKind::FixedBytes(width) => *width,
        }
    }

    /// Signed integer kinds.
    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            ElementKind::Int8 | ElementKind::Int16 | ElementKind::Int32 | ElementKind::Int64
        )
    }

    /// Unsigned integer kinds.
    pub fn is_unsigned(&self) -> bool {
        matches!(
            self,
            ElementKind::UInt8 | ElementKind::UInt16 | ElementKind::UInt32 | ElementKind::UInt64
        )
    }

    /// Floating point kinds, `f2` included.
    pub fn is_float(&self) -> bool {
        matches!(
            self,
            ElementKind::Float16 | ElementKind::Float32 | ElementKind::Float64
        )
    }

    /// Integer and floating point kinds.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, ElementKind::FixedBytes(_))
    }

    /// The Arrow type a single element of this kind exports as.
    ///
    /// Fails for a `fixed_bytes` width Arrow can not express.
    pub fn arrow_data_type(&self) -> Result<ArrowDataType, ArrowError> {
        let data_type = match self {
            ElementKind::Int8 => ArrowDataType::Int8,
            ElementKind::Int16 => ArrowDataType::Int16,
            ElementKind::Int32 => ArrowDataType::Int32,
            ElementKind::Int64 => ArrowDataType::Int64,
            ElementKind::UInt8 => ArrowDataType::UInt8,
            ElementKind::UInt16 => ArrowDataType::UInt16,
            ElementKind::UInt32 => ArrowDataType::UInt32,
            ElementKind::UInt64 => ArrowDataType::UInt64,
            ElementKind::Float16 => ArrowDataType::Float16,
            ElementKind::Float32 => ArrowDataType::Float32,
            ElementKind::Float64 => ArrowDataType::Float64,
            ElementKind::FixedBytes(width) => ArrowDataType::FixedSizeBinary(arrow_len(*width)?),
        };
        Ok(data_type)
    }
}

/// Arrow sizes list and binary widths with `i32`.
pub(crate) fn arrow_len(len: usize) -> Result<i32, ArrowError> {
    i32::try_from(len)
        .map_err(|_| ArrowError::InvalidArgumentError(format!("length {len} exceeds i32::MAX")))
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Int8 => f.write_str("i1"),
            ElementKind::Int16 => f.write_str("i2"),
            ElementKind::Int32 => f.write_str("i4"),
            ElementKind::Int64 => f.write_str("i8"),
            ElementKind::UInt8 => f.write_str("u1"),
            ElementKind::UInt16 => f.write_str("u2"),
            ElementKind::UInt32 => f.write_str("u4"),
            ElementKind::UInt64 => f.write_str("u8"),
            ElementKind::Float16 => f.write_str("f2"),
            ElementKind::Float32 => f.write_str("f4"),
            ElementKind::Float64 => f.write_str("f8"),
            ElementKind::FixedBytes(width) => write!(f, "fixed_bytes({width})"),
        }
    }
}

/// A kind token that does not name a member of [`ElementKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedKind(
    /// The token or Arrow type as given.
    pub String,
);

impl FromStr for ElementKind {
    type Err = UnsupportedKind;

    /// Parses the schema wire tokens `i1|i2|i4|i8|u1|u2|u4|u8|f2|f4|f8|fixed_bytes(N)`.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let trimmed = token.trim();
        let kind = match trimmed {
            "i1" => ElementKind::Int8,
            "i2" => ElementKind::Int16,
            "i4" => ElementKind::Int32,
            "i8" => ElementKind::Int64,
            "u1" => ElementKind::UInt8,
            "u2" => ElementKind::UInt16,
            "u4" => ElementKind::UInt32,
            "u8" => ElementKind::UInt64,
            "f2" => ElementKind::Float16,
            "f4" => ElementKind::Float32,
            "f8" => ElementKind::Float64,
            other => {
                let width = other
                    .strip_prefix("fixed_bytes(")
                    .and_then(|rest| rest.strip_suffix(')'))
                    .and_then(|width| width.trim().parse::<usize>().ok())
                    .ok_or_else(|| UnsupportedKind(token.to_string()))?;
                ElementKind::FixedBytes(width)
            }
        };
        Ok(kind)
    }
}

impl TryFrom<&ArrowDataType> for ElementKind {
    type Error = UnsupportedKind;

    fn try_from(data_type: &ArrowDataType) -> Result<Self, Self::Error> {
        match data_type {
            ArrowDataType::Int8 => Ok(ElementKind::Int8),
            ArrowDataType::Int16 => Ok(ElementKind::Int16),
            ArrowDataType::Int32 => Ok(ElementKind::Int32),
            ArrowDataType::Int64 => Ok(ElementKind::Int64),
            ArrowDataType::UInt8 => Ok(ElementKind::UInt8),
            ArrowDataType::UInt16 => Ok(ElementKind::UInt16),
            ArrowDataType::UInt32 => Ok(ElementKind::UInt32),
            ArrowDataType::UInt64 => Ok(ElementKind::UInt64),
            ArrowDataType::Float16 => Ok(ElementKind::Float16),
            ArrowDataType::Float32 => Ok(ElementKind::Float32),
            ArrowDataType::Float64 => Ok(ElementKind::Float64),
            ArrowDataType::FixedSizeBinary(width) if *width >= 0 => {
                Ok(ElementKind::FixedBytes(*width as usize))
            }
            other => Err(UnsupportedKind(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use arrow::datatypes::DataType;

    use super::ElementKind;

    #[test]
    fn parse_wire_tokens() {
        let cases = [
            ("i1", ElementKind::Int8, 1),
            ("i2", ElementKind::Int16, 2),
            ("i4", ElementKind::Int32, 4),
            ("i8", ElementKind::Int64, 8),
            ("u1", ElementKind::UInt8, 1),
            ("u2", ElementKind::UInt16, 2),
            ("u4", ElementKind::UInt32, 4),
            ("u8", ElementKind::UInt64, 8),
            ("f2", ElementKind::Float16, 2),
            ("f4", ElementKind::Float32, 4),
            ("f8", ElementKind::Float64, 8),
            ("fixed_bytes(16)", ElementKind::FixedBytes(16), 16),
        ];
        for (token, kind, width) in cases {
            let parsed: ElementKind = token.parse().unwrap();
            assert_eq!(parsed, kind);
            assert_eq!(parsed.width(), width);
            assert_eq!(parsed.to_string(), token);
        }
    }

    #[test]
    fn reject_unlisted_tokens() {
        for token in ["str", "U10", "O", "b1", "i3", "fixed_bytes", "fixed_bytes(x)", ""] {
            let err = token.parse::<ElementKind>().unwrap_err();
            assert_eq!(err.0, token);
        }
    }

    #[test]
    fn arrow_round_trip() {
        for kind in [
            ElementKind::Int16,
            ElementKind::UInt64,
            ElementKind::Float16,
            ElementKind::Float64,
            ElementKind::FixedBytes(8),
        ] {
            assert_eq!(ElementKind::try_from(&kind.arrow_data_type().unwrap()).unwrap(), kind);
        }
        assert!(ElementKind::FixedBytes(i32::MAX as usize + 1).arrow_data_type().is_err());
        assert!(ElementKind::try_from(&DataType::Utf8).is_err());
        assert!(ElementKind::try_from(&DataType::Boolean).is_err());
        assert!(ElementKind::try_from(&DataType::Binary).is_err());
    }
}
