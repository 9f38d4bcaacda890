//! Native-endian element encoding inside a row.
//!
//! Callers hand in slices that are exactly as long as the field (or element)
//! they address; the layout computed by [`Schema`](crate::Schema) guarantees it.

use half::f16;

use crate::{
    schema::{ElementKind, Field},
    value::{Scalar, Value},
};

pub(crate) fn array<const N: usize>(src: &[u8]) -> [u8; N] {
    let mut buf = [0u8; N];
    buf.copy_from_slice(&src[..N]);
    buf
}

/// Writes one numeric element. `dst` must be `kind.width()` bytes long.
pub(crate) fn write_scalar(dst: &mut [u8], kind: ElementKind, scalar: Scalar) {
    match kind {
        ElementKind::Int8 => dst.copy_from_slice(&(scalar.as_i64() as i8).to_ne_bytes()),
        ElementKind::Int16 => dst.copy_from_slice(&(scalar.as_i64() as i16).to_ne_bytes()),
        ElementKind::Int32 => dst.copy_from_slice(&(scalar.as_i64() as i32).to_ne_bytes()),
        ElementKind::Int64 => dst.copy_from_slice(&scalar.as_i64().to_ne_bytes()),
        ElementKind::UInt8 => dst.copy_from_slice(&(scalar.as_u64() as u8).to_ne_bytes()),
        ElementKind::UInt16 => dst.copy_from_slice(&(scalar.as_u64() as u16).to_ne_bytes()),
        ElementKind::UInt32 => dst.copy_from_slice(&(scalar.as_u64() as u32).to_ne_bytes()),
        ElementKind::UInt64 => dst.copy_from_slice(&scalar.as_u64().to_ne_bytes()),
        ElementKind::Float16 => {
            dst.copy_from_slice(&f16::from_f64(scalar.as_f64()).to_bits().to_ne_bytes())
        }
        ElementKind::Float32 => dst.copy_from_slice(&(scalar.as_f64() as f32).to_ne_bytes()),
        ElementKind::Float64 => dst.copy_from_slice(&scalar.as_f64().to_ne_bytes()),
        ElementKind::FixedBytes(_) => unreachable!("fixed_bytes fields hold no scalars"),
    }
}

/// Reads one numeric element. `None` for fixed_bytes.
pub(crate) fn read_scalar(src: &[u8], kind: ElementKind) -> Option<Scalar> {
    let scalar = match kind {
        ElementKind::Int8 => Scalar::Int(i8::from_ne_bytes(array(src)) as i64),
        ElementKind::Int16 => Scalar::Int(i16::from_ne_bytes(array(src)) as i64),
        ElementKind::Int32 => Scalar::Int(i32::from_ne_bytes(array(src)) as i64),
        ElementKind::Int64 => Scalar::Int(i64::from_ne_bytes(array(src))),
        ElementKind::UInt8 => Scalar::UInt(src[0] as u64),
        ElementKind::UInt16 => Scalar::UInt(u16::from_ne_bytes(array(src)) as u64),
        ElementKind::UInt32 => Scalar::UInt(u32::from_ne_bytes(array(src)) as u64),
        ElementKind::UInt64 => Scalar::UInt(u64::from_ne_bytes(array(src))),
        ElementKind::Float16 => {
            Scalar::Float(f16::from_bits(u16::from_ne_bytes(array(src))).to_f64())
        }
        ElementKind::Float32 => Scalar::Float(f32::from_ne_bytes(array(src)) as f64),
        ElementKind::Float64 => Scalar::Float(f64::from_ne_bytes(array(src))),
        ElementKind::FixedBytes(_) => return None,
    };
    Some(scalar)
}

/// Reads one numeric element back into the dynamic value of its kind.
/// Half floats widen to `Float32`.
fn read_element_value(src: &[u8], kind: ElementKind) -> Value {
    match kind {
        ElementKind::Int8 => Value::Int8(i8::from_ne_bytes(array(src))),
        ElementKind::Int16 => Value::Int16(i16::from_ne_bytes(array(src))),
        ElementKind::Int32 => Value::Int32(i32::from_ne_bytes(array(src))),
        ElementKind::Int64 => Value::Int64(i64::from_ne_bytes(array(src))),
        ElementKind::UInt8 => Value::UInt8(src[0]),
        ElementKind::UInt16 => Value::UInt16(u16::from_ne_bytes(array(src))),
        ElementKind::UInt32 => Value::UInt32(u32::from_ne_bytes(array(src))),
        ElementKind::UInt64 => Value::UInt64(u64::from_ne_bytes(array(src))),
        ElementKind::Float16 => {
            Value::Float32(f16::from_bits(u16::from_ne_bytes(array(src))).to_f32())
        }
        ElementKind::Float32 => Value::Float32(f32::from_ne_bytes(array(src))),
        ElementKind::Float64 => Value::Float64(f64::from_ne_bytes(array(src))),
        ElementKind::FixedBytes(width) => Value::Binary(src[..width].to_vec()),
    }
}

/// Reads a whole field of `row` as a dynamic value.
pub(crate) fn read_value(field: &Field, row: &[u8]) -> Value {
    let src = &row[field.range()];
    let kind = field.kind();
    match field.vector_length() {
        Some(_) => Value::List(
            src.chunks_exact(kind.width())
                .map(|element| read_element_value(element, kind))
                .collect(),
        ),
        None => read_element_value(src, kind),
    }
}

#[cfg(test)]
mod tests {
    use half::f16;

    use super::{read_scalar, read_value, write_scalar};
    use crate::{
        schema::{ElementKind, FieldDesc, Schema},
        value::{Scalar, Value},
    };

    #[test]
    fn write_int_truncates() {
        let mut buf = [0u8; 1];
        write_scalar(&mut buf, ElementKind::Int8, Scalar::Int(300));
        assert_eq!(read_scalar(&buf, ElementKind::Int8), Some(Scalar::Int(300i64 as i8 as i64)));
    }

    #[test]
    fn write_uint_and_float() {
        let mut buf = [0u8; 2];
        write_scalar(&mut buf, ElementKind::UInt16, Scalar::UInt(65535));
        assert_eq!(read_scalar(&buf, ElementKind::UInt16), Some(Scalar::UInt(65535)));

        let mut buf = [0u8; 4];
        write_scalar(&mut buf, ElementKind::Float32, Scalar::Float(3.14));
        match read_scalar(&buf, ElementKind::Float32) {
            Some(Scalar::Float(v)) => assert!((v - 3.14).abs() < 1e-6),
            other => panic!("expected float, got {other:?}"),
        }

        let mut buf = [0u8; 8];
        write_scalar(&mut buf, ElementKind::Float64, Scalar::Int(-7));
        assert_eq!(read_scalar(&buf, ElementKind::Float64), Some(Scalar::Float(-7.0)));
    }

    #[test]
    fn float16_special_values() {
        let mut buf = [0u8; 2];
        write_scalar(&mut buf, ElementKind::Float16, Scalar::Float(1.5));
        assert_eq!(read_scalar(&buf, ElementKind::Float16), Some(Scalar::Float(1.5)));

        write_scalar(&mut buf, ElementKind::Float16, Scalar::Float(f64::INFINITY));
        let bits = f16::from_bits(u16::from_ne_bytes(buf));
        assert!(bits.is_infinite() && bits.is_sign_positive());

        write_scalar(&mut buf, ElementKind::Float16, Scalar::Float(f64::NAN));
        assert!(f16::from_bits(u16::from_ne_bytes(buf)).is_nan());
    }

    #[test]
    fn read_fields_as_values() {
        let schema = Schema::try_new(vec![
            FieldDesc::new("id", "u2"),
            FieldDesc::vector("v", "i2", 2),
            FieldDesc::new("raw", "fixed_bytes(3)"),
        ])
        .unwrap();
        let mut row = vec![0u8; schema.row_width()];
        row[0..2].copy_from_slice(&9u16.to_ne_bytes());
        row[2..4].copy_from_slice(&(-1i16).to_ne_bytes());
        row[4..6].copy_from_slice(&2i16.to_ne_bytes());
        row[6..9].copy_from_slice(b"abc");

        let fields = schema.fields();
        assert_eq!(read_value(&fields[0], &row), Value::UInt16(9));
        assert_eq!(
            read_value(&fields[1], &row),
            Value::List(vec![Value::Int16(-1), Value::Int16(2)])
        );
        assert_eq!(read_value(&fields[2], &row), Value::Binary(b"abc".to_vec()));
        assert_eq!(read_scalar(&row[6..9], ElementKind::FixedBytes(3)), None);
    }
}
