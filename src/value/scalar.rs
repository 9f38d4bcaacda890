use std::fmt;

/// A numeric element read from, or about to be written to, a row.
///
/// Integers keep their signedness so that `u64` values above `i64::MAX`
/// survive a round trip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    /// Signed integer, widened.
    Int(i64),
    /// Unsigned integer, widened.
    UInt(u64),
    /// Float, widened.
    Float(f64),
}

impl Scalar {
    /// Wrapping/truncating conversion, the same as an `as` cast.
    pub fn as_i64(&self) -> i64 {
        match self {
            Scalar::Int(v) => *v,
            Scalar::UInt(v) => *v as i64,
            Scalar::Float(v) => *v as i64,
        }
    }

    /// Wrapping/truncating conversion to `u64`.
    pub fn as_u64(&self) -> u64 {
        match self {
            Scalar::Int(v) => *v as u64,
            Scalar::UInt(v) => *v,
            Scalar::Float(v) => *v as u64,
        }
    }

    /// Conversion to `f64`, lossy above 2^53.
    pub fn as_f64(&self) -> f64 {
        match self {
            Scalar::Int(v) => *v as f64,
            Scalar::UInt(v) => *v as f64,
            Scalar::Float(v) => *v,
        }
    }

    /// Whether the value is zero, as in an untouched field.
    pub fn is_zero(&self) -> bool {
        match self {
            Scalar::Int(v) => *v == 0,
            Scalar::UInt(v) => *v == 0,
            Scalar::Float(v) => *v == 0.0,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::UInt(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Scalar;

    #[test]
    fn casts() {
        assert_eq!(Scalar::Float(-2.7).as_i64(), -2);
        assert_eq!(Scalar::Int(-1).as_u64(), u64::MAX);
        assert_eq!(Scalar::UInt(7).as_f64(), 7.0);
        assert!(Scalar::Float(0.0).is_zero());
        assert!(!Scalar::Int(1).is_zero());
    }
}
