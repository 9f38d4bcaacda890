use std::fmt;

use crate::value::Value;

/// The application-level primary key of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UserKey {
    /// Integer key; every integer width widens to `i64`.
    Int(i64),
    /// String key.
    String(String),
    /// Blob key.
    Bytes(Vec<u8>),
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserKey::Int(v) => write!(f, "{v}"),
            UserKey::String(v) => write!(f, "{v:?}"),
            UserKey::Bytes(v) => {
                f.write_str("0x")?;
                for byte in v {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for UserKey {
    fn from(value: &str) -> Self {
        UserKey::String(value.to_string())
    }
}

impl From<String> for UserKey {
    fn from(value: String) -> Self {
        UserKey::String(value)
    }
}

impl From<i64> for UserKey {
    fn from(value: i64) -> Self {
        UserKey::Int(value)
    }
}

impl From<i32> for UserKey {
    fn from(value: i32) -> Self {
        UserKey::Int(value as i64)
    }
}

impl From<Vec<u8>> for UserKey {
    fn from(value: Vec<u8>) -> Self {
        UserKey::Bytes(value)
    }
}

impl From<&[u8]> for UserKey {
    fn from(value: &[u8]) -> Self {
        UserKey::Bytes(value.to_vec())
    }
}

impl From<&UserKey> for UserKey {
    fn from(value: &UserKey) -> Self {
        value.clone()
    }
}

impl From<UserKey> for Value {
    fn from(key: UserKey) -> Self {
        match key {
            UserKey::Int(v) => Value::Int64(v),
            UserKey::String(v) => Value::String(v),
            UserKey::Bytes(v) => Value::Binary(v),
        }
    }
}

impl TryFrom<Value> for UserKey {
    type Error = Value;

    /// Integers, strings and blobs are valid user keys. Unsigned values above
    /// `i64::MAX` and every other variant are handed back unchanged.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Int8(v) => Ok(UserKey::Int(v as i64)),
            Value::Int16(v) => Ok(UserKey::Int(v as i64)),
            Value::Int32(v) => Ok(UserKey::Int(v as i64)),
            Value::Int64(v) => Ok(UserKey::Int(v)),
            Value::UInt8(v) => Ok(UserKey::Int(v as i64)),
            Value::UInt16(v) => Ok(UserKey::Int(v as i64)),
            Value::UInt32(v) => Ok(UserKey::Int(v as i64)),
            Value::UInt64(v) => i64::try_from(v)
                .map(UserKey::Int)
                .map_err(|_| Value::UInt64(v)),
            Value::String(v) => Ok(UserKey::String(v)),
            Value::Binary(v) => Ok(UserKey::Bytes(v)),
            other => Err(other),
        }
    }
}

/// Fully qualified record key: namespace, set, user key and digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    /// Namespace of the record.
    pub namespace: String,
    /// Set inside the namespace.
    pub set_name: String,
    /// `None` when the key was sent by digest only and the server did not
    /// return the user key.
    pub user_key: Option<UserKey>,
    /// 20-byte digest of set and user key, when known.
    pub digest: Option<[u8; 20]>,
}

impl RecordKey {
    /// A key addressed by user key.
    pub fn new(
        namespace: impl Into<String>,
        set_name: impl Into<String>,
        user_key: impl Into<UserKey>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            set_name: set_name.into(),
            user_key: Some(user_key.into()),
            digest: None,
        }
    }

    /// A key addressed by digest alone.
    pub fn from_digest(
        namespace: impl Into<String>,
        set_name: impl Into<String>,
        digest: [u8; 20],
    ) -> Self {
        Self {
            namespace: namespace.into(),
            set_name: set_name.into(),
            user_key: None,
            digest: Some(digest),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::UserKey;
    use crate::value::Value;

    #[test]
    fn user_key_from_value() {
        assert_eq!(UserKey::try_from(Value::Int32(42)), Ok(UserKey::Int(42)));
        assert_eq!(UserKey::try_from(Value::from("k1")), Ok(UserKey::from("k1")));
        assert_eq!(
            UserKey::try_from(Value::UInt64(u64::MAX)),
            Err(Value::UInt64(u64::MAX))
        );
        assert_eq!(UserKey::try_from(Value::Null), Err(Value::Null));
        assert_eq!(UserKey::try_from(Value::Float64(1.0)), Err(Value::Float64(1.0)));
    }

    #[test]
    fn display() {
        assert_eq!(UserKey::Int(7).to_string(), "7");
        assert_eq!(UserKey::from("k").to_string(), "\"k\"");
        assert_eq!(UserKey::Bytes(vec![0xab, 0x01]).to_string(), "0xab01");
    }
}
