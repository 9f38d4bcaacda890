//! Per-key batch-read results as delivered by the fetch layer.

mod key;
pub mod result_code;

use std::{collections::HashMap, time::Duration};

pub use key::*;

use crate::value::Value;

/// Record metadata copied into the `meta` column of a projection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RecordMeta {
    /// Incremented by the server on every successful write.
    pub generation: u32,
    /// Remaining seconds to live.
    pub ttl: u32,
}

impl RecordMeta {
    /// The ttl reported for a record that never expires.
    pub const NEVER_EXPIRE: u32 = u32::MAX;

    /// Metadata with a ttl in seconds.
    pub fn new(generation: u32, ttl: u32) -> Self {
        Self { generation, ttl }
    }

    /// Builds metadata from a server-side time-to-live, where `None` means
    /// the record never expires. Durations beyond `u32` seconds saturate.
    pub fn from_time_to_live(generation: u32, time_to_live: Option<Duration>) -> Self {
        let ttl = match time_to_live {
            Some(duration) => u32::try_from(duration.as_secs())
                .unwrap_or(Self::NEVER_EXPIRE - 1)
                .min(Self::NEVER_EXPIRE - 1),
            None => Self::NEVER_EXPIRE,
        };
        Self { generation, ttl }
    }

    /// Whether the ttl is [`Self::NEVER_EXPIRE`].
    pub fn never_expires(&self) -> bool {
        self.ttl == Self::NEVER_EXPIRE
    }
}

/// The payload of a successful read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    /// The key echoed back by the server, if any.
    pub key: Option<RecordKey>,
    /// Generation and ttl.
    pub meta: RecordMeta,
    /// Named values of the record.
    pub bins: HashMap<String, Value>,
}

impl Record {
    /// A payload without an echoed key.
    pub fn new(meta: RecordMeta, bins: HashMap<String, Value>) -> Self {
        Self {
            key: None,
            meta,
            bins,
        }
    }
}

/// One entry of a batch read before projection.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// The key as requested. `None` when the fetch layer lost it.
    pub key: Option<RecordKey>,
    /// 0 on success, see [`result_code`] for the failure codes.
    pub result_code: i32,
    /// Present for successful reads.
    pub record: Option<Record>,
}

impl RawRecord {
    /// A successful read carrying the given bins.
    pub fn ok<I, S, V>(key: RecordKey, meta: RecordMeta, bins: I) -> Self
    where
        I: IntoIterator<Item = (S, V)>,
        S: Into<String>,
        V: Into<Value>,
    {
        let bins = bins
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        Self {
            key: Some(key),
            result_code: result_code::OK,
            record: Some(Record::new(meta, bins)),
        }
    }

    /// A failed read. No payload is attached.
    pub fn failed(key: RecordKey, result_code: i32) -> Self {
        Self {
            key: Some(key),
            result_code,
            record: None,
        }
    }

    /// Whether the read succeeded.
    pub fn is_ok(&self) -> bool {
        self.result_code == result_code::OK
    }

    pub(crate) fn user_key(&self) -> Option<&UserKey> {
        self.key.as_ref().and_then(|key| key.user_key.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{result_code, RawRecord, RecordKey, RecordMeta};
    use crate::value::Value;

    #[test]
    fn meta_from_time_to_live() {
        assert_eq!(
            RecordMeta::from_time_to_live(3, Some(Duration::from_secs(100))),
            RecordMeta::new(3, 100)
        );
        let never = RecordMeta::from_time_to_live(1, None);
        assert!(never.never_expires());
        assert!(!RecordMeta::from_time_to_live(1, Some(Duration::from_secs(u64::MAX))).never_expires());
    }

    #[test]
    fn constructors() {
        let ok = RawRecord::ok(
            RecordKey::new("test", "demo", "k1"),
            RecordMeta::new(1, 0),
            [("a", Value::Int64(5))],
        );
        assert!(ok.is_ok());
        assert_eq!(ok.record.as_ref().unwrap().bins["a"], Value::Int64(5));

        let failed = RawRecord::failed(RecordKey::new("test", "demo", "k2"), result_code::KEY_NOT_FOUND);
        assert!(!failed.is_ok());
        assert!(failed.record.is_none());
    }
}
