//! Key → row lookup.

use std::collections::HashMap;

use crate::record::UserKey;

/// The key a row is registered under.
///
/// Rows whose record carried no usable user key are registered under their
/// input position instead. The two variants never compare equal, so a
/// positional key can not shadow an application key such as `UserKey::Int(3)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndexKey {
    /// The record's application key.
    User(UserKey),
    /// Input position of a record without a usable key.
    Position(usize),
}

impl IndexKey {
    /// Whether this is a positional fallback.
    pub fn is_fallback(&self) -> bool {
        matches!(self, IndexKey::Position(_))
    }
}

/// Key → row lookup built once during projection.
///
/// Duplicate keys resolve to the last row registered for them; earlier rows
/// stay reachable by position only.
#[derive(Debug, Clone, Default)]
pub struct KeyIndex {
    users: HashMap<UserKey, usize>,
    positions: HashMap<usize, usize>,
    keys: Vec<IndexKey>,
}

impl KeyIndex {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            users: HashMap::with_capacity(capacity),
            positions: HashMap::new(),
            keys: Vec::with_capacity(capacity),
        }
    }

    /// Registers the key of the next row. Rows must be registered in order.
    pub(crate) fn register(&mut self, key: IndexKey) {
        let row = self.keys.len();
        match &key {
            IndexKey::User(user_key) => {
                self.users.insert(user_key.clone(), row);
            }
            IndexKey::Position(position) => {
                self.positions.insert(*position, row);
            }
        }
        self.keys.push(key);
    }

    /// Row index of either kind of key.
    pub fn lookup(&self, key: &IndexKey) -> Option<usize> {
        match key {
            IndexKey::User(user_key) => self.position(user_key),
            IndexKey::Position(position) => self.positions.get(position).copied(),
        }
    }

    /// Row index of an application key. Positional fallbacks never match.
    pub fn position(&self, key: &UserKey) -> Option<usize> {
        self.users.get(key).copied()
    }

    /// The key row `row` was registered under.
    pub fn key_of(&self, row: usize) -> Option<&IndexKey> {
        self.keys.get(row)
    }

    /// Rows registered under a positional fallback key, in row order.
    pub fn fallback_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.keys
            .iter()
            .enumerate()
            .filter(|(_, key)| key.is_fallback())
            .map(|(row, _)| row)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.users.len() + self.positions.len()
    }

    /// Whether no key was registered.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.positions.is_empty()
    }

    /// Index over the given rows, renumbered in the order given.
    ///
    /// Fallback keys keep their original input position as identity.
    pub(crate) fn select(&self, rows: &[usize]) -> Self {
        let mut index = Self::with_capacity(rows.len());
        for &row in rows {
            index.register(self.keys[row].clone());
        }
        index
    }
}
