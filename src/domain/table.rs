// SPDX-License-Identifier: MIT OR Apache-2.0

//! The flat store mapping key identities to raw values.
//!
//! A [`ValueTable`] is owned by the caller, never by the key system; keys
//! only read it during extraction. It is backed by a `Vec` of entries so that
//! iteration order is insertion order, which is the order
//! [`ListConfigKey`](crate::domain::ListConfigKey) reassembles sequences in.
//! Lookup is a linear scan by key-identity equality; configuration tables are
//! small and the identity comparison is cheap after the pointer fast path.

use crate::domain::key::{KeyMeta, TableKey};
use crate::domain::value::RawValue;
use std::sync::Arc;

/// An insertion-ordered mapping from key identity to raw value.
///
/// # Examples
///
/// ```
/// use keytree::domain::{ConfigKey, RawValue, ValueTable};
///
/// let key: ConfigKey<i64> = ConfigKey::new("server.port");
/// let mut table = ValueTable::new();
///
/// assert!(table.insert(&key, RawValue::plain(8080)).is_none());
/// assert!(table.get(&key).is_some());
/// assert_eq!(table.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct ValueTable {
    entries: Vec<(Arc<KeyMeta>, RawValue)>,
}

impl ValueTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key`, replacing any existing entry with an equal
    /// key identity in place. Returns the previous raw value, if any.
    pub fn insert(&mut self, key: &impl TableKey, value: RawValue) -> Option<RawValue> {
        let meta = key.meta();
        match self.position(meta) {
            Some(idx) => Some(std::mem::replace(&mut self.entries[idx].1, value)),
            None => {
                self.entries.push((Arc::clone(meta), value));
                None
            }
        }
    }

    /// Looks up the raw value stored under `key`, by key identity.
    pub fn get(&self, key: &impl TableKey) -> Option<&RawValue> {
        self.position(key.meta()).map(|idx| &self.entries[idx].1)
    }

    /// Whether the table has an entry for `key`.
    pub fn contains(&self, key: &impl TableKey) -> bool {
        self.position(key.meta()).is_some()
    }

    /// Removes the entry for `key`, returning its raw value.
    pub fn remove(&mut self, key: &impl TableKey) -> Option<RawValue> {
        self.position(key.meta())
            .map(|idx| self.entries.remove(idx).1)
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&KeyMeta, &RawValue)> {
        self.entries.iter().map(|(meta, raw)| (&**meta, raw))
    }

    fn position(&self, meta: &Arc<KeyMeta>) -> Option<usize> {
        self.entries
            .iter()
            .position(|(existing, _)| Arc::ptr_eq(existing, meta) || **existing == **meta)
    }
}
