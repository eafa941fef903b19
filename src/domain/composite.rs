// SPDX-License-Identifier: MIT OR Apache-2.0

//! Composite keys whose values decompose into families of sub-keys.
//!
//! A composite key never has its own table entry. Whoever writes one element
//! of the composite value mints a sub-key ([`MapConfigKey::sub_key`] /
//! [`ListConfigKey::sub_key`]) and inserts under it; extraction scans the
//! whole table and reassembles the composite value from every entry whose key
//! carries this composite as its parent. There is no eager sub-key
//! registration, and a missing element is simply absent from the result.

use crate::domain::errors::Result;
use crate::domain::key::{ConfigKey, KeyMeta, SubElementKey, TableKey, ValueType};
use crate::domain::table::ValueTable;
use crate::domain::value::{ConfigValue, FromConfigValue};
use crate::ports::ExecutionContext;
use crate::service::Resolver;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// Process-wide counter backing generated list sub-key suffixes. Uniqueness
// within one list key's lifetime is all that is required; process-wide is
// what we get for free.
static NEXT_LIST_SUFFIX: AtomicU64 = AtomicU64::new(1);

fn next_list_suffix() -> String {
    format!("{:08x}", NEXT_LIST_SUFFIX.fetch_add(1, Ordering::Relaxed))
}

/// A composite key for a map-shaped value, `BTreeMap<String, V>`.
///
/// # Examples
///
/// ```
/// use keytree::domain::MapConfigKey;
///
/// let tags: MapConfigKey<String> = MapConfigKey::new("tags");
/// let env = tags.sub_key("env");
/// assert_eq!(env.name(), "tags.env");
/// ```
pub struct MapConfigKey<V> {
    key: ConfigKey<BTreeMap<String, V>>,
    sub_type: ValueType,
}

impl<V: 'static> MapConfigKey<V> {
    /// Creates a map key with the given dotted name.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            key: ConfigKey::new(name),
            sub_type: ValueType::of::<V>(),
        }
    }

    /// Attaches a description.
    pub fn with_description(self, description: impl Into<String>) -> Self {
        Self {
            key: self.key.with_description(description),
            sub_type: self.sub_type,
        }
    }

    /// The full dotted name of the composite key.
    pub fn name(&self) -> &str {
        self.key.name()
    }

    /// The semantic type of one map entry.
    pub fn sub_type(&self) -> ValueType {
        self.sub_type
    }

    /// Mints the sub-key for the entry named `entry`.
    ///
    /// Sub-keys are created lazily by whoever writes an entry; the composite
    /// key keeps no record of them.
    ///
    /// # Panics
    ///
    /// Panics if `entry` is empty.
    pub fn sub_key(&self, entry: &str) -> SubElementKey<V> {
        SubElementKey::mint(self.key.meta(), entry)
    }

    /// Whether `candidate` is a sub-key of this composite.
    ///
    /// Recognition goes through the candidate's parent back-reference; a key
    /// whose name merely starts with `self.name() + "."` is not a sub-key.
    pub fn is_sub_key(&self, candidate: &KeyMeta) -> bool {
        candidate.is_sub_key_of(self.key.meta())
    }

    /// Decodes the entry name of one of this composite's sub-keys: the
    /// suffix after `self.name() + "."`. Returns `None` for keys that are not
    /// sub-keys of this composite.
    pub fn extract_sub_key_name<'m>(&self, candidate: &'m KeyMeta) -> Option<&'m str> {
        if !self.is_sub_key(candidate) {
            return None;
        }
        candidate
            .name()
            .strip_prefix(self.key.name())
            .and_then(|rest| rest.strip_prefix('.'))
    }
}

impl<V: FromConfigValue + 'static> MapConfigKey<V> {
    /// Reassembles the map value from every sub-key entry present in `table`.
    ///
    /// The result holds exactly one entry per present sub-key; nothing is
    /// null-filled for entries never written. Each raw value is resolved
    /// recursively before decoding.
    pub fn extract_value(
        &self,
        table: &ValueTable,
        context: &dyn ExecutionContext,
    ) -> Result<BTreeMap<String, V>> {
        let resolver = Resolver::new(context);
        let mut out = BTreeMap::new();
        for (meta, raw) in table.iter() {
            if let Some(entry) = self.extract_sub_key_name(meta) {
                let resolved = resolver.resolve(raw)?;
                out.insert(
                    entry.to_string(),
                    V::from_config_value(resolved, meta.name())?,
                );
            }
        }
        Ok(out)
    }
}

impl<V> TableKey for MapConfigKey<V> {
    fn meta(&self) -> &Arc<KeyMeta> {
        self.key.meta()
    }
}

impl<V> Clone for MapConfigKey<V> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            sub_type: self.sub_type,
        }
    }
}

impl<V> PartialEq for MapConfigKey<V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<V> fmt::Debug for MapConfigKey<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapConfigKey")
            .field("name", &self.key.name())
            .field("sub_type", &self.sub_type.name())
            .finish()
    }
}

/// A composite key for a list-shaped value, `Vec<V>`.
///
/// List elements are unordered and unnamed individually, so every call to
/// [`sub_key`](Self::sub_key) mints a sub-key with a freshly generated unique
/// suffix. The reassembled sequence follows the value table's iteration
/// order, which for [`ValueTable`] is insertion order; no semantic order is
/// promised by the key itself.
pub struct ListConfigKey<V> {
    key: ConfigKey<Vec<V>>,
    sub_type: ValueType,
}

impl<V: 'static> ListConfigKey<V> {
    /// Creates a list key with the given dotted name.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            key: ConfigKey::new(name),
            sub_type: ValueType::of::<V>(),
        }
    }

    /// Attaches a description.
    pub fn with_description(self, description: impl Into<String>) -> Self {
        Self {
            key: self.key.with_description(description),
            sub_type: self.sub_type,
        }
    }

    /// The full dotted name of the composite key.
    pub fn name(&self) -> &str {
        self.key.name()
    }

    /// The semantic type of one list element.
    pub fn sub_type(&self) -> ValueType {
        self.sub_type
    }

    /// Mints a sub-key for one new list element.
    ///
    /// Two calls never return sub-keys with equal names.
    pub fn sub_key(&self) -> SubElementKey<V> {
        SubElementKey::mint(self.key.meta(), &next_list_suffix())
    }

    /// Whether `candidate` is a sub-key of this composite. Same
    /// parent-reference discrimination as [`MapConfigKey::is_sub_key`].
    pub fn is_sub_key(&self, candidate: &KeyMeta) -> bool {
        candidate.is_sub_key_of(self.key.meta())
    }
}

impl<V: FromConfigValue + 'static> ListConfigKey<V> {
    /// Reassembles the sequence from every sub-key entry present in `table`,
    /// in table iteration order.
    pub fn extract_value(
        &self,
        table: &ValueTable,
        context: &dyn ExecutionContext,
    ) -> Result<Vec<V>> {
        let resolver = Resolver::new(context);
        let mut out = Vec::new();
        for (meta, raw) in table.iter() {
            if self.is_sub_key(meta) {
                let resolved = resolver.resolve(raw)?;
                out.push(V::from_config_value(resolved, meta.name())?);
            }
        }
        Ok(out)
    }
}

impl<V> TableKey for ListConfigKey<V> {
    fn meta(&self) -> &Arc<KeyMeta> {
        self.key.meta()
    }
}

impl<V> Clone for ListConfigKey<V> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            sub_type: self.sub_type,
        }
    }
}

impl<V> PartialEq for ListConfigKey<V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<V> fmt::Debug for ListConfigKey<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListConfigKey")
            .field("name", &self.key.name())
            .field("sub_type", &self.sub_type.name())
            .finish()
    }
}
