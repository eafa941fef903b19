// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed configuration key identities.
//!
//! A [`ConfigKey<T>`] is an immutable, typed identifier for one configuration
//! slot: a non-empty dotted name, a semantic [`ValueType`] token captured from
//! the Rust type parameter, an optional description, and an optional default
//! value. Keys compare by value, never by allocation identity, so two
//! independently constructed keys with identical metadata are the same key
//! everywhere in the system.
//!
//! A [`SubElementKey<T>`] is a key minted by a composite key (see
//! [`crate::domain::composite`]) that carries an owned back-reference to its
//! parent. Sub-keys are recognized through that back-reference, never by name
//! pattern matching, because an unrelated key is free to carry a colliding
//! dotted name.

use crate::domain::errors::{ConfigError, Result};
use crate::domain::table::ValueTable;
use crate::domain::value::{ConfigValue, FromConfigValue};
use crate::ports::ExecutionContext;
use crate::service::Resolver;
use std::any::TypeId;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// A semantic value type token.
///
/// Captures the Rust type a key's value must decode to. Two tokens are equal
/// iff they were captured from the same type.
///
/// # Examples
///
/// ```
/// use keytree::domain::ValueType;
///
/// assert_eq!(ValueType::of::<i64>(), ValueType::of::<i64>());
/// assert_ne!(ValueType::of::<i64>(), ValueType::of::<String>());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ValueType {
    id: TypeId,
    name: &'static str,
}

impl ValueType {
    /// Captures the token for `T`.
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Returns the Rust type name behind this token. Diagnostic use only.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// The erased identity of a key.
///
/// All typed key shapes share this identity record; it is what a
/// [`ValueTable`] addresses entries by. Equality is value semantics over
/// name, value type, description, default, and parent.
#[derive(Clone, Debug)]
pub struct KeyMeta {
    name: String,
    value_type: ValueType,
    description: Option<String>,
    default: Option<ConfigValue>,
    parent: Option<Arc<KeyMeta>>,
}

impl KeyMeta {
    pub(crate) fn new(name: String, value_type: ValueType) -> Self {
        assert!(!name.is_empty(), "config key name must not be empty");
        Self {
            name,
            value_type,
            description: None,
            default: None,
            parent: None,
        }
    }

    pub(crate) fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    pub(crate) fn with_default(mut self, default: ConfigValue) -> Self {
        self.default = Some(default);
        self
    }

    pub(crate) fn with_parent(mut self, parent: Arc<KeyMeta>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// The full dotted name of the key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The dot-separated segments of the name.
    ///
    /// Used for display and grouping only; addressing never goes through the
    /// segments.
    pub fn name_parts(&self) -> Vec<&str> {
        self.name.split('.').collect()
    }

    /// The semantic value type of the key.
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// The key's description, if one was declared.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The key's declared default value, if any. Never substituted
    /// implicitly by extraction.
    pub fn default_value(&self) -> Option<&ConfigValue> {
        self.default.as_ref()
    }

    /// The composite parent of this key, if it is a sub-element key.
    pub fn parent(&self) -> Option<&Arc<KeyMeta>> {
        self.parent.as_ref()
    }

    /// Whether this key was minted as a sub-element of `parent`.
    ///
    /// Discrimination is by the owned parent back-reference, with a pointer
    /// comparison fast path. A key whose name merely shares the parent's name
    /// as a string prefix does not qualify.
    pub fn is_sub_key_of(&self, parent: &Arc<KeyMeta>) -> bool {
        match &self.parent {
            Some(own) => Arc::ptr_eq(own, parent) || **own == **parent,
            None => false,
        }
    }
}

impl PartialEq for KeyMeta {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.value_type == other.value_type
            && self.description == other.description
            && self.default == other.default
            && match (&self.parent, &other.parent) {
                (None, None) => true,
                (Some(a), Some(b)) => Arc::ptr_eq(a, b) || **a == **b,
                _ => false,
            }
    }
}

impl fmt::Display for KeyMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Access to the erased identity of any key shape.
///
/// Implemented by [`ConfigKey`], [`SubElementKey`], and the composite keys so
/// that a [`ValueTable`] can address entries uniformly.
pub trait TableKey {
    /// The erased identity of this key.
    fn meta(&self) -> &Arc<KeyMeta>;
}

/// A typed, named identifier for one configuration slot.
///
/// Immutable once constructed; the `with_*` builders return reconfigured
/// copies and are meant to be chained at declaration time, before any
/// sub-keys are minted from a composite wrapper.
///
/// # Examples
///
/// ```
/// use keytree::domain::ConfigKey;
///
/// let key: ConfigKey<i64> = ConfigKey::new("server.port")
///     .with_description("listen port")
///     .with_default(8080);
///
/// assert_eq!(key.name(), "server.port");
/// assert_eq!(key.name_parts(), vec!["server", "port"]);
/// ```
pub struct ConfigKey<T> {
    meta: Arc<KeyMeta>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: 'static> ConfigKey<T> {
    /// Creates a key with the given dotted name.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty.
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_meta(KeyMeta::new(name.into(), ValueType::of::<T>()))
    }
}

impl<T> ConfigKey<T> {
    /// Attaches a description.
    pub fn with_description(self, description: impl Into<String>) -> Self {
        Self::from_meta((*self.meta).clone().with_description(description.into()))
    }

    /// Declares a default value.
    ///
    /// The default is part of the key's identity and is only ever applied by
    /// the explicit [`extract_value_or_default`](Self::extract_value_or_default)
    /// caller policy, never by plain extraction.
    pub fn with_default(self, default: impl Into<ConfigValue>) -> Self {
        Self::from_meta((*self.meta).clone().with_default(default.into()))
    }

    pub(crate) fn from_meta(meta: KeyMeta) -> Self {
        Self {
            meta: Arc::new(meta),
            _marker: PhantomData,
        }
    }

    /// The full dotted name of the key.
    pub fn name(&self) -> &str {
        self.meta.name()
    }

    /// The dot-separated name segments, for display/grouping only.
    pub fn name_parts(&self) -> Vec<&str> {
        self.meta.name_parts()
    }

    /// The key's description, if any.
    pub fn description(&self) -> Option<&str> {
        self.meta.description()
    }

    /// The key's declared default value, if any.
    pub fn default_value(&self) -> Option<&ConfigValue> {
        self.meta.default_value()
    }

    /// The semantic value type of the key.
    pub fn value_type(&self) -> ValueType {
        self.meta.value_type()
    }
}

impl<T: FromConfigValue + 'static> ConfigKey<T> {
    /// Extracts and fully resolves this key's value from `table`.
    ///
    /// Absent entries fail with
    /// [`ConfigError::ValueNotFound`](crate::domain::ConfigError::ValueNotFound)
    /// even when the key declares a default; default substitution is an
    /// explicit caller policy, see
    /// [`extract_value_or_default`](Self::extract_value_or_default). A present
    /// raw value is resolved recursively (pending and deferred computations
    /// included) and then decoded to `T`.
    pub fn extract_value(&self, table: &ValueTable, context: &dyn ExecutionContext) -> Result<T> {
        let raw = table
            .get(self)
            .ok_or_else(|| ConfigError::ValueNotFound {
                key: self.name().to_string(),
            })?;
        let resolved = Resolver::new(context).resolve(raw)?;
        T::from_config_value(resolved, self.name())
    }

    /// Extracts this key's value, substituting the declared default when the
    /// table has no entry.
    ///
    /// Only [`ValueNotFound`](crate::domain::ConfigError::ValueNotFound) is
    /// recovered, and only when a default was declared; every other failure
    /// (resolution errors, task failures, type mismatches) propagates
    /// unchanged.
    pub fn extract_value_or_default(
        &self,
        table: &ValueTable,
        context: &dyn ExecutionContext,
    ) -> Result<T> {
        match self.extract_value(table, context) {
            Err(ConfigError::ValueNotFound { key }) => match self.default_value() {
                Some(default) => T::from_config_value(default.clone(), self.name()),
                None => Err(ConfigError::ValueNotFound { key }),
            },
            other => other,
        }
    }
}

impl<T> TableKey for ConfigKey<T> {
    fn meta(&self) -> &Arc<KeyMeta> {
        &self.meta
    }
}

impl<T> Clone for ConfigKey<T> {
    fn clone(&self) -> Self {
        Self {
            meta: Arc::clone(&self.meta),
            _marker: PhantomData,
        }
    }
}

impl<T> PartialEq for ConfigKey<T> {
    fn eq(&self, other: &Self) -> bool {
        self.meta == other.meta
    }
}

impl<T> fmt::Debug for ConfigKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigKey")
            .field("name", &self.meta.name())
            .field("type", &self.meta.value_type().name())
            .finish()
    }
}

impl<T> fmt::Display for ConfigKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A key minted by a composite key for one element of its value.
///
/// Behaves as an ordinary [`ConfigKey`] for direct table lookup; the only
/// thing the parent back-reference is used for is recognition during the
/// parent's decomposition scan. Sub-keys are never looked up independently of
/// that scan except as plain entries.
pub struct SubElementKey<T> {
    key: ConfigKey<T>,
}

impl<T: 'static> SubElementKey<T> {
    pub(crate) fn mint(parent: &Arc<KeyMeta>, suffix: &str) -> Self {
        assert!(!suffix.is_empty(), "sub-key suffix must not be empty");
        let name = format!("{}.{}", parent.name(), suffix);
        let meta = KeyMeta::new(name, ValueType::of::<T>()).with_parent(Arc::clone(parent));
        Self {
            key: ConfigKey::from_meta(meta),
        }
    }
}

impl<T> SubElementKey<T> {
    /// The full dotted name, always `parent.name + "." + suffix`.
    pub fn name(&self) -> &str {
        self.key.name()
    }

    /// The composite parent this sub-key belongs to.
    pub fn parent(&self) -> &Arc<KeyMeta> {
        self.key
            .meta()
            .parent()
            .unwrap_or_else(|| unreachable!("sub-element keys always carry a parent"))
    }

    /// This sub-key viewed as an ordinary key.
    pub fn as_key(&self) -> &ConfigKey<T> {
        &self.key
    }
}

impl<T: FromConfigValue + 'static> SubElementKey<T> {
    /// Extracts this sub-key's own entry, exactly like a plain key.
    ///
    /// The parent reference plays no part here; it only tags the key for the
    /// parent's decomposition scan.
    pub fn extract_value(&self, table: &ValueTable, context: &dyn ExecutionContext) -> Result<T> {
        self.key.extract_value(table, context)
    }
}

impl<T> TableKey for SubElementKey<T> {
    fn meta(&self) -> &Arc<KeyMeta> {
        self.key.meta()
    }
}

impl<T> Clone for SubElementKey<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
        }
    }
}

impl<T> PartialEq for SubElementKey<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<T> fmt::Debug for SubElementKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubElementKey")
            .field("name", &self.key.name())
            .finish()
    }
}

impl<T> fmt::Display for SubElementKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
