// SPDX-License-Identifier: MIT OR Apache-2.0

//! Realized and stored value types, plus typed decoding.
//!
//! [`ConfigValue`] is a fully realized value. [`RawValue`] is what a value
//! table actually stores: a plain value, a pending computation, a deferred
//! computation, or a nested container of any of those. The
//! [`Resolver`](crate::service::Resolver) turns the latter into the former.
//! [`FromConfigValue`] layers typed decoding on top of resolution, one
//! implementation per supported Rust type.

use crate::domain::errors::{ConfigError, Result};
use crate::ports::PendingTask;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A fully realized configuration or sensor value.
///
/// Values are self-describing and compare by structure. Containers nest
/// arbitrarily.
///
/// # Examples
///
/// ```
/// use keytree::domain::ConfigValue;
///
/// let v = ConfigValue::from(8080);
/// assert_eq!(v, ConfigValue::Int(8080));
/// assert_eq!(v.kind(), "int");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// A boolean value.
    Bool(bool),
    /// A signed integer value.
    Int(i64),
    /// A floating-point value.
    Float(f64),
    /// A string value.
    Str(String),
    /// A mapping from entry names to nested values.
    Map(BTreeMap<String, ConfigValue>),
    /// A sequence of nested values.
    List(Vec<ConfigValue>),
}

impl ConfigValue {
    /// Returns a short name for the kind of this value, used in diagnostics
    /// and type-mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            ConfigValue::Bool(_) => "bool",
            ConfigValue::Int(_) => "int",
            ConfigValue::Float(_) => "float",
            ConfigValue::Str(_) => "string",
            ConfigValue::Map(_) => "map",
            ConfigValue::List(_) => "list",
        }
    }

    /// Returns the nested map if this value is a [`ConfigValue::Map`].
    pub fn as_map(&self) -> Option<&BTreeMap<String, ConfigValue>> {
        match self {
            ConfigValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the nested list if this value is a [`ConfigValue::List`].
    pub fn as_list(&self) -> Option<&[ConfigValue]> {
        match self {
            ConfigValue::List(v) => Some(v),
            _ => None,
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(v: bool) -> Self {
        ConfigValue::Bool(v)
    }
}

impl From<i64> for ConfigValue {
    fn from(v: i64) -> Self {
        ConfigValue::Int(v)
    }
}

impl From<i32> for ConfigValue {
    fn from(v: i32) -> Self {
        ConfigValue::Int(v.into())
    }
}

impl From<f64> for ConfigValue {
    fn from(v: f64) -> Self {
        ConfigValue::Float(v)
    }
}

impl From<&str> for ConfigValue {
    fn from(v: &str) -> Self {
        ConfigValue::Str(v.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(v: String) -> Self {
        ConfigValue::Str(v)
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(v: Vec<ConfigValue>) -> Self {
        ConfigValue::List(v)
    }
}

impl From<BTreeMap<String, ConfigValue>> for ConfigValue {
    fn from(v: BTreeMap<String, ConfigValue>) -> Self {
        ConfigValue::Map(v)
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Bool(v) => write!(f, "{v}"),
            ConfigValue::Int(v) => write!(f, "{v}"),
            ConfigValue::Float(v) => write!(f, "{v}"),
            ConfigValue::Str(v) => write!(f, "{v}"),
            ConfigValue::Map(m) => write!(f, "{{{} entries}}", m.len()),
            ConfigValue::List(v) => write!(f, "[{} elements]", v.len()),
        }
    }
}

/// A zero-argument deferred computation stored in a value table.
///
/// Invoked synchronously during resolution; the value it produces is itself
/// resolved recursively, so a deferred computation may hand back another
/// deferred computation, a pending task, or a container.
pub type DeferredFn = dyn Fn() -> RawValue + Send + Sync;

/// A stored, possibly unresolved value.
///
/// This is the tagged variant the resolver dispatches on once per recursive
/// step. Cloning is cheap for the computation variants (shared handles) and
/// structural for the containers.
#[derive(Clone)]
pub enum RawValue {
    /// A plain value; resolution is the identity.
    Value(ConfigValue),
    /// A pending computation that must be scheduled and awaited through the
    /// [`ExecutionContext`](crate::ports::ExecutionContext).
    Task(Arc<dyn PendingTask>),
    /// A zero-argument deferred computation, invoked synchronously.
    Deferred(Arc<DeferredFn>),
    /// A mapping whose values are resolved element-wise.
    Map(BTreeMap<String, RawValue>),
    /// A sequence whose elements are resolved element-wise.
    List(Vec<RawValue>),
}

impl RawValue {
    /// Wraps a plain value.
    ///
    /// # Examples
    ///
    /// ```
    /// use keytree::domain::{ConfigValue, RawValue};
    ///
    /// let raw = RawValue::plain("prod");
    /// assert!(matches!(raw, RawValue::Value(ConfigValue::Str(_))));
    /// ```
    pub fn plain(value: impl Into<ConfigValue>) -> Self {
        RawValue::Value(value.into())
    }

    /// Wraps a zero-argument deferred computation.
    pub fn deferred(f: impl Fn() -> RawValue + Send + Sync + 'static) -> Self {
        RawValue::Deferred(Arc::new(f))
    }

    /// Wraps a pending computation handle.
    pub fn task(task: Arc<dyn PendingTask>) -> Self {
        RawValue::Task(task)
    }
}

impl From<ConfigValue> for RawValue {
    fn from(value: ConfigValue) -> Self {
        RawValue::Value(value)
    }
}

impl fmt::Debug for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Value(v) => f.debug_tuple("Value").field(v).finish(),
            RawValue::Task(t) => f.debug_tuple("Task").field(&t.name()).finish(),
            RawValue::Deferred(_) => f.write_str("Deferred(..)"),
            RawValue::Map(m) => f.debug_tuple("Map").field(m).finish(),
            RawValue::List(v) => f.debug_tuple("List").field(v).finish(),
        }
    }
}

/// Typed decoding of a resolved [`ConfigValue`].
///
/// Decoding is strict: no cross-type coercion is performed, so an
/// [`ConfigValue::Int`] does not decode as `f64` and numeric strings do not
/// decode as numbers. A mismatch fails with
/// [`ConfigError::TypeMismatch`](crate::domain::ConfigError::TypeMismatch).
///
/// # Examples
///
/// ```
/// use keytree::domain::{ConfigValue, FromConfigValue};
///
/// let n = i64::from_config_value(ConfigValue::Int(7), "some.key").unwrap();
/// assert_eq!(n, 7);
///
/// let err = i64::from_config_value(ConfigValue::from("7"), "some.key");
/// assert!(err.is_err());
/// ```
pub trait FromConfigValue: Sized {
    /// Human-readable name of the expected value shape, used in error
    /// messages.
    fn expected() -> &'static str;

    /// Decodes a resolved value. `key` is the full dotted key name, carried
    /// for error context only.
    fn from_config_value(value: ConfigValue, key: &str) -> Result<Self>;
}

fn mismatch<T: FromConfigValue>(key: &str, found: &ConfigValue) -> ConfigError {
    ConfigError::TypeMismatch {
        key: key.to_string(),
        expected: T::expected(),
        found: found.kind(),
    }
}

impl FromConfigValue for ConfigValue {
    fn expected() -> &'static str {
        "any value"
    }

    fn from_config_value(value: ConfigValue, _key: &str) -> Result<Self> {
        Ok(value)
    }
}

impl FromConfigValue for bool {
    fn expected() -> &'static str {
        "bool"
    }

    fn from_config_value(value: ConfigValue, key: &str) -> Result<Self> {
        match value {
            ConfigValue::Bool(v) => Ok(v),
            other => Err(mismatch::<Self>(key, &other)),
        }
    }
}

impl FromConfigValue for i64 {
    fn expected() -> &'static str {
        "int"
    }

    fn from_config_value(value: ConfigValue, key: &str) -> Result<Self> {
        match value {
            ConfigValue::Int(v) => Ok(v),
            other => Err(mismatch::<Self>(key, &other)),
        }
    }
}

impl FromConfigValue for f64 {
    fn expected() -> &'static str {
        "float"
    }

    fn from_config_value(value: ConfigValue, key: &str) -> Result<Self> {
        match value {
            ConfigValue::Float(v) => Ok(v),
            other => Err(mismatch::<Self>(key, &other)),
        }
    }
}

impl FromConfigValue for String {
    fn expected() -> &'static str {
        "string"
    }

    fn from_config_value(value: ConfigValue, key: &str) -> Result<Self> {
        match value {
            ConfigValue::Str(v) => Ok(v),
            other => Err(mismatch::<Self>(key, &other)),
        }
    }
}

impl<V: FromConfigValue> FromConfigValue for Vec<V> {
    fn expected() -> &'static str {
        "list"
    }

    fn from_config_value(value: ConfigValue, key: &str) -> Result<Self> {
        match value {
            ConfigValue::List(items) => items
                .into_iter()
                .map(|item| V::from_config_value(item, key))
                .collect(),
            other => Err(mismatch::<Self>(key, &other)),
        }
    }
}

impl<V: FromConfigValue> FromConfigValue for BTreeMap<String, V> {
    fn expected() -> &'static str {
        "map"
    }

    fn from_config_value(value: ConfigValue, key: &str) -> Result<Self> {
        match value {
            ConfigValue::Map(entries) => entries
                .into_iter()
                .map(|(name, item)| Ok((name, V::from_config_value(item, key)?)))
                .collect(),
            other => Err(mismatch::<Self>(key, &other)),
        }
    }
}
