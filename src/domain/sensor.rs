// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed sensor descriptors.
//!
//! A [`Sensor`] names one path into an entity's sensor value tree (see
//! [`SensorStore`](crate::service::SensorStore)). Like config keys, sensors
//! are immutable identities with value semantics; unlike config keys, their
//! dotted name is the address itself, split on `.` when the tree is walked.

use crate::domain::key::ValueType;
use std::fmt;
use std::marker::PhantomData;

/// A typed descriptor naming one path into a sensor value tree.
///
/// # Examples
///
/// ```
/// use keytree::domain::Sensor;
///
/// let load: Sensor<f64> = Sensor::new("metrics.cpu.load")
///     .with_description("1-minute load average");
/// assert_eq!(load.name(), "metrics.cpu.load");
/// assert_eq!(load.name_parts(), vec!["metrics", "cpu", "load"]);
/// ```
pub struct Sensor<T> {
    name: String,
    description: Option<String>,
    value_type: ValueType,
    _marker: PhantomData<fn() -> T>,
}

impl<T: 'static> Sensor<T> {
    /// Creates a sensor with the given dotted name.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        assert!(!name.is_empty(), "sensor name must not be empty");
        Self {
            name,
            description: None,
            value_type: ValueType::of::<T>(),
            _marker: PhantomData,
        }
    }
}

impl<T> Sensor<T> {
    /// Attaches a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The full dotted name; doubles as the path into the value tree.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The dot-separated path segments.
    pub fn name_parts(&self) -> Vec<&str> {
        self.name.split('.').collect()
    }

    /// The sensor's description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The semantic type of the observed value.
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }
}

impl<T> Clone for Sensor<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            description: self.description.clone(),
            value_type: self.value_type,
            _marker: PhantomData,
        }
    }
}

impl<T> PartialEq for Sensor<T> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.value_type == other.value_type
            && self.description == other.description
    }
}

impl<T> fmt::Debug for Sensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sensor")
            .field("name", &self.name)
            .field("type", &self.value_type.name())
            .finish()
    }
}

impl<T> fmt::Display for Sensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
