// SPDX-License-Identifier: MIT OR Apache-2.0

//! The path-addressed sensor value store.
//!
//! One [`SensorStore`] is owned exclusively by one entity for its lifetime;
//! no node is shared between trees and the tree dies with its owner. Values
//! are addressed by successive path segments into a single nested mapping.
//!
//! The update walk carries a deliberate lossy policy inherited from the
//! system this models: writing below a position that currently holds a
//! non-map value overwrites that value with a fresh empty map, with a
//! warning, rather than rejecting the write. Callers that cannot tolerate
//! the loss must not address below their own scalars.

use crate::domain::errors::{ConfigError, Result};
use crate::domain::sensor::Sensor;
use crate::domain::value::{ConfigValue, FromConfigValue};
use crate::ports::{EventSink, SensorEvent};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A per-entity nested-mapping store for observed values.
///
/// Not internally synchronized: concurrent access from multiple threads must
/// be serialized by the owner.
///
/// # Examples
///
/// ```
/// use keytree::domain::ConfigValue;
/// use keytree::service::SensorStore;
///
/// let mut store = SensorStore::new("web-1");
/// store.update(&["metrics", "cpu"], ConfigValue::Float(0.5)).unwrap();
/// assert_eq!(
///     store.get_value(&["metrics", "cpu"]).unwrap(),
///     &ConfigValue::Float(0.5)
/// );
/// ```
pub struct SensorStore {
    entity: String,
    values: BTreeMap<String, ConfigValue>,
    events: Option<Arc<dyn EventSink>>,
}

impl SensorStore {
    /// Creates an empty store for `entity`, without an event sink. Sensor
    /// updates succeed but raise nothing.
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            values: BTreeMap::new(),
            events: None,
        }
    }

    /// Creates an empty store for `entity` that raises a [`SensorEvent`]
    /// through `events` on every successful sensor-style update.
    pub fn with_event_sink(entity: impl Into<String>, events: Arc<dyn EventSink>) -> Self {
        Self {
            entity: entity.into(),
            values: BTreeMap::new(),
            events: Some(events),
        }
    }

    /// The owning entity's name.
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Stores `value` at `path`, returning the prior value at that position.
    ///
    /// Intermediate positions that hold a non-map value are overwritten with
    /// a fresh empty map (the prior value there is lost) and a warning is
    /// emitted; this is the documented lossy-overwrite policy, not an error.
    ///
    /// Fails with [`ConfigError::PathNotFound`] if the path is empty or
    /// contains an empty segment.
    pub fn update(&mut self, path: &[&str], value: ConfigValue) -> Result<Option<ConfigValue>> {
        let (last, parents) = Self::check_path(path)?;

        let mut node = &mut self.values;
        for segment in parents {
            let entry = node
                .entry((*segment).to_string())
                .or_insert_with(|| ConfigValue::Map(BTreeMap::new()));
            if !matches!(entry, ConfigValue::Map(_)) {
                tracing::warn!(
                    entity = %self.entity,
                    path = %path.join("."),
                    segment = %segment,
                    "overwriting non-map value with a nested map"
                );
                *entry = ConfigValue::Map(BTreeMap::new());
            }
            let ConfigValue::Map(next) = entry else {
                unreachable!("entry was just made a map");
            };
            node = next;
        }
        Ok(node.insert(last.to_string(), value))
    }

    /// Stores `value` under the path named by `sensor` and raises exactly one
    /// value-changed event on success.
    pub fn update_sensor<T>(
        &mut self,
        sensor: &Sensor<T>,
        value: ConfigValue,
    ) -> Result<Option<ConfigValue>> {
        let path: Vec<&str> = sensor.name().split('.').collect();
        let prior = self.update(&path, value.clone())?;
        if let Some(events) = &self.events {
            events.raise(SensorEvent {
                entity: self.entity.clone(),
                sensor: sensor.name().to_string(),
                value,
            });
        }
        Ok(prior)
    }

    /// Reads the value at `path`.
    ///
    /// Fails with [`ConfigError::PathNotFound`] if the path is empty,
    /// contains an empty segment, or any intermediate or final lookup is
    /// absent. No partial result is returned.
    pub fn get_value(&self, path: &[&str]) -> Result<&ConfigValue> {
        let (last, parents) = Self::check_path(path)?;

        let mut node = &self.values;
        for segment in parents {
            match node.get(*segment) {
                Some(ConfigValue::Map(next)) => node = next,
                _ => return Err(Self::path_not_found(path)),
            }
        }
        node.get(last).ok_or_else(|| Self::path_not_found(path))
    }

    /// Reads the value under the path named by `sensor`.
    pub fn get_sensor<T>(&self, sensor: &Sensor<T>) -> Result<&ConfigValue> {
        let path: Vec<&str> = sensor.name().split('.').collect();
        self.get_value(&path)
    }

    /// Reads and decodes the value under `sensor` to its declared type.
    pub fn read_sensor<T: FromConfigValue>(&self, sensor: &Sensor<T>) -> Result<T> {
        let value = self.get_sensor(sensor)?.clone();
        T::from_config_value(value, sensor.name())
    }

    fn check_path<'p>(path: &'p [&'p str]) -> Result<(&'p str, &'p [&'p str])> {
        match path.split_last() {
            Some((last, parents)) if !path.iter().any(|segment| segment.is_empty()) => {
                Ok((*last, parents))
            }
            _ => Err(Self::path_not_found(path)),
        }
    }

    fn path_not_found(path: &[&str]) -> ConfigError {
        ConfigError::PathNotFound {
            path: path.join("."),
        }
    }
}
