// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event sink trait definition and the sensor event record.
//!
//! The sensor store's contract ends at "event is emitted exactly once per
//! successful sensor update"; delivery, subscription, and dispatch are
//! external. From the store's perspective [`EventSink::raise`] is
//! fire-and-forget.

use crate::domain::value::ConfigValue;
use serde::{Deserialize, Serialize};

/// A value-changed notification for one sensor of one entity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensorEvent {
    /// The entity whose tree was updated.
    pub entity: String,
    /// The full dotted name of the updated sensor.
    pub sensor: String,
    /// The value that was stored.
    pub value: ConfigValue,
}

/// Capability to carry sensor value-changed events downstream.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; a sink is typically shared across
/// every store of a runtime.
///
/// # Examples
///
/// ```
/// use keytree::ports::{EventSink, SensorEvent};
///
/// /// A sink that drops every event.
/// struct NullSink;
///
/// impl EventSink for NullSink {
///     fn raise(&self, _event: SensorEvent) {}
/// }
/// ```
pub trait EventSink: Send + Sync {
    /// Accepts one event. Fire-and-forget: the caller neither observes nor
    /// waits for delivery.
    fn raise(&self, event: SensorEvent);
}
