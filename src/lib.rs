// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hierarchical typed configuration keys with recursive value resolution,
//! plus a path-addressed sensor value store.
//!
//! This crate provides two independent, structurally analogous components:
//!
//! - **Config keys** (`ConfigKey`, `MapConfigKey`, `ListConfigKey`): typed,
//!   named identifiers for configuration slots. Composite keys decompose into
//!   families of sub-keys so that map- and list-shaped values can be written
//!   one entry at a time into a flat [`ValueTable`](domain::ValueTable) and
//!   reassembled on read. Stored values may be plain, pending computations,
//!   zero-argument deferred computations, or nested containers of any of
//!   those; extraction resolves them recursively through an externally
//!   supplied [`ExecutionContext`](ports::ExecutionContext).
//! - **Sensor store** ([`SensorStore`](service::SensorStore)): a per-owner
//!   nested-mapping store addressed by dotted path or by a typed
//!   [`Sensor`](domain::Sensor) descriptor, with point update, point read,
//!   and a value-changed event emitted per sensor-style update.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types (`ConfigKey`, `ConfigValue`, `RawValue`,
//!   `ValueTable`, `Sensor`, errors)
//! - **Ports**: Trait seams for external collaborators (`ExecutionContext`,
//!   `PendingTask`, `EventSink`)
//! - **Service**: The resolution algorithm (`Resolver`) and the sensor value
//!   tree (`SensorStore`)
//!
//! The execution engine that actually runs pending computations and the bus
//! that delivers sensor events are deliberately outside this crate; both are
//! consumed purely through the port traits.
//!
//! # Quick Start
//!
//! ```rust
//! use keytree::prelude::*;
//! # use std::sync::Arc;
//! # struct NoTasks;
//! # impl ExecutionContext for NoTasks {
//! #     fn submit(&self, _task: &Arc<dyn PendingTask>) -> Result<()> { Ok(()) }
//! #     fn wait_for(&self, _task: &Arc<dyn PendingTask>) -> Result<RawValue> {
//! #         unreachable!("no pending tasks in this example")
//! #     }
//! # }
//!
//! # fn main() -> Result<()> {
//! let port: ConfigKey<i64> = ConfigKey::new("server.port");
//! let mut table = ValueTable::new();
//! table.insert(&port, RawValue::from(ConfigValue::from(8080)));
//!
//! let value = port.extract_value(&table, &NoTasks)?;
//! assert_eq!(value, 8080);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for
/// convenient access.
pub mod prelude {
    pub use crate::domain::{
        ConfigError, ConfigKey, ConfigValue, FromConfigValue, KeyMeta, ListConfigKey,
        MapConfigKey, RawValue, Result, Sensor, SubElementKey, TableKey, ValueTable, ValueType,
    };
    pub use crate::ports::{EventSink, ExecutionContext, PendingTask, SensorEvent};
    pub use crate::service::{Resolver, SensorStore};
}
