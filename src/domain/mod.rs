// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core types and business logic.
//!
//! This module contains the key, value, and table types at the heart of the
//! crate. It is independent of any external collaborator; everything that
//! touches the outside world goes through the traits in [`crate::ports`].

pub mod composite;
pub mod errors;
pub mod key;
pub mod sensor;
pub mod table;
pub mod value;

// Re-export commonly used types
pub use composite::{ListConfigKey, MapConfigKey};
pub use errors::{ConfigError, Result};
pub use key::{ConfigKey, KeyMeta, SubElementKey, TableKey, ValueType};
pub use sensor::Sensor;
pub use table::ValueTable;
pub use value::{ConfigValue, DeferredFn, FromConfigValue, RawValue};
