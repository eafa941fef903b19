// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer orchestrating domain types and ports.
//!
//! This module holds the two pieces of logic that tie everything together:
//! the recursive value [`Resolver`] and the path-addressed [`SensorStore`].

pub mod resolver;
pub mod sensor_store;

// Re-export commonly used types
pub use resolver::{Resolver, DEFAULT_MAX_DEPTH};
pub use sensor_store::SensorStore;
