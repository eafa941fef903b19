// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions for external collaborators.
//!
//! This module defines the seams the core calls across: the execution context
//! that schedules and runs pending computations, and the event sink that
//! carries sensor value-changed notifications. Both are consumed, never
//! implemented, by this crate; callers plug in their own engines.

pub mod events;
pub mod executor;

// Re-export commonly used types
pub use events::{EventSink, SensorEvent};
pub use executor::{ExecutionContext, PendingTask};
