// SPDX-License-Identifier: MIT OR Apache-2.0

//! The recursive value resolution algorithm.
//!
//! Resolution turns a stored [`RawValue`] into a realized [`ConfigValue`]:
//! pending computations are submitted to the execution context (at most once)
//! and awaited, deferred computations are invoked synchronously, containers
//! are resolved element-wise, and plain values pass through unchanged.
//!
//! Termination is only guaranteed for acyclic, finite chains of computations.
//! A computation whose result resolves back into itself would recurse
//! forever, so the resolver enforces a depth ceiling over chained computation
//! unwraps and fails with
//! [`ConfigError::ResolutionDepthExceeded`](crate::domain::ConfigError::ResolutionDepthExceeded)
//! instead of looping. Container nesting does not count against the ceiling;
//! an owned container tree is finite by construction and any cycle must pass
//! through a computation.

use crate::domain::errors::{ConfigError, Result};
use crate::domain::value::{ConfigValue, RawValue};
use crate::ports::ExecutionContext;
use std::collections::BTreeMap;

/// Default ceiling on chained pending/deferred computation unwraps.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Resolves stored raw values against an execution context.
///
/// Cheap to construct; key extraction builds one per call. Resolution never
/// mutates the value table — its only side effect is the scheduling of work
/// through the context in step 1.
pub struct Resolver<'a> {
    context: &'a dyn ExecutionContext,
    max_depth: usize,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver with the default depth ceiling.
    pub fn new(context: &'a dyn ExecutionContext) -> Self {
        Self {
            context,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Overrides the ceiling on chained computation unwraps.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Fully resolves `raw` into a realized value.
    ///
    /// Resolving a plain value is the identity. Failures raised by the
    /// underlying computations propagate unchanged.
    pub fn resolve(&self, raw: &RawValue) -> Result<ConfigValue> {
        self.resolve_at(raw, 0)
    }

    fn resolve_at(&self, raw: &RawValue, depth: usize) -> Result<ConfigValue> {
        match raw {
            RawValue::Task(task) => {
                if depth >= self.max_depth {
                    return Err(ConfigError::ResolutionDepthExceeded {
                        limit: self.max_depth,
                    });
                }
                if !task.is_submitted() {
                    tracing::debug!(task = task.name(), "submitting pending task");
                    self.context.submit(task)?;
                    task.mark_submitted();
                }
                let produced = self.context.wait_for(task)?;
                self.resolve_at(&produced, depth + 1)
            }
            RawValue::Deferred(f) => {
                if depth >= self.max_depth {
                    return Err(ConfigError::ResolutionDepthExceeded {
                        limit: self.max_depth,
                    });
                }
                let produced = f();
                self.resolve_at(&produced, depth + 1)
            }
            RawValue::Map(entries) => {
                let mut out = BTreeMap::new();
                for (name, value) in entries {
                    out.insert(name.clone(), self.resolve_at(value, depth)?);
                }
                Ok(ConfigValue::Map(out))
            }
            RawValue::List(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.resolve_at(item, depth)?);
                }
                Ok(ConfigValue::List(out))
            }
            RawValue::Value(value) => Ok(value.clone()),
        }
    }
}
