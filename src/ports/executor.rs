// SPDX-License-Identifier: MIT OR Apache-2.0

//! Execution context trait definitions.
//!
//! The resolver never runs a pending computation itself; it hands the task to
//! an [`ExecutionContext`] and blocks until the context has a result. Which
//! threads the context uses, whether it retries, how it cancels — all of that
//! is the context's business. The only protocol the resolver relies on is:
//! submission is idempotent for an already-submitted task, and `wait_for`
//! either produces the task's raw result or propagates its failure.

use crate::domain::errors::Result;
use crate::domain::value::RawValue;
use std::sync::Arc;

/// A unit of work that must be scheduled and awaited before its result is
/// usable.
///
/// The handle carries a submitted flag so the resolver can guarantee, from
/// its side, that one task is handed to the context at most once: it checks
/// [`is_submitted`](Self::is_submitted) before submitting and calls
/// [`mark_submitted`](Self::mark_submitted) after a successful submit.
/// Implementations typically back the flag with an `AtomicBool`.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; task handles are shared freely
/// between table entries.
pub trait PendingTask: Send + Sync {
    /// A short name for the task, used in diagnostics and failure messages.
    fn name(&self) -> &str;

    /// Whether this task has already been handed to an execution context.
    fn is_submitted(&self) -> bool;

    /// Records that the task has been handed to an execution context.
    fn mark_submitted(&self);
}

/// Capability to schedule pending computations and block on their results.
///
/// # Examples
///
/// ```
/// use keytree::domain::{RawValue, Result};
/// use keytree::ports::{ExecutionContext, PendingTask};
/// use std::sync::Arc;
///
/// /// A context for tables that are known to hold no tasks.
/// struct NoTasks;
///
/// impl ExecutionContext for NoTasks {
///     fn submit(&self, _task: &Arc<dyn PendingTask>) -> Result<()> {
///         Ok(())
///     }
///
///     fn wait_for(&self, _task: &Arc<dyn PendingTask>) -> Result<RawValue> {
///         unreachable!("no pending tasks expected")
///     }
/// }
/// ```
pub trait ExecutionContext: Send + Sync {
    /// Hands `task` over for scheduling.
    ///
    /// Must be idempotent with respect to an already-submitted task: the
    /// resolver checks the task's submitted flag first, but two threads
    /// racing on the same task may both get here.
    fn submit(&self, task: &Arc<dyn PendingTask>) -> Result<()>;

    /// Blocks the calling thread until `task` completes, returning its raw
    /// result.
    ///
    /// A task failure is surfaced as an error and propagated unchanged by the
    /// resolver; it is never swallowed, retried, or downgraded. Timeout and
    /// cancellation policy belong to the context.
    fn wait_for(&self, task: &Arc<dyn PendingTask>) -> Result<RawValue>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FlagTask {
        name: String,
        submitted: AtomicBool,
    }

    impl PendingTask for FlagTask {
        fn name(&self) -> &str {
            &self.name
        }

        fn is_submitted(&self) -> bool {
            self.submitted.load(Ordering::Acquire)
        }

        fn mark_submitted(&self) {
            self.submitted.store(true, Ordering::Release);
        }
    }

    #[test]
    fn submitted_flag_round_trip() {
        let task = FlagTask {
            name: "t".to_string(),
            submitted: AtomicBool::new(false),
        };
        assert!(!task.is_submitted());
        task.mark_submitted();
        assert!(task.is_submitted());
    }

    #[test]
    fn trait_objects_are_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn PendingTask>();
        assert_send_sync::<dyn ExecutionContext>();
    }
}
