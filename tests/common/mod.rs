// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared test doubles for the integration tests: a task handle backed by an
//! atomic flag, an execution context that completes tasks from canned
//! results, and an event sink that records what it is given.

#![allow(dead_code)]

use keytree::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

static TRACING: Once = Once::new();

/// Installs a test-writer subscriber once per test binary.
pub fn init_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init()
            .ok();
    });
}

/// A pending-task handle whose submitted flag is an `AtomicBool`.
pub struct StubTask {
    name: String,
    submitted: AtomicBool,
}

impl StubTask {
    pub fn new(name: &str) -> Arc<dyn PendingTask> {
        Arc::new(Self {
            name: name.to_string(),
            submitted: AtomicBool::new(false),
        })
    }
}

impl PendingTask for StubTask {
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

/// An execution context that completes tasks from canned results keyed by
/// task name, counting how many times each task name is submitted.
pub struct InlineContext {
    results: Mutex<HashMap<String, keytree::domain::Result<RawValue>>>,
    submits: Mutex<Vec<String>>,
}

impl InlineContext {
    pub fn new() -> Self {
        Self {
            results: Mutex::new(HashMap::new()),
            submits: Mutex::new(Vec::new()),
        }
    }

    pub fn with_result(self, name: &str, result: RawValue) -> Self {
        self.results
            .lock()
            .unwrap()
            .insert(name.to_string(), Ok(result));
        self
    }

    pub fn with_failure(self, name: &str, message: &str) -> Self {
        self.results.lock().unwrap().insert(
            name.to_string(),
            Err(ConfigError::TaskFailed {
                name: name.to_string(),
                message: message.to_string(),
            }),
        );
        self
    }

    /// How many times `name` was submitted.
    pub fn submit_count(&self, name: &str) -> usize {
        self.submits
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.as_str() == name)
            .count()
    }
}

impl ExecutionContext for InlineContext {
    fn submit(&self, task: &Arc<dyn PendingTask>) -> Result<()> {
        self.submits.lock().unwrap().push(task.name().to_string());
        Ok(())
    }

    fn wait_for(&self, task: &Arc<dyn PendingTask>) -> Result<RawValue> {
        match self.results.lock().unwrap().get(task.name()) {
            Some(Ok(raw)) => Ok(raw.clone()),
            Some(Err(ConfigError::TaskFailed { name, message })) => {
                Err(ConfigError::TaskFailed {
                    name: name.clone(),
                    message: message.clone(),
                })
            }
            _ => Err(ConfigError::TaskFailed {
                name: task.name().to_string(),
                message: "no canned result".to_string(),
            }),
        }
    }
}

/// A context for tables known to hold no pending tasks; panics if used.
pub struct NoTasks;

impl ExecutionContext for NoTasks {
    fn submit(&self, task: &Arc<dyn PendingTask>) -> Result<()> {
        panic!("unexpected submit of task '{}'", task.name());
    }

    fn wait_for(&self, task: &Arc<dyn PendingTask>) -> Result<RawValue> {
        panic!("unexpected wait on task '{}'", task.name());
    }
}

/// An event sink that records every raised event.
pub struct RecordingSink {
    events: Mutex<Vec<SensorEvent>>,
    raised: AtomicUsize,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            events: Mutex::new(Vec::new()),
            raised: AtomicUsize::new(0),
        })
    }

    pub fn events(&self) -> Vec<SensorEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn raised(&self) -> usize {
        self.raised.load(Ordering::SeqCst)
    }
}

impl EventSink for RecordingSink {
    fn raise(&self, event: SensorEvent) {
        self.raised.fetch_add(1, Ordering::SeqCst);
        self.events.lock().unwrap().push(event);
    }
}
