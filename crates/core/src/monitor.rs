// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Observer handles for taskforce state.
//!
//! The JEL watcher owns its per-cluster state outright. What it publishes
//! for the rest of the process is a [`TaskforceMonitor`]: a read-only handle
//! carrying the last snapshots sent to the WMS, shared through a
//! process-wide [`AppendOnlyList`]. No back-pointers, no removal.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::id::{ClusterId, TaskforceUuid};

/// Compound statuses: job-status label → (pilot-status label → worker count).
pub type AggregateStatuses = BTreeMap<String, BTreeMap<String, u64>>;

/// Top task errors: error text → worker count.
pub type TopTaskErrors = BTreeMap<String, u64>;

#[derive(Debug, Default, Clone)]
struct Snapshots {
    aggregate_statuses: AggregateStatuses,
    top_task_errors: TopTaskErrors,
}

/// Minimal long-lived record of a taskforce, readable by any task.
#[derive(Debug)]
pub struct TaskforceMonitor {
    pub taskforce_uuid: TaskforceUuid,
    pub cluster_id: ClusterId,
    snapshots: Mutex<Snapshots>,
}

impl TaskforceMonitor {
    pub fn new(taskforce_uuid: TaskforceUuid, cluster_id: ClusterId) -> Self {
        Self {
            taskforce_uuid,
            cluster_id,
            snapshots: Mutex::new(Snapshots::default()),
        }
    }

    pub fn aggregate_statuses(&self) -> AggregateStatuses {
        self.snapshots.lock().aggregate_statuses.clone()
    }

    pub fn set_aggregate_statuses(&self, statuses: AggregateStatuses) {
        self.snapshots.lock().aggregate_statuses = statuses;
    }

    pub fn top_task_errors(&self) -> TopTaskErrors {
        self.snapshots.lock().top_task_errors.clone()
    }

    pub fn set_top_task_errors(&self, errors: TopTaskErrors) {
        self.snapshots.lock().top_task_errors = errors;
    }
}

/// A shared list you cannot remove items from.
///
/// Cloning shares the underlying storage; entries are `Arc`s so readers get
/// cheap handles rather than copies.
#[derive(Debug)]
pub struct AppendOnlyList<T> {
    inner: Arc<Mutex<Vec<Arc<T>>>>,
}

impl<T> Clone for AppendOnlyList<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for AppendOnlyList<T> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<T> AppendOnlyList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, returning the shared handle to it.
    pub fn push(&self, entry: T) -> Arc<T> {
        let entry = Arc::new(entry);
        self.inner.lock().push(Arc::clone(&entry));
        entry
    }

    /// All entries appended so far.
    pub fn snapshot(&self) -> Vec<Arc<T>> {
        self.inner.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
