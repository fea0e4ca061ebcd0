// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake scheduler for deterministic testing
#![cfg_attr(coverage_nightly, coverage(off))]

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tms_core::ClusterId;

use crate::scheduler::{RemoveOutcome, Scheduler, SchedulerError, SubmitOutcome};
use crate::submit::SubmitDescription;

/// Recorded call to FakeScheduler
#[derive(Debug, Clone)]
pub enum SchedulerCall {
    Submit {
        description: SubmitDescription,
        count: u64,
    },
    Remove {
        cluster_id: ClusterId,
        reason: String,
    },
}

struct FakeSchedulerState {
    calls: Vec<SchedulerCall>,
    next_cluster_id: u64,
    submit_error: Option<String>,
    remove_error: Option<String>,
    remove_affected: Option<u64>,
}

/// Fake scheduler for testing
///
/// Submits hand out sequential cluster ids; errors can be injected per
/// operation. All calls are recorded.
#[derive(Clone)]
pub struct FakeScheduler {
    inner: Arc<Mutex<FakeSchedulerState>>,
}

impl Default for FakeScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeScheduler {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeSchedulerState {
                calls: Vec::new(),
                next_cluster_id: 1,
                submit_error: None,
                remove_error: None,
                remove_affected: None,
            })),
        }
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<SchedulerCall> {
        self.inner.lock().calls.clone()
    }

    /// Cluster id handed out by the next submit.
    pub fn set_next_cluster_id(&self, id: u64) {
        self.inner.lock().next_cluster_id = id;
    }

    /// Make the next submit fail with an internal error.
    pub fn set_submit_error(&self, message: impl Into<String>) {
        self.inner.lock().submit_error = Some(message.into());
    }

    /// Make the next remove fail with an internal error.
    pub fn set_remove_error(&self, message: impl Into<String>) {
        self.inner.lock().remove_error = Some(message.into());
    }

    /// Worker count reported by removes.
    pub fn set_remove_affected(&self, affected: u64) {
        self.inner.lock().remove_affected = Some(affected);
    }

    /// Descriptions submitted so far, in order.
    pub fn submitted(&self) -> Vec<SubmitDescription> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                SchedulerCall::Submit { description, .. } => Some(description.clone()),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl Scheduler for FakeScheduler {
    async fn submit(
        &self,
        description: &SubmitDescription,
        count: u64,
    ) -> Result<SubmitOutcome, SchedulerError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SchedulerCall::Submit {
            description: description.clone(),
            count,
        });
        if let Some(message) = inner.submit_error.take() {
            return Err(SchedulerError::Internal(message));
        }
        let cluster_id = ClusterId::new(inner.next_cluster_id);
        inner.next_cluster_id += 1;
        Ok(SubmitOutcome {
            cluster_id,
            num_procs: count,
        })
    }

    async fn remove(
        &self,
        cluster_id: ClusterId,
        reason: &str,
    ) -> Result<RemoveOutcome, SchedulerError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SchedulerCall::Remove {
            cluster_id,
            reason: reason.to_string(),
        });
        if let Some(message) = inner.remove_error.take() {
            return Err(SchedulerError::Internal(message));
        }
        Ok(RemoveOutcome {
            affected: inner.remove_affected,
        })
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
