// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake WMS client for deterministic testing
#![cfg_attr(coverage_nightly, coverage(off))]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tms_core::{Phase, TaskforceUuid};

use crate::client::{WmsClient, WmsError};
use crate::types::{
    PendingStarter, PendingStopper, StatusesBody, SubmitConfirmation, TaskforceQuery, TaskforceRow,
};

/// Recorded call to FakeWmsClient
#[derive(Debug, Clone)]
pub enum WmsCall {
    PendingStarter {
        collector: String,
        schedd: String,
    },
    PendingStopper {
        collector: String,
        schedd: String,
    },
    TaskforcePhase {
        uuid: TaskforceUuid,
    },
    ConfirmCondorSubmit {
        uuid: TaskforceUuid,
        body: SubmitConfirmation,
    },
    CondorSubmitFailed {
        uuid: TaskforceUuid,
        error: String,
    },
    ConfirmCondorRm {
        uuid: TaskforceUuid,
    },
    CondorRmFailed {
        uuid: TaskforceUuid,
    },
    CondorComplete {
        uuid: TaskforceUuid,
        condor_complete_ts: i64,
    },
    PostStatuses {
        body: StatusesBody,
    },
    QueryTaskforces {
        query: TaskforceQuery,
    },
}

struct FakeWmsState {
    calls: Vec<WmsCall>,
    pending_starters: VecDeque<PendingStarter>,
    pending_stoppers: VecDeque<PendingStopper>,
    phases: HashMap<TaskforceUuid, Phase>,
    query_results: VecDeque<Vec<TaskforceRow>>,
    fail_with: Option<String>,
}

/// Fake WMS client for testing
///
/// Pending directives and query results are scripted as queues; every call
/// is recorded for assertions.
#[derive(Clone)]
pub struct FakeWmsClient {
    inner: Arc<Mutex<FakeWmsState>>,
}

impl Default for FakeWmsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeWmsClient {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeWmsState {
                calls: Vec::new(),
                pending_starters: VecDeque::new(),
                pending_stoppers: VecDeque::new(),
                phases: HashMap::new(),
                query_results: VecDeque::new(),
                fail_with: None,
            })),
        }
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<WmsCall> {
        self.inner.lock().calls.clone()
    }

    /// Clear recorded calls
    pub fn clear_calls(&self) {
        self.inner.lock().calls.clear();
    }

    /// Queue a pending-starter directive (served once, in order).
    pub fn push_pending_starter(&self, directive: PendingStarter) {
        self.inner.lock().pending_starters.push_back(directive);
    }

    /// Queue a pending-stopper directive (served once, in order).
    pub fn push_pending_stopper(&self, directive: PendingStopper) {
        self.inner.lock().pending_stoppers.push_back(directive);
    }

    /// Set the phase reported for a taskforce (default: pending-starter).
    pub fn set_phase(&self, uuid: TaskforceUuid, phase: Phase) {
        self.inner.lock().phases.insert(uuid, phase);
    }

    /// Queue a query response (served once, in order; empty afterwards).
    pub fn push_query_result(&self, rows: Vec<TaskforceRow>) {
        self.inner.lock().query_results.push_back(rows);
    }

    /// Make every subsequent call fail with a transport error.
    pub fn fail_with(&self, message: impl Into<String>) {
        self.inner.lock().fail_with = Some(message.into());
    }

    /// Statuses bodies posted so far, in order.
    pub fn posted_statuses(&self) -> Vec<StatusesBody> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                WmsCall::PostStatuses { body } => Some(body.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: WmsCall) -> Result<(), WmsError> {
        let mut inner = self.inner.lock();
        inner.calls.push(call);
        match &inner.fail_with {
            Some(message) => Err(WmsError::Transport(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl WmsClient for FakeWmsClient {
    async fn pending_starter(
        &self,
        collector: &str,
        schedd: &str,
    ) -> Result<Option<PendingStarter>, WmsError> {
        self.record(WmsCall::PendingStarter {
            collector: collector.to_string(),
            schedd: schedd.to_string(),
        })?;
        Ok(self.inner.lock().pending_starters.pop_front())
    }

    async fn pending_stopper(
        &self,
        collector: &str,
        schedd: &str,
    ) -> Result<Option<PendingStopper>, WmsError> {
        self.record(WmsCall::PendingStopper {
            collector: collector.to_string(),
            schedd: schedd.to_string(),
        })?;
        Ok(self.inner.lock().pending_stoppers.pop_front())
    }

    async fn taskforce_phase(&self, uuid: &TaskforceUuid) -> Result<Phase, WmsError> {
        self.record(WmsCall::TaskforcePhase { uuid: uuid.clone() })?;
        Ok(self
            .inner
            .lock()
            .phases
            .get(uuid)
            .cloned()
            .unwrap_or(Phase::PendingStarter))
    }

    async fn confirm_condor_submit(
        &self,
        uuid: &TaskforceUuid,
        body: &SubmitConfirmation,
    ) -> Result<(), WmsError> {
        self.record(WmsCall::ConfirmCondorSubmit {
            uuid: uuid.clone(),
            body: body.clone(),
        })
    }

    async fn condor_submit_failed(
        &self,
        uuid: &TaskforceUuid,
        error: &str,
    ) -> Result<(), WmsError> {
        self.record(WmsCall::CondorSubmitFailed {
            uuid: uuid.clone(),
            error: error.to_string(),
        })
    }

    async fn confirm_condor_rm(&self, uuid: &TaskforceUuid) -> Result<(), WmsError> {
        self.record(WmsCall::ConfirmCondorRm { uuid: uuid.clone() })
    }

    async fn condor_rm_failed(&self, uuid: &TaskforceUuid) -> Result<(), WmsError> {
        self.record(WmsCall::CondorRmFailed { uuid: uuid.clone() })
    }

    async fn condor_complete(
        &self,
        uuid: &TaskforceUuid,
        condor_complete_ts: i64,
    ) -> Result<(), WmsError> {
        self.record(WmsCall::CondorComplete {
            uuid: uuid.clone(),
            condor_complete_ts,
        })
    }

    async fn post_statuses(&self, body: &StatusesBody) -> Result<(), WmsError> {
        self.record(WmsCall::PostStatuses { body: body.clone() })
    }

    async fn query_taskforces(
        &self,
        query: &TaskforceQuery,
    ) -> Result<Vec<TaskforceRow>, WmsError> {
        self.record(WmsCall::QueryTaskforces {
            query: query.clone(),
        })?;
        Ok(self
            .inner
            .lock()
            .query_results
            .pop_front()
            .unwrap_or_default())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
