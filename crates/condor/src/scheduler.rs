// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The scheduler action surface.

use async_trait::async_trait;
use thiserror::Error;
use tms_core::ClusterId;

use crate::submit::SubmitDescription;

/// Errors from scheduler actions. The scalar loop reports every one of
/// these to the WMS via the `/failed` routes and moves on.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("scheduler internal error: {0}")]
    Internal(String),
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
    #[error("could not parse scheduler output: {0}")]
    ParseOutput(String),
}

/// Result of a successful submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub cluster_id: ClusterId,
    /// Workers actually queued (the scheduler's count, not the request).
    pub num_procs: u64,
}

/// Result of a successful remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RemoveOutcome {
    /// Workers affected, when the scheduler reports a count.
    pub affected: Option<u64>,
}

/// Adapter for scheduler actions
#[async_trait]
pub trait Scheduler: Clone + Send + Sync + 'static {
    /// Submit a cluster of `count` workers.
    async fn submit(
        &self,
        description: &SubmitDescription,
        count: u64,
    ) -> Result<SubmitOutcome, SchedulerError>;

    /// Remove every worker of a cluster.
    async fn remove(
        &self,
        cluster_id: ClusterId,
        reason: &str,
    ) -> Result<RemoveOutcome, SchedulerError>;
}
