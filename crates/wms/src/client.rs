// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The typed client surface the loops program against.

use async_trait::async_trait;
use thiserror::Error;
use tms_core::{Phase, TaskforceUuid};

use crate::types::{
    PendingStarter, PendingStopper, StatusesBody, SubmitConfirmation, TaskforceQuery, TaskforceRow,
};

/// Errors from WMS operations. All of these propagate to the caller; the
/// loops die on them and outer supervision restarts the process.
#[derive(Debug, Error)]
pub enum WmsError {
    #[error("wms returned {status} for {route}: {body}")]
    Status {
        route: String,
        status: u16,
        body: String,
    },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("token acquisition failed: {0}")]
    Token(String),
    #[error("could not decode response from {route}: {message}")]
    Decode { route: String, message: String },
}

/// Client for the WMS control plane.
#[async_trait]
pub trait WmsClient: Clone + Send + Sync + 'static {
    /// Next taskforce pending a start on this agent, if any.
    async fn pending_starter(
        &self,
        collector: &str,
        schedd: &str,
    ) -> Result<Option<PendingStarter>, WmsError>;

    /// Next taskforce pending a stop on this agent, if any.
    async fn pending_stopper(
        &self,
        collector: &str,
        schedd: &str,
    ) -> Result<Option<PendingStopper>, WmsError>;

    /// Current lifecycle phase of a taskforce.
    async fn taskforce_phase(&self, uuid: &TaskforceUuid) -> Result<Phase, WmsError>;

    /// Confirm a successful scheduler submit.
    async fn confirm_condor_submit(
        &self,
        uuid: &TaskforceUuid,
        body: &SubmitConfirmation,
    ) -> Result<(), WmsError>;

    /// Report a scheduler-side submit failure.
    async fn condor_submit_failed(
        &self,
        uuid: &TaskforceUuid,
        error: &str,
    ) -> Result<(), WmsError>;

    /// Confirm a successful scheduler remove.
    async fn confirm_condor_rm(&self, uuid: &TaskforceUuid) -> Result<(), WmsError>;

    /// Report a scheduler-side remove failure.
    async fn condor_rm_failed(&self, uuid: &TaskforceUuid) -> Result<(), WmsError>;

    /// Report that the cluster backing a taskforce left the scheduler.
    async fn condor_complete(
        &self,
        uuid: &TaskforceUuid,
        condor_complete_ts: i64,
    ) -> Result<(), WmsError>;

    /// Push one batched statuses update.
    async fn post_statuses(&self, body: &StatusesBody) -> Result<(), WmsError>;

    /// Generic filtered taskforce query.
    async fn query_taskforces(
        &self,
        query: &TaskforceQuery,
    ) -> Result<Vec<TaskforceRow>, WmsError>;
}
