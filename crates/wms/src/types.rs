// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire types for the WMS HTTP surface.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tms_core::{AggregateStatuses, ClusterId, EnvVal, SizeSpec, TaskforceUuid, TopTaskErrors};

/// Where the pilot container image is published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PilotImageSource {
    /// Let TMS pick; currently resolves the same as [`Self::Cvmfs`].
    Auto,
    Cvmfs,
}

/// Pilot (container) configuration of a taskforce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PilotConfig {
    pub image_source: PilotImageSource,
    pub tag: String,
    #[serde(default)]
    pub environment: BTreeMap<String, EnvVal>,
    #[serde(default)]
    pub input_files: Vec<String>,
}

/// Worker (scheduler-resource) configuration of a taskforce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerConfig {
    pub do_transfer_worker_stdouterr: bool,
    pub max_worker_runtime: u64,
    pub n_cores: u64,
    pub priority: i64,
    pub worker_disk: SizeSpec,
    pub worker_memory: SizeSpec,
    #[serde(default)]
    pub condor_requirements: Option<String>,
}

/// The taskforce object inside a pending-starter response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Taskforce {
    pub taskforce_uuid: TaskforceUuid,
    pub n_workers: u64,
    pub pilot_config: PilotConfig,
    pub worker_config: WorkerConfig,
}

/// The task directive a taskforce realizes: what the pilot should run and
/// which queues it talks to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDirective {
    pub task_image: String,
    #[serde(default)]
    pub task_args: String,
    #[serde(default)]
    pub task_env: BTreeMap<String, EnvVal>,
    #[serde(default)]
    pub input_queues: Vec<String>,
    #[serde(default)]
    pub output_queues: Vec<String>,
}

/// Transport descriptor for one message queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MqProfile {
    pub mqid: String,
    pub broker_type: String,
    pub broker_address: String,
    #[serde(default)]
    pub auth_token: String,
}

/// Non-empty response from the pending-starter endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingStarter {
    pub taskforce: Taskforce,
    pub task_directive: TaskDirective,
    #[serde(default)]
    pub mqprofiles: Vec<MqProfile>,
}

/// Non-empty response from the pending-stopper endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingStopper {
    pub taskforce_uuid: TaskforceUuid,
    pub cluster_id: ClusterId,
}

/// Body confirming a successful scheduler submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitConfirmation {
    pub cluster_id: ClusterId,
    pub n_workers: u64,
    pub submit_dict: serde_json::Value,
    pub job_event_log_fpath: String,
}

/// One batched statuses update. Empty top-level keys are dropped on the
/// wire; an all-empty body is never sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusesBody {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub top_task_errors_by_taskforce: BTreeMap<TaskforceUuid, TopTaskErrors>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub compound_statuses_by_taskforce: BTreeMap<TaskforceUuid, AggregateStatuses>,
}

impl StatusesBody {
    pub fn is_empty(&self) -> bool {
        self.top_task_errors_by_taskforce.is_empty()
            && self.compound_statuses_by_taskforce.is_empty()
    }
}

/// Filter + projection for the generic taskforce query endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskforceQuery {
    pub query: serde_json::Value,
    pub projection: Vec<String>,
}

/// One projected row from a taskforce query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskforceRow {
    pub taskforce_uuid: TaskforceUuid,
    #[serde(default)]
    pub cluster_id: Option<ClusterId>,
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
