// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-cluster state derived from the JEL, and its change-detected
//! aggregation.

use std::collections::BTreeMap;
use std::sync::Arc;

use tms_condor::{parse_chirp, status_transition, JelEventType, JobEvent};
use tms_core::{
    AggregateStatuses, ClusterId, JobInfoKey, JobInfoVal, JobStatus, ProcId, TaskforceMonitor,
    TaskforceUuid, TopTaskErrors,
};

/// How many distinct task errors a snapshot carries at most.
pub const N_TOP_TASK_ERRORS: usize = 10;

/// Label used where a worker has no value for a grouping attribute.
const NULL_LABEL: &str = "null";

/// What one event did to the cluster's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    Updated,
    /// Nothing important happened; too common to log loudly.
    NoUpdate,
    /// The whole cluster left the scheduler at the given epoch time.
    ClusterRemoved { timestamp: i64 },
}

/// Statuses and info of one cluster. Owned exclusively by its watcher; the
/// last-sent snapshots are mirrored into the shared [`TaskforceMonitor`].
pub struct ClusterInfo {
    monitor: Arc<TaskforceMonitor>,
    seen_in_jel: bool,
    jobs: BTreeMap<ProcId, BTreeMap<JobInfoKey, JobInfoVal>>,
}

impl ClusterInfo {
    pub fn new(monitor: Arc<TaskforceMonitor>) -> Self {
        Self {
            monitor,
            seen_in_jel: false,
            jobs: BTreeMap::new(),
        }
    }

    pub fn taskforce_uuid(&self) -> &TaskforceUuid {
        &self.monitor.taskforce_uuid
    }

    pub fn cluster_id(&self) -> ClusterId {
        self.monitor.cluster_id
    }

    pub fn seen_in_jel(&self) -> bool {
        self.seen_in_jel
    }

    /// Extract the meaningful info from one event.
    pub fn update_from_event(&mut self, event: &JobEvent) -> EventOutcome {
        self.seen_in_jel = true;

        match event.event_type {
            // chirp -- pilot telemetry
            JelEventType::Generic => {
                let Some((key, value)) = event.chirp_info().and_then(parse_chirp) else {
                    return EventOutcome::NoUpdate;
                };
                self.set_job_attr(event, key, JobInfoVal::Text(value))
            }
            JelEventType::ClusterRemove => EventOutcome::ClusterRemoved {
                timestamp: event.timestamp,
            },
            // job status
            event_type => match status_transition(event_type) {
                Some(JobStatus::Held) => {
                    // the hold reason is the interesting part of the value
                    let (code, subcode) = event.hold_codes();
                    self.set_job_attr(
                        event,
                        JobInfoKey::JobStatus,
                        JobInfoVal::Held(JobStatus::Held.code(), code, subcode),
                    )
                }
                Some(status) => self.set_job_attr(
                    event,
                    JobInfoKey::JobStatus,
                    JobInfoVal::Int(status.code()),
                ),
                None => EventOutcome::NoUpdate,
            },
        }
    }

    fn set_job_attr(&mut self, event: &JobEvent, key: JobInfoKey, value: JobInfoVal) -> EventOutcome {
        let Ok(proc) = ProcId::try_from(event.proc) else {
            // cluster-level event with no per-worker slot
            return EventOutcome::NoUpdate;
        };
        tracing::debug!(
            cluster_id = %event.cluster_id,
            proc,
            key = ?key,
            value = ?value,
            "new worker state"
        );
        self.jobs.entry(proc).or_default().insert(key, value);
        EventOutcome::Updated
    }

    /// Count workers per (job status, pilot status) pair.
    ///
    /// Human-readable keys; workers without a value group under `"null"`.
    pub fn aggregate_compound_statuses(&self) -> AggregateStatuses {
        let mut aggregated = AggregateStatuses::new();
        for job_info in self.jobs.values() {
            let job_status = Self::label(job_info, JobInfoKey::JobStatus);
            let pilot_status = Self::label(job_info, JobInfoKey::HTChirpEWMSPilotStatus);
            *aggregated
                .entry(job_status)
                .or_default()
                .entry(pilot_status)
                .or_insert(0) += 1;
        }
        aggregated
    }

    /// Count the distinct pilot errors, keeping the `N_TOP_TASK_ERRORS`
    /// most common.
    pub fn aggregate_top_task_errors(&self) -> TopTaskErrors {
        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        for job_info in self.jobs.values() {
            if let Some(error) = job_info.get(&JobInfoKey::HTChirpEWMSPilotError) {
                *counts
                    .entry(error.to_label(JobInfoKey::HTChirpEWMSPilotError))
                    .or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(String, u64)> = counts.into_iter().collect();
        ranked.sort_by(|(err_a, n_a), (err_b, n_b)| n_b.cmp(n_a).then(err_a.cmp(err_b)));
        ranked.truncate(N_TOP_TASK_ERRORS);
        ranked.into_iter().collect()
    }

    /// The compound-statuses snapshot, if it changed since the last one.
    /// Empty snapshots are suppressed.
    pub fn changed_compound_statuses(&self) -> Option<AggregateStatuses> {
        let aggregated = self.aggregate_compound_statuses();
        if aggregated == self.monitor.aggregate_statuses() {
            return None;
        }
        self.monitor.set_aggregate_statuses(aggregated.clone());
        if aggregated.is_empty() {
            return None;
        }
        Some(aggregated)
    }

    /// The top-errors snapshot, if it changed since the last one. Empty
    /// snapshots are suppressed.
    pub fn changed_top_task_errors(&self) -> Option<TopTaskErrors> {
        let errors = self.aggregate_top_task_errors();
        if errors == self.monitor.top_task_errors() {
            return None;
        }
        self.monitor.set_top_task_errors(errors.clone());
        if errors.is_empty() {
            return None;
        }
        Some(errors)
    }

    fn label(job_info: &BTreeMap<JobInfoKey, JobInfoVal>, key: JobInfoKey) -> String {
        job_info
            .get(&key)
            .map(|val| val.to_label(key))
            .unwrap_or_else(|| NULL_LABEL.to_string())
    }
}

#[cfg(test)]
#[path = "cluster_info_tests.rs"]
mod tests;
