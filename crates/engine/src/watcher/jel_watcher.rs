// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One watcher per job event log: incremental parse, per-cluster state,
//! change-only snapshots to the WMS.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tms_condor::{JelReadError, JelReader, JobEvent};
use tms_core::{
    AppendOnlyList, ClusterId, IntervalTimer, TaskforceMonitor, TaskforceUuid,
};
use tms_wms::{StatusesBody, TaskforceQuery, WmsClient};

use super::cluster_info::{ClusterInfo, EventOutcome};
use super::WatcherError;
use crate::options::{SchedulerLocation, WatcherOptions};

/// Watches one JEL, which may carry many taskforces.
///
/// A taskforce is never split among multiple JELs. If this task dies, the
/// file is re-read from the top on respawn; replay yields the same state,
/// so no cursor is persisted.
pub struct JelWatcher<W: WmsClient> {
    jel_fpath: PathBuf,
    wms: W,
    location: SchedulerLocation,
    monitors: AppendOnlyList<TaskforceMonitor>,
    cluster_infos: BTreeMap<ClusterId, ClusterInfo>,
    jel_timer: IntervalTimer,
    update_timer: IntervalTimer,
    logging_timer: IntervalTimer,
}

impl<W: WmsClient> JelWatcher<W> {
    pub fn new(
        jel_fpath: PathBuf,
        wms: W,
        monitors: AppendOnlyList<TaskforceMonitor>,
        opts: &WatcherOptions,
    ) -> Self {
        let mut logging_timer = IntervalTimer::new(opts.max_logging_interval);
        // first pass logs at INFO
        logging_timer.fast_forward();
        Self {
            jel_fpath,
            wms,
            location: opts.location.clone(),
            monitors,
            cluster_infos: BTreeMap::new(),
            jel_timer: IntervalTimer::new(opts.watcher_interval),
            update_timer: IntervalTimer::new(opts.update_interval),
            logging_timer,
        }
    }

    /// Watch until the JEL is deleted (normal end) or the WMS errors.
    pub async fn run(mut self) -> Result<(), WatcherError> {
        tracing::info!(jel = %self.jel_fpath.display(), "this watcher will read the jel");

        // preload taskforces already attributed to this jel, so the first
        // events need no per-cluster lookup
        self.query_for_taskforces(None).await?;

        let mut reader = JelReader::new(&self.jel_fpath);

        loop {
            // wait for the jel to populate more
            self.jel_timer.wait_until_interval().await;

            match self.read_and_update(&mut reader).await {
                Ok(()) => {
                    self.flush().await?;
                    self.log_summary();
                }
                Err(WatchEnd::JelDeleted) => {
                    // best-effort final flush; the WMS converges via the
                    // next poll either way
                    if let Err(e) = self.flush().await {
                        tracing::warn!(
                            jel = %self.jel_fpath.display(),
                            error = %e,
                            "final flush failed"
                        );
                    }
                    tracing::info!(jel = %self.jel_fpath.display(), "jel deleted, watcher retiring");
                    return Ok(());
                }
                Err(WatchEnd::Failed(e)) => return Err(e),
            }
        }
    }

    /// Drain available events and apply them, flushing mid-drain on the
    /// update cadence.
    async fn read_and_update(&mut self, reader: &mut JelReader) -> Result<(), WatchEnd> {
        tracing::debug!(jel = %self.jel_fpath.display(), "reading events");
        let events = match reader.drain() {
            Ok(events) => events,
            Err(JelReadError::Deleted(_)) => return Err(WatchEnd::JelDeleted),
            Err(JelReadError::Io(e)) => {
                // survivable; whatever was unread stays for the next pass
                tracing::warn!(jel = %self.jel_fpath.display(), error = %e, "i/o error reading jel");
                return Ok(());
            }
        };

        for event in events {
            // the scheduler library is synchronous; yield between events so
            // a long batch cannot starve the other tasks
            tokio::task::yield_now().await;

            if !reader.exists() {
                return Err(WatchEnd::JelDeleted);
            }

            self.apply_event(&event).await?;

            if self.update_timer.has_interval_elapsed() {
                self.flush().await.map_err(WatchEnd::Failed)?;
            }
        }
        Ok(())
    }

    async fn apply_event(&mut self, event: &JobEvent) -> Result<(), WatchEnd> {
        // clusters late to start may not be known yet
        if !self.cluster_infos.contains_key(&event.cluster_id) {
            self.query_for_taskforces(Some(event.cluster_id))
                .await
                .map_err(WatchEnd::Failed)?;
        }
        let outcome = match self.cluster_infos.get_mut(&event.cluster_id) {
            Some(info) => info.update_from_event(event),
            None => {
                tracing::warn!(
                    cluster_id = %event.cluster_id,
                    "cluster found in jel does not match any known taskforce, skipping it"
                );
                return Ok(());
            }
        };

        match outcome {
            EventOutcome::Updated => {}
            EventOutcome::NoUpdate => {
                // nothing important happened; too common to log loudly
                tracing::trace!(cluster_id = %event.cluster_id, event = ?event.event_type, "no update");
            }
            EventOutcome::ClusterRemoved { timestamp } => {
                let uuid = self
                    .cluster_infos
                    .get(&event.cluster_id)
                    .map(|info| info.taskforce_uuid().clone());
                if let Some(uuid) = uuid {
                    self.send_condor_complete(&uuid, timestamp)
                        .await
                        .map_err(WatchEnd::Failed)?;
                }
            }
        }
        Ok(())
    }

    /// Query the WMS for taskforces attributed to this JEL and track any
    /// new ones. With a cluster id, the query narrows to that cluster.
    async fn query_for_taskforces(
        &mut self,
        cluster_id: Option<ClusterId>,
    ) -> Result<(), WatcherError> {
        let mut query = serde_json::json!({
            "collector": self.location.collector,
            "schedd": self.location.schedd,
            "job_event_log_fpath": self.jel_fpath.display().to_string(),
        });
        if let Some(cluster_id) = cluster_id {
            query["cluster_id"] = serde_json::json!(cluster_id);
        }

        let rows = self
            .wms
            .query_taskforces(&TaskforceQuery {
                query,
                projection: vec!["taskforce_uuid".to_string(), "cluster_id".to_string()],
            })
            .await?;

        for row in rows {
            let Some(cluster_id) = row.cluster_id else {
                continue;
            };
            if self.cluster_infos.contains_key(&cluster_id) {
                continue;
            }
            tracing::info!(
                taskforce_uuid = %row.taskforce_uuid,
                %cluster_id,
                "tracking new taskforce"
            );
            let monitor = self
                .monitors
                .push(TaskforceMonitor::new(row.taskforce_uuid, cluster_id));
            self.cluster_infos
                .insert(cluster_id, ClusterInfo::new(monitor));
        }
        Ok(())
    }

    /// Tell the WMS this taskforce is condor-complete.
    async fn send_condor_complete(
        &self,
        uuid: &TaskforceUuid,
        timestamp: i64,
    ) -> Result<(), WatcherError> {
        tracing::info!(taskforce_uuid = %uuid, timestamp, "cluster removed, sending condor-complete");
        self.wms.condor_complete(uuid, timestamp).await?;
        Ok(())
    }

    /// Send one batched update of everything that changed. Never split
    /// across requests; suppressed entirely when nothing changed.
    async fn flush(&mut self) -> Result<(), WatcherError> {
        let mut body = StatusesBody::default();
        for info in self.cluster_infos.values() {
            if let Some(errors) = info.changed_top_task_errors() {
                body.top_task_errors_by_taskforce
                    .insert(info.taskforce_uuid().clone(), errors);
            }
            if let Some(statuses) = info.changed_compound_statuses() {
                body.compound_statuses_by_taskforce
                    .insert(info.taskforce_uuid().clone(), statuses);
            }
        }

        if body.is_empty() {
            tracing::debug!(jel = %self.jel_fpath.display(), "no updates needed for the wms");
            return Ok(());
        }

        tracing::info!(
            jel = %self.jel_fpath.display(),
            statuses = body.compound_statuses_by_taskforce.len(),
            errors = body.top_task_errors_by_taskforce.len(),
            "sending updates to the wms"
        );
        self.wms.post_statuses(&body).await?;
        tracing::info!("updates sent");
        Ok(())
    }

    /// Per-drain summary; promoted to INFO on the verbose cadence so the
    /// log shows life at least that often.
    fn log_summary(&mut self) {
        let clusters = self.cluster_infos.len();
        let seen: usize = self
            .cluster_infos
            .values()
            .filter(|c| c.seen_in_jel())
            .count();
        if self.logging_timer.has_interval_elapsed() {
            tracing::info!(jel = %self.jel_fpath.display(), clusters, seen, "done reading events for now");
        } else {
            tracing::debug!(jel = %self.jel_fpath.display(), clusters, seen, "done reading events for now");
        }
    }
}

/// Why a watch pass ended.
#[derive(Debug)]
enum WatchEnd {
    JelDeleted,
    Failed(WatcherError),
}

#[cfg(test)]
#[path = "jel_watcher_tests.rs"]
mod tests;
