// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The watcher: one supervisor loop, one long-lived task per job event log.

mod cluster_info;
mod jel_watcher;

pub use cluster_info::{ClusterInfo, EventOutcome};
pub use jel_watcher::JelWatcher;

use std::collections::HashSet;
use std::path::PathBuf;

use thiserror::Error;
use tms_core::{AppendOnlyList, JelPaths, TaskforceMonitor};
use tms_wms::{WmsClient, WmsError};
use tokio::task::JoinSet;

use crate::options::WatcherOptions;

/// Errors that end a watcher task (or the supervisor itself).
#[derive(Debug, Error)]
pub enum WatcherError {
    #[error(transparent)]
    Wms(#[from] WmsError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Watch over all JEL files, spawning one watcher task per file.
///
/// A finished task (normal end or error) frees its path for re-watching,
/// so a re-created file, or a watcher killed by a WMS hiccup, is picked up
/// on a later scan while the file exists. Child tasks are aborted when the
/// supervisor itself is cancelled.
pub async fn watcher_loop<W: WmsClient>(
    wms: W,
    monitors: AppendOnlyList<TaskforceMonitor>,
    opts: WatcherOptions,
) -> Result<(), WatcherError> {
    tracing::info!(jel_dir = %opts.jel_dir.display(), "watcher loop activated");

    let jel_paths = JelPaths::new(&opts.jel_dir);
    let mut in_progress: HashSet<PathBuf> = HashSet::new();
    let mut watchers: JoinSet<(PathBuf, Result<(), WatcherError>)> = JoinSet::new();

    loop {
        reap_finished(&mut watchers, &mut in_progress);

        tracing::debug!(jel_dir = %opts.jel_dir.display(), "analyzing jel directory for new logs");
        for entry in std::fs::read_dir(&opts.jel_dir)? {
            let fpath = entry?.path();
            if !jel_paths.is_valid(&fpath) {
                continue;
            }
            if !in_progress.insert(fpath.clone()) {
                continue;
            }

            tracing::info!(jel = %fpath.display(), "creating new jel watcher");
            let watcher = JelWatcher::new(fpath.clone(), wms.clone(), monitors.clone(), &opts);
            watchers.spawn(async move { (fpath, watcher.run().await) });
        }

        tokio::time::sleep(opts.outer_loop_wait).await;
    }
}

/// Collect finished watcher tasks and free their paths.
fn reap_finished(
    watchers: &mut JoinSet<(PathBuf, Result<(), WatcherError>)>,
    in_progress: &mut HashSet<PathBuf>,
) {
    while let Some(joined) = watchers.try_join_next() {
        match joined {
            Ok((fpath, Ok(()))) => {
                tracing::info!(jel = %fpath.display(), "jel watcher finished");
                in_progress.remove(&fpath);
            }
            Ok((fpath, Err(e))) => {
                tracing::error!(jel = %fpath.display(), error = %e, "jel watcher failed");
                in_progress.remove(&fpath);
            }
            Err(e) => {
                // the path association is lost with the task; its file stays
                // reserved until the process restarts
                tracing::error!(error = %e, "jel watcher panicked");
            }
        }
    }
}
