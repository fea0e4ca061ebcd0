// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-loop runtime options, assembled by the daemon from its config.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// The `(collector, schedd)` pair identifying this agent's scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerLocation {
    pub collector: String,
    pub schedd: String,
}

/// Options for the scalar loop and its starter/stopper.
#[derive(Debug, Clone)]
pub struct ScalarOptions {
    pub location: SchedulerLocation,
    /// Parent directory for JELs and taskforce dirs.
    pub jel_dir: PathBuf,
    /// Filesystem prefix the pilot image tag is appended to.
    pub cvmfs_pilot_path: String,
    /// Operator-provided pilot env additions (`EWMS_PILOT_*` only are used).
    pub pilot_env_additions: BTreeMap<String, String>,
    pub dryrun: bool,
    pub outer_loop_wait: Duration,
    /// Pause after a scheduler-side failure before polling again.
    pub error_wait: Duration,
}

/// Options for the watcher supervisor and its per-JEL watchers.
#[derive(Debug, Clone)]
pub struct WatcherOptions {
    pub location: SchedulerLocation,
    pub jel_dir: PathBuf,
    /// Cadence of the supervisor's directory scan.
    pub outer_loop_wait: Duration,
    /// Cadence of each watcher's JEL poll.
    pub watcher_interval: Duration,
    /// Bound on mid-drain flushes to the WMS.
    pub update_interval: Duration,
    /// Something is logged at INFO at least this often per watcher.
    pub max_logging_interval: Duration,
}

/// Options for the file-manager sweeps.
#[derive(Debug, Clone)]
pub struct FileManagerOptions {
    pub location: SchedulerLocation,
    pub jel_dir: PathBuf,
    pub interval: Duration,
    /// JELs untouched this long (and unused per the WMS) are deleted.
    pub jel_modification_expiry: Duration,
    /// Taskforce dirs this old are archived.
    pub taskforce_dirs_expiry: Duration,
    /// Archived taskforce tarballs this old are deleted.
    pub taskforce_dirs_tar_expiry: Duration,
}
