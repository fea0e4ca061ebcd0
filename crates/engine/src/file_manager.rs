// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The file manager: sweep aged artifacts out of the JEL directory.
//!
//! Three sweeps, each a glob + age gate (+ optional WMS precheck):
//! retired JELs are deleted, old taskforce dirs are archived, old archives
//! are deleted. A path that fails a gate is simply retried next sweep.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tms_core::{is_old_enough, JelPaths, TaskforceDirs};
use tms_wms::{TaskforceQuery, WmsClient, WmsError};

use crate::options::FileManagerOptions;

/// Pause before the first sweep, so startup I/O settles.
const STARTUP_GRACE: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum FileManagerError {
    #[error(transparent)]
    Wms(#[from] WmsError),
    #[error("bad sweep pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// What to do with a path that passes its gates.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SweepAction {
    /// Delete the file.
    Remove,
    /// Tar+gzip the directory into `dest`, then remove the source.
    TarGz { dest: PathBuf },
}

/// Gate checked before the age gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Precheck {
    None,
    /// The WMS must report no non-completed taskforce still on the JEL.
    JelNoLongerUsed,
}

struct SweepRule {
    pattern: String,
    age_threshold: Duration,
    action: SweepAction,
    precheck: Precheck,
}

fn sweep_rules(opts: &FileManagerOptions) -> Vec<SweepRule> {
    let jel_paths = JelPaths::new(&opts.jel_dir);
    let taskforce_dirs = TaskforceDirs::new(&opts.jel_dir);
    vec![
        // ex: 2025-08-26.tms.jel
        SweepRule {
            pattern: jel_paths.glob_pattern(),
            age_threshold: opts.jel_modification_expiry,
            action: SweepAction::Remove,
            precheck: Precheck::JelNoLongerUsed,
        },
        // ex: ewms-taskforce-TF-685e6219
        SweepRule {
            pattern: taskforce_dirs.glob_pattern(),
            age_threshold: opts.taskforce_dirs_expiry,
            action: SweepAction::TarGz {
                dest: opts.jel_dir.clone(),
            },
            precheck: Precheck::None,
        },
        // ex: ewms-taskforce-TF-685e6219.tar.gz
        SweepRule {
            pattern: taskforce_dirs.tarball_glob_pattern(),
            age_threshold: opts.taskforce_dirs_tar_expiry,
            action: SweepAction::Remove,
            precheck: Precheck::None,
        },
    ]
}

/// Run the file manager loop.
pub async fn file_manager_loop<W: WmsClient>(
    wms: W,
    opts: FileManagerOptions,
) -> Result<(), FileManagerError> {
    tokio::time::sleep(STARTUP_GRACE).await;

    let rules = sweep_rules(&opts);
    loop {
        tracing::info!("inspecting filepaths...");
        for rule in &rules {
            sweep(&wms, &opts, rule).await?;
        }
        tokio::time::sleep(opts.interval).await; // O(hours)
    }
}

async fn sweep<W: WmsClient>(
    wms: &W,
    opts: &FileManagerOptions,
    rule: &SweepRule,
) -> Result<(), FileManagerError> {
    tracing::debug!(pattern = %rule.pattern, "searching filepath pattern");
    for entry in glob::glob(&rule.pattern)? {
        // let the rest of TMS do its scheduled things
        tokio::task::yield_now().await;

        let fpath = match entry {
            Ok(fpath) => fpath,
            Err(e) => {
                tracing::debug!(error = %e, "skipping unreadable path");
                continue;
            }
        };
        if !fpath.exists() {
            continue; // vanished since the glob
        }

        // the dir glob also matches its own tarballs; shape-check per action
        let right_shape = match &rule.action {
            SweepAction::Remove => fpath.is_file(),
            SweepAction::TarGz { .. } => fpath.is_dir(),
        };
        if !right_shape {
            continue;
        }

        if !precheck_passes(wms, opts, rule.precheck, &fpath).await? {
            tracing::warn!(
                fpath = %fpath.display(),
                retry_in_s = opts.interval.as_secs(),
                "precheck failed, will try again later"
            );
            continue;
        }

        if !is_old_enough(&fpath, rule.age_threshold) {
            tracing::info!(
                fpath = %fpath.display(),
                threshold_s = rule.age_threshold.as_secs(),
                "no action, filepath not older than threshold"
            );
            continue;
        }

        match apply_action(&rule.action, &fpath) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // deleted under us mid-action; nothing left to do
                tracing::debug!(fpath = %fpath.display(), "path vanished during action");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

async fn precheck_passes<W: WmsClient>(
    wms: &W,
    opts: &FileManagerOptions,
    precheck: Precheck,
    fpath: &Path,
) -> Result<bool, WmsError> {
    match precheck {
        Precheck::None => Ok(true),
        Precheck::JelNoLongerUsed => is_jel_no_longer_used(wms, opts, fpath).await,
    }
}

/// Whether no non-completed taskforce still uses this JEL.
async fn is_jel_no_longer_used<W: WmsClient>(
    wms: &W,
    opts: &FileManagerOptions,
    fpath: &Path,
) -> Result<bool, WmsError> {
    let rows = wms
        .query_taskforces(&TaskforceQuery {
            query: serde_json::json!({
                "job_event_log_fpath": fpath.display().to_string(),
                "collector": opts.location.collector,
                "schedd": opts.location.schedd,
                "phase": {"$ne": "condor-complete"},  // only non-completed tfs
            }),
            projection: vec!["taskforce_uuid".to_string()],
        })
        .await?;

    if rows.is_empty() {
        tracing::warn!(jel = %fpath.display(), "no non-completed taskforces are using jel, can delete");
        Ok(true)
    } else {
        tracing::debug!(jel = %fpath.display(), "non-completed taskforces still use jel, keeping");
        Ok(false)
    }
}

fn apply_action(action: &SweepAction, fpath: &Path) -> std::io::Result<()> {
    match action {
        SweepAction::Remove => {
            std::fs::remove_file(fpath)?;
            tracing::info!(fpath = %fpath.display(), "done: rm");
            Ok(())
        }
        SweepAction::TarGz { dest } => {
            let tarball = tar_gz(fpath, dest)?;
            tracing::info!(
                fpath = %fpath.display(),
                tarball = %tarball.display(),
                "done: tar.gz + rm"
            );
            Ok(())
        }
    }
}

/// Tar+gzip a directory (top-level name preserved) and remove the source.
fn tar_gz(src: &Path, dest_dir: &Path) -> std::io::Result<PathBuf> {
    let name = src
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| std::io::Error::other(format!("unnameable path: {}", src.display())))?;
    if !src.is_dir() {
        return Err(std::io::Error::other(format!(
            "not a directory: {}",
            src.display()
        )));
    }

    std::fs::create_dir_all(dest_dir)?;
    let tarball = dest_dir.join(format!("{name}.tar.gz"));

    let file = std::fs::File::create(&tarball)?;
    let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder.append_dir_all(name, src)?;
    builder.into_inner()?.finish()?;

    std::fs::remove_dir_all(src)?;
    Ok(tarball)
}

#[cfg(test)]
#[path = "file_manager_tests.rs"]
mod tests;
