// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File-age policy for the file-manager sweeps.

use std::path::Path;
use std::time::{Duration, SystemTime};

/// Is the file/dir older than the threshold?
///
/// For a directory, every *file* descendant must be old AND the directory's
/// own mtime must be old: a dir's mtime updates when its entries change
/// (create/rm/mv), not when descendant contents change, so both checks are
/// needed. An empty directory falls back to its own mtime. Paths vanishing
/// mid-traversal are skipped.
pub fn is_old_enough(fpath: &Path, threshold: Duration) -> bool {
    let Some(cutoff) = SystemTime::now().checked_sub(threshold) else {
        return false;
    };
    let Ok(meta) = std::fs::metadata(fpath) else {
        return false;
    };

    if meta.is_dir() {
        if has_fresh_file_descendant(fpath, cutoff) {
            return false;
        }
        is_mtime_old(&meta, cutoff)
    } else {
        is_mtime_old(&meta, cutoff)
    }
}

fn is_mtime_old(meta: &std::fs::Metadata, cutoff: SystemTime) -> bool {
    match meta.modified() {
        Ok(mtime) => mtime <= cutoff,
        Err(_) => false,
    }
}

/// Short-circuit walk: true as soon as any file newer than the cutoff shows up.
fn has_fresh_file_descendant(dir: &Path, cutoff: SystemTime) -> bool {
    let Ok(entries) = std::fs::read_dir(dir) else {
        // dir vanished under us
        return false;
    };
    for entry in entries.flatten() {
        let Ok(meta) = entry.metadata() else {
            continue;
        };
        if meta.is_dir() {
            if has_fresh_file_descendant(&entry.path(), cutoff) {
                return true;
            }
        } else if meta.is_file() && !is_mtime_old(&meta, cutoff) {
            return true;
        }
    }
    false
}

#[cfg(test)]
#[path = "age_tests.rs"]
mod tests;
