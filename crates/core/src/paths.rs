// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Path conventions under the job-event-log directory.
//!
//! One configured directory holds everything TMS writes: the per-day JEL
//! files the scheduler appends to, and one directory per taskforce for the
//! envfile and any returned worker stdout/stderr.

use std::path::{Path, PathBuf};

use crate::id::TaskforceUuid;

/// Naming and discovery of job event log files.
#[derive(Debug, Clone)]
pub struct JelPaths {
    dir: PathBuf,
}

impl JelPaths {
    /// Filename suffix marking a JEL as ours.
    pub const SUFFIX: &'static str = ".tms.jel";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Today's JEL path (`{dir}/{YYYY-MM-DD}.tms.jel`), creating parents.
    pub fn create_today(&self) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let stem = chrono::Local::now().format("%Y-%m-%d");
        Ok(self.dir.join(format!("{}{}", stem, Self::SUFFIX)))
    }

    /// Whether a path is a live JEL of ours: right parent, right suffix,
    /// and a regular file on disk.
    pub fn is_valid(&self, fpath: &Path) -> bool {
        fpath.parent() == Some(self.dir.as_path())
            && fpath
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(Self::SUFFIX))
            && fpath.is_file()
    }

    /// Glob pattern matching all JEL files in the directory.
    pub fn glob_pattern(&self) -> String {
        format!("{}/*{}", self.dir.display(), Self::SUFFIX)
    }
}

/// Naming and creation of per-taskforce directories.
#[derive(Debug, Clone)]
pub struct TaskforceDirs {
    dir: PathBuf,
}

impl TaskforceDirs {
    /// Directory-name prefix for taskforce dirs.
    pub const PREFIX: &'static str = "ewms-taskforce-";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The taskforce's directory path (not created).
    pub fn path(&self, uuid: &TaskforceUuid) -> PathBuf {
        self.dir.join(format!("{}{}", Self::PREFIX, uuid))
    }

    /// Assemble and mkdir the taskforce's directory.
    pub fn create(&self, uuid: &TaskforceUuid) -> std::io::Result<PathBuf> {
        let path = self.path(uuid);
        std::fs::create_dir_all(&path)?;
        Ok(path)
    }

    /// Glob pattern matching all taskforce directories.
    pub fn glob_pattern(&self) -> String {
        format!("{}/{}*", self.dir.display(), Self::PREFIX)
    }

    /// Glob pattern matching archived taskforce directories.
    pub fn tarball_glob_pattern(&self) -> String {
        format!("{}/{}*.tar.gz", self.dir.display(), Self::PREFIX)
    }
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
