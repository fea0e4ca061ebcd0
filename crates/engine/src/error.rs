// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Top-level error type the daemon supervises on.

use thiserror::Error;

use crate::file_manager::FileManagerError;
use crate::scalar::ScalarError;
use crate::watcher::WatcherError;

/// Failure of one of the three core loops. Any of these ends the process;
/// operators restart it.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("scalar loop failed: {0}")]
    Scalar(#[from] ScalarError),
    #[error("watcher loop failed: {0}")]
    Watcher(#[from] WatcherError),
    #[error("file manager failed: {0}")]
    FileManager(#[from] FileManagerError),
}
