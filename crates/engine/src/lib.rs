// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tms-engine: The three long-lived loops of the Taskforce Management
//! Service.
//!
//! - `scalar` pulls pending start/stop directives from the WMS and realizes
//!   them against the scheduler.
//! - `watcher` tails job event logs and pushes change-only status snapshots
//!   back to the WMS.
//! - `file_manager` sweeps aged artifacts out of the working directory.
//!
//! The loops never call each other; everything they share travels through
//! the WMS, the filesystem, or the append-only monitor list.

pub mod error;
pub mod file_manager;
pub mod options;
pub mod scalar;
pub mod watcher;

pub use error::EngineError;
pub use file_manager::{file_manager_loop, FileManagerError};
pub use options::{FileManagerOptions, ScalarOptions, SchedulerLocation, WatcherOptions};
pub use scalar::{scalar_loop, ScalarError, StartError};
pub use watcher::{watcher_loop, WatcherError};
