// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Taskforce Management Service daemon (tmsd)
//!
//! On-cluster agent of the Event-driven Workflow Management System: runs the
//! scalar, watcher, and file-manager loops against one scheduler.
//!
//! Architecture:
//! - Scalar Task: polls the WMS for start/stop directives, acts, confirms
//! - Watcher Task: one child task per job event log, statuses back to WMS
//! - File Manager Task: periodic sweeps of aged artifacts

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod config;
mod logging;

use tms_condor::CondorSchedd;
use tms_core::AppendOnlyList;
use tms_engine::{file_manager_loop, scalar_loop, watcher_loop, EngineError};
use tms_wms::RestWmsClient;
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Handle info flags before any config loading
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("tmsd {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("tmsd {}", env!("CARGO_PKG_VERSION"));
                println!("Taskforce Management Service - on-cluster agent for EWMS workloads");
                println!();
                println!("USAGE:");
                println!("    tmsd");
                println!();
                println!("All configuration is taken from the environment; see the");
                println!("EWMS_* / TMS_* / JOB_EVENT_LOG_* variables in the README.");
                println!();
                println!("OPTIONS:");
                println!("    -h, --help       Print help information");
                println!("    -v, --version    Print version information");
                return Ok(());
            }
            _ => {
                eprintln!("error: unexpected argument '{arg}'");
                eprintln!("Usage: tmsd [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    let config = Config::from_env()?;
    logging::setup_logging(&config);

    info!("TMS activated");

    // everything lives under this directory; make sure it exists up front
    std::fs::create_dir_all(&config.job_event_log_dir)?;

    info!("connecting to EWMS...");
    let wms = RestWmsClient::new(
        &config.ewms_address,
        &config.ewms_token_url,
        &config.ewms_client_id,
        &config.ewms_client_secret,
    )?;
    let scheduler = CondorSchedd::new();
    let monitors = AppendOnlyList::new();

    info!("starting tasks...");
    let mut tasks: JoinSet<Result<(), EngineError>> = JoinSet::new();

    info!("firing off scalar loop...");
    let scalar_wms = wms.clone();
    let scalar_opts = config.scalar_options();
    tasks.spawn(async move {
        scalar_loop(scalar_wms, scheduler, scalar_opts)
            .await
            .map_err(EngineError::from)
    });

    info!("firing off watcher loop...");
    let watcher_wms = wms.clone();
    let watcher_monitors = monitors.clone();
    let watcher_opts = config.watcher_options();
    tasks.spawn(async move {
        watcher_loop(watcher_wms, watcher_monitors, watcher_opts)
            .await
            .map_err(EngineError::from)
    });

    info!("firing off file manager...");
    let fm_opts = config.file_manager_options();
    tasks.spawn(async move {
        file_manager_loop(wms, fm_opts)
            .await
            .map_err(EngineError::from)
    });

    // the loops only return on failure; on the first one, cancel the others
    // and exit non-zero so the outer supervisor restarts the process
    let first = tasks.join_next().await;
    tasks.shutdown().await;

    match first {
        Some(Ok(Err(e))) => {
            error!(error = %e, "core task failed, shutting down");
            Err(e.into())
        }
        Some(Err(join_error)) => {
            error!(error = %join_error, "core task panicked, shutting down");
            Err(join_error.into())
        }
        Some(Ok(Ok(()))) | None => {
            error!("core task ended unexpectedly, shutting down");
            Err("core task ended unexpectedly".into())
        }
    }
}
