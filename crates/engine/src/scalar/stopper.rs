// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request removal of one cluster's workers.

use tms_condor::{RemoveOutcome, Scheduler, SchedulerError};
use tms_core::ClusterId;

use crate::options::SchedulerLocation;

/// Removal reason recorded with the scheduler.
const REMOVE_REASON: &str = "Requested by EWMS";

/// Remove every worker of a cluster. Removing an unknown cluster completes
/// without effect.
pub async fn stop<S: Scheduler>(
    scheduler: &S,
    location: &SchedulerLocation,
    cluster_id: ClusterId,
) -> Result<RemoveOutcome, SchedulerError> {
    tracing::info!(
        %cluster_id,
        collector = %location.collector,
        schedd = %location.schedd,
        "stopping taskforce workers"
    );

    // removal may not be instantaneous
    let outcome = scheduler.remove(cluster_id, REMOVE_REASON).await?;

    match outcome.affected {
        Some(n) => tracing::info!(%cluster_id, workers = n, "removed workers"),
        None => tracing::info!(%cluster_id, "removal requested"),
    }
    Ok(outcome)
}

#[cfg(test)]
#[path = "stopper_tests.rs"]
mod tests;
