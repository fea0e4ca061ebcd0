// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The scalar loop: realize WMS start/stop directives against the scheduler.
//!
//! The loop carries no state between iterations. Every successful scheduler
//! action is confirmed to the WMS before the next poll; if a confirmation is
//! lost the WMS re-offers the directive.

mod starter;
mod stopper;

pub use starter::{start, StartError};
pub use stopper::stop;

use std::collections::BTreeMap;

use thiserror::Error;
use tms_condor::Scheduler;
use tms_core::{EnvVal, IntervalTimer, SizeParseError};
use tms_wms::{PendingStarter, WmsClient, WmsError};

use crate::options::ScalarOptions;

/// Errors that end the scalar loop (and with it, the process).
#[derive(Debug, Error)]
pub enum ScalarError {
    #[error(transparent)]
    Wms(#[from] WmsError),
    #[error("bad directive: {0}")]
    BadDirective(#[from] SizeParseError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Listen to the WMS and start and/or stop designated taskforces.
pub async fn scalar_loop<W: WmsClient, S: Scheduler>(
    wms: W,
    scheduler: S,
    opts: ScalarOptions,
) -> Result<(), ScalarError> {
    tracing::info!(
        collector = %opts.location.collector,
        schedd = %opts.location.schedd,
        "starting scalar"
    );

    let mut interval_timer = IntervalTimer::new(opts.outer_loop_wait);

    loop {
        run_starts(&wms, &scheduler, &opts).await?;
        run_stops(&wms, &scheduler, &opts).await?;

        // throttle, measured from the start of the start phase
        interval_timer.wait_until_interval().await;
    }
}

async fn run_starts<W: WmsClient, S: Scheduler>(
    wms: &W,
    scheduler: &S,
    opts: &ScalarOptions,
) -> Result<(), ScalarError> {
    tracing::debug!("activating starter...");
    while let Some(pending) = wms
        .pending_starter(&opts.location.collector, &opts.location.schedd)
        .await?
    {
        let uuid = pending.taskforce.taskforce_uuid.clone();
        let environment = pilot_environment(&pending);

        match start(wms, scheduler, opts, &pending.taskforce, environment).await {
            Ok(confirmation) => {
                // confirm, otherwise the WMS will offer this one again
                wms.confirm_condor_submit(&uuid, &confirmation).await?;
                tracing::info!(taskforce_uuid = %uuid, "confirmed taskforce start");
            }
            Err(StartError::NotToBeStarted(uuid)) => {
                tracing::info!(taskforce_uuid = %uuid, "taskforce no longer pending start, skipping");
            }
            Err(StartError::HaltedByDryRun) => {
                tracing::warn!("dry run enabled, not submitting");
                break;
            }
            Err(StartError::Scheduler(e)) => {
                tracing::error!(taskforce_uuid = %uuid, error = %e, "scheduler failed to start taskforce");
                wms.condor_submit_failed(&uuid, &e.to_string()).await?;
                tokio::time::sleep(opts.error_wait).await;
            }
            Err(StartError::Wms(e)) => return Err(e.into()),
            Err(StartError::Size(e)) => return Err(e.into()),
            Err(StartError::Io(e)) => return Err(e.into()),
        }
    }
    tracing::debug!("de-activated starter");
    Ok(())
}

async fn run_stops<W: WmsClient, S: Scheduler>(
    wms: &W,
    scheduler: &S,
    opts: &ScalarOptions,
) -> Result<(), ScalarError> {
    tracing::debug!("activating stopper...");
    while let Some(pending) = wms
        .pending_stopper(&opts.location.collector, &opts.location.schedd)
        .await?
    {
        match stop(scheduler, &opts.location, pending.cluster_id).await {
            Ok(_) => {
                // confirm, otherwise the WMS will request this one again
                wms.confirm_condor_rm(&pending.taskforce_uuid).await?;
                tracing::info!(taskforce_uuid = %pending.taskforce_uuid, "confirmed taskforce stop");
            }
            Err(e) => {
                tracing::error!(
                    taskforce_uuid = %pending.taskforce_uuid,
                    error = %e,
                    "scheduler failed to stop taskforce"
                );
                wms.condor_rm_failed(&pending.taskforce_uuid).await?;
                tokio::time::sleep(opts.error_wait).await;
            }
        }
    }
    tracing::debug!("de-activated stopper");
    Ok(())
}

/// Assemble the pilot environment for one directive: transport descriptors
/// and task-directive values first, directive-supplied env winning on
/// collision.
pub fn pilot_environment(pending: &PendingStarter) -> BTreeMap<String, EnvVal> {
    let mut env: BTreeMap<String, EnvVal> = BTreeMap::new();

    let directive = &pending.task_directive;
    env.insert(
        "EWMS_PILOT_TASK_IMAGE".to_string(),
        EnvVal::Text(directive.task_image.clone()),
    );
    env.insert(
        "EWMS_PILOT_TASK_ARGS".to_string(),
        EnvVal::Text(directive.task_args.clone()),
    );
    env.insert(
        "EWMS_PILOT_TASK_ENV_JSON".to_string(),
        EnvVal::Text(serde_json::to_string(&directive.task_env).unwrap_or_else(|_| "{}".into())),
    );

    for (direction, queue_ids) in [
        ("INCOMING", &directive.input_queues),
        ("OUTGOING", &directive.output_queues),
    ] {
        let profiles: Vec<_> = queue_ids
            .iter()
            .filter_map(|qid| pending.mqprofiles.iter().find(|p| &p.mqid == qid))
            .collect();
        let field = |f: fn(&tms_wms::MqProfile) -> String| {
            EnvVal::List(profiles.iter().map(|p| f(p)).collect::<Vec<_>>())
        };
        env.insert(
            format!("EWMS_PILOT_QUEUE_{direction}"),
            field(|p| p.mqid.clone()),
        );
        env.insert(
            format!("EWMS_PILOT_QUEUE_{direction}_AUTH_TOKEN"),
            field(|p| p.auth_token.clone()),
        );
        env.insert(
            format!("EWMS_PILOT_QUEUE_{direction}_BROKER_TYPE"),
            field(|p| p.broker_type.clone()),
        );
        env.insert(
            format!("EWMS_PILOT_QUEUE_{direction}_BROKER_ADDRESS"),
            field(|p| p.broker_address.clone()),
        );
    }

    // directive-supplied env vars override anything derived here
    for (key, value) in &pending.taskforce.pilot_config.environment {
        env.insert(key.clone(), value.clone());
    }

    env
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
