// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler adapter backed by the scheduler's command-line tools.
//!
//! TMS runs on the access point, so no remote auth is needed; the tools
//! find the local schedd themselves. The submit description is piped over
//! stdin, and `-terse` output gives back the assigned cluster and proc range.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tms_core::ClusterId;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::scheduler::{RemoveOutcome, Scheduler, SchedulerError, SubmitOutcome};
use crate::submit::SubmitDescription;

/// Timeout for scheduler command-line tools.
const SCHEDD_TIMEOUT: Duration = Duration::from_secs(120);

/// Scheduler adapter invoking `condor_submit` / `condor_rm`.
#[derive(Debug, Clone, Default)]
pub struct CondorSchedd;

impl CondorSchedd {
    pub fn new() -> Self {
        Self
    }
}

async fn run_with_timeout(
    mut cmd: Command,
    stdin_payload: Option<String>,
    command_name: &str,
) -> Result<std::process::Output, SchedulerError> {
    cmd.stdin(if stdin_payload.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    });
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|source| SchedulerError::Spawn {
        command: command_name.to_string(),
        source,
    })?;

    if let Some(payload) = stdin_payload {
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(payload.as_bytes())
                .await
                .map_err(|source| SchedulerError::Spawn {
                    command: command_name.to_string(),
                    source,
                })?;
            // close stdin so the tool sees EOF
            drop(stdin);
        }
    }

    match tokio::time::timeout(SCHEDD_TIMEOUT, child.wait_with_output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(source)) => Err(SchedulerError::Spawn {
            command: command_name.to_string(),
            source,
        }),
        Err(_elapsed) => Err(SchedulerError::Internal(format!(
            "{} timed out after {}s",
            command_name,
            SCHEDD_TIMEOUT.as_secs()
        ))),
    }
}

/// Parse `condor_submit -terse` output: `<cluster>.<first> - <cluster>.<last>`.
fn parse_terse_submit(stdout: &str) -> Result<SubmitOutcome, SchedulerError> {
    let line = stdout
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or_else(|| SchedulerError::ParseOutput("empty submit output".to_string()))?;

    let parse_job_id = |token: &str| -> Option<(u64, u64)> {
        let (cluster, proc) = token.split_once('.')?;
        Some((cluster.parse().ok()?, proc.parse().ok()?))
    };

    let (first_token, last_token) = line
        .split_once(" - ")
        .ok_or_else(|| SchedulerError::ParseOutput(format!("unexpected terse output: {line}")))?;
    let ((cluster, first), (cluster2, last)) = parse_job_id(first_token.trim())
        .zip(parse_job_id(last_token.trim()))
        .ok_or_else(|| SchedulerError::ParseOutput(format!("unexpected terse output: {line}")))?;

    if cluster != cluster2 || last < first {
        return Err(SchedulerError::ParseOutput(format!(
            "inconsistent terse output: {line}"
        )));
    }

    Ok(SubmitOutcome {
        cluster_id: ClusterId::new(cluster),
        num_procs: last - first + 1,
    })
}

#[async_trait]
impl Scheduler for CondorSchedd {
    async fn submit(
        &self,
        description: &SubmitDescription,
        count: u64,
    ) -> Result<SubmitOutcome, SchedulerError> {
        let payload = description.to_submit_file(count);
        tracing::info!(n_workers = count, "submitting request to condor");
        tracing::debug!(submit_file = %payload, "submit description");

        let mut cmd = Command::new("condor_submit");
        cmd.arg("-terse").arg("-");

        let output = run_with_timeout(cmd, Some(payload), "condor_submit").await?;
        if !output.status.success() {
            return Err(SchedulerError::Internal(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let outcome = parse_terse_submit(&String::from_utf8_lossy(&output.stdout))?;
        tracing::info!(
            cluster_id = %outcome.cluster_id,
            num_procs = outcome.num_procs,
            "submitted request to condor"
        );
        Ok(outcome)
    }

    async fn remove(
        &self,
        cluster_id: ClusterId,
        reason: &str,
    ) -> Result<RemoveOutcome, SchedulerError> {
        let mut cmd = Command::new("condor_rm");
        cmd.arg("-constraint")
            .arg(format!("ClusterId == {cluster_id}"))
            .arg("-reason")
            .arg(reason);

        let output = run_with_timeout(cmd, None, "condor_rm").await?;
        if !output.status.success() {
            return Err(SchedulerError::Internal(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        tracing::debug!(
            %cluster_id,
            stdout = %String::from_utf8_lossy(&output.stdout).trim(),
            "condor_rm finished"
        );
        // the CLI acknowledges the constraint but reports no count
        Ok(RemoveOutcome { affected: None })
    }
}

#[cfg(test)]
#[path = "schedd_tests.rs"]
mod tests;
