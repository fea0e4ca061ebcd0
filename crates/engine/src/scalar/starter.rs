// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Translate one pending-start directive into a scheduler submission.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tms_condor::{Scheduler, SchedulerError, SubmitDescription};
use tms_core::{
    format_bytes, render_envfile, EnvVal, JelPaths, Phase, SizeParseError, TaskforceDirs,
    TaskforceUuid, ENVFILE_NAME,
};
use tms_wms::{SubmitConfirmation, Taskforce, WmsClient, WmsError};

use crate::options::ScalarOptions;

/// Base scheduler requirements every worker carries.
const BASE_REQUIREMENTS: &[&str] = &[
    // singularity support -- note: sub-2 meets this req by default
    "ifthenelse(!isUndefined(HAS_SINGULARITY), HAS_SINGULARITY, HasSingularity)",
    //
    // cvmfs support -- note: sub-2 meets this req by default
    "HAS_CVMFS_icecube_opensciencegrid_org",
    //
    // support apptainer-in-apptainer
    "(OSG_OS_VERSION =?= \"8\" || OSG_OS_VERSION =?= \"9\")",
];

/// Sites excluded for lacking working apptainer support.
const EXCLUDED_SITES: &[&str] = &[
    "San Diego Supercomputer Center",
    "SDSC-PRP",
    "Kansas State University",
    "AMNH",
    "NotreDame",
    "Rhodes-HPC",
];

/// The default requirements expression: base clauses plus site exclusions.
pub fn default_condor_requirements() -> String {
    let mut clauses: Vec<String> = BASE_REQUIREMENTS.iter().map(|s| s.to_string()).collect();
    clauses.extend(
        EXCLUDED_SITES
            .iter()
            // '=!=' -> 'not equal or undefined'
            .map(|site| format!("GLIDEIN_Site =!= \"{site}\"")),
    );
    clauses.join(" && ")
}

#[derive(Debug, Error)]
pub enum StartError {
    /// Dry run configured; not an error, the caller stops this directive.
    #[error("halted by dry run")]
    HaltedByDryRun,
    /// The WMS moved on; not an error, the caller skips silently.
    #[error("taskforce is no longer pending-starter: {0}")]
    NotToBeStarted(TaskforceUuid),
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
    #[error(transparent)]
    Wms(#[from] WmsError),
    #[error("bad worker size: {0}")]
    Size(#[from] SizeParseError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Start a taskforce's workers on the scheduler.
///
/// Returns the attrs to confirm back to the WMS.
pub async fn start<W: WmsClient, S: Scheduler>(
    wms: &W,
    scheduler: &S,
    opts: &ScalarOptions,
    taskforce: &Taskforce,
    mut environment: BTreeMap<String, EnvVal>,
) -> Result<SubmitConfirmation, StartError> {
    let uuid = &taskforce.taskforce_uuid;
    tracing::info!(
        taskforce_uuid = %uuid,
        n_workers = taskforce.n_workers,
        collector = %opts.location.collector,
        schedd = %opts.location.schedd,
        "starting taskforce workers"
    );

    apply_env_defaults(&mut environment, &opts.pilot_env_additions);

    let taskforce_dir = TaskforceDirs::new(&opts.jel_dir).create(uuid)?;
    let envfile = write_envfile(&taskforce_dir, &environment)?;

    let mut input_files = taskforce.pilot_config.input_files.clone();
    input_files.push(envfile.display().to_string());

    let jel_fpath = JelPaths::new(&opts.jel_dir).create_today()?;
    let (submit, make_output_subdir) =
        make_submit_description(opts, taskforce, &input_files, &taskforce_dir, &jel_fpath)?;

    // final checks
    if opts.dryrun {
        return Err(StartError::HaltedByDryRun);
    }
    if wms.taskforce_phase(uuid).await? != Phase::PendingStarter {
        return Err(StartError::NotToBeStarted(uuid.clone()));
    }

    let outcome = scheduler.submit(&submit, taskforce.n_workers).await?;

    // the concrete output dir, now that the cluster id is known
    if make_output_subdir {
        std::fs::create_dir_all(taskforce_dir.join(format!("cluster-{}", outcome.cluster_id)))?;
    }

    Ok(SubmitConfirmation {
        cluster_id: outcome.cluster_id,
        n_workers: outcome.num_procs,
        submit_dict: submit.to_json(),
        job_event_log_fpath: jel_fpath.display().to_string(),
    })
}

/// Merge in the static chirp defaults and the operator's `EWMS_PILOT_*`
/// additions. Directive values are never overridden.
fn apply_env_defaults(
    environment: &mut BTreeMap<String, EnvVal>,
    operator_additions: &BTreeMap<String, String>,
) {
    let mut defaults: BTreeMap<String, EnvVal> = BTreeMap::from([
        ("EWMS_PILOT_HTCHIRP".to_string(), EnvVal::from("True")),
        (
            "EWMS_PILOT_HTCHIRP_DEST".to_string(),
            EnvVal::from("JOB_EVENT_LOG"),
        ),
    ]);
    for (key, value) in operator_additions {
        // only pilot-facing vars; anything else could have adverse effects
        if key.starts_with("EWMS_PILOT_") {
            defaults.insert(key.clone(), EnvVal::Text(value.clone()));
        }
    }
    for (key, value) in defaults {
        environment.entry(key).or_insert(value);
    }
}

/// Write the envfile into the taskforce dir, executable.
fn write_envfile(
    taskforce_dir: &Path,
    environment: &BTreeMap<String, EnvVal>,
) -> std::io::Result<PathBuf> {
    let envfile = taskforce_dir.join(ENVFILE_NAME);
    std::fs::write(&envfile, render_envfile(environment))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&envfile, std::fs::Permissions::from_mode(0o755))?;
    }
    Ok(envfile)
}

/// Build the submit description. Also returns whether the output subdir
/// must be created after submission.
fn make_submit_description(
    opts: &ScalarOptions,
    taskforce: &Taskforce,
    input_files: &[String],
    taskforce_dir: &Path,
    jel_fpath: &Path,
) -> Result<(SubmitDescription, bool), StartError> {
    let worker = &taskforce.worker_config;
    let pilot = &taskforce.pilot_config;

    let requirements = match worker.condor_requirements.as_deref().map(str::trim) {
        Some(extras) if !extras.is_empty() => {
            format!("{} && {}", default_condor_requirements(), extras)
        }
        _ => default_condor_requirements(),
    };

    let image_prefix = match pilot.image_source {
        // "auto" currently resolves to the cvmfs mount as well
        tms_wms::PilotImageSource::Auto | tms_wms::PilotImageSource::Cvmfs => {
            opts.cvmfs_pilot_path.as_str()
        }
    };

    let mut submit = SubmitDescription::new();
    submit.set("universe", "container");
    submit.set("+should_transfer_container", "no");
    // not quoted -- otherwise the scheduler assumes a relative path
    submit.set("container_image", format!("{}:{}", image_prefix, pilot.tag));
    submit.set("Requirements", requirements);
    submit.set("+FileSystemDomain", "\"blah\""); // must be quoted
    //
    // cluster logs -- shared w/ other clusters
    submit.set("log", jel_fpath.display().to_string());
    //
    submit.set("transfer_input_files", input_files.join(","));
    submit.set("transfer_output_files", "");
    submit.set("should_transfer_files", "YES");
    submit.set("when_to_transfer_output", "ON_EXIT_OR_EVICT");
    //
    submit.set("transfer_executable", "false");
    //
    submit.set("request_cpus", worker.n_cores.to_string());
    // the scheduler uses binary sizes but formats like decimal
    submit.set("request_memory", format_bytes(worker.worker_memory.to_bytes()?));
    submit.set("request_disk", format_bytes(worker.worker_disk.to_bytes()?));
    //
    submit.set("priority", worker.priority);
    submit.set("+WantIOProxy", "true"); // for chirping
    submit.set("+OriginalTime", worker.max_worker_runtime); // execution time limit
    //
    submit.set(
        "+EWMSTaskforceUUID",
        format!("\"{}\"", taskforce.taskforce_uuid), // must be quoted
    );
    submit.set("job_ad_information_attrs", "EWMSTaskforceUUID");

    if worker.do_transfer_worker_stdouterr {
        // where the files land when/if returned here
        submit.set(
            "output",
            taskforce_dir
                .join("cluster-$(ClusterId)/$(ProcId).out")
                .display()
                .to_string(),
        );
        submit.set(
            "error",
            taskforce_dir
                .join("cluster-$(ClusterId)/$(ProcId).err")
                .display()
                .to_string(),
        );
    }

    tracing::debug!(submit = ?submit, "assembled submit description");
    Ok((submit, worker.do_transfer_worker_stdouterr))
}

#[cfg(test)]
#[path = "starter_tests.rs"]
mod tests;
