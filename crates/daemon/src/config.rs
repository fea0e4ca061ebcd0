// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment configuration for the daemon.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tms_engine::{FileManagerOptions, ScalarOptions, SchedulerLocation, WatcherOptions};

/// Default pilot image location on cvmfs.
const DEFAULT_CVMFS_PILOT_PATH: &str =
    "/cvmfs/icecube.opensciencegrid.org/containers/ewms/observation-management-service/ewms-pilot";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable not set: {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Everything TMS reads from its environment.
#[derive(Debug, Clone)]
pub struct Config {
    // required
    pub ewms_address: String,
    pub ewms_token_url: String,
    pub ewms_client_id: String,
    pub ewms_client_secret: String,
    pub job_event_log_dir: PathBuf,

    // this agent's scheduler
    pub collector: String,
    pub schedd: String,

    // cadences
    pub outer_loop_wait: Duration,
    pub watcher_interval: Duration,
    pub file_manager_interval: Duration,
    pub max_logging_interval: Duration,
    pub error_wait: Duration,

    // expiries
    pub jel_modification_expiry: Duration,
    pub taskforce_dirs_expiry: Duration,
    pub taskforce_dirs_tar_expiry: Duration,

    // pilot
    pub cvmfs_pilot_path: String,
    pub pilot_env_additions: BTreeMap<String, String>,

    pub dryrun: bool,

    // logging levels
    pub log_level: String,
    pub log_level_third_party: String,
    pub log_level_rest_tools: String,
}

impl Config {
    /// Read the full configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            ewms_address: required("EWMS_ADDRESS")?,
            ewms_token_url: required("EWMS_TOKEN_URL")?,
            ewms_client_id: required("EWMS_CLIENT_ID")?,
            ewms_client_secret: required("EWMS_CLIENT_SECRET")?,
            job_event_log_dir: PathBuf::from(required("JOB_EVENT_LOG_DIR")?),

            // fall back to the scheduler's own config variables
            collector: optional("COLLECTOR")
                .or_else(|| optional("CONDOR_HOST"))
                .unwrap_or_else(|| "localhost".to_string()),
            schedd: optional("SCHEDD")
                .or_else(|| optional("FULL_HOSTNAME"))
                .unwrap_or_else(|| "localhost".to_string()),

            outer_loop_wait: duration_secs("TMS_OUTER_LOOP_WAIT", 60)?,
            watcher_interval: duration_secs("TMS_WATCHER_INTERVAL", 60 * 3)?,
            file_manager_interval: duration_secs("TMS_FILE_MANAGER_INTERVAL", 60 * 60)?,
            // something will be logged at least this often
            max_logging_interval: duration_secs("TMS_MAX_LOGGING_INTERVAL", 5 * 60)?,
            // wait after an error, with the intention it may be transient
            error_wait: duration_secs("TMS_ERROR_WAIT", 10)?,

            jel_modification_expiry: duration_secs("JOB_EVENT_LOG_MODIFICATION_EXPIRY", 86400)?,
            taskforce_dirs_expiry: duration_secs("TASKFORCE_DIRS_EXPIRY", 5 * 86400)?,
            taskforce_dirs_tar_expiry: duration_secs("TASKFORCE_DIRS_TAR_EXPIRY", 5 * 86400)?,

            cvmfs_pilot_path: optional("CVMFS_PILOT_PATH")
                .unwrap_or_else(|| DEFAULT_CVMFS_PILOT_PATH.to_string()),
            pilot_env_additions: env_var_map("TMS_ENV_VARS_AND_VALS_ADD_TO_PILOT")?,

            dryrun: boolean("DRYRUN", false)?,

            log_level: optional("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_level_third_party: optional("LOG_LEVEL_THIRD_PARTY")
                .unwrap_or_else(|| "warn".to_string()),
            log_level_rest_tools: optional("LOG_LEVEL_REST_TOOLS")
                .unwrap_or_else(|| "info".to_string()),
        })
    }

    fn location(&self) -> SchedulerLocation {
        SchedulerLocation {
            collector: self.collector.clone(),
            schedd: self.schedd.clone(),
        }
    }

    pub fn scalar_options(&self) -> ScalarOptions {
        ScalarOptions {
            location: self.location(),
            jel_dir: self.job_event_log_dir.clone(),
            cvmfs_pilot_path: self.cvmfs_pilot_path.clone(),
            pilot_env_additions: self.pilot_env_additions.clone(),
            dryrun: self.dryrun,
            outer_loop_wait: self.outer_loop_wait,
            error_wait: self.error_wait,
        }
    }

    pub fn watcher_options(&self) -> WatcherOptions {
        WatcherOptions {
            location: self.location(),
            jel_dir: self.job_event_log_dir.clone(),
            outer_loop_wait: self.outer_loop_wait,
            watcher_interval: self.watcher_interval,
            update_interval: self.watcher_interval,
            max_logging_interval: self.max_logging_interval,
        }
    }

    pub fn file_manager_options(&self) -> FileManagerOptions {
        FileManagerOptions {
            location: self.location(),
            jel_dir: self.job_event_log_dir.clone(),
            interval: self.file_manager_interval,
            jel_modification_expiry: self.jel_modification_expiry,
            taskforce_dirs_expiry: self.taskforce_dirs_expiry,
            taskforce_dirs_tar_expiry: self.taskforce_dirs_tar_expiry,
        }
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::Missing(key))
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn duration_secs(key: &'static str, default: u64) -> Result<Duration, ConfigError> {
    match optional(key) {
        None => Ok(Duration::from_secs(default)),
        Some(value) => value
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

fn boolean(key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match optional(key) {
        None => Ok(default),
        Some(value) => match value.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid { key, value }),
        },
    }
}

/// Parse a space-separated `key=value` list, e.g. `"foo=1 bar=barbar"`.
fn env_var_map(key: &'static str) -> Result<BTreeMap<String, String>, ConfigError> {
    let Some(raw) = optional(key) else {
        return Ok(BTreeMap::new());
    };
    let mut map = BTreeMap::new();
    for pair in raw.split_whitespace() {
        let Some((k, v)) = pair.split_once('=') else {
            return Err(ConfigError::Invalid {
                key,
                value: raw.clone(),
            });
        };
        map.insert(k.to_string(), v.to_string());
    }
    Ok(map)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
