// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-worker attribute storage for the JEL watcher.
//!
//! Workers report a closed set of attributes: scheduler-maintained job state
//! plus pilot-reported chirp telemetry. Chirps naming anything outside the
//! set are dropped before they reach storage.

use crate::hold_reasons::hold_reason_to_string;
use crate::status::JobStatus;

/// Worker index within a cluster (the scheduler's proc id).
pub type ProcId = u64;

/// The closed set of per-worker attributes tracked from the JEL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum JobInfoKey {
    ClusterId,
    JobStatus,
    EnteredCurrentStatus,
    ProcId,
    //
    HoldReason,
    HoldReasonCode,
    HoldReasonSubCode,
    //
    HTChirpEWMSPilotLastUpdatedTimestamp,
    HTChirpEWMSPilotStartedTimestamp,
    HTChirpEWMSPilotStatus,
    //
    HTChirpEWMSPilotTasksTotal,
    HTChirpEWMSPilotTasksFailed,
    HTChirpEWMSPilotTasksSuccess,
    //
    HTChirpEWMSPilotError,
    HTChirpEWMSPilotErrorTraceback,
}

impl JobInfoKey {
    /// Look up a chirp attribute name. Unknown names return `None`; the
    /// caller treats that as a no-update, not an error.
    pub fn from_attr_name(name: &str) -> Option<Self> {
        match name {
            "ClusterId" => Some(Self::ClusterId),
            "JobStatus" => Some(Self::JobStatus),
            "EnteredCurrentStatus" => Some(Self::EnteredCurrentStatus),
            "ProcId" => Some(Self::ProcId),
            "HoldReason" => Some(Self::HoldReason),
            "HoldReasonCode" => Some(Self::HoldReasonCode),
            "HoldReasonSubCode" => Some(Self::HoldReasonSubCode),
            "HTChirpEWMSPilotLastUpdatedTimestamp" => {
                Some(Self::HTChirpEWMSPilotLastUpdatedTimestamp)
            }
            "HTChirpEWMSPilotStartedTimestamp" => Some(Self::HTChirpEWMSPilotStartedTimestamp),
            "HTChirpEWMSPilotStatus" => Some(Self::HTChirpEWMSPilotStatus),
            "HTChirpEWMSPilotTasksTotal" => Some(Self::HTChirpEWMSPilotTasksTotal),
            "HTChirpEWMSPilotTasksFailed" => Some(Self::HTChirpEWMSPilotTasksFailed),
            "HTChirpEWMSPilotTasksSuccess" => Some(Self::HTChirpEWMSPilotTasksSuccess),
            "HTChirpEWMSPilotError" => Some(Self::HTChirpEWMSPilotError),
            "HTChirpEWMSPilotErrorTraceback" => Some(Self::HTChirpEWMSPilotErrorTraceback),
            _ => None,
        }
    }
}

/// A tracked attribute value: an integer, a string, or (for HELD) the
/// `(status, hold_code, hold_subcode)` triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobInfoVal {
    Int(i64),
    Text(String),
    Held(i64, i64, i64),
}

impl JobInfoVal {
    /// Render the value as the human-readable label used in snapshots.
    ///
    /// `JobStatus` values render to the scheduler's canonical status name;
    /// HELD triples are expanded through the hold-reason table. Everything
    /// else stringifies as-is.
    pub fn to_label(&self, key: JobInfoKey) -> String {
        match (key, self) {
            (JobInfoKey::HTChirpEWMSPilotError, val) => val.stringify(),
            (JobInfoKey::JobStatus, JobInfoVal::Int(code)) => match JobStatus::from_code(*code) {
                Some(status) => status.label().to_string(),
                None => code.to_string(),
            },
            (JobInfoKey::JobStatus, JobInfoVal::Held(status, code, subcode))
                if *status == JobStatus::Held.code() =>
            {
                format!("HELD: {}", hold_reason_to_string(*code, *subcode))
            }
            (_, val) => val.stringify(),
        }
    }

    fn stringify(&self) -> String {
        match self {
            JobInfoVal::Int(i) => i.to_string(),
            JobInfoVal::Text(s) => s.clone(),
            JobInfoVal::Held(a, b, c) => format!("({}, {}, {})", a, b, c),
        }
    }
}

#[cfg(test)]
#[path = "job_info_tests.rs"]
mod tests;
