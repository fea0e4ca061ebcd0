// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The job event log format.
//!
//! A JEL is a line-oriented, append-only stream. Each event is a banner
//! line,
//!
//! ```text
//! 012 (123.000.000) 2024-01-27 10:00:00 Job was held.
//! ```
//!
//! followed by optional body lines and a terminator line of three dots.
//! The numeric code on the banner is the event type; the parenthesized
//! triple is `cluster.proc.subproc`.

mod chirp;
mod reader;

pub use chirp::{parse_chirp, unquote};
pub use reader::{JelReadError, JelReader};

use tms_core::{ClusterId, JobStatus};

/// Event types TMS cares about, by the scheduler's numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JelEventType {
    Submit,             // 000
    Execute,            // 001
    JobEvicted,         // 004
    JobTerminated,      // 005
    ShadowException,    // 007
    Generic,            // 008
    JobAborted,         // 009
    JobSuspended,       // 010
    JobUnsuspended,     // 011
    JobHeld,            // 012
    JobReleased,        // 013
    JobReconnectFailed, // 024
    ClusterSubmit,      // 035
    ClusterRemove,      // 036
    Other(u16),
}

impl JelEventType {
    pub fn from_code(code: u16) -> Self {
        match code {
            0 => Self::Submit,
            1 => Self::Execute,
            4 => Self::JobEvicted,
            5 => Self::JobTerminated,
            7 => Self::ShadowException,
            8 => Self::Generic,
            9 => Self::JobAborted,
            10 => Self::JobSuspended,
            11 => Self::JobUnsuspended,
            12 => Self::JobHeld,
            13 => Self::JobReleased,
            24 => Self::JobReconnectFailed,
            35 => Self::ClusterSubmit,
            36 => Self::ClusterRemove,
            other => Self::Other(other),
        }
    }
}

/// The fixed event-type → worker-status transition table.
///
/// Returns `None` for event types that do not change a worker's status.
pub fn status_transition(event_type: JelEventType) -> Option<JobStatus> {
    match event_type {
        JelEventType::Submit
        | JelEventType::JobEvicted
        | JelEventType::JobUnsuspended
        | JelEventType::JobReleased
        | JelEventType::ShadowException
        | JelEventType::JobReconnectFailed => Some(JobStatus::Idle),
        JelEventType::Execute => Some(JobStatus::Running),
        JelEventType::JobSuspended => Some(JobStatus::Suspended),
        JelEventType::JobHeld => Some(JobStatus::Held),
        JelEventType::JobAborted => Some(JobStatus::Removed),
        JelEventType::JobTerminated => Some(JobStatus::Completed),
        _ => None,
    }
}

/// One parsed job event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobEvent {
    pub event_type: JelEventType,
    pub cluster_id: ClusterId,
    /// Proc within the cluster; negative for cluster-level events.
    pub proc: i64,
    /// Banner time as epoch seconds.
    pub timestamp: i64,
    /// Banner text after the datetime.
    pub message: String,
    /// Body lines (indentation and terminator stripped).
    pub body: Vec<String>,
}

impl JobEvent {
    /// The chirp payload, for generic events.
    pub fn chirp_info(&self) -> Option<&str> {
        match self.event_type {
            JelEventType::Generic => Some(self.message.as_str()),
            _ => None,
        }
    }

    /// Hold `(code, subcode)` from a `Code N Subcode M` body line.
    /// Missing or unparsable lines yield `(0, 0)`.
    pub fn hold_codes(&self) -> (i64, i64) {
        for line in &self.body {
            let mut tokens = line.split_whitespace();
            if tokens.next() != Some("Code") {
                continue;
            }
            let Some(code) = tokens.next().and_then(|t| t.parse().ok()) else {
                continue;
            };
            if tokens.next() != Some("Subcode") {
                continue;
            }
            let Some(subcode) = tokens.next().and_then(|t| t.parse().ok()) else {
                continue;
            };
            return (code, subcode);
        }
        (0, 0)
    }
}

/// Parse a banner line into its parts. `None` means "not a banner".
fn parse_banner(line: &str) -> Option<JobEvent> {
    let line = line.trim_end();
    let (code_str, rest) = line.split_once(' ')?;
    if code_str.len() != 3 {
        return None;
    }
    let code: u16 = code_str.parse().ok()?;

    let rest = rest.strip_prefix('(')?;
    let (ids, rest) = rest.split_once(") ")?;
    let mut id_parts = ids.split('.');
    let cluster: u64 = id_parts.next()?.parse().ok()?;
    let proc: i64 = id_parts.next()?.parse().ok()?;
    let _subproc = id_parts.next()?;
    if id_parts.next().is_some() {
        return None;
    }

    let (timestamp, message) = parse_banner_datetime(rest)?;

    Some(JobEvent {
        event_type: JelEventType::from_code(code),
        cluster_id: ClusterId::new(cluster),
        proc,
        timestamp,
        message: message.trim_start().to_string(),
        body: Vec::new(),
    })
}

/// Banner datetimes are ISO (`YYYY-MM-DD HH:MM:SS`); the scheduler's legacy
/// spelling (`MM/DD/YY HH:MM:SS`) is accepted for older logs.
fn parse_banner_datetime(rest: &str) -> Option<(i64, &str)> {
    const LEN: usize = 19; // both spellings are 19 bytes
    if rest.len() < LEN || !rest.is_char_boundary(LEN) {
        return None;
    }
    let (dt_str, message) = rest.split_at(LEN);
    let parsed = chrono::NaiveDateTime::parse_from_str(dt_str, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(dt_str, "%m/%d/%y %H:%M:%S"))
        .ok()?;
    Some((parsed.and_utc().timestamp(), message))
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
