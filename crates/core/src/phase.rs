// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WMS-visible lifecycle label of a taskforce.

use serde::{Deserialize, Serialize};

/// Lifecycle phase the WMS reports for a taskforce.
///
/// TMS only ever branches on the phases it acts on; anything else (aborted,
/// canceled, future additions) collapses into [`Phase::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    PendingStarter,
    PendingStopper,
    CondorSubmitted,
    CondorComplete,
    #[serde(other)]
    Other,
}

impl Phase {
    pub fn is_pending_starter(&self) -> bool {
        matches!(self, Phase::PendingStarter)
    }
}

#[cfg(test)]
#[path = "phase_tests.rs"]
mod tests;
