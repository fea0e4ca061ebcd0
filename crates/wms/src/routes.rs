// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Route builders for the WMS HTTP surface.

use tms_core::TaskforceUuid;

/// Version prefix shared by every route.
pub const VERSION_PREFIX: &str = "v1";

pub fn pending_starter() -> String {
    format!("/{VERSION_PREFIX}/tms/pending-starter/taskforces")
}

pub fn pending_stopper() -> String {
    format!("/{VERSION_PREFIX}/tms/pending-stopper/taskforces")
}

pub fn taskforce(uuid: &TaskforceUuid) -> String {
    format!("/{VERSION_PREFIX}/taskforces/{uuid}")
}

pub fn condor_submit(uuid: &TaskforceUuid) -> String {
    format!("/{VERSION_PREFIX}/tms/condor-submit/taskforces/{uuid}")
}

pub fn condor_submit_failed(uuid: &TaskforceUuid) -> String {
    format!("/{VERSION_PREFIX}/tms/condor-submit/taskforces/{uuid}/failed")
}

pub fn condor_rm(uuid: &TaskforceUuid) -> String {
    format!("/{VERSION_PREFIX}/tms/condor-rm/taskforces/{uuid}")
}

pub fn condor_rm_failed(uuid: &TaskforceUuid) -> String {
    format!("/{VERSION_PREFIX}/tms/condor-rm/taskforces/{uuid}/failed")
}

pub fn condor_complete(uuid: &TaskforceUuid) -> String {
    format!("/{VERSION_PREFIX}/tms/condor-complete/taskforces/{uuid}")
}

pub fn statuses() -> String {
    format!("/{VERSION_PREFIX}/tms/statuses/taskforces")
}

pub fn query_taskforces() -> String {
    format!("/{VERSION_PREFIX}/query/taskforces")
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
