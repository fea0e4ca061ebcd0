// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tms-wms: REST envelope to the Workflow Management Service control plane.
//!
//! All routes are JSON under the `v1` version prefix. The production client
//! authenticates with OAuth2 client credentials. Errors always propagate:
//! TMS keeps no retry queue and relies on the WMS re-offering work.

pub mod client;
pub mod rest;
pub mod routes;
pub mod token;
pub mod types;

pub use client::{WmsClient, WmsError};
pub use rest::RestWmsClient;
pub use types::{
    MqProfile, PendingStarter, PendingStopper, PilotConfig, PilotImageSource, StatusesBody,
    SubmitConfirmation, TaskDirective, Taskforce, TaskforceQuery, TaskforceRow, WorkerConfig,
};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeWmsClient, WmsCall};
