// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing bootstrap.
//!
//! Three level knobs, mirroring the service's operational split: first-party
//! crates, the WMS client, and everything else. `RUST_LOG` wins when set.

use crate::config::Config;

/// First-party tracing targets.
const FIRST_PARTY_TARGETS: &[&str] = &[
    "tmsd",
    "tms_core",
    "tms_condor",
    "tms_engine",
    "tms_daemon",
];

/// Assemble the filter directives from the configured levels.
pub fn filter_directives(config: &Config) -> String {
    let mut directives = vec![config.log_level_third_party.to_ascii_lowercase()];
    for target in FIRST_PARTY_TARGETS {
        directives.push(format!(
            "{}={}",
            target,
            config.log_level.to_ascii_lowercase()
        ));
    }
    directives.push(format!(
        "tms_wms={}",
        config.log_level_rest_tools.to_ascii_lowercase()
    ));
    directives.join(",")
}

/// Configure the logging level and format.
pub fn setup_logging(config: &Config) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(config)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
