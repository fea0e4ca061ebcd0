// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rendering of the per-taskforce environment file.
//!
//! The file is sourced by the pilot container entrypoint, so values are
//! shell-quoted and newline-free. Output is byte-stable for a given input:
//! keys render in lexicographic order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// File name of the generated environment file inside a taskforce dir.
pub const ENVFILE_NAME: &str = "ewms_htcondor_envfile.sh";

/// An environment value as the WMS sends it: a scalar or a list.
///
/// List values exist for the pilot's multi-queue handling and are joined
/// with `;` when rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnvVal {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<String>),
}

impl EnvVal {
    /// String-cast the value: lists join with `;`, booleans spell
    /// `True`/`False` as the pilot expects.
    pub fn to_env_string(&self) -> String {
        match self {
            EnvVal::Bool(true) => "True".to_string(),
            EnvVal::Bool(false) => "False".to_string(),
            EnvVal::Int(i) => i.to_string(),
            EnvVal::Float(f) => f.to_string(),
            EnvVal::Text(s) => s.clone(),
            EnvVal::List(items) => items.join(";"),
        }
    }
}

impl From<&str> for EnvVal {
    fn from(s: &str) -> Self {
        EnvVal::Text(s.to_string())
    }
}

impl From<String> for EnvVal {
    fn from(s: String) -> Self {
        EnvVal::Text(s)
    }
}

impl From<Vec<String>> for EnvVal {
    fn from(items: Vec<String>) -> Self {
        EnvVal::List(items)
    }
}

/// Quote a string for safe use in a shell `export` line.
///
/// Strings made of safe characters pass through bare; anything else is
/// wrapped in single quotes with embedded quotes escaped.
pub fn shell_quote(s: &str) -> String {
    if s.is_empty() {
        return "''".to_string();
    }
    let safe = s.chars().all(|c| {
        c.is_ascii_alphanumeric() || matches!(c, '@' | '%' | '+' | '=' | ':' | ',' | '.' | '/' | '_' | '-')
    });
    if safe {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r#"'"'"'"#))
    }
}

fn to_export_value(val: &EnvVal) -> String {
    let joined = val.to_env_string();
    let flat = joined.replace('\n', " "); // no new-lines!
    shell_quote(&flat)
}

/// Render the environment file contents: shebang, header comments, traced
/// `export` lines in sorted key order, footer comment.
pub fn render_envfile(env: &BTreeMap<String, EnvVal>) -> String {
    let mut out = String::new();
    out.push_str("#!/bin/bash\n\n");

    out.push_str("# Environment setup for HTCondor worker\n");
    out.push_str("# This file is auto-generated and sets necessary environment variables.\n");
    out.push_str("# Sourced automatically by the EWMS Pilot's container entrypoint.\n\n");

    out.push_str("set -x\n");
    for (key, value) in env {
        out.push_str(&format!("export {}={}\n", key, to_export_value(value)));
    }
    out.push_str("set +x\n");

    out.push_str("\n# End of environment file\n");
    out
}

#[cfg(test)]
#[path = "envfile_tests.rs"]
mod tests;
