// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The submit description handed to the scheduler.
//!
//! The description renders in insertion order: the submit file reads the
//! way an operator would write it, and identical inputs always confirm the
//! same description back to the WMS.

use indexmap::IndexMap;
use serde::Serialize;

/// A submit-description value: the submit language only knows strings and
/// integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SubmitValue {
    Str(String),
    Int(i64),
}

impl std::fmt::Display for SubmitValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitValue::Str(s) => write!(f, "{}", s),
            SubmitValue::Int(i) => write!(f, "{}", i),
        }
    }
}

impl From<&str> for SubmitValue {
    fn from(s: &str) -> Self {
        SubmitValue::Str(s.to_string())
    }
}

impl From<String> for SubmitValue {
    fn from(s: String) -> Self {
        SubmitValue::Str(s)
    }
}

impl From<i64> for SubmitValue {
    fn from(i: i64) -> Self {
        SubmitValue::Int(i)
    }
}

impl From<u64> for SubmitValue {
    fn from(i: u64) -> Self {
        SubmitValue::Int(i as i64)
    }
}

/// Ordered submit description.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SubmitDescription {
    entries: IndexMap<String, SubmitValue>,
}

impl SubmitDescription {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a key, keeping first-insertion order on overwrite.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<SubmitValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&SubmitValue> {
        self.entries.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.entries.get(key) {
            Some(SubmitValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    /// Render as submit-file text with a trailing `queue N` statement.
    pub fn to_submit_file(&self, count: u64) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            out.push_str(&format!("{} = {}\n", key, value));
        }
        out.push_str(&format!("\nqueue {}\n", count));
        out
    }

    /// JSON object form, as confirmed back to the WMS.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
#[path = "submit_tests.rs"]
mod tests;
