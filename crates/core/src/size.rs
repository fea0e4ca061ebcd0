// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Byte-size parsing and formatting for submit descriptions.
//!
//! The scheduler measures in binary multiples but spells sizes with decimal
//! unit names. Parsing therefore treats every unit suffix ("GB" and "GiB"
//! alike) as a binary multiple, and formatting emits the decimal spelling
//! ("1 GB" for 2^30 bytes).

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SizeParseError {
    #[error("empty size string")]
    Empty,
    #[error("invalid number in size: {0}")]
    InvalidNumber(String),
    #[error("unknown size unit: {0}")]
    UnknownUnit(String),
}

const UNITS: &[(&str, u32)] = &[
    ("b", 0),
    ("byte", 0),
    ("bytes", 0),
    ("k", 1),
    ("kb", 1),
    ("kib", 1),
    ("m", 2),
    ("mb", 2),
    ("mib", 2),
    ("g", 3),
    ("gb", 3),
    ("gib", 3),
    ("t", 4),
    ("tb", 4),
    ("tib", 4),
    ("p", 5),
    ("pb", 5),
    ("pib", 5),
];

/// Parse a human-readable size ("1 GB", "1.5GiB", "1073741824") into bytes.
pub fn parse_bytes(input: &str) -> Result<u64, SizeParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(SizeParseError::Empty);
    }

    let split = input
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit() && *c != '.')
        .map(|(i, _)| i)
        .unwrap_or(input.len());
    let (num_str, unit_str) = input.split_at(split);
    let unit_str = unit_str.trim();

    let num: f64 = num_str
        .parse()
        .map_err(|_| SizeParseError::InvalidNumber(input.to_string()))?;

    if unit_str.is_empty() {
        return Ok(num.round() as u64);
    }

    let exponent = UNITS
        .iter()
        .find(|(u, _)| *u == unit_str.to_ascii_lowercase())
        .map(|(_, e)| *e)
        .ok_or_else(|| SizeParseError::UnknownUnit(unit_str.to_string()))?;

    Ok((num * 1024f64.powi(exponent as i32)).round() as u64)
}

/// Format a byte count in the scheduler's decimal-spelled convention.
///
/// Largest binary unit, at most two decimals with trailing zeros trimmed:
/// 2^30 renders as "1 GB", 4235 as "4.13 KB", 512 as "512 bytes".
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return if bytes == 1 {
            "1 byte".to_string()
        } else {
            format!("{} bytes", bytes)
        };
    }

    let labels = ["KB", "MB", "GB", "TB", "PB"];
    let mut exponent = 1u32;
    while exponent < 5 && bytes as f64 >= 1024f64.powi(exponent as i32 + 1) {
        exponent += 1;
    }

    let value = bytes as f64 / 1024f64.powi(exponent as i32);
    let rounded = format!("{:.2}", value);
    let rounded = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", rounded, labels[(exponent - 1) as usize])
}

/// A size as the WMS sends it: either a raw byte count or a human string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SizeSpec {
    Bytes(u64),
    Human(String),
}

impl SizeSpec {
    pub fn to_bytes(&self) -> Result<u64, SizeParseError> {
        match self {
            SizeSpec::Bytes(n) => Ok(*n),
            SizeSpec::Human(s) => parse_bytes(s),
        }
    }
}

#[cfg(test)]
#[path = "size_tests.rs"]
mod tests;
