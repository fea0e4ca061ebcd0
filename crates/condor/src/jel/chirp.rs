// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parsing of pilot chirps out of generic events.

use tms_core::JobInfoKey;

/// Parse a chirp payload (`"HTChirpEWMSPilotStatus: value"`).
///
/// The payload splits once on the first `:`; the attribute must be one of
/// the tracked pilot attributes, the value is trimmed and best-effort
/// unquoted. Anything else (wrong prefix, unknown attribute, no colon)
/// is `None`: a no-update, never an error.
pub fn parse_chirp(info: &str) -> Option<(JobInfoKey, String)> {
    if !info.starts_with("HTChirpEWMSPilot") {
        return None;
    }
    let (attr, value) = info.split_once(':')?;
    let key = JobInfoKey::from_attr_name(attr.trim())?;
    Some((key, unquote(value.trim())))
}

/// Best-effort unquote of a classad string value.
///
/// The value was *probably* quoted by the chirp sender. A surrounding `"`
/// pair is stripped and `\"`/`\\` unescaped; anything that does not parse
/// cleanly is returned as-is.
pub fn unquote(value: &str) -> String {
    let Some(inner) = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
    else {
        return value.to_string();
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                // trailing backslash: not a clean quoted string
                None => return value.to_string(),
            }
        } else if c == '"' {
            // bare quote inside: not a clean quoted string
            return value.to_string();
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
#[path = "chirp_tests.rs"]
mod tests;
