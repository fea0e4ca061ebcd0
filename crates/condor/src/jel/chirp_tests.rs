// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parses_quoted_status() {
    let (key, value) = parse_chirp("HTChirpEWMSPilotStatus: \"running\"").unwrap();
    assert_eq!(key, JobInfoKey::HTChirpEWMSPilotStatus);
    assert_eq!(value, "running");
}

#[test]
fn parses_unquoted_value() {
    let (key, value) = parse_chirp("HTChirpEWMSPilotTasksTotal: 128").unwrap();
    assert_eq!(key, JobInfoKey::HTChirpEWMSPilotTasksTotal);
    assert_eq!(value, "128");
}

#[test]
fn splits_once_on_first_colon_only() {
    // a quoted payload with embedded colons stays whole after the first split
    let (key, value) =
        parse_chirp("HTChirpEWMSPilotError: \"ValueError: bad input: line 3\"").unwrap();
    assert_eq!(key, JobInfoKey::HTChirpEWMSPilotError);
    assert_eq!(value, "ValueError: bad input: line 3");
}

#[yare::parameterized(
    wrong_prefix      = { "SomethingElse: value" },
    unknown_attribute = { "HTChirpEWMSPilotBogus: value" },
    no_colon          = { "HTChirpEWMSPilotStatus" },
)]
fn non_chirps_are_none(info: &str) {
    assert_eq!(parse_chirp(info), None);
}

#[yare::parameterized(
    plain            = { "running", "running" },
    quoted           = { "\"running\"", "running" },
    escaped_quote    = { r#""say \"hi\"""#, "say \"hi\"" },
    escaped_backslash = { r#""a\\b""#, r"a\b" },
    unterminated     = { "\"half", "\"half" },
    inner_bare_quote = { "\"a\"b\"", "\"a\"b\"" },
    empty_quoted     = { "\"\"", "" },
)]
fn unquote_is_best_effort(input: &str, expected: &str) {
    assert_eq!(unquote(input), expected);
}
