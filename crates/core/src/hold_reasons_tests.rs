// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    memory_limit_no_subcode = { 34, 0, "Memory usage exceeds a memory limit" },
    user_hold               = { 1, 0, "The user put the job on hold with condor_hold" },
    docker_image            = { 35, 0, "Specified Docker image was invalid" },
)]
fn known_code_subcode_zero(code: i64, subcode: i64, expected: &str) {
    assert_eq!(hold_reason_to_string(code, subcode), expected);
}

#[test]
fn subcode_with_meaning_label() {
    assert_eq!(
        hold_reason_to_string(6, 2),
        "The condor_starter failed to start the executable: 2 (Errno)"
    );
}

#[test]
fn subcode_with_lookup_hit() {
    assert_eq!(
        hold_reason_to_string(37, 9),
        "User error in the EC2 universe: Failed to authenticate"
    );
}

#[test]
fn subcode_with_lookup_miss_falls_back_to_number() {
    assert_eq!(
        hold_reason_to_string(37, 999),
        "User error in the EC2 universe: 999"
    );
}

#[test]
fn subcode_without_lookup_or_meaning() {
    assert_eq!(
        hold_reason_to_string(34, 7),
        "Memory usage exceeds a memory limit: 7 (unknown)"
    );
}

#[test]
fn unknown_code_surfaces_pair() {
    assert_eq!(hold_reason_to_string(999, 3), "999: 3 (unknown)");
    assert_eq!(hold_reason_to_string(2, 0), "2: 0 (unknown)");
}
