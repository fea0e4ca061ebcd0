// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    submit            = { 0, JelEventType::Submit },
    execute           = { 1, JelEventType::Execute },
    evicted           = { 4, JelEventType::JobEvicted },
    terminated        = { 5, JelEventType::JobTerminated },
    shadow_exception  = { 7, JelEventType::ShadowException },
    generic           = { 8, JelEventType::Generic },
    aborted           = { 9, JelEventType::JobAborted },
    suspended         = { 10, JelEventType::JobSuspended },
    unsuspended       = { 11, JelEventType::JobUnsuspended },
    held              = { 12, JelEventType::JobHeld },
    released          = { 13, JelEventType::JobReleased },
    reconnect_failed  = { 24, JelEventType::JobReconnectFailed },
    cluster_submit    = { 35, JelEventType::ClusterSubmit },
    cluster_remove    = { 36, JelEventType::ClusterRemove },
    unmapped          = { 22, JelEventType::Other(22) },
)]
fn event_type_from_code(code: u16, expected: JelEventType) {
    assert_eq!(JelEventType::from_code(code), expected);
}

#[yare::parameterized(
    submit           = { JelEventType::Submit, Some(JobStatus::Idle) },
    evicted          = { JelEventType::JobEvicted, Some(JobStatus::Idle) },
    unsuspended      = { JelEventType::JobUnsuspended, Some(JobStatus::Idle) },
    released         = { JelEventType::JobReleased, Some(JobStatus::Idle) },
    shadow_exception = { JelEventType::ShadowException, Some(JobStatus::Idle) },
    reconnect_failed = { JelEventType::JobReconnectFailed, Some(JobStatus::Idle) },
    execute          = { JelEventType::Execute, Some(JobStatus::Running) },
    suspended        = { JelEventType::JobSuspended, Some(JobStatus::Suspended) },
    held             = { JelEventType::JobHeld, Some(JobStatus::Held) },
    aborted          = { JelEventType::JobAborted, Some(JobStatus::Removed) },
    terminated       = { JelEventType::JobTerminated, Some(JobStatus::Completed) },
    generic          = { JelEventType::Generic, None },
    cluster_remove   = { JelEventType::ClusterRemove, None },
    other            = { JelEventType::Other(22), None },
)]
fn transitions(event_type: JelEventType, expected: Option<JobStatus>) {
    assert_eq!(status_transition(event_type), expected);
}

#[test]
fn banner_parses_iso_datetime() {
    let event =
        parse_banner("000 (123.000.000) 2024-01-27 10:00:00 Job submitted from host: <1.2.3.4>")
            .unwrap();
    assert_eq!(event.event_type, JelEventType::Submit);
    assert_eq!(event.cluster_id, ClusterId::new(123));
    assert_eq!(event.proc, 0);
    assert_eq!(event.timestamp, 1706349600); // 2024-01-27T10:00:00Z
    assert_eq!(event.message, "Job submitted from host: <1.2.3.4>");
}

#[test]
fn banner_parses_legacy_datetime() {
    let event = parse_banner("001 (045.002.000) 01/27/24 10:00:00 Job executing on host").unwrap();
    assert_eq!(event.event_type, JelEventType::Execute);
    assert_eq!(event.cluster_id, ClusterId::new(45));
    assert_eq!(event.proc, 2);
    assert_eq!(event.timestamp, 1706349600);
}

#[test]
fn banner_accepts_negative_proc_for_cluster_events() {
    let event = parse_banner("036 (123.-1.-1) 2024-01-27 10:00:00 Cluster removed").unwrap();
    assert_eq!(event.event_type, JelEventType::ClusterRemove);
    assert_eq!(event.proc, -1);
}

#[yare::parameterized(
    body_line      = { "\tMemory usage exceeds a memory limit" },
    terminator     = { "..." },
    empty          = { "" },
    short_code     = { "12 (1.0.0) 2024-01-27 10:00:00 x" },
    bad_ids        = { "000 (123) 2024-01-27 10:00:00 x" },
    bad_datetime   = { "000 (123.000.000) not-a-date xxxxxxx x" },
)]
fn non_banners_are_none(line: &str) {
    assert!(parse_banner(line).is_none());
}

#[test]
fn hold_codes_scan_the_body() {
    let mut event = parse_banner("012 (123.000.000) 2024-01-27 10:00:00 Job was held.").unwrap();
    event.body = vec![
        "Memory usage exceeds a memory limit".to_string(),
        "Code 34 Subcode 0".to_string(),
    ];
    assert_eq!(event.hold_codes(), (34, 0));
}

#[test]
fn hold_codes_default_to_zero() {
    let event = parse_banner("012 (123.000.000) 2024-01-27 10:00:00 Job was held.").unwrap();
    assert_eq!(event.hold_codes(), (0, 0));
}

#[test]
fn chirp_info_only_for_generic_events() {
    let generic = parse_banner(
        "008 (123.000.000) 2024-01-27 10:00:00 HTChirpEWMSPilotStatus: \"running\"",
    )
    .unwrap();
    assert_eq!(
        generic.chirp_info(),
        Some("HTChirpEWMSPilotStatus: \"running\"")
    );

    let submit = parse_banner("000 (123.000.000) 2024-01-27 10:00:00 Job submitted").unwrap();
    assert_eq!(submit.chirp_info(), None);
}
