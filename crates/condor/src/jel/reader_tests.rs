// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::jel::JelEventType;
use std::io::Write;

fn write_all(path: &std::path::Path, content: &str) {
    std::fs::write(path, content).unwrap();
}

fn append(path: &std::path::Path, content: &str) {
    let mut f = std::fs::OpenOptions::new().append(true).open(path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
}

const SUBMIT_EVENT: &str = "000 (123.000.000) 2024-01-27 10:00:00 Job submitted from host\n...\n";
const EXECUTE_EVENT: &str = "001 (123.000.000) 2024-01-27 10:05:00 Job executing on host\n...\n";

#[test]
fn drains_complete_events() {
    let tmp = tempfile::tempdir().unwrap();
    let jel = tmp.path().join("2024-01-27.tms.jel");
    write_all(&jel, &format!("{SUBMIT_EVENT}{EXECUTE_EVENT}"));

    let mut reader = JelReader::new(&jel);
    let events = reader.drain().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event_type, JelEventType::Submit);
    assert_eq!(events[1].event_type, JelEventType::Execute);

    // nothing new
    assert!(reader.drain().unwrap().is_empty());
}

#[test]
fn consumes_only_appended_events_on_later_drains() {
    let tmp = tempfile::tempdir().unwrap();
    let jel = tmp.path().join("j.tms.jel");
    write_all(&jel, SUBMIT_EVENT);

    let mut reader = JelReader::new(&jel);
    assert_eq!(reader.drain().unwrap().len(), 1);

    append(&jel, EXECUTE_EVENT);
    let events = reader.drain().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, JelEventType::Execute);
}

#[test]
fn partial_tail_is_left_for_the_next_drain() {
    let tmp = tempfile::tempdir().unwrap();
    let jel = tmp.path().join("j.tms.jel");
    // banner written, no terminator yet
    write_all(
        &jel,
        "012 (123.000.000) 2024-01-27 10:00:00 Job was held.\n\tMemory usage exceeds a memory limit\n",
    );

    let mut reader = JelReader::new(&jel);
    assert!(reader.drain().unwrap().is_empty());

    append(&jel, "\tCode 34 Subcode 0\n...\n");
    let events = reader.drain().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, JelEventType::JobHeld);
    assert_eq!(events[0].hold_codes(), (34, 0));
    assert_eq!(
        events[0].body,
        vec!["Memory usage exceeds a memory limit", "Code 34 Subcode 0"]
    );
}

#[test]
fn partial_line_is_not_consumed() {
    let tmp = tempfile::tempdir().unwrap();
    let jel = tmp.path().join("j.tms.jel");
    // newline-incomplete banner
    write_all(&jel, "000 (123.000.000) 2024-01-27 10:00:00 Job subm");

    let mut reader = JelReader::new(&jel);
    assert!(reader.drain().unwrap().is_empty());

    append(&jel, "itted from host\n...\n");
    assert_eq!(reader.drain().unwrap().len(), 1);
}

#[test]
fn truncation_restarts_from_the_top() {
    let tmp = tempfile::tempdir().unwrap();
    let jel = tmp.path().join("j.tms.jel");
    write_all(&jel, &format!("{SUBMIT_EVENT}{EXECUTE_EVENT}"));

    let mut reader = JelReader::new(&jel);
    assert_eq!(reader.drain().unwrap().len(), 2);

    write_all(&jel, SUBMIT_EVENT);
    let events = reader.drain().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, JelEventType::Submit);
}

#[test]
fn deleted_file_reports_deleted() {
    let tmp = tempfile::tempdir().unwrap();
    let jel = tmp.path().join("j.tms.jel");
    write_all(&jel, SUBMIT_EVENT);

    let mut reader = JelReader::new(&jel);
    assert_eq!(reader.drain().unwrap().len(), 1);

    std::fs::remove_file(&jel).unwrap();
    assert!(!reader.exists());
    assert!(matches!(reader.drain(), Err(JelReadError::Deleted(_))));
}

#[test]
fn junk_lines_are_skipped() {
    let tmp = tempfile::tempdir().unwrap();
    let jel = tmp.path().join("j.tms.jel");
    write_all(&jel, &format!("not an event line\n\n{SUBMIT_EVENT}"));

    let mut reader = JelReader::new(&jel);
    let events = reader.drain().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, JelEventType::Submit);
}

#[test]
fn empty_file_yields_no_events() {
    let tmp = tempfile::tempdir().unwrap();
    let jel = tmp.path().join("j.tms.jel");
    write_all(&jel, "");

    let mut reader = JelReader::new(&jel);
    assert!(reader.drain().unwrap().is_empty());
}

#[test]
fn replay_from_top_matches_streaming_reads() {
    let tmp = tempfile::tempdir().unwrap();
    let jel = tmp.path().join("j.tms.jel");
    write_all(&jel, SUBMIT_EVENT);

    let mut streaming = JelReader::new(&jel);
    let mut collected = streaming.drain().unwrap();
    append(&jel, EXECUTE_EVENT);
    collected.extend(streaming.drain().unwrap());

    let mut fresh = JelReader::new(&jel);
    assert_eq!(fresh.drain().unwrap(), collected);
}
