// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn taskforce_uuid_display() {
    let id = TaskforceUuid::new("TF-abc123");
    assert_eq!(id.to_string(), "TF-abc123");
}

#[test]
fn taskforce_uuid_equality() {
    let id1 = TaskforceUuid::new("TF-1");
    let id2 = TaskforceUuid::new("TF-1");
    let id3 = TaskforceUuid::new("TF-2");

    assert_eq!(id1, id2);
    assert_ne!(id1, id3);
    assert_eq!(id1, "TF-1");
}

#[test]
fn taskforce_uuid_serde() {
    let id = TaskforceUuid::new("TF-xyz");
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"TF-xyz\"");

    let parsed: TaskforceUuid = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, id);
}

#[test]
fn cluster_id_display() {
    assert_eq!(ClusterId::new(42).to_string(), "42");
}

#[test]
fn cluster_id_serde_bare_integer() {
    let id = ClusterId::new(123);
    assert_eq!(serde_json::to_string(&id).unwrap(), "123");

    let parsed: ClusterId = serde_json::from_str("123").unwrap();
    assert_eq!(parsed, id);
}
