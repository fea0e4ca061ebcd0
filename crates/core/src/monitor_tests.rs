// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn monitor_starts_with_empty_snapshots() {
    let m = TaskforceMonitor::new(TaskforceUuid::new("TF-1"), ClusterId::new(7));
    assert!(m.aggregate_statuses().is_empty());
    assert!(m.top_task_errors().is_empty());
}

#[test]
fn monitor_snapshot_round_trip() {
    let m = TaskforceMonitor::new(TaskforceUuid::new("TF-1"), ClusterId::new(7));

    let mut statuses = AggregateStatuses::new();
    statuses.insert(
        "IDLE".to_string(),
        BTreeMap::from([("null".to_string(), 5u64)]),
    );
    m.set_aggregate_statuses(statuses.clone());
    assert_eq!(m.aggregate_statuses(), statuses);

    let errors = TopTaskErrors::from([("boom".to_string(), 2u64)]);
    m.set_top_task_errors(errors.clone());
    assert_eq!(m.top_task_errors(), errors);
}

#[test]
fn list_appends_and_snapshots() {
    let list: AppendOnlyList<u32> = AppendOnlyList::new();
    assert!(list.is_empty());

    list.push(1);
    list.push(2);
    assert_eq!(list.len(), 2);

    let snap: Vec<u32> = list.snapshot().iter().map(|a| **a).collect();
    assert_eq!(snap, vec![1, 2]);
}

#[test]
fn clones_share_storage() {
    let list: AppendOnlyList<&'static str> = AppendOnlyList::new();
    let other = list.clone();

    list.push("from-original");
    other.push("from-clone");

    assert_eq!(list.len(), 2);
    assert_eq!(other.len(), 2);
}

#[test]
fn push_returns_shared_handle() {
    let list: AppendOnlyList<TaskforceMonitor> = AppendOnlyList::new();
    let handle = list.push(TaskforceMonitor::new(
        TaskforceUuid::new("TF-9"),
        ClusterId::new(42),
    ));

    handle.set_top_task_errors(TopTaskErrors::from([("err".to_string(), 1u64)]));

    // the list sees the update made through the returned handle
    let via_list = &list.snapshot()[0];
    assert_eq!(via_list.top_task_errors().len(), 1);
}
