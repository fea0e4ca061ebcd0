// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;
use tms_wms::{FakeWmsClient, TaskforceRow, WmsCall};

use crate::options::{SchedulerLocation, WatcherOptions};

fn options(jel_dir: &std::path::Path) -> WatcherOptions {
    WatcherOptions {
        location: SchedulerLocation {
            collector: "collector.example.org".to_string(),
            schedd: "schedd.example.org".to_string(),
        },
        jel_dir: jel_dir.to_path_buf(),
        outer_loop_wait: Duration::from_millis(10),
        watcher_interval: Duration::from_millis(10),
        update_interval: Duration::from_secs(3600),
        max_logging_interval: Duration::from_secs(300),
    }
}

fn row(uuid: &str, cluster: u64) -> TaskforceRow {
    TaskforceRow {
        taskforce_uuid: TaskforceUuid::new(uuid),
        cluster_id: Some(ClusterId::new(cluster)),
    }
}

fn submit_event(cluster: u64, proc: u64) -> String {
    format!("000 ({cluster:03}.{proc:03}.000) 2024-01-27 10:00:00 Job submitted from host\n...\n")
}

fn execute_event(cluster: u64, proc: u64) -> String {
    format!("001 ({cluster:03}.{proc:03}.000) 2024-01-27 10:05:00 Job executing on host\n...\n")
}

fn held_event(cluster: u64, proc: u64, code: i64, subcode: i64) -> String {
    format!(
        "012 ({cluster:03}.{proc:03}.000) 2024-01-27 10:10:00 Job was held.\n\
         \tMemory usage exceeds a memory limit\n\
         \tCode {code} Subcode {subcode}\n...\n"
    )
}

fn cluster_remove_event(cluster: u64, ts: &str) -> String {
    format!("036 ({cluster:03}.-1.-1) {ts} Cluster removed\n...\n")
}

struct Setup {
    watcher: JelWatcher<FakeWmsClient>,
    reader: tms_condor::JelReader,
    wms: FakeWmsClient,
    jel: PathBuf,
    _tmp: tempfile::TempDir,
}

/// A watcher preloaded with one taskforce (TF-A on cluster 123).
async fn setup(initial_jel_content: &str) -> Setup {
    let tmp = tempfile::tempdir().unwrap();
    let jel = tmp.path().join("2024-01-27.tms.jel");
    std::fs::write(&jel, initial_jel_content).unwrap();

    let wms = FakeWmsClient::new();
    wms.push_query_result(vec![row("TF-A", 123)]);

    let mut watcher = JelWatcher::new(
        jel.clone(),
        wms.clone(),
        AppendOnlyList::new(),
        &options(tmp.path()),
    );
    watcher.query_for_taskforces(None).await.unwrap();

    let reader = tms_condor::JelReader::new(&jel);
    Setup {
        watcher,
        reader,
        wms,
        jel,
        _tmp: tmp,
    }
}

fn append(jel: &std::path::Path, content: &str) {
    use std::io::Write;
    let mut f = std::fs::OpenOptions::new().append(true).open(jel).unwrap();
    f.write_all(content.as_bytes()).unwrap();
}

// ---------------------------------------------------------------------------

#[tokio::test]
async fn zero_events_produce_no_posts() {
    let mut s = setup("").await;

    s.watcher.read_and_update(&mut s.reader).await.unwrap();
    s.watcher.flush().await.unwrap();

    assert!(s.wms.posted_statuses().is_empty());
}

#[tokio::test]
async fn identical_aggregates_post_once() {
    // five idle workers
    let content: String = (0..5).map(|p| submit_event(123, p)).collect();
    let mut s = setup(&content).await;

    // first pass: one post with {"IDLE": {"null": 5}}
    s.watcher.read_and_update(&mut s.reader).await.unwrap();
    s.watcher.flush().await.unwrap();
    // second pass: no new events, same aggregate, no post
    s.watcher.read_and_update(&mut s.reader).await.unwrap();
    s.watcher.flush().await.unwrap();

    let posted = s.wms.posted_statuses();
    assert_eq!(posted.len(), 1);
    let statuses = &posted[0].compound_statuses_by_taskforce[&TaskforceUuid::new("TF-A")];
    assert_eq!(statuses["IDLE"]["null"], 5);

    // now all five start running: exactly one more post
    let running: String = (0..5).map(|p| execute_event(123, p)).collect();
    append(&s.jel, &running);
    s.watcher.read_and_update(&mut s.reader).await.unwrap();
    s.watcher.flush().await.unwrap();

    let posted = s.wms.posted_statuses();
    assert_eq!(posted.len(), 2);
    let statuses = &posted[1].compound_statuses_by_taskforce[&TaskforceUuid::new("TF-A")];
    assert_eq!(statuses["RUNNING"]["null"], 5);
    assert!(statuses.get("IDLE").is_none());
}

#[tokio::test]
async fn held_workers_render_via_the_hold_reason_table() {
    let mut s = setup(&held_event(123, 0, 34, 0)).await;

    s.watcher.read_and_update(&mut s.reader).await.unwrap();
    s.watcher.flush().await.unwrap();

    let posted = s.wms.posted_statuses();
    let statuses = &posted[0].compound_statuses_by_taskforce[&TaskforceUuid::new("TF-A")];
    assert_eq!(
        statuses["HELD: Memory usage exceeds a memory limit"]["null"],
        1
    );
}

#[tokio::test]
async fn cluster_remove_sends_condor_complete_with_event_timestamp() {
    // 2023-11-14 22:13:20 UTC == 1700000000
    let mut s = setup(&cluster_remove_event(123, "2023-11-14 22:13:20")).await;

    s.watcher.read_and_update(&mut s.reader).await.unwrap();

    let completes: Vec<_> = s
        .wms
        .calls()
        .iter()
        .filter_map(|c| match c {
            WmsCall::CondorComplete {
                uuid,
                condor_complete_ts,
            } => Some((uuid.clone(), *condor_complete_ts)),
            _ => None,
        })
        .collect();
    assert_eq!(completes, vec![(TaskforceUuid::new("TF-A"), 1700000000)]);
}

#[tokio::test]
async fn unknown_cluster_is_resolved_through_the_wms() {
    let mut s = setup(&submit_event(456, 0)).await;
    // the targeted lookup for cluster 456 returns TF-B
    s.wms.push_query_result(vec![row("TF-B", 456)]);

    s.watcher.read_and_update(&mut s.reader).await.unwrap();
    s.watcher.flush().await.unwrap();

    let posted = s.wms.posted_statuses();
    assert_eq!(posted.len(), 1);
    assert!(posted[0]
        .compound_statuses_by_taskforce
        .contains_key(&TaskforceUuid::new("TF-B")));

    // the lookup carried the cluster id in its filter
    let lookups: Vec<_> = s
        .wms
        .calls()
        .iter()
        .filter_map(|c| match c {
            WmsCall::QueryTaskforces { query } => Some(query.query.clone()),
            _ => None,
        })
        .collect();
    assert!(lookups.iter().any(|q| q["cluster_id"] == serde_json::json!(456)));
}

#[tokio::test]
async fn unresolvable_cluster_is_skipped_with_no_state() {
    let mut s = setup(&submit_event(456, 0)).await;
    // no scripted result: the lookup comes back empty

    s.watcher.read_and_update(&mut s.reader).await.unwrap();
    s.watcher.flush().await.unwrap();

    assert!(s.wms.posted_statuses().is_empty());
}

#[tokio::test]
async fn update_cadence_flushes_mid_drain() {
    let content = format!("{}{}", submit_event(123, 0), execute_event(123, 0));
    let mut s = setup(&content).await;
    // zero update interval: flush after every event
    s.watcher.update_timer = IntervalTimer::new(Duration::ZERO);
    s.watcher.update_timer.fast_forward();

    s.watcher.read_and_update(&mut s.reader).await.unwrap();
    s.watcher.flush().await.unwrap();

    let posted = s.wms.posted_statuses();
    assert_eq!(posted.len(), 2);
    let first = &posted[0].compound_statuses_by_taskforce[&TaskforceUuid::new("TF-A")];
    assert_eq!(first["IDLE"]["null"], 1);
    let second = &posted[1].compound_statuses_by_taskforce[&TaskforceUuid::new("TF-A")];
    assert_eq!(second["RUNNING"]["null"], 1);
}

#[tokio::test]
async fn jel_deletion_ends_the_watcher_normally_after_a_final_flush() {
    let tmp = tempfile::tempdir().unwrap();
    let jel = tmp.path().join("2024-01-27.tms.jel");
    std::fs::write(&jel, submit_event(123, 0)).unwrap();

    let wms = FakeWmsClient::new();
    wms.push_query_result(vec![row("TF-A", 123)]);

    let watcher = JelWatcher::new(
        jel.clone(),
        wms.clone(),
        AppendOnlyList::new(),
        &options(tmp.path()),
    );
    let handle = tokio::spawn(watcher.run());

    // let it pick up the submit event, then delete the file
    tokio::time::sleep(Duration::from_millis(100)).await;
    std::fs::remove_file(&jel).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap();
    assert!(result.is_ok());

    // the idle snapshot made it out before retirement
    assert!(!wms.posted_statuses().is_empty());
}

#[tokio::test]
async fn wms_errors_end_the_watcher_task() {
    let mut s = setup(&submit_event(123, 0)).await;
    s.wms.fail_with("wms down");

    s.watcher.read_and_update(&mut s.reader).await.unwrap();
    let result = s.watcher.flush().await;
    assert!(matches!(result, Err(WatcherError::Wms(_))));
}

#[tokio::test]
async fn monitors_list_gains_one_entry_per_tracked_taskforce() {
    let tmp = tempfile::tempdir().unwrap();
    let jel = tmp.path().join("2024-01-27.tms.jel");
    std::fs::write(&jel, "").unwrap();

    let monitors: AppendOnlyList<TaskforceMonitor> = AppendOnlyList::new();
    let wms = FakeWmsClient::new();
    wms.push_query_result(vec![row("TF-A", 1), row("TF-B", 2)]);

    let mut watcher = JelWatcher::new(jel, wms, monitors.clone(), &options(tmp.path()));
    watcher.query_for_taskforces(None).await.unwrap();

    assert_eq!(monitors.len(), 2);
}
