// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fresh_timer_has_not_elapsed() {
    let mut timer = IntervalTimer::new(Duration::from_secs(60));
    assert!(!timer.has_interval_elapsed());
}

#[test]
fn fast_forward_fires_immediately() {
    let mut timer = IntervalTimer::new(Duration::from_secs(60));
    timer.fast_forward();
    assert!(timer.has_interval_elapsed());
    // firing resets the tick
    assert!(!timer.has_interval_elapsed());
}

#[test]
fn elapses_after_interval() {
    let mut timer = IntervalTimer::new(Duration::from_millis(20));
    assert!(!timer.has_interval_elapsed());
    std::thread::sleep(Duration::from_millis(30));
    assert!(timer.has_interval_elapsed());
    // and resets afterwards
    assert!(!timer.has_interval_elapsed());
}

#[tokio::test]
async fn wait_until_interval_returns_after_elapse() {
    let mut timer = IntervalTimer::new(Duration::from_millis(30));
    let start = Instant::now();
    timer.wait_until_interval().await;
    assert!(start.elapsed() >= Duration::from_millis(30));
}

#[tokio::test]
async fn wait_until_interval_returns_promptly_when_fast_forwarded() {
    let mut timer = IntervalTimer::new(Duration::from_secs(3600));
    timer.fast_forward();
    let start = Instant::now();
    timer.wait_until_interval().await;
    assert!(start.elapsed() < Duration::from_secs(1));
}
