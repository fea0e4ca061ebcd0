// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coarse interval timing for the polling loops.
//!
//! All three loops pace themselves with the same primitive: "has the
//! interval elapsed since the last tick?" on a monotonic clock. The
//! fast-forward primitive exists so a cadence can fire on its first check
//! (the watcher uses it for the verbose-logging cadence).

use std::time::{Duration, Instant};

/// Tracks whether a fixed interval has elapsed since the last tick.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    interval: Duration,
    /// `None` means the next check fires immediately.
    last_tick: Option<Instant>,
}

impl IntervalTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_tick: Some(Instant::now()),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Make the next [`has_interval_elapsed`](Self::has_interval_elapsed)
    /// (or wait) fire immediately.
    pub fn fast_forward(&mut self) {
        self.last_tick = None;
    }

    /// Returns true, and resets the tick, once the interval has elapsed.
    pub fn has_interval_elapsed(&mut self) -> bool {
        let elapsed = match self.last_tick {
            None => true,
            Some(tick) => tick.elapsed() >= self.interval,
        };
        if elapsed {
            self.last_tick = Some(Instant::now());
        }
        elapsed
    }

    /// Time left until the next tick (zero once elapsed or fast-forwarded).
    fn remaining(&self) -> Duration {
        match self.last_tick {
            None => Duration::ZERO,
            Some(tick) => self.interval.saturating_sub(tick.elapsed()),
        }
    }

    /// Sleep until the interval has elapsed, then reset the tick.
    ///
    /// Sleeps in coarse steps (1 s at most) so cancellation is honoured
    /// promptly; accuracy is second-granular.
    pub async fn wait_until_interval(&mut self) {
        loop {
            if self.has_interval_elapsed() {
                return;
            }
            let step = self.remaining().min(Duration::from_secs(1));
            tokio::time::sleep(step.max(Duration::from_millis(10))).await;
        }
    }
}

#[cfg(test)]
#[path = "timer_tests.rs"]
mod tests;
