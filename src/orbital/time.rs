//! Wall-clock time sources and interval timers
//!
//! Trail refresh and TLE refresh run on wall-clock cadences that are
//! independent of the frame rate. Both are expressed as [`IntervalTimer`]s
//! polled against a [`Clock`], so tests can drive them with a [`ManualClock`].

use bevy::prelude::*;
use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex};

/// Source of "now"
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Real UTC wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn set(&self, t: DateTime<Utc>) {
        if let Ok(mut now) = self.now.lock() {
            *now = t;
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        match self.now.lock() {
            Ok(now) => *now,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Clock resource shared by the tracker systems
#[derive(Resource, Clone)]
pub struct WallClock(pub Arc<dyn Clock>);

impl WallClock {
    pub fn now(&self) -> DateTime<Utc> {
        self.0.now()
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self(Arc::new(SystemClock))
    }
}

/// Fixed-interval timer with an explicit lifecycle.
///
/// A stopped timer never fires. A started timer fires on the first poll at or
/// after its due time and then re-arms `interval` after that poll, so a long
/// stall produces one catch-up tick rather than a burst.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    interval: Duration,
    next_due: Option<DateTime<Utc>>,
}

impl IntervalTimer {
    pub fn new(interval: std::time::Duration) -> Self {
        Self {
            interval: to_chrono(interval),
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_interval(&mut self, interval: std::time::Duration) {
        self.interval = to_chrono(interval);
    }

    /// Start so that the first poll at `now` fires immediately.
    pub fn start(&mut self, now: DateTime<Utc>) {
        self.next_due = Some(now);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.next_due
    }

    /// Returns true when the timer is due, re-arming it.
    pub fn poll(&mut self, now: DateTime<Utc>) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }
}

/// Longest interval a timer will run with
const MAX_TIMER_DAYS: i64 = 365;

fn to_chrono(d: std::time::Duration) -> Duration {
    let max = Duration::days(MAX_TIMER_DAYS);
    match Duration::from_std(d) {
        Ok(interval) if interval <= max => interval,
        _ => {
            warn!("[TIMER] interval {:?} exceeds {} days; clamping", d, MAX_TIMER_DAYS);
            max
        }
    }
}
