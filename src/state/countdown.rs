//! Countdown reconciliation between server snapshots
//!
//! A [`Countdown`] is an anchor point: the remaining seconds the server
//! reported and the local instant the report arrived. The displayed value is
//! recomputed from the anchor on every tick and never accumulated, so a new
//! snapshot corrects any local drift in one step.

use tokio::time::Instant;

use super::timer::{Timer, TimerStatus};

/// Sentinel shown in place of a zero or negative countdown
pub const REFILL_SENTINEL: &str = "REFILL";

/// Anchor point for one timer's local countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    synced_at: Instant,
    synced_remaining: i64,
    status: TimerStatus,
    /// Set once the timer stops being active
    frozen: Option<i64>,
}

impl Countdown {
    /// Anchor a countdown on a freshly received timer record
    pub fn sync(timer: &Timer, now: Instant) -> Self {
        let mut countdown = Self {
            synced_at: now,
            synced_remaining: timer.remaining_seconds,
            status: timer.status,
            frozen: None,
        };
        countdown.freeze_if_stopped(timer.remaining_seconds.max(0));
        countdown
    }

    /// Overwrite the anchor with a newer snapshot of the same timer
    pub fn resync(&mut self, timer: &Timer, now: Instant) {
        let last_shown = self.remaining_at(now);
        self.synced_at = now;
        self.synced_remaining = timer.remaining_seconds;
        self.status = timer.status;
        self.frozen = None;
        self.freeze_if_stopped(last_shown);
    }

    fn freeze_if_stopped(&mut self, last_shown: i64) {
        self.frozen = match self.status {
            TimerStatus::Active => None,
            TimerStatus::Completed => Some(0),
            TimerStatus::Deleted | TimerStatus::Error => Some(last_shown),
        };
    }

    /// Whole seconds left at `now`, clamped at zero
    pub fn remaining_at(&self, now: Instant) -> i64 {
        if let Some(frozen) = self.frozen {
            return frozen;
        }
        let elapsed = now.saturating_duration_since(self.synced_at).as_secs() as i64;
        self.synced_remaining.saturating_sub(elapsed).max(0)
    }

    /// Display text at `now`
    pub fn display_at(&self, now: Instant) -> String {
        if self.status == TimerStatus::Completed {
            return REFILL_SENTINEL.to_string();
        }
        format_countdown(self.remaining_at(now))
    }

    /// Whether a tick loop should keep running for this anchor
    pub fn is_ticking(&self) -> bool {
        self.frozen.is_none()
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn synced_remaining(&self) -> i64 {
        self.synced_remaining
    }
}

/// Format remaining seconds for display: `REFILL` at or below zero, a bare
/// count up to a minute, `MM:SS` above that.
pub fn format_countdown(seconds: i64) -> String {
    if seconds <= 0 {
        REFILL_SENTINEL.to_string()
    } else if seconds <= 60 {
        seconds.to_string()
    } else {
        format!("{:02}:{:02}", seconds / 60, seconds % 60)
    }
}
