//! Deadline timers serviced by a cooperative scheduler.
//!
//! A [`Timer`] never calls anything on its own. The owner asks it whether it
//! expired at a given instant via [`Timer::poll_expired`], which keeps every
//! callback on the caller's thread and makes expiry order explicit.

use tokio::time::{Duration, Instant};

/// Whether a timer re-arms itself after expiring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerMode {
    /// Fires every interval until cancelled.
    Recurring,
    /// Fires at most once per arming.
    OneShot,
}

/// A recurring or one-shot deadline timer.
#[derive(Clone, Debug)]
pub struct Timer {
    interval: Duration,
    mode: TimerMode,
    deadline: Option<Instant>,
}

impl Timer {
    /// Create a stopped recurring timer.
    pub fn recurring(interval: Duration) -> Self {
        Self {
            interval,
            mode: TimerMode::Recurring,
            deadline: None,
        }
    }

    /// Create a stopped one-shot timer.
    pub fn one_shot(interval: Duration) -> Self {
        Self {
            interval,
            mode: TimerMode::OneShot,
            deadline: None,
        }
    }

    /// Arm the timer to expire one interval after `now`.
    ///
    /// Re-arming a running timer replaces its pending deadline.
    pub fn start(&mut self, now: Instant) {
        self.deadline = Some(now + self.interval);
    }

    /// Change the interval and arm the timer from `now`.
    pub fn restart(&mut self, interval: Duration, now: Instant) {
        self.interval = interval;
        self.start(now);
    }

    /// Stop the timer. A cancelled timer never reports expiry.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_running(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    /// Report whether the timer expired at or before `now`.
    ///
    /// Expiry is reported once per deadline. A recurring timer advances its
    /// deadline by whole intervals; ticks missed while the scheduler was
    /// late are skipped rather than replayed in a burst.
    pub fn poll_expired(&mut self, now: Instant) -> bool {
        let Some(deadline) = self.deadline else {
            return false;
        };
        if deadline > now {
            return false;
        }

        self.deadline = match self.mode {
            TimerMode::OneShot => None,
            TimerMode::Recurring => {
                let next = deadline + self.interval;
                Some(if next > now { next } else { now + self.interval })
            }
        };
        true
    }
}
