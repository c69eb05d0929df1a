//! Idle timeout for admin sessions.
//!
//! One deadline, pushed forward on every observed interaction. Once the
//! deadline has passed, the next poll reports expiry exactly once and the
//! tracker stays disarmed until the next login re-arms it.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Inactivity after which the admin is logged out.
pub const IDLE_TIMEOUT_SECS: i64 = 60;

/// How often the browser checks the deadline.
pub const IDLE_POLL_INTERVAL_SECS: i64 = 10;

/// Notice shown on the login page after an idle logout.
pub const IDLE_NOTICE: &str = "You have been logged out due to inactivity.";

/// Result of checking the deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdlePoll {
    /// Deadline not reached.
    Active,
    /// Deadline passed; log out now.
    Expired,
    /// Not armed (no session, or already expired).
    Inactive,
}

/// Tracks the last interaction of an admin session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdleTracker {
    timeout_secs: i64,
    deadline: Option<DateTime<Utc>>,
}

impl Default for IdleTracker {
    fn default() -> Self {
        Self::new(IDLE_TIMEOUT_SECS)
    }
}

impl IdleTracker {
    /// Create a disarmed tracker with the given timeout.
    #[must_use]
    pub const fn new(timeout_secs: i64) -> Self {
        Self {
            timeout_secs,
            deadline: None,
        }
    }

    /// Create a tracker armed from `now`.
    #[must_use]
    pub fn armed(timeout_secs: i64, now: DateTime<Utc>) -> Self {
        let mut tracker = Self::new(timeout_secs);
        tracker.touch(now);
        tracker
    }

    /// Record an interaction, rescheduling the deadline.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.deadline = Some(now + Duration::seconds(self.timeout_secs));
    }

    /// Stop tracking (logout).
    pub const fn disarm(&mut self) {
        self.deadline = None;
    }

    /// Whether a deadline is scheduled.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Current deadline, if armed.
    #[must_use]
    pub const fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    /// Check the deadline.
    ///
    /// Returns [`IdlePoll::Expired`] once when `now` has reached the deadline,
    /// disarming the tracker so later polls return [`IdlePoll::Inactive`].
    pub fn poll(&mut self, now: DateTime<Utc>) -> IdlePoll {
        match self.deadline {
            None => IdlePoll::Inactive,
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                IdlePoll::Expired
            }
            Some(_) => IdlePoll::Active,
        }
    }

    /// Check the deadline when a request arrives at the server.
    ///
    /// The browser reports interactions at most once per poll interval, so a
    /// request may carry activity up to one interval old. The deadline is
    /// extended by [`IDLE_POLL_INTERVAL_SECS`] for that.
    pub fn poll_request(&mut self, now: DateTime<Utc>) -> IdlePoll {
        self.poll(now - Duration::seconds(IDLE_POLL_INTERVAL_SECS))
    }
}
