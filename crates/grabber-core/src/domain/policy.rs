//! Policy: timing and retry settings for one engine instance.

use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolicyError {
    #[error("delay should be positive or 0, got {0}s")]
    NegativeDelay(f64),

    #[error("invalid duration for `{field}`: {value}")]
    InvalidDuration { field: &'static str, value: f64 },
}

/// Engine policy.
///
/// Defaults follow the long-standing behaviour: 500ms between attempts, start
/// immediately, retry transient failures forever, no per-attempt timeout.
#[derive(Debug, Clone, PartialEq)]
pub struct Policy {
    /// Pause after every attempt, success included.
    pub delay: Duration,

    /// Absolute start time (UTC). `None` or a past instant starts immediately.
    pub start_at: Option<DateTime<Utc>>,

    /// Retry targets that failed with a transient error.
    pub retry: bool,

    /// Stop the run after the first attempt, whatever its outcome.
    pub priority_mode: bool,

    /// Upper bound for a single attempt. A timed-out attempt counts as transient.
    pub attempt_timeout: Option<Duration>,

    /// Drop the head target once it has been retried this many times.
    pub max_retries: Option<u32>,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(500),
            start_at: None,
            retry: true,
            priority_mode: false,
            attempt_timeout: None,
            max_retries: None,
        }
    }
}

impl Policy {
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Set the delay from (possibly user-provided) seconds.
    pub fn with_delay_secs(self, secs: f64) -> Result<Self, PolicyError> {
        if secs < 0.0 {
            return Err(PolicyError::NegativeDelay(secs));
        }
        let delay = secs_to_duration("delay", secs)?;
        Ok(self.with_delay(delay))
    }

    pub fn with_start_at(mut self, start_at: DateTime<Utc>) -> Self {
        self.start_at = Some(start_at);
        self
    }

    pub fn with_retry(mut self, retry: bool) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_priority_mode(mut self, priority_mode: bool) -> Self {
        self.priority_mode = priority_mode;
        self
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// How long to wait before the first attempt, seen from `now`.
    ///
    /// `None` when there is nothing to wait for.
    pub fn wait_from(&self, now: DateTime<Utc>) -> Option<Duration> {
        let start_at = self.start_at?;
        // 過去の時刻なら to_std() が Err になる
        (start_at - now).to_std().ok().filter(|d| !d.is_zero())
    }
}

pub(crate) fn secs_to_duration(field: &'static str, secs: f64) -> Result<Duration, PolicyError> {
    Duration::try_from_secs_f64(secs).map_err(|_| PolicyError::InvalidDuration { field, value: secs })
}
