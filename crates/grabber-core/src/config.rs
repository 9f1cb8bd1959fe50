//! Task file: account + policy + courses, as JSON.
//!
//! ```json
//! {
//!   "account": { "session_id": "..." },
//!   "config": { "delay": 0.5, "start_at": "2024-09-02T12:30:00+08:00", "retry": true },
//!   "courses": [ { "id": 114514, "name": "Linear Algebra" } ]
//! }
//! ```
//!
//! Durations are seconds (float). `start_at` accepts any RFC 3339 offset and is
//! converted to UTC.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app::Grabber;
use crate::domain::policy::secs_to_duration;
use crate::domain::{Account, Policy, PolicyError, Target};
use crate::error::GrabberError;
use crate::ports::Connector;

fn default_delay() -> f64 {
    0.5
}

fn default_retry() -> bool {
    true
}

/// Policy as written in a task file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Seconds between attempts.
    #[serde(default = "default_delay")]
    pub delay: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_at: Option<DateTime<Utc>>,

    #[serde(default = "default_retry")]
    pub retry: bool,

    #[serde(default)]
    pub priority_mode: bool,

    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempt_timeout: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            delay: default_delay(),
            start_at: None,
            retry: default_retry(),
            priority_mode: false,
            attempt_timeout: None,
            max_retries: None,
        }
    }
}

impl TryFrom<PolicyConfig> for Policy {
    type Error = PolicyError;

    fn try_from(config: PolicyConfig) -> Result<Self, Self::Error> {
        let mut policy = Policy::default()
            .with_delay_secs(config.delay)?
            .with_retry(config.retry)
            .with_priority_mode(config.priority_mode);

        policy.start_at = config.start_at;
        policy.max_retries = config.max_retries;
        if let Some(secs) = config.attempt_timeout {
            policy.attempt_timeout = Some(secs_to_duration("attempt_timeout", secs)?);
        }
        Ok(policy)
    }
}

/// One grab job: who, how, and which courses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrabberTask {
    pub account: Account,

    #[serde(default)]
    pub config: PolicyConfig,

    #[serde(default, alias = "targets")]
    pub courses: Vec<Target>,
}

impl GrabberTask {
    pub fn from_json_str(s: &str) -> Result<Self, GrabberError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GrabberError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| GrabberError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn policy(&self) -> Result<Policy, PolicyError> {
        Policy::try_from(self.config.clone())
    }

    /// Build an engine for this task with the default decider and system clock.
    pub fn into_grabber(self, connector: Arc<dyn Connector>) -> Result<Grabber, GrabberError> {
        let policy = self.policy()?;
        Ok(Grabber::new(self.account, policy, self.courses, connector)?)
    }
}
