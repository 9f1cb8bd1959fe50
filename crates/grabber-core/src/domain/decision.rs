//! Decision model: what the worker loop does with the head target after an attempt.
//!
//! This module defines the Decision type (what to do next) and the Decider trait
//! (how to determine it from the attempt result).

use serde::{Deserialize, Serialize};

use super::outcome::{AttemptError, FailureClass, kind_of};
use super::policy::Policy;

/// The next action for the head target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Decision {
    /// Acquired. Remove the target.
    Complete,

    /// Give up on this target and move on.
    Skip { reason: String },

    /// Leave the target at the head and try again next iteration.
    Retry { reason: String },

    /// Stop the whole run. The queue is left as is.
    Abort { reason: String },
}

impl Decision {
    /// Does this decision remove the attempted target from the queue?
    pub fn removes_target(&self) -> bool {
        matches!(self, Decision::Complete | Decision::Skip { .. })
    }

    pub fn is_abort(&self) -> bool {
        matches!(self, Decision::Abort { .. })
    }
}

/// Trait for deciding the next action from an attempt result.
///
/// Deciders are pure functions: given the result and how many times the head
/// target has already been retried, they return the next action.
pub trait Decider: Send + Sync {
    /// # Arguments
    /// * `result` - The result of the most recent attempt
    /// * `retries` - Retries already spent on this target (0 on the first attempt)
    fn decide(&self, result: &Result<(), AttemptError>, retries: u32) -> Decision;
}

/// Default decider.
///
/// - fatal kinds abort the run
/// - target-specific kinds drop the target
/// - transient failures are retried when `retry` is set, up to `max_retries` if any
#[derive(Debug, Clone)]
pub struct DefaultDecider {
    retry: bool,
    max_retries: Option<u32>,
}

impl DefaultDecider {
    pub fn new(retry: bool, max_retries: Option<u32>) -> Self {
        Self { retry, max_retries }
    }

    pub fn from_policy(policy: &Policy) -> Self {
        Self::new(policy.retry, policy.max_retries)
    }
}

impl Decider for DefaultDecider {
    fn decide(&self, result: &Result<(), AttemptError>, retries: u32) -> Decision {
        let err = match result {
            Ok(()) => return Decision::Complete,
            Err(e) => e,
        };

        match kind_of(result).class() {
            FailureClass::Succeeded => Decision::Complete,
            FailureClass::Fatal => Decision::Abort {
                reason: err.to_string(),
            },
            FailureClass::Skip => Decision::Skip {
                reason: err.to_string(),
            },
            FailureClass::Transient if !self.retry => Decision::Skip {
                reason: format!("{err} (retry disabled)"),
            },
            FailureClass::Transient => match self.max_retries {
                Some(max) if retries >= max => Decision::Skip {
                    reason: format!("{err} (gave up after {retries} retries)"),
                },
                _ => Decision::Retry {
                    reason: format!("{err} (retry {})", retries + 1),
                },
            },
        }
    }
}
