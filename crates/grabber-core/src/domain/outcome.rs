//! Outcome model: classification of a single acquisition attempt.
//!
//! The remote service rejects attempts for several distinct reasons. Each
//! rejection is mapped to an `OutcomeKind`, and each kind to a `FailureClass`
//! that the decider turns into a queue action.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What happened on one attempt.
///
/// Serialized as SCREAMING_SNAKE_CASE (SUCCESS / TARGET_FULL / ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeKind {
    AuthFailed,
    VerificationRequired,
    RequirementExceeded,
    AlreadyAcquired,
    TargetFull,
    TargetConflict,
    Success,
    Transient,
}

/// How the worker loop treats an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// The attempt went through.
    Succeeded,

    /// Session or caller state is unusable for any target. Abort the run.
    Fatal,

    /// This target can never succeed for this caller. Drop it and continue.
    Skip,

    /// Unknown or ephemeral. Retry when policy allows.
    Transient,
}

impl OutcomeKind {
    pub fn class(self) -> FailureClass {
        match self {
            OutcomeKind::AuthFailed
            | OutcomeKind::VerificationRequired
            | OutcomeKind::RequirementExceeded => FailureClass::Fatal,
            OutcomeKind::AlreadyAcquired | OutcomeKind::TargetFull | OutcomeKind::TargetConflict => {
                FailureClass::Skip
            }
            OutcomeKind::Success => FailureClass::Succeeded,
            OutcomeKind::Transient => FailureClass::Transient,
        }
    }

    pub fn is_fatal(self) -> bool {
        self.class() == FailureClass::Fatal
    }
}

// 教務システムが返す拒否理由（部分一致）
const REASON_NOT_SELECTION_TIME: &str = "当前不是选课时间";
const REASON_TARGET_FULL: &str = "选课人数超出";
const REASON_CONFLICT: &str = "上课时间有冲突";
const REASON_ALREADY_SELECTED: &str = "您已经选了该门课程";
const REASON_REQUIREMENT_EXCEEDED: &str = "超出选课要求门数";

/// A failed attempt, as reported by an `AcquisitionClient`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptError {
    #[error("authorization failed")]
    AuthFailed,

    #[error("interactive verification required")]
    VerificationRequired,

    #[error("requirement exceeded: {0}")]
    RequirementExceeded(String),

    #[error("already acquired: {0}")]
    AlreadyAcquired(String),

    #[error("target is full: {0}")]
    TargetFull(String),

    #[error("target conflicts with a held resource: {0}")]
    TargetConflict(String),

    #[error("not in selection time: {0}")]
    NotSelectionTime(String),

    #[error("rejected: {0}")]
    Rejected(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("attempt timed out after {0:?}")]
    TimedOut(Duration),
}

impl AttemptError {
    /// Build the matching error from the remote's rejection text.
    ///
    /// First match wins; unrecognised text becomes `Rejected`.
    pub fn from_reason(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        if reason.contains(REASON_NOT_SELECTION_TIME) {
            AttemptError::NotSelectionTime(reason)
        } else if reason.contains(REASON_TARGET_FULL) {
            AttemptError::TargetFull(reason)
        } else if reason.contains(REASON_CONFLICT) {
            AttemptError::TargetConflict(reason)
        } else if reason.contains(REASON_ALREADY_SELECTED) {
            AttemptError::AlreadyAcquired(reason)
        } else if reason.contains(REASON_REQUIREMENT_EXCEEDED) {
            AttemptError::RequirementExceeded(reason)
        } else {
            AttemptError::Rejected(reason)
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            AttemptError::AuthFailed => OutcomeKind::AuthFailed,
            AttemptError::VerificationRequired => OutcomeKind::VerificationRequired,
            AttemptError::RequirementExceeded(_) => OutcomeKind::RequirementExceeded,
            AttemptError::AlreadyAcquired(_) => OutcomeKind::AlreadyAcquired,
            AttemptError::TargetFull(_) => OutcomeKind::TargetFull,
            AttemptError::TargetConflict(_) => OutcomeKind::TargetConflict,
            AttemptError::NotSelectionTime(_)
            | AttemptError::Rejected(_)
            | AttemptError::Transport(_)
            | AttemptError::TimedOut(_) => OutcomeKind::Transient,
        }
    }
}

/// Kind of an attempt result, success included.
pub fn kind_of(result: &Result<(), AttemptError>) -> OutcomeKind {
    match result {
        Ok(()) => OutcomeKind::Success,
        Err(e) => e.kind(),
    }
}
