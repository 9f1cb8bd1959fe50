//! Attempt history: one record per acquisition attempt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::decision::Decision;
use super::ids::{RunId, TargetId};
use super::outcome::{AttemptError, OutcomeKind, kind_of};
use super::target::Target;

/// A single attempt and what the engine decided afterwards.
///
/// This is what the caller reads to explain why a target left the queue
/// (or why the run stopped early).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub run_id: RunId,
    pub target_id: TargetId,
    pub target_name: String,
    pub outcome: OutcomeKind,
    pub decision: Decision,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub started_at: DateTime<Utc>,
}

impl AttemptRecord {
    pub fn new(
        run_id: RunId,
        target: &Target,
        result: &Result<(), AttemptError>,
        decision: Decision,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            run_id,
            target_id: target.id,
            target_name: target.name.clone(),
            outcome: kind_of(result),
            decision,
            error: result.as_ref().err().map(ToString::to_string),
            started_at,
        }
    }
}
