//! Status - 実行がなぜ終わったかの説明
//!
//! `status()` は Idle/Waiting/Running しか返さないので、
//! 「キューが残っているのに Idle」の理由はここで読む。

use serde::{Deserialize, Serialize};

use crate::domain::{GrabberStatus, RunId, TargetId};

/// Why the last worker run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "exit", rename_all = "snake_case")]
pub enum RunExit {
    /// The queue ran empty.
    Exhausted,

    /// Priority mode: one attempt was made.
    PriorityDone,

    /// A fatal outcome stopped the run. Remaining targets are still queued.
    Aborted { target_id: TargetId, reason: String },

    /// No client session could be opened.
    ConnectFailed { reason: String },

    /// Stopped by `cancel` (or by dropping the engine).
    Cancelled,
}

impl RunExit {
    /// Did the run stop before it ran out of work on its own terms?
    pub fn is_failure(&self) -> bool {
        matches!(self, RunExit::Aborted { .. } | RunExit::ConnectFailed { .. })
    }
}

/// Point-in-time view of an engine, for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusView {
    pub status: GrabberStatus,
    pub run_id: Option<RunId>,
    pub queued: usize,
    pub attempts: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_exit: Option<RunExit>,
}
