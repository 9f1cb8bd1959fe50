//! State - エンジンのライフサイクル状態

use serde::{Deserialize, Serialize};

/// Lifecycle state of a grabber engine.
///
/// # 状態遷移
/// - Idle -> Waiting: `start`
/// - Waiting -> Running: 開始時刻に到達
/// - Waiting/Running -> Idle: `cancel`、キュー枯渇、致命的エラー、priority mode の 1 回目終了
///
/// 直接セットはできない。worker handle の有無と wait gate の通過有無から導出する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GrabberStatus {
    Idle,
    Waiting,
    Running,
}

impl GrabberStatus {
    pub fn derive(worker_present: bool, past_gate: bool) -> Self {
        match (worker_present, past_gate) {
            (false, _) => GrabberStatus::Idle,
            (true, false) => GrabberStatus::Waiting,
            (true, true) => GrabberStatus::Running,
        }
    }

    pub fn is_active(self) -> bool {
        !matches!(self, GrabberStatus::Idle)
    }
}
