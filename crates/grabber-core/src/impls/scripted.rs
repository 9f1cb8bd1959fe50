//! ScriptedClient - 開発用・テスト用の AcquisitionClient
//!
//! # 学習ポイント
//! - ターゲットごとに結果の台本（VecDeque）を持ち、呼ばれるたびに先頭を消費
//! - 台本が尽きたら fallback を返す
//! - latency を入れると「応答しない教務システム」を再現できる

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::domain::{Account, AttemptError, Target, TargetId};
use crate::ports::{AcquisitionClient, Connector};

/// One scripted outcome, in a form that can live in a JSON task file.
///
/// ```json
/// ["not_selection_time", "target_full", {"reason": "选课人数超出"}, "success"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptStep {
    Success,
    AuthFailed,
    VerificationRequired,
    RequirementExceeded,
    AlreadyAcquired,
    TargetFull,
    TargetConflict,
    NotSelectionTime,
    Transport,
    /// Raw rejection text from the remote, classified with `AttemptError::from_reason`.
    Reason(String),
}

impl ScriptStep {
    pub fn into_result(self) -> Result<(), AttemptError> {
        match self {
            ScriptStep::Success => Ok(()),
            ScriptStep::AuthFailed => Err(AttemptError::AuthFailed),
            ScriptStep::VerificationRequired => Err(AttemptError::VerificationRequired),
            ScriptStep::RequirementExceeded => {
                Err(AttemptError::RequirementExceeded("scripted".into()))
            }
            ScriptStep::AlreadyAcquired => Err(AttemptError::AlreadyAcquired("scripted".into())),
            ScriptStep::TargetFull => Err(AttemptError::TargetFull("scripted".into())),
            ScriptStep::TargetConflict => Err(AttemptError::TargetConflict("scripted".into())),
            ScriptStep::NotSelectionTime => {
                Err(AttemptError::NotSelectionTime("scripted".into()))
            }
            ScriptStep::Transport => Err(AttemptError::Transport("scripted".into())),
            ScriptStep::Reason(reason) => Err(AttemptError::from_reason(reason)),
        }
    }
}

/// A call observed by the scripted client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptCall {
    pub target_id: TargetId,
    /// tokio の Instant（テストで時刻を止めていても比較できる）
    pub at: Instant,
}

#[derive(Debug, Default)]
struct ScriptState {
    scripts: HashMap<TargetId, VecDeque<Result<(), AttemptError>>>,
    calls: Vec<AttemptCall>,
}

/// In-memory client that replays scripted outcomes.
#[derive(Debug)]
pub struct ScriptedClient {
    state: Mutex<ScriptState>,
    fallback: Result<(), AttemptError>,
    latency: Duration,
}

impl ScriptedClient {
    /// Client that succeeds for any target without a script.
    pub fn new() -> Self {
        Self::with_fallback(Ok(()))
    }

    pub fn with_fallback(fallback: Result<(), AttemptError>) -> Self {
        Self {
            state: Mutex::new(ScriptState::default()),
            fallback,
            latency: Duration::ZERO,
        }
    }

    /// Sleep this long inside every attempt.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Outcomes for `target_id`, consumed one per attempt.
    pub fn script(
        self,
        target_id: impl Into<TargetId>,
        outcomes: impl IntoIterator<Item = Result<(), AttemptError>>,
    ) -> Self {
        self.lock()
            .scripts
            .entry(target_id.into())
            .or_default()
            .extend(outcomes);
        self
    }

    fn lock(&self) -> MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every attempt seen so far, in call order.
    pub fn calls(&self) -> Vec<AttemptCall> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }
}

impl Default for ScriptedClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AcquisitionClient for ScriptedClient {
    async fn attempt(&self, target: &Target) -> Result<(), AttemptError> {
        let outcome = {
            let mut state = self.lock();
            state.calls.push(AttemptCall {
                target_id: target.id,
                at: Instant::now(),
            });
            state
                .scripts
                .get_mut(&target.id)
                .and_then(VecDeque::pop_front)
                .unwrap_or_else(|| self.fallback.clone())
        }; // Lock released here

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        outcome
    }
}

/// Hands out the same client for every account.
#[derive(Clone)]
pub struct StaticConnector {
    client: Arc<dyn AcquisitionClient>,
}

impl StaticConnector {
    pub fn new(client: Arc<dyn AcquisitionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Connector for StaticConnector {
    async fn connect(&self, _account: &Account) -> Result<Arc<dyn AcquisitionClient>, AttemptError> {
        Ok(Arc::clone(&self.client))
    }
}
