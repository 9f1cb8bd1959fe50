//! GrabberBuilder - エンジンの構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）

use std::sync::Arc;

use super::grabber::{DEFAULT_HISTORY_CAPACITY, Grabber};
use crate::domain::{Account, Decider, DefaultDecider, Policy, Target};
use crate::ports::{Clock, Connector, SystemClock};
use crate::queue::TargetQueue;

/// BuildError はエンジン構築時のエラー
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("attempt_timeout must be greater than zero")]
    ZeroAttemptTimeout,
}

/// GrabberBuilder はエンジンを構築
///
/// # 使用例
/// ```ignore
/// let grabber = GrabberBuilder::new(account, connector)
///     .policy(policy)
///     .targets(courses)
///     .clock(Arc::new(FixedClock(now)))
///     .build()?;
/// ```
///
/// decider を指定しなければ policy から `DefaultDecider` を作る。
pub struct GrabberBuilder {
    account: Account,
    connector: Arc<dyn Connector>,
    policy: Policy,
    targets: Vec<Target>,
    clock: Option<Arc<dyn Clock>>,
    decider: Option<Arc<dyn Decider>>,
    history_capacity: usize,
}

impl GrabberBuilder {
    pub fn new(account: Account, connector: Arc<dyn Connector>) -> Self {
        Self {
            account,
            connector,
            policy: Policy::default(),
            targets: Vec::new(),
            clock: None,
            decider: None,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }

    pub fn policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    /// Append targets. Order is priority.
    pub fn targets(mut self, targets: impl IntoIterator<Item = Target>) -> Self {
        self.targets.extend(targets);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn decider(mut self, decider: Arc<dyn Decider>) -> Self {
        self.decider = Some(decider);
        self
    }

    /// How many attempt records `history()` keeps. Older ones are dropped.
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// # 検証
    /// - attempt_timeout が 0 なら全 attempt が即タイムアウトするので弾く
    pub fn build(self) -> Result<Grabber, BuildError> {
        if self.policy.attempt_timeout.is_some_and(|t| t.is_zero()) {
            return Err(BuildError::ZeroAttemptTimeout);
        }

        let decider = self
            .decider
            .unwrap_or_else(|| Arc::new(DefaultDecider::from_policy(&self.policy)));
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        Ok(Grabber::from_parts(
            self.account,
            self.policy,
            TargetQueue::new(self.targets),
            self.connector,
            decider,
            clock,
            self.history_capacity,
        ))
    }
}
