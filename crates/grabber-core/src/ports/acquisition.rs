//! AcquisitionClient port - 教務システムへの 1 回の登録リクエスト
//!
//! トランスポート、Cookie、レスポンス解析はすべて実装側の責務。
//! エンジンは「成功」か「分類済みの失敗」だけを受け取る。

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Account, AttemptError, Target};

/// One acquisition attempt against the remote service.
///
/// # 契約
/// - 内部でリトライしない（リトライ方針はすべてエンジン側）
/// - 返ってきた future を drop されたら、その時点で処理を放棄してよい
///   （キャンセル時、エンジンは in-flight の attempt を await せずに drop する）
#[async_trait]
pub trait AcquisitionClient: Send + Sync {
    async fn attempt(&self, target: &Target) -> Result<(), AttemptError>;
}

/// Opens a client bound to one account's session.
///
/// The engine connects once per run and never rotates credentials mid-run.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, account: &Account) -> Result<Arc<dyn AcquisitionClient>, AttemptError>;
}
