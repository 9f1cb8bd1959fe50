//! WorkerLoop - 取得ループ
//!
//! # フロー
//! 1. 開始時刻まで待つ（キャンセルと競合させる）
//! 2. Connector で client を開く
//! 3. キュー先頭を peek → attempt → Decider → pop / 残す / 中断
//! 4. 結果に関係なく delay だけ待つ
//! 5. priority mode なら 1 回で終了
//!
//! 終了時は必ず自分の handle を片付けて Idle に戻す（drop guard）。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{Instrument, debug, error, info, info_span, warn};

use super::grabber::Shared;
use super::status::RunExit;
use crate::domain::{
    Account, AttemptError, AttemptRecord, Decider, Decision, Policy, RunId, Target,
};
use crate::ports::{AcquisitionClient, Clock, Connector};
use crate::queue::TargetQueue;

/// Everything one run needs. Owned by the spawned task.
pub(crate) struct WorkerContext {
    pub run_id: RunId,
    pub account: Account,
    pub policy: Policy,
    pub queue: TargetQueue,
    pub connector: Arc<dyn Connector>,
    pub decider: Arc<dyn Decider>,
    pub clock: Arc<dyn Clock>,
    pub past_gate: Arc<AtomicBool>,
    pub shared: Arc<Shared>,
}

/// Clears the run's handle however the task ends (return, panic, abort).
struct ReleaseOnDrop {
    run_id: RunId,
    shared: Arc<Shared>,
}

impl Drop for ReleaseOnDrop {
    fn drop(&mut self) {
        if self.shared.release(self.run_id) {
            debug!(run_id = %self.run_id, "worker released its handle");
        }
    }
}

pub(crate) async fn run(ctx: WorkerContext, mut cancel_rx: watch::Receiver<bool>) {
    let span = info_span!("grabber_run", run_id = %ctx.run_id);

    async move {
        let _release = ReleaseOnDrop {
            run_id: ctx.run_id,
            shared: Arc::clone(&ctx.shared),
        };

        // cancel を優先。負けた側の future（in-flight の attempt を含む）は drop される
        let exit = tokio::select! {
            biased;
            _ = cancelled(&mut cancel_rx) => RunExit::Cancelled,
            exit = drive(&ctx) => exit,
        };

        match &exit {
            RunExit::Exhausted => info!("queue exhausted, worker finished"),
            RunExit::PriorityDone => info!("priority mode: stopped after first attempt"),
            RunExit::Aborted { target_id, reason } => {
                error!(%target_id, %reason, "error occurred, run aborted")
            }
            RunExit::ConnectFailed { reason } => error!(%reason, "could not open a session"),
            RunExit::Cancelled => info!("worker cancelled"),
        }
        ctx.shared.set_last_exit(exit);
    }
    .instrument(span)
    .await
}

async fn cancelled(rx: &mut watch::Receiver<bool>) {
    // Sender が drop された場合も止める
    let _ = rx.wait_for(|cancel| *cancel).await;
}

async fn drive(ctx: &WorkerContext) -> RunExit {
    if let Some(wait) = ctx.policy.wait_from(ctx.clock.now()) {
        info!(?wait, start_at = ?ctx.policy.start_at, "waiting for start time");
        tokio::time::sleep(wait).await;
    }

    ctx.past_gate.store(true, Ordering::Release);
    info!(queued = ctx.queue.len(), "running");

    let client = match ctx.connector.connect(&ctx.account).await {
        Ok(client) => client,
        Err(e) => return RunExit::ConnectFailed { reason: e.to_string() },
    };

    // 先頭ターゲットに対して既に使ったリトライ回数
    let mut retries: u32 = 0;

    loop {
        let Some(target) = ctx.queue.peek_front() else {
            return RunExit::Exhausted;
        };

        let started_at = ctx.clock.now();
        let result = attempt_once(client.as_ref(), &target, ctx.policy.attempt_timeout).await;
        let decision = ctx.decider.decide(&result, retries);
        log_attempt(&target, &result, &decision);

        if decision.removes_target() {
            ctx.queue.pop_front_if(target.id);
        }
        retries = retries_after(&decision, retries);

        ctx.shared.push_history(AttemptRecord::new(
            ctx.run_id,
            &target,
            &result,
            decision.clone(),
            started_at,
        ));

        // 成功時も含めて必ず待つ（中断する前も）
        tokio::time::sleep(ctx.policy.delay).await;

        if let Decision::Abort { reason } = decision {
            return RunExit::Aborted {
                target_id: target.id,
                reason,
            };
        }

        if ctx.policy.priority_mode {
            return RunExit::PriorityDone;
        }
    }
}

/// Retry count for the head target after `decision`.
fn retries_after(decision: &Decision, retries: u32) -> u32 {
    match decision {
        Decision::Complete | Decision::Skip { .. } => 0,
        // retry forever + delay 0 でも溢れない
        Decision::Retry { .. } => retries.saturating_add(1),
        Decision::Abort { .. } => retries,
    }
}

async fn attempt_once(
    client: &dyn AcquisitionClient,
    target: &Target,
    timeout: Option<Duration>,
) -> Result<(), AttemptError> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, client.attempt(target))
            .await
            .unwrap_or(Err(AttemptError::TimedOut(limit))),
        None => client.attempt(target).await,
    }
}

fn log_attempt(target: &Target, result: &Result<(), AttemptError>, decision: &Decision) {
    let target_id = target.id;
    let name = target.name.as_str();
    match (result, decision) {
        (Ok(()), _) => info!(%target_id, name, "grabbed target successfully"),
        (Err(e), Decision::Abort { .. }) => error!(%target_id, name, error = %e, "fatal outcome"),
        (Err(e), Decision::Retry { reason }) => {
            warn!(%target_id, name, error = %e, %reason, "attempt failed, will retry")
        }
        (Err(e), _) => warn!(%target_id, name, error = %e, "skipped target"),
    }
}
