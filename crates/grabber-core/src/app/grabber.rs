//! Grabber - エンジン本体とライフサイクル API
//!
//! # 設計
//! - ワーカーは最大 1 つ。handle は `Mutex<Option<WorkerHandle>>` に置き、
//!   `start` はロック内で check-and-set する（同時 start でも 2 つ目は false）
//! - 状態は handle の有無と wait gate 通過フラグから導出する
//! - `status` / `queue` / `history` はロックを一瞬だけ取ってコピーを返す。
//!   どのロックも `.await` を跨がない
//! - history はリングバッファ。容量を超えたら古いものから捨てる。
//!   attempt 数は別カウンタで数え続ける

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::builder::GrabberBuilder;
use super::status::{RunExit, StatusView};
use super::worker_loop::{self, WorkerContext};
use crate::domain::{Account, AttemptRecord, Decider, GrabberStatus, Policy, RunId, Target};
use crate::ports::{Clock, Connector};
use crate::queue::TargetQueue;

/// Attempt records kept by default. At the default 500 ms delay this is a
/// little over eight minutes of retries.
pub const DEFAULT_HISTORY_CAPACITY: usize = 1024;

/// The active worker.
struct WorkerHandle {
    run_id: RunId,
    past_gate: Arc<AtomicBool>,
    cancel_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// State shared between the engine and its worker.
pub(crate) struct Shared {
    worker: Mutex<Option<WorkerHandle>>,
    history: Mutex<VecDeque<AttemptRecord>>,
    history_capacity: usize,
    attempts: AtomicUsize,
    last_exit: Mutex<Option<RunExit>>,
}

impl Shared {
    fn new(history_capacity: usize) -> Self {
        Self {
            worker: Mutex::new(None),
            history: Mutex::new(VecDeque::with_capacity(history_capacity.min(64))),
            history_capacity,
            attempts: AtomicUsize::new(0),
            last_exit: Mutex::new(None),
        }
    }

    /// Drop the handle if it still belongs to `run_id`.
    ///
    /// A finished worker must never clear the handle of a newer run.
    pub(crate) fn release(&self, run_id: RunId) -> bool {
        let mut slot = lock(&self.worker);
        if slot.as_ref().is_some_and(|h| h.run_id == run_id) {
            *slot = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn push_history(&self, record: AttemptRecord) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        let mut history = lock(&self.history);
        history.push_back(record);
        while history.len() > self.history_capacity {
            history.pop_front();
        }
    }

    pub(crate) fn set_last_exit(&self, exit: RunExit) {
        *lock(&self.last_exit) = Some(exit);
    }

    fn take_worker(&self) -> Option<WorkerHandle> {
        let mut slot = lock(&self.worker);
        let handle = slot.take()?;
        // ignore send error: the worker may already be gone
        let _ = handle.cancel_tx.send(true);
        Some(handle)
    }
}

/// Course grabber engine.
///
/// # 使用例
/// ```ignore
/// let grabber = Grabber::builder(account, connector)
///     .policy(Policy::default().with_priority_mode(true))
///     .targets(courses)
///     .build()?;
///
/// grabber.start();
/// while grabber.status().is_active() {
///     println!("{:?} {:?}", grabber.status(), grabber.queue());
///     tokio::time::sleep(Duration::from_millis(200)).await;
/// }
/// ```
pub struct Grabber {
    account: Account,
    policy: Policy,
    queue: TargetQueue,
    connector: Arc<dyn Connector>,
    decider: Arc<dyn Decider>,
    clock: Arc<dyn Clock>,
    shared: Arc<Shared>,
}

impl Grabber {
    pub fn builder(account: Account, connector: Arc<dyn Connector>) -> GrabberBuilder {
        GrabberBuilder::new(account, connector)
    }

    /// Engine with the default decider and the system clock.
    pub fn new(
        account: Account,
        policy: Policy,
        targets: impl IntoIterator<Item = Target>,
        connector: Arc<dyn Connector>,
    ) -> Result<Self, super::builder::BuildError> {
        Self::builder(account, connector)
            .policy(policy)
            .targets(targets)
            .build()
    }

    pub(crate) fn from_parts(
        account: Account,
        policy: Policy,
        queue: TargetQueue,
        connector: Arc<dyn Connector>,
        decider: Arc<dyn Decider>,
        clock: Arc<dyn Clock>,
        history_capacity: usize,
    ) -> Self {
        Self {
            account,
            policy,
            queue,
            connector,
            decider,
            clock,
            shared: Arc::new(Shared::new(history_capacity)),
        }
    }

    /// Spawn the worker on the current tokio runtime.
    ///
    /// Returns `false` if a worker is already active (it is left untouched)
    /// or if there is no runtime to spawn on.
    pub fn start(&self) -> bool {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("start called outside a tokio runtime");
            return false;
        };

        let mut slot = lock(&self.shared.worker);
        if let Some(active) = slot.as_ref() {
            debug!(run_id = %active.run_id, "worker already active, start ignored");
            return false;
        }

        let run_id = RunId::generate();
        let past_gate = Arc::new(AtomicBool::new(false));
        let (cancel_tx, cancel_rx) = watch::channel(false);

        let ctx = WorkerContext {
            run_id,
            account: self.account.clone(),
            policy: self.policy.clone(),
            queue: self.queue.clone(),
            connector: Arc::clone(&self.connector),
            decider: Arc::clone(&self.decider),
            clock: Arc::clone(&self.clock),
            past_gate: Arc::clone(&past_gate),
            shared: Arc::clone(&self.shared),
        };

        // spawn した task が先に終わっても、release はこのロックが外れるまで待つ
        let join = runtime.spawn(worker_loop::run(ctx, cancel_rx));
        *slot = Some(WorkerHandle {
            run_id,
            past_gate,
            cancel_tx,
            join,
        });

        info!(%run_id, queued = self.queue.len(), "grabber started");
        true
    }

    /// Stop the active worker.
    ///
    /// Returns `false` if nothing was running. On `true` the worker task has
    /// terminated: an in-flight attempt is dropped, not awaited, and no further
    /// attempt will be made. The engine is `Idle` afterwards.
    ///
    /// A worker that had already finished keeps the exit it recorded.
    pub async fn cancel(&self) -> bool {
        let Some(handle) = self.shared.take_worker() else {
            return false;
        };

        let run_id = handle.run_id;
        handle.join.abort();
        // abort 済みなので次の await 地点ですぐ終わる
        match handle.join.await {
            Err(e) if e.is_cancelled() => {
                self.shared.set_last_exit(RunExit::Cancelled);
                info!(%run_id, "grabber cancelled");
            }
            Err(e) => warn!(%run_id, error = %e, "worker panicked"),
            Ok(()) => debug!(%run_id, "worker had already finished"),
        }
        true
    }

    /// Current lifecycle state. Never waits on the worker.
    pub fn status(&self) -> GrabberStatus {
        let slot = lock(&self.shared.worker);
        match slot.as_ref() {
            None => GrabberStatus::Idle,
            Some(h) => GrabberStatus::derive(true, h.past_gate.load(Ordering::Acquire)),
        }
    }

    /// Copy of the remaining targets, head first.
    pub fn queue(&self) -> Vec<Target> {
        self.queue.snapshot()
    }

    /// Copy of the most recent attempts across runs, oldest first.
    ///
    /// Bounded by the builder's `history_capacity`; `view().attempts` keeps
    /// the full count.
    pub fn history(&self) -> Vec<AttemptRecord> {
        lock(&self.shared.history).iter().cloned().collect()
    }

    /// Why the most recent run ended, if one has.
    pub fn last_exit(&self) -> Option<RunExit> {
        lock(&self.shared.last_exit).clone()
    }

    pub fn view(&self) -> StatusView {
        let (status, run_id) = {
            let slot = lock(&self.shared.worker);
            match slot.as_ref() {
                None => (GrabberStatus::Idle, None),
                Some(h) => (
                    GrabberStatus::derive(true, h.past_gate.load(Ordering::Acquire)),
                    Some(h.run_id),
                ),
            }
        };
        StatusView {
            status,
            run_id,
            queued: self.queue.len(),
            attempts: self.shared.attempts.load(Ordering::Relaxed),
            last_exit: self.last_exit(),
        }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn account(&self) -> &Account {
        &self.account
    }
}

impl Drop for Grabber {
    fn drop(&mut self) {
        // エンジンが消えたらワーカーも止める
        if let Some(handle) = self.shared.take_worker() {
            handle.join.abort();
            debug!(run_id = %handle.run_id, "grabber dropped, worker aborted");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use tokio::time::{Instant, sleep};

    use super::*;
    use crate::domain::{AttemptError, Decision, OutcomeKind, TargetId};
    use crate::impls::{ScriptedClient, StaticConnector};
    use crate::ports::{AcquisitionClient, FixedClock};

    fn targets(ids: &[u64]) -> Vec<Target> {
        ids.iter()
            .map(|&id| Target::new(id, format!("course-{id}")))
            .collect()
    }

    fn engine(client: &Arc<ScriptedClient>, policy: Policy, ids: &[u64]) -> Grabber {
        let connector = Arc::new(StaticConnector::new(client.clone()));
        Grabber::new(Account::new("sid"), policy, targets(ids), connector).unwrap()
    }

    fn fast() -> Policy {
        Policy::default().with_delay(Duration::from_millis(100))
    }

    fn queued_ids(g: &Grabber) -> Vec<u64> {
        g.queue().iter().map(|t| t.id.as_u64()).collect()
    }

    async fn wait_idle(g: &Grabber) {
        tokio::time::timeout(Duration::from_secs(24 * 3600), async {
            while g.status() != GrabberStatus::Idle {
                sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("engine did not become idle");
    }

    #[tokio::test(start_paused = true)]
    async fn all_successes_drain_the_queue() {
        let client = Arc::new(ScriptedClient::new());
        let g = engine(&client, fast(), &[1, 2, 3]);

        assert!(g.start());
        wait_idle(&g).await;

        assert!(g.queue().is_empty());
        assert_eq!(client.call_count(), 3);
        assert_eq!(g.last_exit(), Some(RunExit::Exhausted));
        assert!(g.history().iter().all(|r| r.decision == Decision::Complete));
    }

    #[tokio::test(start_paused = true)]
    async fn full_targets_are_dropped_without_retry() {
        let client = Arc::new(ScriptedClient::with_fallback(Err(AttemptError::TargetFull(
            "full".into(),
        ))));
        let g = engine(&client, fast(), &[1, 2, 3]);

        g.start();
        wait_idle(&g).await;

        assert!(g.queue().is_empty());
        let attempted: Vec<u64> = client.calls().iter().map(|c| c.target_id.as_u64()).collect();
        assert_eq!(attempted, vec![1, 2, 3]);
        assert!(g.history().iter().all(|r| r.outcome == OutcomeKind::TargetFull));
    }

    #[tokio::test(start_paused = true)]
    async fn auth_failure_aborts_after_one_attempt() {
        let client = Arc::new(ScriptedClient::new().script(1, [Err(AttemptError::AuthFailed)]));
        let g = engine(&client, fast(), &[1, 2, 3]);

        g.start();
        wait_idle(&g).await;

        assert_eq!(client.call_count(), 1);
        assert_eq!(queued_ids(&g), vec![1, 2, 3]);
        assert!(matches!(
            g.last_exit(),
            Some(RunExit::Aborted { target_id, .. }) if target_id == TargetId::new(1)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn delay_is_honored_before_aborting() {
        let client = Arc::new(ScriptedClient::with_fallback(Err(
            AttemptError::VerificationRequired,
        )));
        let g = engine(&client, Policy::default().with_delay(Duration::from_millis(300)), &[1]);

        let before = Instant::now();
        g.start();
        wait_idle(&g).await;

        assert!(before.elapsed() >= Duration::from_millis(300));
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn priority_mode_stops_after_first_success() {
        let client = Arc::new(ScriptedClient::new());
        let g = engine(&client, fast().with_priority_mode(true), &[1, 2, 3]);

        g.start();
        wait_idle(&g).await;

        assert_eq!(client.call_count(), 1);
        assert_eq!(queued_ids(&g), vec![2, 3]);
        assert_eq!(g.last_exit(), Some(RunExit::PriorityDone));
    }

    #[tokio::test(start_paused = true)]
    async fn priority_mode_stops_after_first_failure() {
        let client = Arc::new(ScriptedClient::with_fallback(Err(AttemptError::Transport(
            "reset".into(),
        ))));
        let g = engine(&client, fast().with_priority_mode(true), &[1, 2]);

        g.start();
        wait_idle(&g).await;

        assert_eq!(client.call_count(), 1);
        // transient + retry: still at the head
        assert_eq!(queued_ids(&g), vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_start_time() {
        let now = Utc.with_ymd_and_hms(2024, 9, 2, 12, 0, 0).unwrap();
        let client = Arc::new(ScriptedClient::new());
        let policy = Policy::default()
            .with_delay(Duration::from_secs(1))
            .with_start_at(now + chrono::Duration::milliseconds(500));
        let g = Grabber::builder(Account::new("sid"), Arc::new(StaticConnector::new(client.clone())))
            .policy(policy)
            .targets(targets(&[1]))
            .clock(Arc::new(FixedClock(now)))
            .build()
            .unwrap();

        g.start();
        assert_eq!(g.status(), GrabberStatus::Waiting);

        sleep(Duration::from_millis(400)).await;
        assert_eq!(g.status(), GrabberStatus::Waiting);
        assert_eq!(client.call_count(), 0);

        sleep(Duration::from_millis(200)).await;
        assert_eq!(client.call_count(), 1);
        assert_eq!(g.status(), GrabberStatus::Running);

        wait_idle(&g).await;
        assert!(g.queue().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_during_wait_prevents_any_attempt() {
        let now = Utc.with_ymd_and_hms(2024, 9, 2, 12, 0, 0).unwrap();
        let client = Arc::new(ScriptedClient::new());
        let g = Grabber::builder(Account::new("sid"), Arc::new(StaticConnector::new(client.clone())))
            .policy(fast().with_start_at(now + chrono::Duration::milliseconds(500)))
            .targets(targets(&[1, 2]))
            .clock(Arc::new(FixedClock(now)))
            .build()
            .unwrap();

        g.start();
        sleep(Duration::from_millis(100)).await;
        assert_eq!(g.status(), GrabberStatus::Waiting);

        assert!(g.cancel().await);
        assert_eq!(g.status(), GrabberStatus::Idle);

        sleep(Duration::from_secs(5)).await;
        assert_eq!(client.call_count(), 0);
        assert_eq!(queued_ids(&g), vec![1, 2]);
        assert_eq!(g.last_exit(), Some(RunExit::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failure_is_retried_at_the_head() {
        let client = Arc::new(
            ScriptedClient::new().script(1, [Err(AttemptError::Transport("reset".into())), Ok(())]),
        );
        let g = engine(&client, Policy::default().with_delay(Duration::from_millis(200)), &[1, 2]);

        g.start();
        sleep(Duration::from_millis(100)).await;
        assert_eq!(client.call_count(), 1);
        assert_eq!(queued_ids(&g), vec![1, 2]);

        wait_idle(&g).await;
        assert!(g.queue().is_empty());

        let calls = client.calls();
        let attempted: Vec<u64> = calls.iter().map(|c| c.target_id.as_u64()).collect();
        assert_eq!(attempted, vec![1, 1, 2]);

        let gap = calls[1].at - calls[0].at;
        assert!(gap >= Duration::from_millis(200), "gap was {gap:?}");
        assert!(gap < Duration::from_millis(250), "gap was {gap:?}");

        let history = g.history();
        assert!(matches!(history[0].decision, Decision::Retry { .. }));
        assert_eq!(history[1].decision, Decision::Complete);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failure_is_dropped_when_retry_disabled() {
        let client = Arc::new(ScriptedClient::new().script(1, [Err(AttemptError::Rejected("?".into()))]));
        let g = engine(&client, fast().with_retry(false), &[1, 2]);

        g.start();
        wait_idle(&g).await;

        let attempted: Vec<u64> = client.calls().iter().map(|c| c.target_id.as_u64()).collect();
        assert_eq!(attempted, vec![1, 2]);
        assert!(g.queue().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn max_retries_drops_a_stuck_target() {
        let client = Arc::new(
            ScriptedClient::new().script(1, std::iter::repeat_n(Err(AttemptError::Transport("x".into())), 10)),
        );
        let g = engine(&client, fast().with_max_retries(2), &[1, 2]);

        g.start();
        wait_idle(&g).await;

        let attempted: Vec<u64> = client.calls().iter().map(|c| c.target_id.as_u64()).collect();
        assert_eq!(attempted, vec![1, 1, 1, 2]);
        assert!(g.queue().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn hung_attempt_times_out_as_transient() {
        let client = Arc::new(ScriptedClient::new().with_latency(Duration::from_secs(3600)));
        let policy = fast()
            .with_retry(false)
            .with_attempt_timeout(Duration::from_secs(1));
        let g = engine(&client, policy, &[1]);

        let before = Instant::now();
        g.start();
        wait_idle(&g).await;

        assert!(before.elapsed() < Duration::from_secs(60));
        let history = g.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].outcome, OutcomeKind::Transient);
        assert!(history[0].error.as_deref().unwrap().contains("timed out"));
        assert!(g.queue().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_abandons_in_flight_attempt() {
        let client = Arc::new(ScriptedClient::new().with_latency(Duration::from_secs(3600)));
        let g = engine(&client, fast(), &[1, 2]);

        g.start();
        sleep(Duration::from_millis(10)).await;
        assert_eq!(client.call_count(), 1);
        assert_eq!(g.status(), GrabberStatus::Running);

        let before = Instant::now();
        assert!(g.cancel().await);
        assert!(before.elapsed() < Duration::from_secs(1));
        assert_eq!(g.status(), GrabberStatus::Idle);

        sleep(Duration::from_secs(7200)).await;
        assert_eq!(client.call_count(), 1);
        assert_eq!(queued_ids(&g), vec![1, 2]);
        assert!(g.history().is_empty());
    }

    #[tokio::test]
    async fn cancel_on_idle_engine_returns_false() {
        let client = Arc::new(ScriptedClient::new());
        let g = engine(&client, fast(), &[1]);

        assert!(!g.cancel().await);
        assert!(!g.cancel().await);
        assert_eq!(g.status(), GrabberStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn start_on_running_engine_is_rejected() {
        let client = Arc::new(ScriptedClient::new().with_latency(Duration::from_secs(1)));
        let g = engine(&client, fast(), &[1, 2]);

        assert!(g.start());
        let run_id = g.view().run_id;
        assert!(run_id.is_some());

        assert!(!g.start());
        assert_eq!(g.view().run_id, run_id);

        wait_idle(&g).await;
        assert_eq!(client.call_count(), 2);
        assert!(g.queue().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn engine_can_restart_after_a_fatal_run() {
        let client = Arc::new(ScriptedClient::new().script(1, [Err(AttemptError::AuthFailed)]));
        let g = engine(&client, fast(), &[1, 2]);

        g.start();
        wait_idle(&g).await;
        assert_eq!(queued_ids(&g), vec![1, 2]);

        assert!(g.start());
        wait_idle(&g).await;
        assert!(g.queue().is_empty());
        assert_eq!(client.call_count(), 3);

        let runs: std::collections::HashSet<RunId> = g.history().iter().map(|r| r.run_id).collect();
        assert_eq!(runs.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn history_stays_bounded_while_retrying_forever() {
        let client = Arc::new(ScriptedClient::with_fallback(Err(
            AttemptError::NotSelectionTime("当前不是选课时间".into()),
        )));
        let g = engine(&client, Policy::default(), &[1]);

        g.start();
        sleep(Duration::from_secs(3600)).await;
        assert!(g.cancel().await);

        // 500 ms ごとに 1 回、1 時間で 7200 回
        assert!(client.call_count() >= 7000, "calls: {}", client.call_count());
        assert_eq!(g.history().len(), DEFAULT_HISTORY_CAPACITY);
        assert_eq!(g.view().attempts, client.call_count());
        assert_eq!(g.last_exit(), Some(RunExit::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn history_drops_the_oldest_records_first() {
        let client = Arc::new(ScriptedClient::new());
        let g = Grabber::builder(Account::new("sid"), Arc::new(StaticConnector::new(client.clone())))
            .policy(fast())
            .targets(targets(&[1, 2, 3]))
            .history_capacity(2)
            .build()
            .unwrap();

        g.start();
        wait_idle(&g).await;

        let kept: Vec<u64> = g.history().iter().map(|r| r.target_id.as_u64()).collect();
        assert_eq!(kept, vec![2, 3]);
        assert_eq!(g.view().attempts, 3);
    }

    #[tokio::test]
    async fn cancel_keeps_the_exit_of_a_run_that_already_finished() {
        let client = Arc::new(ScriptedClient::new());
        let g = engine(&client, fast(), &[]);

        // Exhausted を記録したが、まだ handle を release していないワーカー
        let join = tokio::spawn(async {});
        while !join.is_finished() {
            tokio::task::yield_now().await;
        }
        let (cancel_tx, _cancel_rx) = watch::channel(false);
        g.shared.set_last_exit(RunExit::Exhausted);
        *lock(&g.shared.worker) = Some(WorkerHandle {
            run_id: RunId::generate(),
            past_gate: Arc::new(AtomicBool::new(true)),
            cancel_tx,
            join,
        });
        assert_eq!(g.status(), GrabberStatus::Running);

        assert!(g.cancel().await);
        assert_eq!(g.status(), GrabberStatus::Idle);
        assert_eq!(g.last_exit(), Some(RunExit::Exhausted));
    }

    struct RefusingConnector;

    #[async_trait]
    impl Connector for RefusingConnector {
        async fn connect(
            &self,
            _account: &Account,
        ) -> Result<Arc<dyn AcquisitionClient>, AttemptError> {
            Err(AttemptError::AuthFailed)
        }
    }

    #[tokio::test]
    async fn connect_failure_ends_the_run() {
        let g = Grabber::new(
            Account::new("expired"),
            fast(),
            targets(&[1]),
            Arc::new(RefusingConnector),
        )
        .unwrap();

        g.start();
        wait_idle(&g).await;

        assert!(matches!(g.last_exit(), Some(RunExit::ConnectFailed { .. })));
        assert_eq!(queued_ids(&g), vec![1]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_starts_spawn_one_worker() {
        let client = Arc::new(ScriptedClient::new().with_latency(Duration::from_secs(3600)));
        let g = Arc::new(engine(&client, fast(), &[1]));

        let mut joins = Vec::new();
        for _ in 0..8 {
            let g = Arc::clone(&g);
            joins.push(tokio::spawn(async move { g.start() }));
        }

        let mut accepted = 0;
        for j in joins {
            if j.await.unwrap() {
                accepted += 1;
            }
        }
        assert_eq!(accepted, 1);

        assert!(g.cancel().await);
        assert_eq!(g.status(), GrabberStatus::Idle);
    }

    #[test]
    fn start_outside_runtime_returns_false() {
        let client = Arc::new(ScriptedClient::new());
        let g = engine(&client, fast(), &[1]);
        assert!(!g.start());
        assert_eq!(g.status(), GrabberStatus::Idle);
    }
}
