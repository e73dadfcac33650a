//! # EvalTask: one unit of concurrent work per circuit node.
//!
//! A task dispatches on its node's gate, spawns one child task per child,
//! consumes child results **in arrival order** and delivers exactly one
//! boolean upward once its value is decided.
//!
//! ## Architecture
//! ```text
//!                     parent FanIn (mpsc, many producers / one consumer)
//!                          ▲ (idx, Ok(bool))
//!  EvalTask::run() ────────┘
//!     │  select! { token.cancelled() ─► Err(Cancelled), dispatch() }
//!     ▼
//!  dispatch(gate)
//!     ├─ LEAF       ─► leaf.value(token)
//!     ├─ NOT        ─► fan_out ─► !first
//!     ├─ AND/OR/GT/LT ─► fan_out ─► aggregate(policy) ─► prune()
//!     └─ IF         ─► fan_out(cond, then, else) ─► cancel unneeded ─► await needed
//! ```
//!
//! ## Cancellation
//! - Every child runs on `token.child_token()`: cancelling a task cancels its subtree.
//! - Each suspension point (child receive, leaf future, `IF` wait) sits under
//!   the `select!` in [`EvalTask::run`], so a cancelled task never stays blocked.
//! - [`FanIn`] cancels every child it has not consumed when it is pruned or dropped.
//! - Cancelled tasks deliver nothing; only the root turns that into an error.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::{
    circuit::{Gate, NodeRef},
    error::SolveError,
    events::{Bus, Event, EventKind},
    policies::{Aggregate, AllOf, AnyOf, FewerThan, MoreThan},
};

/// Outcome of one task: a decided boolean or the reason there is none.
pub(crate) type Verdict = Result<bool, SolveError>;

/// Per-request state shared by every task of one evaluation.
pub(crate) struct EvalContext {
    /// Request id (for events).
    pub request: u64,
    /// Event bus.
    pub bus: Bus,
    /// Tracks every spawned task so shutdown can wait for them.
    pub tracker: TaskTracker,
    /// Runtime the tasks are spawned on.
    pub runtime: Handle,
}

impl EvalContext {
    pub(crate) fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tracker.spawn_on(fut, &self.runtime);
    }

    fn publish(&self, ev: Event) {
        self.bus.publish(ev.with_request(self.request));
    }
}

/// Evaluation of one node within one request.
pub(crate) struct EvalTask {
    node: NodeRef,
    ctx: Arc<EvalContext>,
    token: CancellationToken,
}

impl EvalTask {
    pub(crate) fn new(node: NodeRef, ctx: Arc<EvalContext>, token: CancellationToken) -> Self {
        Self { node, ctx, token }
    }

    /// Runs the task until it decides or its token is cancelled.
    ///
    /// Returns a boxed future so tasks can spawn tasks of their own type.
    pub(crate) fn run(self) -> BoxFuture<'static, Verdict> {
        Box::pin(async move {
            let res = tokio::select! {
                biased;
                _ = self.token.cancelled() => Err(SolveError::Cancelled),
                res = self.dispatch() => res,
            };
            if matches!(res, Err(SolveError::Cancelled)) {
                self.ctx
                    .publish(Event::new(EventKind::TaskCancelled).with_gate(self.node.kind()));
            }
            res
        })
    }

    async fn dispatch(&self) -> Verdict {
        let arity = self.node.children().len();
        match self.node.gate() {
            Gate::Leaf(source) => Ok(source.value(self.token.clone()).await),
            Gate::Not => self.negate().await,
            Gate::And => self.aggregate(AllOf).await,
            Gate::Or => self.aggregate(AnyOf).await,
            Gate::Gt(k) | Gate::Lt(k) if *k > arity => Err(self.malformed(format!(
                "threshold {k} exceeds child count {arity}"
            ))),
            Gate::Gt(k) => self.aggregate(MoreThan::new(*k)).await,
            Gate::Lt(k) => self.aggregate(FewerThan::new(*k, arity)).await,
            Gate::If => self.speculate().await,
        }
    }

    async fn negate(&self) -> Verdict {
        self.expect_arity(1)?;
        let mut fan = self.fan_out();
        let (_, value) = fan.next().await?;
        Ok(self.decided(!value, 0))
    }

    async fn aggregate<A: Aggregate + Send>(&self, mut policy: A) -> Verdict {
        if self.node.children().is_empty() {
            return Err(self.malformed("needs at least one child"));
        }
        let mut fan = self.fan_out();
        for _ in 0..fan.len() {
            let (_, value) = fan.next().await?;
            if let Some(decided) = policy.observe(value) {
                let pruned = fan.prune();
                return Ok(self.decided(decided, pruned));
            }
        }
        Ok(self.decided(policy.exhausted(), 0))
    }

    /// `IF`: condition and both branches start together; the branch the
    /// condition rules out is cancelled as soon as the condition arrives.
    async fn speculate(&self) -> Verdict {
        self.expect_arity(3)?;
        let mut fan = self.fan_out();

        let mut early = [None; 3];
        let cond = loop {
            let (idx, value) = fan.next().await?;
            if idx == 0 {
                break value;
            }
            if let Some(slot) = early.get_mut(idx) {
                *slot = Some(value);
            }
        };

        let (needed, unneeded) = if cond { (1, 2) } else { (2, 1) };
        let pruned = usize::from(fan.cancel(unneeded));

        let value = match early[needed] {
            Some(value) => value,
            None => loop {
                let (idx, value) = fan.next().await?;
                if idx == needed {
                    break value;
                }
            },
        };
        Ok(self.decided(value, pruned))
    }

    /// Spawns one child task per child node, all reporting into one channel.
    fn fan_out(&self) -> FanIn {
        let (tx, rx) = mpsc::unbounded_channel();
        let pending = self
            .node
            .children()
            .iter()
            .enumerate()
            .map(|(idx, child)| {
                let token = self.token.child_token();
                let task = EvalTask::new(Arc::clone(child), Arc::clone(&self.ctx), token.clone());
                let tx = tx.clone();
                self.ctx.spawn(async move {
                    match task.run().await {
                        Err(SolveError::Cancelled) => {}
                        verdict => {
                            let _ = tx.send((idx, verdict));
                        }
                    }
                });
                Some(token)
            })
            .collect();
        FanIn { rx, pending }
    }

    fn decided(&self, value: bool, pruned: usize) -> bool {
        self.ctx.publish(
            Event::new(EventKind::GateDecided)
                .with_gate(self.node.kind())
                .with_value(value)
                .with_pruned(pruned),
        );
        value
    }

    fn expect_arity(&self, n: usize) -> Result<(), SolveError> {
        let got = self.node.children().len();
        if got != n {
            return Err(self.malformed(format!("expected {n} children, got {got}")));
        }
        Ok(())
    }

    fn malformed(&self, reason: impl Into<String>) -> SolveError {
        SolveError::malformed(self.node.kind(), reason)
    }
}

/// Receiving side of a task's children, plus cancellation handles for the
/// children whose result has not been consumed yet.
struct FanIn {
    rx: mpsc::UnboundedReceiver<(usize, Verdict)>,
    pending: Vec<Option<CancellationToken>>,
}

impl FanIn {
    fn len(&self) -> usize {
        self.pending.len()
    }

    /// Next child result in arrival order.
    ///
    /// A closed channel means every remaining child was cancelled.
    async fn next(&mut self) -> Result<(usize, bool), SolveError> {
        match self.rx.recv().await {
            Some((idx, verdict)) => {
                if let Some(slot) = self.pending.get_mut(idx) {
                    slot.take();
                }
                verdict.map(|value| (idx, value))
            }
            None => Err(SolveError::Cancelled),
        }
    }

    /// Cancels one child; returns `false` if it already delivered.
    fn cancel(&mut self, idx: usize) -> bool {
        match self.pending.get_mut(idx).and_then(Option::take) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancels every child that has not delivered; returns how many.
    fn prune(&mut self) -> usize {
        let mut pruned = 0;
        for token in self.pending.iter_mut().filter_map(Option::take) {
            token.cancel();
            pruned += 1;
        }
        pruned
    }
}

impl Drop for FanIn {
    fn drop(&mut self) {
        self.prune();
    }
}
