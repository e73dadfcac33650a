//! # Solver: accepts circuits, schedules root tasks, stops everything on demand.
//!
//! The [`Solver`] owns the event bus, a [`SubscriberSet`], the in-flight tracker
//! and the runtime token every evaluation descends from.
//!
//! ## Key responsibilities
//! - turn each [`submit`](Solver::submit) into one root [`EvalTask`] and a [`CircuitValue`]
//! - subscribe to the [`Bus`] and **fan-out** events via [`SubscriberSet`]
//! - irreversible [`stop`](Solver::stop): cancel all in-flight work, reject future requests
//! - optional [`shutdown`](Solver::shutdown): stop, then wait up to [`SolverConfig::grace`]
//!
//! ## High-level architecture
//! ```text
//! submit(root):
//!   stopped? ──yes──► CircuitValue (already Stopped), RequestRejected, nothing spawned
//!      │no
//!      ▼
//!   request_token = runtime_token.child_token()
//!   AliveTracker.insert(id); (CircuitValue, Resolver) ◄── pending slot
//!   tracker.spawn_on(EvalTask(root).run() ─► resolver.resolve(verdict))
//!
//! Cancellation tree:
//!   runtime_token ─► request_token ─► task token ─► child task tokens ─► ...
//!        ▲ stop()         ▲ CircuitValue::cancel()       ▲ pruning (FanIn)
//!
//! Shutdown path:
//!   stop() ─► tracker.close() ─► timeout(grace, tracker.wait())
//!                                  ├─ Ok       → publish AllStoppedWithin
//!                                  └─ Elapsed  → publish GraceExceeded
//!                                                (AliveTracker.snapshot() for stuck requests)
//!
//! Dropping the solver stops it like stop().
//! ```
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use circuitvisor::{Node, SolveError, Solver, SolverConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), SolveError> {
//!     let solver = Solver::builder(SolverConfig::default()).build();
//!
//!     let circuit = Node::or(vec![
//!         Node::delayed(false, Duration::from_secs(60)),
//!         Node::constant(true),
//!     ])?;
//!     assert!(solver.submit(&circuit).value().await?);
//!
//!     solver.stop();
//!     let late = solver.submit(&circuit);
//!     assert_eq!(late.value().await, Err(SolveError::Stopped));
//!     Ok(())
//! }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::runtime::Handle;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use super::{
    alive::AliveTracker,
    builder::SolverBuilder,
    task::{EvalContext, EvalTask},
    value::CircuitValue,
};
use crate::{
    circuit::NodeRef,
    core::SolverConfig,
    error::RuntimeError,
    events::{Bus, Event, EventKind},
    subscribers::SubscriberSet,
};

/// Concurrent circuit evaluator with global, irreversible stop.
pub struct Solver {
    cfg: SolverConfig,
    bus: Bus,
    subs: Arc<SubscriberSet>,
    alive: Arc<AliveTracker>,
    runtime: Handle,
    tracker: TaskTracker,
    runtime_token: CancellationToken,
    listener_token: CancellationToken,
    stopped: Arc<AtomicBool>,
    next_request: AtomicU64,
}

impl Solver {
    /// Creates a [`SolverBuilder`] for the given configuration.
    pub fn builder(cfg: SolverConfig) -> SolverBuilder {
        SolverBuilder::new(cfg)
    }

    pub(crate) fn new_internal(
        cfg: SolverConfig,
        bus: Bus,
        subs: Arc<SubscriberSet>,
        alive: Arc<AliveTracker>,
        runtime: Handle,
    ) -> Self {
        Self {
            cfg,
            bus,
            subs,
            alive,
            runtime,
            tracker: TaskTracker::new(),
            runtime_token: CancellationToken::new(),
            listener_token: CancellationToken::new(),
            stopped: Arc::new(AtomicBool::new(false)),
            next_request: AtomicU64::new(1),
        }
    }

    /// Starts evaluating `root` concurrently and returns immediately.
    ///
    /// After [`stop`](Self::stop) the returned handle has already failed with
    /// [`SolveError::Stopped`](crate::SolveError::Stopped) and no task is scheduled.
    pub fn submit(&self, root: &NodeRef) -> CircuitValue {
        let request = self.next_request.fetch_add(1, Ordering::Relaxed);
        if self.is_stopped() {
            self.bus
                .publish(Event::new(EventKind::RequestRejected).with_request(request));
            return CircuitValue::stopped(request);
        }

        let token = self.runtime_token.child_token();
        self.alive.insert(request);
        let (value, resolver) = CircuitValue::pending(
            request,
            token.clone(),
            Arc::clone(&self.stopped),
            Arc::clone(&self.alive),
            self.bus.clone(),
        );
        let ctx = Arc::new(EvalContext {
            request,
            bus: self.bus.clone(),
            tracker: self.tracker.clone(),
            runtime: self.runtime.clone(),
        });

        self.bus.publish(
            Event::new(EventKind::RequestSubmitted)
                .with_request(request)
                .with_gate(root.kind()),
        );
        let task = EvalTask::new(Arc::clone(root), Arc::clone(&ctx), token);
        ctx.spawn(async move {
            resolver.resolve(task.run().await);
        });
        value
    }

    /// Stops the solver: cancels every in-flight task and rejects future submits.
    ///
    /// Idempotent and non-blocking; tasks unwind asynchronously.
    pub fn stop(&self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        self.bus.publish(Event::new(EventKind::StopRequested));
        self.runtime_token.cancel();
    }

    /// True once [`stop`](Self::stop) has been called.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Stops the solver and waits up to [`SolverConfig::grace`] for all tasks to unwind.
    ///
    /// Publishes [`EventKind::AllStoppedWithin`] on success, or
    /// [`EventKind::GraceExceeded`] on timeout and returns
    /// [`RuntimeError::GraceExceeded`] with the requests still in flight.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        self.stop();
        self.tracker.close();

        let grace = self.cfg.grace;
        match tokio::time::timeout(grace, self.tracker.wait()).await {
            Ok(()) => {
                self.bus
                    .publish(Event::new(EventKind::AllStoppedWithin).with_timeout(grace));
                Ok(())
            }
            Err(_elapsed) => {
                self.bus
                    .publish(Event::new(EventKind::GraceExceeded).with_timeout(grace));
                let stuck = self.alive.snapshot();
                Err(RuntimeError::GraceExceeded { grace, stuck })
            }
        }
    }

    /// Number of evaluation tasks currently alive across all requests.
    pub fn live_tasks(&self) -> usize {
        self.tracker.len()
    }

    /// Returns the solver configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.cfg
    }

    /// Subscribes to the bus and forwards events to the subscriber set.
    pub(crate) fn subscriber_listener(&self) {
        let mut rx = self.bus.subscribe();
        let set = Arc::clone(&self.subs);
        let token = self.listener_token.clone();

        self.runtime.spawn(async move {
            loop {
                let ev = tokio::select! {
                    _ = token.cancelled() => break,
                    ev = rx.recv() => ev,
                };
                match ev {
                    Ok(ev) => set.emit(ev),
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                }
            }
        });
    }
}

impl Drop for Solver {
    fn drop(&mut self) {
        self.stop();
        self.listener_token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use rand::Rng;
    use tokio::time::timeout;

    use super::*;
    use crate::{
        circuit::{Gate, GateKind, LeafFn, Node},
        error::SolveError,
        subscribers::Subscribe,
    };

    const LONG: Duration = Duration::from_secs(60);
    const PROMPT: Duration = Duration::from_secs(5);

    /// Collects every event it sees.
    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<Event>>,
    }

    impl Recorder {
        fn count(&self, kind: EventKind) -> usize {
            self.events
                .lock()
                .unwrap()
                .iter()
                .filter(|e| e.kind == kind)
                .count()
        }

        async fn wait_for(&self, pred: impl Fn(&Event) -> bool) -> Event {
            loop {
                let found = self.events.lock().unwrap().iter().find(|e| pred(e)).cloned();
                if let Some(ev) = found {
                    return ev;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        }
    }

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, ev: &Event) {
            self.events.lock().unwrap().push(ev.clone());
        }

        fn name(&self) -> &'static str {
            "recorder"
        }

        fn queue_capacity(&self) -> usize {
            65_536
        }
    }

    fn solver() -> Arc<Solver> {
        Solver::builder(SolverConfig::default()).build()
    }

    fn recorded() -> (Arc<Solver>, Arc<Recorder>) {
        let rec = Arc::new(Recorder::default());
        let solver = Solver::builder(SolverConfig::default())
            .with_subscribers(vec![rec.clone() as Arc<dyn Subscribe>])
            .build();
        (solver, rec)
    }

    /// Leaf that records the token it was started with, then sleeps for a long time.
    fn parked(seen: &Arc<Mutex<Vec<CancellationToken>>>, value: bool) -> NodeRef {
        let seen = Arc::clone(seen);
        Node::leaf(LeafFn::arc(move |ctx: CancellationToken| {
            let seen = Arc::clone(&seen);
            async move {
                seen.lock().unwrap().push(ctx);
                tokio::time::sleep(LONG).await;
                value
            }
        }))
    }

    fn all_cancelled(seen: &Arc<Mutex<Vec<CancellationToken>>>) -> bool {
        seen.lock().unwrap().iter().all(CancellationToken::is_cancelled)
    }

    async fn eval(solver: &Solver, root: &NodeRef) -> Result<bool, SolveError> {
        timeout(PROMPT, solver.submit(root).value())
            .await
            .expect("evaluation did not finish in time")
    }

    fn leaves(values: &[bool]) -> Vec<NodeRef> {
        values.iter().map(|v| Node::constant(*v)).collect()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_and_short_circuits_and_prunes() {
        let (solver, rec) = recorded();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let root = Node::and(vec![
            parked(&seen, true),
            Node::constant(false),
            parked(&seen, true),
        ])
        .unwrap();

        assert_eq!(eval(&solver, &root).await, Ok(false));
        assert!(all_cancelled(&seen));

        let decided = timeout(
            PROMPT,
            rec.wait_for(|e| e.kind == EventKind::GateDecided && e.gate == Some(GateKind::And)),
        )
        .await
        .unwrap();
        assert_eq!(decided.value, Some(false));
        assert_eq!(decided.pruned, Some(2));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_and_all_true() {
        let solver = solver();
        let root = Node::and(leaves(&[true, true, true])).unwrap();
        assert_eq!(eval(&solver, &root).await, Ok(true));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_or_short_circuits_and_prunes() {
        let solver = solver();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let root = Node::or(vec![parked(&seen, false), Node::constant(true)]).unwrap();

        assert_eq!(eval(&solver, &root).await, Ok(true));
        assert!(all_cancelled(&seen));

        let none = Node::or(leaves(&[false, false])).unwrap();
        assert_eq!(eval(&solver, &none).await, Ok(false));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_threshold_gates() {
        let solver = solver();
        let cases = [
            (Node::gt(1, leaves(&[true, true, false])).unwrap(), true),
            (Node::gt(2, leaves(&[true, true])).unwrap(), false),
            (Node::lt(2, leaves(&[false, false, false])).unwrap(), true),
            (Node::lt(1, leaves(&[true])).unwrap(), false),
            (Node::lt(0, leaves(&[false])).unwrap(), false),
            (Node::gt(0, leaves(&[false, false])).unwrap(), false),
        ];
        for (root, expected) in cases {
            assert_eq!(eval(&solver, &root).await, Ok(expected), "{root:?}");
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_gt_prunes_after_positive_decision() {
        let solver = solver();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let root = Node::gt(
            1,
            vec![
                Node::constant(true),
                parked(&seen, false),
                Node::constant(true),
            ],
        )
        .unwrap();
        assert_eq!(eval(&solver, &root).await, Ok(true));
        assert!(all_cancelled(&seen));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_lt_prunes_once_too_many_false() {
        let (solver, rec) = recorded();
        let seen = Arc::new(Mutex::new(Vec::new()));
        // LT(2) over 3 children: two falses already guarantee fewer than 2 trues.
        let root = Node::lt(
            2,
            vec![
                Node::constant(false),
                parked(&seen, true),
                Node::constant(false),
            ],
        )
        .unwrap();
        assert_eq!(eval(&solver, &root).await, Ok(true));
        assert!(all_cancelled(&seen));

        let decided = timeout(
            PROMPT,
            rec.wait_for(|e| e.kind == EventKind::GateDecided && e.gate == Some(GateKind::Lt)),
        )
        .await
        .unwrap();
        assert_eq!(decided.value, Some(true));
        assert_eq!(decided.pruned, Some(1));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_not() {
        let solver = solver();
        assert_eq!(eval(&solver, &Node::not(Node::constant(false))).await, Ok(true));
        let double = Node::not(Node::not(Node::constant(false)));
        assert_eq!(eval(&solver, &double).await, Ok(false));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_if_takes_then_and_cancels_else() {
        let solver = solver();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let root = Node::if_then_else(
            Node::delayed(true, Duration::from_millis(10)),
            Node::delayed(false, Duration::from_millis(30)),
            parked(&seen, true),
        );
        assert_eq!(eval(&solver, &root).await, Ok(false));
        assert!(all_cancelled(&seen));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_if_takes_else_and_cancels_then() {
        let solver = solver();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let root = Node::if_then_else(
            Node::constant(false),
            parked(&seen, false),
            Node::constant(true),
        );
        assert_eq!(eval(&solver, &root).await, Ok(true));
        assert!(all_cancelled(&seen));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_if_uses_branch_finished_before_condition() {
        let solver = solver();
        let root = Node::if_then_else(
            Node::delayed(true, Duration::from_millis(40)),
            Node::constant(true),
            Node::constant(false),
        );
        assert_eq!(eval(&solver, &root).await, Ok(true));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_stop_before_submit_schedules_nothing() {
        let (solver, rec) = recorded();
        solver.stop();

        let value = solver.submit(&Node::constant(true));
        assert!(value.is_finished());
        assert_eq!(value.try_value(), Some(Err(SolveError::Stopped)));
        assert_eq!(value.value().await, Err(SolveError::Stopped));
        assert_eq!(solver.live_tasks(), 0);

        timeout(PROMPT, rec.wait_for(|e| e.kind == EventKind::RequestRejected))
            .await
            .unwrap();
        assert_eq!(rec.count(EventKind::RequestSubmitted), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_stop_unblocks_every_waiter() {
        let solver = solver();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let root = Node::and(vec![
            Node::or(vec![parked(&seen, false), parked(&seen, false)]).unwrap(),
            Node::if_then_else(parked(&seen, true), parked(&seen, true), parked(&seen, true)),
            Node::not(parked(&seen, false)),
        ])
        .unwrap();

        let values: Vec<_> = (0..3).map(|_| solver.submit(&root)).collect();
        tokio::time::sleep(Duration::from_millis(50)).await;
        solver.stop();

        for value in values {
            let res = timeout(PROMPT, value.value()).await.expect("waiter hung after stop");
            assert_eq!(res, Err(SolveError::Stopped));
        }
        assert!(all_cancelled(&seen));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_stop_is_idempotent() {
        let (solver, rec) = recorded();
        solver.stop();
        solver.stop();
        assert!(solver.is_stopped());
        assert_eq!(
            solver.submit(&Node::constant(true)).value().await,
            Err(SolveError::Stopped)
        );

        timeout(PROMPT, rec.wait_for(|e| e.kind == EventKind::RequestRejected))
            .await
            .unwrap();
        assert_eq!(rec.count(EventKind::StopRequested), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_cancel_one_request() {
        let solver = solver();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let slow = Node::not(parked(&seen, true));

        let value = solver.submit(&slow);
        value.cancel();
        let res = timeout(PROMPT, value.value()).await.unwrap();
        assert_eq!(res, Err(SolveError::Cancelled));
        assert!(all_cancelled(&seen));

        assert!(!solver.is_stopped());
        assert_eq!(eval(&solver, &Node::constant(true)).await, Ok(true));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_malformed_node_surfaces() {
        let solver = solver();
        let bad_not = Node::unchecked(Gate::Not, leaves(&[true, false]));
        let res = eval(&solver, &bad_not).await;
        assert!(matches!(res, Err(SolveError::MalformedNode { kind: GateKind::Not, .. })));

        let bad_if = Node::unchecked(Gate::If, leaves(&[true]));
        let nested = Node::or(vec![Node::delayed(true, LONG), bad_if]).unwrap();
        let res = eval(&solver, &nested).await;
        assert!(matches!(res, Err(SolveError::MalformedNode { kind: GateKind::If, .. })));

        let bad_gt = Node::unchecked(Gate::Gt(3), leaves(&[true]));
        assert!(eval(&solver, &bad_gt).await.is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_submit_and_wait_from_plain_thread() {
        let solver = solver();
        let root = Node::or(vec![Node::delayed(true, Duration::from_millis(10))]).unwrap();

        let worker = Arc::clone(&solver);
        let res = tokio::task::spawn_blocking(move || {
            std::thread::spawn(move || worker.submit(&root).blocking_value())
                .join()
                .expect("caller thread panicked")
        })
        .await
        .unwrap();
        assert_eq!(res, Ok(true));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_shutdown_within_grace() {
        let (solver, rec) = recorded();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let value = solver.submit(&Node::and(vec![parked(&seen, true), parked(&seen, true)]).unwrap());

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(solver.shutdown().await.is_ok());
        assert_eq!(solver.live_tasks(), 0);
        assert_eq!(value.value().await, Err(SolveError::Stopped));

        timeout(PROMPT, rec.wait_for(|e| e.kind == EventKind::AllStoppedWithin))
            .await
            .unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_shutdown_grace_exceeded() {
        let cfg = SolverConfig {
            grace: Duration::from_millis(50),
            ..SolverConfig::default()
        };
        let solver = Solver::builder(cfg).build();
        // Blocks its worker thread, so cancellation cannot interrupt it.
        let stubborn = Node::leaf(LeafFn::arc(|_ctx: CancellationToken| async {
            std::thread::sleep(Duration::from_millis(400));
            true
        }));
        assert_eq!(eval(&solver, &Node::constant(true)).await, Ok(true));
        let value = solver.submit(&stubborn);

        tokio::time::sleep(Duration::from_millis(20)).await;
        match solver.shutdown().await {
            Err(RuntimeError::GraceExceeded { grace, stuck }) => {
                assert_eq!(grace, Duration::from_millis(50));
                assert_eq!(stuck, vec![value.request()]);
            }
            other => panic!("expected GraceExceeded, got {other:?}"),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_in_flight_tracking_survives_lagging_bus() {
        let cfg = SolverConfig {
            bus_capacity: 8,
            ..SolverConfig::default()
        };
        let solver = Solver::builder(cfg).build();
        // Every NOT publishes GateDecided, far more than the bus can hold.
        let wide = Node::and((0..500).map(|_| Node::not(Node::constant(false))).collect()).unwrap();

        let mut values = Vec::new();
        for _ in 0..10 {
            values.push(solver.submit(&wide));
            values.push(solver.submit(&Node::constant(true)));
        }
        for value in values {
            assert_eq!(timeout(PROMPT, value.value()).await.unwrap(), Ok(true));
        }
        assert!(solver.alive.snapshot().is_empty());
        assert!(solver.shutdown().await.is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_dropping_solver_stops_in_flight_work() {
        let solver = solver();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let value = solver.submit(&Node::and(vec![parked(&seen, true), parked(&seen, true)]).unwrap());

        drop(solver);
        let res = timeout(PROMPT, value.value()).await.expect("waiter hung after drop");
        assert_eq!(res, Err(SolveError::Stopped));
        assert!(all_cancelled(&seen));
    }

    /// Reference model: sequential evaluation of the same circuit.
    #[derive(Debug)]
    enum Shape {
        Leaf(bool, u64),
        Not(Box<Shape>),
        And(Vec<Shape>),
        Or(Vec<Shape>),
        Gt(usize, Vec<Shape>),
        Lt(usize, Vec<Shape>),
        If(Box<Shape>, Box<Shape>, Box<Shape>),
    }

    impl Shape {
        fn random<R: Rng>(rng: &mut R, depth: u32) -> Shape {
            if depth == 0 || rng.random_range(0..7) == 0 {
                return Shape::Leaf(rng.random_bool(0.5), rng.random_range(0..4));
            }
            match rng.random_range(0..6) {
                0 => Shape::Not(Box::new(Shape::random(rng, depth - 1))),
                1 => Shape::And(Shape::children(rng, depth)),
                2 => Shape::Or(Shape::children(rng, depth)),
                3 => {
                    let children = Shape::children(rng, depth);
                    Shape::Gt(rng.random_range(0..=children.len()), children)
                }
                4 => {
                    let children = Shape::children(rng, depth);
                    Shape::Lt(rng.random_range(0..=children.len()), children)
                }
                _ => Shape::If(
                    Box::new(Shape::random(rng, depth - 1)),
                    Box::new(Shape::random(rng, depth - 1)),
                    Box::new(Shape::random(rng, depth - 1)),
                ),
            }
        }

        fn children<R: Rng>(rng: &mut R, depth: u32) -> Vec<Shape> {
            let n = rng.random_range(1..4);
            (0..n).map(|_| Shape::random(rng, depth - 1)).collect()
        }

        fn expected(&self) -> bool {
            let trues = |c: &[Shape]| c.iter().filter(|s| s.expected()).count();
            match self {
                Shape::Leaf(v, _) => *v,
                Shape::Not(c) => !c.expected(),
                Shape::And(c) => c.iter().all(Shape::expected),
                Shape::Or(c) => c.iter().any(Shape::expected),
                Shape::Gt(k, c) => trues(c) > *k,
                Shape::Lt(k, c) => trues(c) < *k,
                Shape::If(c, t, e) => {
                    if c.expected() {
                        t.expected()
                    } else {
                        e.expected()
                    }
                }
            }
        }

        fn build(&self) -> NodeRef {
            let all = |c: &[Shape]| c.iter().map(Shape::build).collect::<Vec<_>>();
            match self {
                Shape::Leaf(v, ms) => Node::delayed(*v, Duration::from_millis(*ms)),
                Shape::Not(c) => Node::not(c.build()),
                Shape::And(c) => Node::and(all(c)).unwrap(),
                Shape::Or(c) => Node::or(all(c)).unwrap(),
                Shape::Gt(k, c) => Node::gt(*k, all(c)).unwrap(),
                Shape::Lt(k, c) => Node::lt(*k, all(c)).unwrap(),
                Shape::If(c, t, e) => Node::if_then_else(c.build(), t.build(), e.build()),
            }
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_results_match_sequential_model() {
        let solver = solver();
        let shapes: Vec<Shape> = {
            let mut rng = rand::rng();
            (0..40).map(|_| Shape::random(&mut rng, 3)).collect()
        };

        for shape in &shapes {
            let root = shape.build();
            for _ in 0..3 {
                assert_eq!(eval(&solver, &root).await, Ok(shape.expected()), "{shape:?}");
            }
        }
    }
}
