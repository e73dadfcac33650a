//! # circuitvisor
//!
//! **Circuitvisor** evaluates boolean circuits (trees of logic gates)
//! concurrently: every node runs as its own task, gates decide as soon as
//! their value is logically determined, and the children they no longer need
//! are cancelled.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!        NodeRef (immutable tree)          NodeRef               NodeRef
//!              │                              │                     │
//!              ▼                              ▼                     ▼
//! ┌───────────────────────────────────────────────────────────────────────┐
//! │  Solver                                                               │
//! │  - runtime_token (root of every cancellation tree)                    │
//! │  - stopped flag (unset → set, never reset)                            │
//! │  - TaskTracker (shared pool bookkeeping, shutdown wait)               │
//! │  - AliveTracker (in-flight request ids, shutdown report)              │
//! │  - Bus + SubscriberSet (observability)                                │
//! └──────┬──────────────────────────┬──────────────────────────┬──────────┘
//!        ▼                          ▼                          ▼
//!   EvalTask (root)            EvalTask (root)            CircuitValue (Stopped)
//!   ├─► EvalTask ─► ...        ├─► EvalTask                 (after stop())
//!   ├─► EvalTask               └─► EvalTask
//!   └─► EvalTask
//!        │
//!        │ results: child ──(idx, bool)──► parent   (mpsc, arrival order)
//!        │ cancel:  parent ──token.cancel()──► subtree (CancellationToken tree)
//!        ▼
//!   Resolver ──► CircuitValue::value() ─► Ok(bool) | Err(Cancelled | Stopped | MalformedNode)
//! ```
//!
//! ### Gate policies
//! ```text
//! LEAF   leaf.value(token)
//! NOT    !child
//! AND    first false ─► false (prune rest) │ all true  ─► true
//! OR     first true  ─► true  (prune rest) │ all false ─► false
//! GT(k)  trues  > k     ─► true (prune)    │ all seen  ─► false
//! LT(k)  falses > N - k ─► true (prune)    │ all seen  ─► false
//! IF     cond, then, else start together; cond decides which branch is cancelled
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                        |
//! |-------------------|---------------------------------------------------------------|-------------------------------------------|
//! | **Circuits**      | Immutable gate trees with validated arity.                    | [`Node`], [`NodeRef`], [`GateKind`]       |
//! | **Leaves**        | Async, interruptible value sources.                           | [`Leaf`], [`LeafFn`]                      |
//! | **Evaluation**    | Concurrent, short-circuiting evaluation with global stop.     | [`Solver`], [`CircuitValue`]              |
//! | **Policies**      | Streaming aggregation rules for multi-input gates.            | [`Aggregate`], [`AllOf`], [`MoreThan`]    |
//! | **Subscriber API**| Hook into request and gate events (logging, metrics).         | [`Subscribe`], [`Event`]                  |
//! | **Errors**        | Typed errors for evaluation and runtime.                      | [`SolveError`], [`RuntimeError`]          |
//! | **Configuration** | Centralize runtime settings.                                  | [`SolverConfig`]                          |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use circuitvisor::{Node, Solver, SolverConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let solver = Solver::builder(SolverConfig::default()).build();
//!
//!     // IF(x, AND(a, b), NOT(c)): the unneeded branch is cancelled once x is known.
//!     let circuit = Node::if_then_else(
//!         Node::constant(true),
//!         Node::and(vec![
//!             Node::delayed(true, Duration::from_millis(20)),
//!             Node::constant(true),
//!         ])?,
//!         Node::not(Node::delayed(true, Duration::from_secs(60))),
//!     );
//!
//!     let value = solver.submit(&circuit);
//!     assert!(value.value().await?);
//!
//!     solver.shutdown().await?;
//!     Ok(())
//! }
//! ```
mod circuit;
mod core;
mod error;
mod events;
mod policies;
mod subscribers;

// ---- Public re-exports ----

pub use circuit::{GateKind, Leaf, LeafFn, LeafRef, Node, NodeRef};
pub use crate::core::{CircuitValue, Solver, SolverBuilder, SolverConfig};
pub use error::{RuntimeError, SolveError};
pub use events::{Event, EventKind};
pub use policies::{Aggregate, AllOf, AnyOf, FewerThan, MoreThan};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
