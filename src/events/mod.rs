//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to runtime events emitted by the solver, evaluation
//! tasks and subscriber workers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Solver` (submit/stop/shutdown), `EvalTask` (decisions,
//!   cancellations), root resolvers (request outcome), `SubscriberSet` workers.
//! - **Consumers**: the solver listener, which updates the in-flight tracker
//!   and fans out to `SubscriberSet`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
