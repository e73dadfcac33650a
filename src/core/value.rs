//! # CircuitValue: the caller's handle to one evaluation request.
//!
//! The root task resolves a write-once slot through a [`Resolver`]; the handle
//! reads it. Cancellation is explicit at this boundary: a root that ended
//! without deciding resolves to [`SolveError::Cancelled`] or
//! [`SolveError::Stopped`], never to a default boolean.
//!
//! ```text
//! Solver::submit ─► (CircuitValue, Resolver)
//!                          ▲            │
//!                  value() │            └─► root EvalTask::run() ─► resolve(verdict)
//!                          └──────── watch slot: None ─► Some(outcome) (once)
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::{
    core::{alive::AliveTracker, task::Verdict},
    error::SolveError,
    events::{Bus, Event, EventKind},
};

/// Handle to the result of one submitted circuit.
///
/// Cheap to clone; every clone observes the same outcome, and reads are
/// repeatable once the outcome is known.
#[derive(Clone, Debug)]
pub struct CircuitValue {
    request: u64,
    slot: watch::Receiver<Option<Verdict>>,
    token: CancellationToken,
}

impl CircuitValue {
    /// Creates an unresolved handle and the resolver its root task will use.
    pub(crate) fn pending(
        request: u64,
        token: CancellationToken,
        stopped: Arc<AtomicBool>,
        alive: Arc<AliveTracker>,
        bus: Bus,
    ) -> (Self, Resolver) {
        let (tx, rx) = watch::channel(None);
        let value = Self {
            request,
            slot: rx,
            token,
        };
        let resolver = Resolver {
            request,
            slot: tx,
            stopped,
            alive,
            bus,
            released: false,
        };
        (value, resolver)
    }

    /// Creates a handle that already failed with [`SolveError::Stopped`].
    pub(crate) fn stopped(request: u64) -> Self {
        let (_tx, rx) = watch::channel(Some(Err(SolveError::Stopped)));
        let token = CancellationToken::new();
        token.cancel();
        Self {
            request,
            slot: rx,
            token,
        }
    }

    /// Id of the request this handle belongs to.
    pub fn request(&self) -> u64 {
        self.request
    }

    /// Waits for the evaluation to finish.
    ///
    /// ### Errors
    /// - [`SolveError::Stopped`] if the solver was stopped before or during evaluation
    /// - [`SolveError::Cancelled`] if this request was cancelled via [`CircuitValue::cancel`]
    /// - [`SolveError::MalformedNode`] if the circuit violated its arity contract
    pub async fn value(&self) -> Result<bool, SolveError> {
        let mut slot = self.slot.clone();
        match slot.wait_for(Option::is_some).await {
            Ok(resolved) => resolved.clone().unwrap_or(Err(SolveError::Cancelled)),
            Err(_closed) => Err(SolveError::Cancelled),
        }
    }

    /// Blocking variant of [`CircuitValue::value`] for synchronous callers.
    ///
    /// Parks the current thread; do not call it from inside an async task.
    pub fn blocking_value(&self) -> Result<bool, SolveError> {
        futures::executor::block_on(self.value())
    }

    /// Returns the outcome if the evaluation already finished.
    pub fn try_value(&self) -> Option<Result<bool, SolveError>> {
        self.slot.borrow().clone()
    }

    /// True once the outcome is known.
    pub fn is_finished(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Cancels this request's whole task tree.
    ///
    /// Has no effect if the evaluation already finished.
    pub fn cancel(&self) {
        self.token.cancel();
    }
}

/// Write-once producer side of a [`CircuitValue`].
///
/// Released exactly once: by [`Resolver::resolve`], or on drop if the root
/// task never got to resolve (e.g. the runtime dropped it).
pub(crate) struct Resolver {
    request: u64,
    slot: watch::Sender<Option<Verdict>>,
    stopped: Arc<AtomicBool>,
    alive: Arc<AliveTracker>,
    bus: Bus,
    released: bool,
}

impl Resolver {
    pub(crate) fn resolve(mut self, verdict: Verdict) {
        self.release(verdict);
    }

    fn release(&mut self, verdict: Verdict) {
        if self.released {
            return;
        }
        self.released = true;

        let outcome = match verdict {
            Err(SolveError::Cancelled) if self.stopped.load(Ordering::SeqCst) => {
                Err(SolveError::Stopped)
            }
            other => other,
        };
        let ev = match &outcome {
            Ok(value) => Event::new(EventKind::RequestCompleted).with_value(*value),
            Err(e) => Event::new(EventKind::RequestFailed).with_reason(e.as_message()),
        };
        self.alive.remove(self.request);
        self.bus.publish(ev.with_request(self.request));
        self.slot.send_replace(Some(outcome));
    }
}

impl Drop for Resolver {
    fn drop(&mut self) {
        self.release(Err(SolveError::Cancelled));
    }
}
