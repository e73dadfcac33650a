//! # Runtime events emitted by the solver and evaluation tasks.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Request events**: one evaluation request's lifecycle (submitted, completed, failed)
//! - **Gate events**: per-task decisions and cancellations inside a request
//! - **Runtime events**: stop/shutdown and subscriber health
//!
//! The [`Event`] struct carries additional metadata such as timestamps, request id,
//! gate kind, decided value and pruning counts.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use circuitvisor::{Event, EventKind, GateKind};
//!
//! let ev = Event::new(EventKind::GateDecided)
//!     .with_request(7)
//!     .with_gate(GateKind::And)
//!     .with_value(false)
//!     .with_pruned(2);
//!
//! assert_eq!(ev.kind, EventKind::GateDecided);
//! assert_eq!(ev.request, Some(7));
//! assert_eq!(ev.pruned, Some(2));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::circuit::GateKind;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `reason`: subscriber name and panic message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `reason`: subscriber name and cause ("full", "closed")
    SubscriberOverflow,

    // === Runtime events ===
    /// `stop()` was called for the first time.
    StopRequested,

    /// Every task unwound within the shutdown grace period.
    ///
    /// Sets:
    /// - `timeout_ms`: configured grace
    AllStoppedWithin,

    /// Shutdown grace period exceeded; some requests were still in flight.
    ///
    /// Sets:
    /// - `timeout_ms`: configured grace
    GraceExceeded,

    // === Request lifecycle events ===
    /// A root task was scheduled for a new request.
    ///
    /// Sets:
    /// - `request`: request id
    /// - `gate`: kind of the root node
    RequestSubmitted,

    /// A request arrived after `stop()` and was failed without scheduling work.
    ///
    /// Sets:
    /// - `request`: request id
    RequestRejected,

    /// The root task delivered a value.
    ///
    /// Sets:
    /// - `request`: request id
    /// - `value`: final boolean
    RequestCompleted,

    /// The root task ended without a value.
    ///
    /// Sets:
    /// - `request`: request id
    /// - `reason`: error message
    RequestFailed,

    // === Gate events ===
    /// A non-leaf task decided its value.
    ///
    /// Sets:
    /// - `request`: request id
    /// - `gate`: gate kind
    /// - `value`: decided boolean
    /// - `pruned`: children cancelled because their result was no longer needed
    GateDecided,

    /// A task was interrupted before deciding.
    ///
    /// Sets:
    /// - `request`: request id
    /// - `gate`: gate kind
    TaskCancelled,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Evaluation request the event belongs to.
    pub request: Option<u64>,
    /// Gate kind of the emitting task.
    pub gate: Option<GateKind>,
    /// Decided boolean.
    pub value: Option<bool>,
    /// Number of children pruned after a decision.
    pub pruned: Option<u32>,
    /// Grace/timeout in milliseconds (compact).
    pub timeout_ms: Option<u32>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            request: None,
            gate: None,
            value: None,
            pruned: None,
            timeout_ms: None,
            reason: None,
        }
    }

    /// Attaches a request id.
    #[inline]
    pub fn with_request(mut self, id: u64) -> Self {
        self.request = Some(id);
        self
    }

    /// Attaches a gate kind.
    #[inline]
    pub fn with_gate(mut self, gate: GateKind) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Attaches a decided value.
    #[inline]
    pub fn with_value(mut self, value: bool) -> Self {
        self.value = Some(value);
        self
    }

    /// Attaches a pruned-children count.
    #[inline]
    pub fn with_pruned(mut self, n: usize) -> Self {
        self.pruned = Some(n.min(u32::MAX as usize) as u32);
        self
    }

    /// Attaches a timeout duration (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.timeout_ms = Some(ms);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_reason(format!("subscriber={subscriber} info={info}"))
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }
}
