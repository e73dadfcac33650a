//! # Event subscriber trait.
//!
//! Provides [`Subscribe`] an extension point for plugging custom event handlers into the solver.
//!
//! Each subscriber gets:
//! - **Dedicated worker task** (runs independently)
//! - **Per-subscriber bounded queue** (capacity via [`Subscribe::queue_capacity`])
//! - **Panic isolation** (panics are caught and reported as `EventKind::SubscriberPanicked`)
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use circuitvisor::{Event, EventKind, Subscribe};
//!
//! struct Pruning;
//!
//! #[async_trait]
//! impl Subscribe for Pruning {
//!     async fn on_event(&self, ev: &Event) {
//!         if matches!(ev.kind, EventKind::GateDecided) {
//!             let _ = ev.pruned;
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "pruning" }
//!     fn queue_capacity(&self) -> usize { 4096 }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Contract for event subscribers.
///
/// Called from a subscriber-dedicated worker task. Implementations should avoid
/// blocking the async runtime (prefer async I/O and cooperative waits).
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single event for this subscriber.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs/metrics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred capacity of this subscriber's queue.
    ///
    /// On overflow, events for this subscriber are **dropped** and reported.
    /// Gate events are frequent on wide circuits; size accordingly.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
