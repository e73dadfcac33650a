//! # In-flight request tracker.
//!
//! Maintains which evaluation requests have been submitted but not yet resolved.
//! Updated synchronously at the two points that bound a request's life, so it
//! never depends on event delivery.
//!
//! ## Architecture
//! ```text
//! Solver::submit ──► AliveTracker::insert(id)
//!                          │
//!                          ▼
//!                    BTreeSet<u64> ◄── Resolver::release ──► AliveTracker::remove(id)
//!                          │
//!                          ▼
//!             Solver::shutdown (GraceExceeded.stuck)
//! ```
//!
//! ## Rules
//! - Rejected requests (after stop) are never inserted
//! - A request is removed before its outcome becomes visible to waiters
//! - `snapshot` returns ids in ascending order

use std::collections::BTreeSet;
use std::sync::{Mutex, PoisonError};

/// Thread-safe set of in-flight request ids.
///
/// Used by [`Solver::shutdown`](crate::Solver::shutdown) to report requests
/// that did not unwind within the grace period.
#[derive(Debug, Default)]
pub struct AliveTracker {
    live: Mutex<BTreeSet<u64>>,
}

impl AliveTracker {
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a request as in flight.
    pub fn insert(&self, request: u64) {
        self.lock().insert(request);
    }

    /// Marks a request as finished. Returns `false` if it was not tracked.
    pub fn remove(&self, request: u64) -> bool {
        self.lock().remove(&request)
    }

    /// Returns sorted ids of requests that started but have not finished.
    pub fn snapshot(&self) -> Vec<u64> {
        self.lock().iter().copied().collect()
    }

    // The set stays consistent even if a holder panicked: every critical
    // section is a single insert/remove/iterate.
    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeSet<u64>> {
        self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
