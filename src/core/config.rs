//! # Solver configuration.
//!
//! Provides [`SolverConfig`] centralized settings for the solver runtime.
//!
//! ## Sentinel values
//! - `bus_capacity = 0` → clamped to 1
//! - `grace = 0s` → shutdown does not wait; any live task counts as stuck

use std::time::Duration;

/// Global configuration for the solver runtime.
///
/// ## Field semantics
/// - `grace`: Maximum wait in [`Solver::shutdown`](crate::Solver::shutdown) for tasks to unwind
/// - `bus_capacity`: Event bus ring buffer size (min 1; clamped by Bus)
#[derive(Clone, Debug)]
pub struct SolverConfig {
    /// Maximum time to wait for cancelled tasks to unwind during shutdown.
    ///
    /// If exceeded, shutdown returns `RuntimeError::GraceExceeded`.
    pub grace: Duration,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Every gate decision and cancellation is an event; wide circuits under
    /// slow subscribers may lag and skip older events.
    pub bus_capacity: usize,
}

impl SolverConfig {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for SolverConfig {
    /// Default configuration:
    ///
    /// - `grace = 5s`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            grace: Duration::from_secs(5),
            bus_capacity: 1024,
        }
    }
}
