use std::sync::Arc;

use tokio::runtime::Handle;

use super::{alive::AliveTracker, solver::Solver};
use crate::{
    core::SolverConfig,
    events::Bus,
    subscribers::{Subscribe, SubscriberSet},
};

/// Builder for constructing a [`Solver`] with optional subscribers.
pub struct SolverBuilder {
    cfg: SolverConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl SolverBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: SolverConfig) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive runtime events (request lifecycle, gate decisions,
    /// cancellations) through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds and returns the Solver instance.
    ///
    /// Must be called inside a tokio runtime: the solver captures the current
    /// runtime handle as its worker pool and starts its event listener there.
    pub fn build(self) -> Arc<Solver> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let subs = Arc::new(SubscriberSet::new(self.subscribers, bus.clone()));
        let alive = Arc::new(AliveTracker::new());

        let solver = Arc::new(Solver::new_internal(
            self.cfg,
            bus,
            subs,
            alive,
            Handle::current(),
        ));
        solver.subscriber_listener();
        solver
    }
}
