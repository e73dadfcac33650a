//! # Event subscribers for the circuitvisor runtime.
//!
//! This module provides the [`Subscribe`] trait and the [`SubscriberSet`] that
//! fans runtime events out to user subscribers.
//!
//! ## Architecture
//! ```text
//! EvalTask ── publish(Event) ──► Bus ──► Solver listener ──► SubscriberSet::emit
//!                                                         ┌─────────┼─────────┐
//!                                                         ▼         ▼         ▼
//!                                                      LogWriter  Metrics   Custom
//! ```

mod set;
mod subscribe;

#[cfg(feature = "logging")]
mod embedded;

pub use set::SubscriberSet;
pub use subscribe::Subscribe;

#[cfg(feature = "logging")]
pub use embedded::LogWriter;
