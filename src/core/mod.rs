//! Runtime core: evaluation engine and request lifecycle.
//!
//! This module contains the embedded implementation of the circuitvisor runtime.
//! The public API from this module is [`Solver`] (with [`SolverBuilder`] and
//! [`SolverConfig`]) and the result handle [`CircuitValue`].
//!
//! Internal modules:
//! - [`task`]: one evaluation task per node (dispatch, fan-in, pruning, `IF` speculation);
//! - [`value`]: result handle and its write-once resolver;
//! - [`solver`]: request submission, global stop, graceful shutdown;
//! - [`alive`]: tracks in-flight requests for shutdown reports;
//! - [`builder`]: wires bus, subscribers and tracker together.

mod alive;
mod builder;
mod config;
mod solver;
mod task;
mod value;

pub use builder::SolverBuilder;
pub use config::SolverConfig;
pub use solver::Solver;
pub use value::CircuitValue;
