//! Error types used by the circuitvisor runtime and evaluations.
//!
//! This module defines two main error enums:
//!
//! - [`SolveError`]: outcomes of a single evaluation request that are not a boolean.
//! - [`RuntimeError`]: errors raised by the solver runtime itself.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.

use std::time::Duration;
use thiserror::Error;

use crate::circuit::GateKind;

/// # Errors produced by evaluating a circuit.
///
/// `Cancelled` and `Stopped` are normal control outcomes; `MalformedNode`
/// means the node model broke its arity contract and is never retried.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// The evaluated subtree was cancelled before it decided a value.
    #[error("evaluation cancelled")]
    Cancelled,

    /// The solver was stopped before or during the evaluation.
    #[error("solver stopped")]
    Stopped,

    /// A node's kind does not match its children or threshold.
    #[error("malformed {kind} node: {reason}")]
    MalformedNode {
        /// Declared gate kind of the offending node.
        kind: GateKind,
        /// What is wrong with it.
        reason: String,
    },
}

impl SolveError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use circuitvisor::SolveError;
    ///
    /// assert_eq!(SolveError::Stopped.as_label(), "solve_stopped");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SolveError::Cancelled => "solve_cancelled",
            SolveError::Stopped => "solve_stopped",
            SolveError::MalformedNode { .. } => "solve_malformed_node",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SolveError::Cancelled => "evaluation cancelled".to_string(),
            SolveError::Stopped => "solver stopped".to_string(),
            SolveError::MalformedNode { kind, reason } => format!("malformed {kind}: {reason}"),
        }
    }

    /// Indicates whether the error is a cancellation outcome rather than a defect.
    ///
    /// # Example
    /// ```
    /// use circuitvisor::SolveError;
    ///
    /// assert!(SolveError::Cancelled.is_cancellation());
    /// assert!(SolveError::Stopped.is_cancellation());
    /// ```
    pub fn is_cancellation(&self) -> bool {
        matches!(self, SolveError::Cancelled | SolveError::Stopped)
    }

    pub(crate) fn malformed(kind: GateKind, reason: impl Into<String>) -> Self {
        SolveError::MalformedNode {
            kind,
            reason: reason.into(),
        }
    }
}

/// # Errors produced by the solver runtime.
///
/// These represent failures of the runtime itself,
/// such as a shutdown sequence exceeding its grace period.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Shutdown grace period was exceeded; some requests were still unwinding.
    #[error("shutdown timeout {grace:?} exceeded; stuck requests: {stuck:?}")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Ids of requests that had not finished in time.
        stuck: Vec<u64>,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use circuitvisor::RuntimeError;
    /// use std::time::Duration;
    ///
    /// let err = RuntimeError::GraceExceeded { grace: Duration::from_secs(5), stuck: vec![] };
    /// assert_eq!(err.as_label(), "runtime_grace_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::GraceExceeded { grace, stuck } => {
                format!("grace exceeded after {grace:?}; stuck requests={stuck:?}")
            }
        }
    }
}
