//! # Circuit nodes.
//!
//! A [`Node`] is one gate of an immutable tree. The gate tag carries everything
//! kind-specific (the threshold of `GT`/`LT`, the source of a `LEAF`), so the
//! engine matches on it exhaustively and never downcasts.
//!
//! ## Arity
//! ```text
//! LEAF → 0     NOT → 1     IF → 3 (condition, then, else)
//! AND / OR / GT(k) / LT(k) → N ≥ 1, with 0 ≤ k ≤ N
//! ```
//! Constructors enforce these rules; fallible ones return
//! [`SolveError::MalformedNode`].
//!
//! ## Example
//! ```rust
//! use circuitvisor::Node;
//!
//! let c = Node::gt(1, vec![
//!     Node::constant(true),
//!     Node::constant(true),
//!     Node::constant(false),
//! ])?;
//! assert_eq!(c.threshold(), Some(1));
//! assert_eq!(c.children().len(), 3);
//! # Ok::<(), circuitvisor::SolveError>(())
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::circuit::leaf::{Constant, Delayed, LeafRef};
use crate::error::SolveError;

/// Shared reference to a node; nodes are read concurrently and never mutated.
pub type NodeRef = Arc<Node>;

/// Kind of a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateKind {
    Leaf,
    Not,
    And,
    Or,
    Gt,
    Lt,
    If,
}

impl GateKind {
    /// Returns a short stable label for logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            GateKind::Leaf => "leaf",
            GateKind::Not => "not",
            GateKind::And => "and",
            GateKind::Or => "or",
            GateKind::Gt => "gt",
            GateKind::Lt => "lt",
            GateKind::If => "if",
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Gate tag with its kind-specific payload.
#[derive(Clone)]
pub(crate) enum Gate {
    Leaf(LeafRef),
    Not,
    And,
    Or,
    Gt(usize),
    Lt(usize),
    If,
}

/// One gate of a circuit together with its ordered children.
#[derive(Clone)]
pub struct Node {
    gate: Gate,
    children: Vec<NodeRef>,
}

impl Node {
    /// Leaf backed by an arbitrary [`Leaf`](crate::Leaf) source.
    pub fn leaf(source: LeafRef) -> NodeRef {
        Self::build(Gate::Leaf(source), Vec::new())
    }

    /// Leaf that yields `value` immediately.
    pub fn constant(value: bool) -> NodeRef {
        Self::leaf(Arc::new(Constant(value)))
    }

    /// Leaf that yields `value` after `delay` (interruptible sleep).
    pub fn delayed(value: bool, delay: Duration) -> NodeRef {
        Self::leaf(Arc::new(Delayed { value, delay }))
    }

    /// Negation of `child`.
    pub fn not(child: NodeRef) -> NodeRef {
        Self::build(Gate::Not, vec![child])
    }

    /// `cond ? then : otherwise`, with both branches evaluated speculatively.
    pub fn if_then_else(cond: NodeRef, then: NodeRef, otherwise: NodeRef) -> NodeRef {
        Self::build(Gate::If, vec![cond, then, otherwise])
    }

    /// Conjunction of at least one child.
    pub fn and(children: Vec<NodeRef>) -> Result<NodeRef, SolveError> {
        Self::non_empty(GateKind::And, &children)?;
        Ok(Self::build(Gate::And, children))
    }

    /// Disjunction of at least one child.
    pub fn or(children: Vec<NodeRef>) -> Result<NodeRef, SolveError> {
        Self::non_empty(GateKind::Or, &children)?;
        Ok(Self::build(Gate::Or, children))
    }

    /// True when more than `threshold` children are true.
    pub fn gt(threshold: usize, children: Vec<NodeRef>) -> Result<NodeRef, SolveError> {
        Self::threshold_fits(GateKind::Gt, threshold, &children)?;
        Ok(Self::build(Gate::Gt(threshold), children))
    }

    /// True when fewer than `threshold` children are true.
    pub fn lt(threshold: usize, children: Vec<NodeRef>) -> Result<NodeRef, SolveError> {
        Self::threshold_fits(GateKind::Lt, threshold, &children)?;
        Ok(Self::build(Gate::Lt(threshold), children))
    }

    /// Returns the gate kind.
    pub fn kind(&self) -> GateKind {
        match self.gate {
            Gate::Leaf(_) => GateKind::Leaf,
            Gate::Not => GateKind::Not,
            Gate::And => GateKind::And,
            Gate::Or => GateKind::Or,
            Gate::Gt(_) => GateKind::Gt,
            Gate::Lt(_) => GateKind::Lt,
            Gate::If => GateKind::If,
        }
    }

    /// Returns the ordered children.
    pub fn children(&self) -> &[NodeRef] {
        &self.children
    }

    /// Returns the threshold of a `GT`/`LT` gate.
    pub fn threshold(&self) -> Option<usize> {
        match self.gate {
            Gate::Gt(k) | Gate::Lt(k) => Some(k),
            _ => None,
        }
    }

    pub(crate) fn gate(&self) -> &Gate {
        &self.gate
    }

    /// Bypasses arity checks; lets tests hand the engine a broken node.
    #[cfg(test)]
    pub(crate) fn unchecked(gate: Gate, children: Vec<NodeRef>) -> NodeRef {
        Self::build(gate, children)
    }

    fn build(gate: Gate, children: Vec<NodeRef>) -> NodeRef {
        Arc::new(Self { gate, children })
    }

    fn non_empty(kind: GateKind, children: &[NodeRef]) -> Result<(), SolveError> {
        if children.is_empty() {
            return Err(SolveError::malformed(kind, "needs at least one child"));
        }
        Ok(())
    }

    fn threshold_fits(
        kind: GateKind,
        threshold: usize,
        children: &[NodeRef],
    ) -> Result<(), SolveError> {
        Self::non_empty(kind, children)?;
        if threshold > children.len() {
            return Err(SolveError::malformed(
                kind,
                format!(
                    "threshold {threshold} exceeds child count {}",
                    children.len()
                ),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("Node");
        d.field("kind", &self.kind());
        if let Some(k) = self.threshold() {
            d.field("threshold", &k);
        }
        if !self.children.is_empty() {
            d.field("children", &self.children);
        }
        d.finish()
    }
}
