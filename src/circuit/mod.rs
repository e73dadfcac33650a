//! # Circuit model.
//!
//! This module provides the immutable tree the solver evaluates:
//! - [`Node`] - one gate with its ordered children (tagged by [`GateKind`])
//! - [`NodeRef`] - shared reference to a node (`Arc<Node>`)
//! - [`Leaf`] - trait for async, interruptible leaf value sources
//! - [`LeafFn`] - closure-backed leaf implementation

mod leaf;
mod node;

pub use leaf::{Leaf, LeafFn, LeafRef};
pub use node::{GateKind, Node, NodeRef};
pub(crate) use node::Gate;
