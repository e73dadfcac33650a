//! Streaming decision policies.
//!
//! This module groups the rules that turn a stream of child results into a
//! gate's value. Each policy sees results **in arrival order**, one at a time,
//! and may decide before the stream ends (short-circuit).
//!
//! ## Contents
//! - [`Aggregate`] the streaming contract (`observe` / `exhausted`)
//! - [`AllOf`] / [`AnyOf`] for `AND` / `OR`
//! - [`MoreThan`] / [`FewerThan`] for `GT(k)` / `LT(k)`
//!
//! ## Quick wiring
//! ```text
//! EvalTask::aggregate(policy)
//!   loop {
//!     ├─► next child result (arrival order)
//!     ├─► policy.observe(value) ─► Some(decided) → prune siblings, deliver
//!     └─► all children consumed ─► policy.exhausted()
//!   }
//! ```
//!
//! `NOT` and `IF` are not aggregations and live in the task itself.

mod aggregate;
mod boolean;
mod threshold;

pub use aggregate::Aggregate;
pub use boolean::{AllOf, AnyOf};
pub use threshold::{FewerThan, MoreThan};
