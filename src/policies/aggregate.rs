//! # Streaming aggregation contract.

/// Folds child results into a gate decision, one result at a time.
///
/// ### Rules
/// - `observe` is called once per consumed child, in arrival order.
/// - Once `observe` returns `Some`, it is not called again.
/// - `exhausted` is called only if every child was observed without a decision.
/// - The final value must not depend on arrival order.
pub trait Aggregate {
    /// Feeds one child result; returns the decided value when it is known.
    fn observe(&mut self, value: bool) -> Option<bool>;

    /// Value of the gate after all children were observed undecided.
    fn exhausted(&self) -> bool;
}
