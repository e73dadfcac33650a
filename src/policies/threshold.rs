//! # `GT(k)` / `LT(k)` policies.
//!
//! Threshold gates count results and decide only on the **positive** side:
//! once the outcome is certainly `true` they stop consuming, but a certain
//! `false` is only concluded after every child was observed.
//!
//! ```text
//! GT(k): trues  > k      → true     (early)
//! LT(k): falses > N - k  → true     (early; means trues < k)
//! otherwise, after N results → false
//! ```

use super::Aggregate;

/// `GT(k)`: true when more than `k` children are true.
#[derive(Debug, Clone, Copy)]
pub struct MoreThan {
    threshold: usize,
    trues: usize,
}

impl MoreThan {
    /// Creates the policy for threshold `k`.
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold,
            trues: 0,
        }
    }
}

impl Aggregate for MoreThan {
    fn observe(&mut self, value: bool) -> Option<bool> {
        if value {
            self.trues += 1;
        }
        (self.trues > self.threshold).then_some(true)
    }

    fn exhausted(&self) -> bool {
        false
    }
}

/// `LT(k)`: true when fewer than `k` of the `N` children are true.
///
/// Counted on the false side: with `m = N - k`, more than `m` falses
/// leave fewer than `k` trues.
#[derive(Debug, Clone, Copy)]
pub struct FewerThan {
    max_falses: usize,
    falses: usize,
}

impl FewerThan {
    /// Creates the policy for threshold `k` over `arity` children.
    pub fn new(threshold: usize, arity: usize) -> Self {
        Self {
            max_falses: arity.saturating_sub(threshold),
            falses: 0,
        }
    }
}

impl Aggregate for FewerThan {
    fn observe(&mut self, value: bool) -> Option<bool> {
        if !value {
            self.falses += 1;
        }
        (self.falses > self.max_falses).then_some(true)
    }

    fn exhausted(&self) -> bool {
        false
    }
}
