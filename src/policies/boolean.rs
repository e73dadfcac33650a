//! # `AND` / `OR` policies.
//!
//! Both short-circuit on their absorbing value: `false` for [`AllOf`],
//! `true` for [`AnyOf`].

use super::Aggregate;

/// `AND`: decides `false` on the first `false`, otherwise `true`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllOf;

impl Aggregate for AllOf {
    #[inline]
    fn observe(&mut self, value: bool) -> Option<bool> {
        (!value).then_some(false)
    }

    #[inline]
    fn exhausted(&self) -> bool {
        true
    }
}

/// `OR`: decides `true` on the first `true`, otherwise `false`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnyOf;

impl Aggregate for AnyOf {
    #[inline]
    fn observe(&mut self, value: bool) -> Option<bool> {
        value.then_some(true)
    }

    #[inline]
    fn exhausted(&self) -> bool {
        false
    }
}
