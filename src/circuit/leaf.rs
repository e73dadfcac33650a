//! # Leaf value sources.
//!
//! A leaf produces the boolean at the bottom of a circuit. Sources may be slow
//! (I/O, sleeps), so they are async and the engine interrupts them by dropping
//! their future once the owning task is cancelled. The [`CancellationToken`]
//! handed to [`Leaf::value`] lets long-running sources notice cancellation
//! on their own (e.g. inside `spawn_blocking`).
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use circuitvisor::{LeafFn, LeafRef};
//!
//! let source: LeafRef = LeafFn::arc(|_ctx: CancellationToken| async { true });
//! ```

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// # Asynchronous, interruptible boolean source.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use async_trait::async_trait;
/// use circuitvisor::Leaf;
///
/// struct Sensor;
///
/// #[async_trait]
/// impl Leaf for Sensor {
///     async fn value(&self, ctx: CancellationToken) -> bool {
///         !ctx.is_cancelled()
///     }
/// }
/// ```
#[async_trait]
pub trait Leaf: Send + Sync + 'static {
    /// Produces the leaf's boolean.
    ///
    /// The returned future may be dropped at any await point when `ctx` is cancelled.
    async fn value(&self, ctx: CancellationToken) -> bool;
}

/// Shared handle to a leaf source.
pub type LeafRef = Arc<dyn Leaf>;

/// Function-backed leaf.
///
/// Wraps a closure that *creates* a new future per evaluation, so one leaf
/// can be shared by several nodes and several concurrent requests.
pub struct LeafFn<F> {
    f: F,
}

impl<F> LeafFn<F> {
    /// Creates a new function-backed leaf.
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the leaf and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F, Fut> Leaf for LeafFn<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = bool> + Send + 'static,
{
    async fn value(&self, ctx: CancellationToken) -> bool {
        (self.f)(ctx).await
    }
}

/// Leaf that yields a fixed value immediately.
pub(crate) struct Constant(pub(crate) bool);

#[async_trait]
impl Leaf for Constant {
    async fn value(&self, _ctx: CancellationToken) -> bool {
        self.0
    }
}

/// Leaf that yields a fixed value after sleeping on the tokio timer.
pub(crate) struct Delayed {
    pub(crate) value: bool,
    pub(crate) delay: Duration,
}

#[async_trait]
impl Leaf for Delayed {
    async fn value(&self, _ctx: CancellationToken) -> bool {
        tokio::time::sleep(self.delay).await;
        self.value
    }
}
