//! Callback traits and utilities
//!
//! Guards, lifecycle hooks, the render callback and lazy view loaders are all
//! async closures supplied by application code. They are stored type-erased
//! behind `Arc<dyn Fn>` so routes stay cheap to clone.

use crate::{NavigationContext, RouterResult};
use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;

/// Boxed guard for type erasure
pub type BoxedGuard =
    Arc<dyn Fn(NavigationContext) -> BoxFuture<'static, RouterResult<bool>> + Send + Sync>;

/// Boxed lifecycle hook (pre/post-navigate and the render callback)
pub type BoxedHook =
    Arc<dyn Fn(NavigationContext) -> BoxFuture<'static, RouterResult<()>> + Send + Sync>;

/// Boxed lazy view loader
pub type BoxedLoader = Arc<dyn Fn() -> BoxFuture<'static, RouterResult<String>> + Send + Sync>;

/// Trait for guard functions
///
/// Automatically implemented for async closures with the signature:
/// `Fn(NavigationContext) -> impl Future<Output = RouterResult<bool>>`
pub trait Guard: Send + Sync + 'static {
    /// The future type returned by the guard
    type Future: Future<Output = RouterResult<bool>> + Send + 'static;

    /// Decide whether the navigation may proceed
    fn check(&self, ctx: NavigationContext) -> Self::Future;
}

impl<F, Fut> Guard for F
where
    F: Fn(NavigationContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = RouterResult<bool>> + Send + 'static,
{
    type Future = Fut;

    fn check(&self, ctx: NavigationContext) -> Self::Future {
        (self)(ctx)
    }
}

/// Trait for lifecycle hooks and the render callback
pub trait Hook: Send + Sync + 'static {
    /// The future type returned by the hook
    type Future: Future<Output = RouterResult<()>> + Send + 'static;

    /// Run the hook for a navigation
    fn run(&self, ctx: NavigationContext) -> Self::Future;
}

impl<F, Fut> Hook for F
where
    F: Fn(NavigationContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = RouterResult<()>> + Send + 'static,
{
    type Future = Fut;

    fn run(&self, ctx: NavigationContext) -> Self::Future {
        (self)(ctx)
    }
}

/// Trait for lazy view loaders. The output is the component tag to render.
pub trait Loader: Send + Sync + 'static {
    /// The future type returned by the loader
    type Future: Future<Output = RouterResult<String>> + Send + 'static;

    /// Produce the view's component tag
    fn load(&self) -> Self::Future;
}

impl<F, Fut> Loader for F
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = RouterResult<String>> + Send + 'static,
{
    type Future = Fut;

    fn load(&self) -> Self::Future {
        (self)()
    }
}

/// Convert a guard into a boxed guard for storage
pub(crate) fn into_boxed_guard<G: Guard>(guard: G) -> BoxedGuard {
    Arc::new(move |ctx| Box::pin(guard.check(ctx)))
}

/// Convert a hook into a boxed hook for storage
pub(crate) fn into_boxed_hook<H: Hook>(hook: H) -> BoxedHook {
    Arc::new(move |ctx| Box::pin(hook.run(ctx)))
}

/// Convert a loader into a boxed loader for storage
pub(crate) fn into_boxed_loader<L: Loader>(loader: L) -> BoxedLoader {
    Arc::new(move || Box::pin(loader.load()))
}
