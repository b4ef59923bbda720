//! The handler contracts every node and branch predicate must fulfil.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::{ExecutionContext, NodeError};

/// Bounds required of the state value threaded through a graph.
///
/// Blanket-implemented; it only exists to keep signatures short.
pub trait GraphState: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> GraphState for T {}

/// A graph node: consumes the current state and returns the next one.
#[async_trait]
pub trait NodeHandler<S: GraphState>: Send + Sync {
    async fn run(&self, ctx: &ExecutionContext, state: S) -> Result<S, NodeError>;
}

/// Decides which branch of a conditional edge is taken.
#[async_trait]
pub trait EdgePredicate<S: GraphState>: Send + Sync {
    /// `true` selects the edge's true target, `false` its false target.
    async fn evaluate(&self, ctx: &ExecutionContext, state: &S) -> Result<bool, NodeError>;
}

#[async_trait]
impl<S, H> NodeHandler<S> for Arc<H>
where
    S: GraphState,
    H: NodeHandler<S> + ?Sized,
{
    async fn run(&self, ctx: &ExecutionContext, state: S) -> Result<S, NodeError> {
        (**self).run(ctx, state).await
    }
}

#[async_trait]
impl<S, P> EdgePredicate<S> for Arc<P>
where
    S: GraphState,
    P: EdgePredicate<S> + ?Sized,
{
    async fn evaluate(&self, ctx: &ExecutionContext, state: &S) -> Result<bool, NodeError> {
        (**self).evaluate(ctx, state).await
    }
}

// ---------------------------------------------------------------------------
// Closure adapters
// ---------------------------------------------------------------------------

/// A [`NodeHandler`] backed by an async closure. See [`node_fn`].
#[derive(Clone)]
pub struct FnNode<F> {
    f: F,
}

/// Wrap an async closure as a node handler.
///
/// The closure receives an owned clone of the context so the returned future
/// does not borrow from the caller.
///
/// ```ignore
/// graph.add_node("greet", node_fn(|_ctx, mut s: State| async move {
///     s.greeted = true;
///     Ok(s)
/// }));
/// ```
pub fn node_fn<S, F, Fut>(f: F) -> FnNode<F>
where
    S: GraphState,
    F: Fn(ExecutionContext, S) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<S, NodeError>> + Send + 'static,
{
    FnNode { f }
}

#[async_trait]
impl<S, F, Fut> NodeHandler<S> for FnNode<F>
where
    S: GraphState,
    F: Fn(ExecutionContext, S) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<S, NodeError>> + Send + 'static,
{
    async fn run(&self, ctx: &ExecutionContext, state: S) -> Result<S, NodeError> {
        (self.f)(ctx.clone(), state).await
    }
}

/// An [`EdgePredicate`] backed by a synchronous closure. See [`predicate_fn`].
#[derive(Clone)]
pub struct FnPredicate<F> {
    f: F,
}

/// Wrap a synchronous closure as a branch predicate. Predicates that need to
/// await something should implement [`EdgePredicate`] directly.
pub fn predicate_fn<S, F>(f: F) -> FnPredicate<F>
where
    S: GraphState,
    F: Fn(&ExecutionContext, &S) -> Result<bool, NodeError> + Send + Sync + 'static,
{
    FnPredicate { f }
}

#[async_trait]
impl<S, F> EdgePredicate<S> for FnPredicate<F>
where
    S: GraphState,
    F: Fn(&ExecutionContext, &S) -> Result<bool, NodeError> + Send + Sync + 'static,
{
    async fn evaluate(&self, ctx: &ExecutionContext, state: &S) -> Result<bool, NodeError> {
        (self.f)(ctx, state)
    }
}
