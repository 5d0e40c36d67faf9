//! Composition of multiple strategies into one executable unit.

use crate::context::ResilienceContext;
use crate::strategy::{Operation, Outcome, Strategy};
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::sync::Arc;

/// An ordered chain of strategies composed into a single [`Strategy`].
///
/// Execution is chain-of-responsibility: the first strategy in the list is
/// the outermost decision-maker and receives a continuation that runs the
/// second, which receives one that runs the third, and so on, terminating
/// in the original user callback. Each strategy decides whether and how
/// many times to invoke its continuation.
pub struct StrategyChain<T>
where
    T: Send + 'static,
{
    strategies: Vec<Arc<dyn Strategy<T>>>,
}

impl<T> StrategyChain<T>
where
    T: Send + 'static,
{
    /// Composes the given strategies, first entry outermost.
    ///
    /// The empty and singleton cases are handled by the builder, not here.
    pub(crate) fn new(strategies: Vec<Arc<dyn Strategy<T>>>) -> Self {
        debug_assert!(strategies.len() >= 2);
        Self { strategies }
    }

    /// Returns the number of member strategies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Returns true if the chain has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl<T> std::fmt::Debug for StrategyChain<T>
where
    T: Send + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyChain")
            .field("len", &self.strategies.len())
            .finish()
    }
}

#[async_trait]
impl<T> Strategy<T> for StrategyChain<T>
where
    T: Send + 'static,
{
    fn strategy_type(&self) -> &str {
        "Pipeline"
    }

    async fn execute(&self, ctx: ResilienceContext, next: Operation<T>) -> Outcome<T> {
        // Fold inner-first so the first-registered strategy ends up
        // outermost.
        let mut inner = next;
        for strategy in self.strategies.iter().rev() {
            let strategy = Arc::clone(strategy);
            let prev = inner;
            inner = Arc::new(move |ctx: ResilienceContext| -> BoxFuture<'static, Outcome<T>> {
                let strategy = Arc::clone(&strategy);
                let prev = Arc::clone(&prev);
                Box::pin(async move { strategy.execute(ctx, prev).await })
            });
        }
        inner(ctx).await
    }
}
