//! The executable pipeline produced by the builder.

use super::StrategyChain;
use crate::context::ResilienceContext;
use crate::strategy::{operation, Operation, Outcome, Passthrough, Strategy};
use std::future::Future;
use std::sync::Arc;

/// A compiled, immutable resilience pipeline.
///
/// Cheap to clone and safe for unlimited concurrent executions; all
/// per-call state lives in the [`ResilienceContext`].
#[derive(Clone)]
pub struct ResiliencePipeline<T>
where
    T: Send + 'static,
{
    name: String,
    strategy: Arc<dyn Strategy<T>>,
}

impl<T> ResiliencePipeline<T>
where
    T: Send + 'static,
{
    /// Wraps the materialized strategy list: pass-through when empty, the
    /// sole member unchanged when singleton, a chain otherwise.
    pub(crate) fn assemble(name: String, mut strategies: Vec<Arc<dyn Strategy<T>>>) -> Self {
        let strategy: Arc<dyn Strategy<T>> = match strategies.len() {
            0 => Arc::new(Passthrough),
            1 => strategies.remove(0),
            _ => Arc::new(StrategyChain::new(strategies)),
        };
        Self { name, strategy }
    }

    /// Returns the pipeline name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn strategy(&self) -> &Arc<dyn Strategy<T>> {
        &self.strategy
    }

    /// Executes `callback` under this pipeline with a fresh context.
    pub async fn execute<F, Fut>(&self, callback: F) -> Outcome<T>
    where
        F: Fn(ResilienceContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Outcome<T>> + Send + 'static,
    {
        let ctx = ResilienceContext::new().with_pipeline_name(self.name.clone());
        self.execute_with_context(ctx, callback).await
    }

    /// Executes `callback` under this pipeline with a caller-supplied
    /// context (pre-existing cancellation token, seeded properties).
    pub async fn execute_with_context<F, Fut>(
        &self,
        ctx: ResilienceContext,
        callback: F,
    ) -> Outcome<T>
    where
        F: Fn(ResilienceContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Outcome<T>> + Send + 'static,
    {
        self.execute_operation(ctx, operation(callback)).await
    }

    /// Executes an already-wrapped [`Operation`].
    pub async fn execute_operation(&self, ctx: ResilienceContext, op: Operation<T>) -> Outcome<T> {
        self.strategy.execute(ctx, op).await
    }
}

impl<T> std::fmt::Debug for ResiliencePipeline<T>
where
    T: Send + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResiliencePipeline")
            .field("name", &self.name)
            .field("strategy_type", &self.strategy.strategy_type())
            .finish()
    }
}
