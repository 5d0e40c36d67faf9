//! The strategy trait and its execution primitives.
//!
//! A [`Strategy`] is the atomic unit of fault handling. It receives the
//! execution context plus a continuation (`next`) that runs everything
//! nested inside it - further strategies and finally the user callback -
//! and decides whether, how often, and with what context to invoke it.

mod options;
mod outcome;

pub use options::{BasicOptions, EmptyOptions, StrategyOptions};
pub use outcome::Outcome;

use crate::context::ResilienceContext;
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;

/// The continuation / user-callback shape: a cloneable async function from
/// context to outcome.
pub type Operation<T> =
    Arc<dyn Fn(ResilienceContext) -> BoxFuture<'static, Outcome<T>> + Send + Sync>;

/// Wraps an async closure into an [`Operation`].
pub fn operation<T, F, Fut>(callback: F) -> Operation<T>
where
    F: Fn(ResilienceContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Outcome<T>> + Send + 'static,
{
    Arc::new(move |ctx| -> BoxFuture<'static, Outcome<T>> { Box::pin(callback(ctx)) })
}

/// A composable unit of fault-handling behavior.
///
/// Implementations must be safe for unlimited concurrent invocations:
/// all per-call state lives on the stack of `execute`, never in the
/// strategy itself.
#[async_trait]
pub trait Strategy<T>: Send + Sync
where
    T: Send + 'static,
{
    /// Type tag for diagnostics.
    fn strategy_type(&self) -> &str {
        "Custom"
    }

    /// Executes the wrapped operation with this strategy's behavior applied.
    async fn execute(&self, ctx: ResilienceContext, next: Operation<T>) -> Outcome<T>;
}

/// A strategy that applies no behavior at all.
///
/// Produced by the builder when no entries were registered, so an empty
/// pipeline is still executable as a pure pass-through.
#[derive(Debug, Default, Clone, Copy)]
pub struct Passthrough;

#[async_trait]
impl<T> Strategy<T> for Passthrough
where
    T: Send + 'static,
{
    fn strategy_type(&self) -> &str {
        "Passthrough"
    }

    async fn execute(&self, ctx: ResilienceContext, next: Operation<T>) -> Outcome<T> {
        next(ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_passthrough_returns_callback_result() {
        let strategy = Passthrough;
        let outcome = strategy
            .execute(
                ResilienceContext::new(),
                operation(|_ctx| async { Outcome::Success("unchanged") }),
            )
            .await;

        assert_eq!(outcome, Outcome::Success("unchanged"));
    }

    #[tokio::test]
    async fn test_passthrough_propagates_failure() {
        let strategy = Passthrough;
        let outcome: Outcome<&str> = strategy
            .execute(
                ResilienceContext::new(),
                operation(|_ctx| async { Outcome::failure("boom") }),
            )
            .await;

        assert!(outcome.is_failure());
    }

    #[tokio::test]
    async fn test_operation_sees_context_properties() {
        let ctx = ResilienceContext::new();
        ctx.properties().set("tenant", serde_json::json!("acme"));

        let op = operation(|ctx: ResilienceContext| async move {
            match ctx.properties().get("tenant") {
                Some(v) => Outcome::Success(v.to_string()),
                None => Outcome::failure("missing property"),
            }
        });

        let outcome = Passthrough.execute(ctx, op).await;
        assert_eq!(outcome, Outcome::Success("\"acme\"".to_string()));
    }
}
