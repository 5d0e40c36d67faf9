//! End-to-end pipeline scenarios.

use crate::context::ResilienceContext;
use crate::hedging::HedgingOptions;
use crate::pipeline::PipelineBuilder;
use crate::strategy::{operation, Operation, Outcome, Strategy};
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Invokes its continuation once more on failure. Minimal retry used to
/// exercise the chain-of-responsibility contract; real retry policies are
/// separate strategy implementations.
struct RetryOnce;

#[async_trait]
impl<T> Strategy<T> for RetryOnce
where
    T: Send + 'static,
{
    fn strategy_type(&self) -> &str {
        "RetryOnce"
    }

    async fn execute(&self, ctx: ResilienceContext, next: Operation<T>) -> Outcome<T> {
        let first = next(ctx.clone()).await;
        if first.is_failure() {
            return next(ctx).await;
        }
        first
    }
}

#[tokio::test]
async fn test_outer_retry_reinvokes_entire_inner_chain() {
    init_tracing();

    let inner_invocations = Arc::new(AtomicUsize::new(0));

    struct CountInvocations(Arc<AtomicUsize>);

    #[async_trait]
    impl Strategy<&'static str> for CountInvocations {
        async fn execute(
            &self,
            ctx: ResilienceContext,
            next: Operation<&'static str>,
        ) -> Outcome<&'static str> {
            self.0.fetch_add(1, Ordering::SeqCst);
            next(ctx).await
        }
    }

    let mut builder = PipelineBuilder::new("retry-wraps-all");
    builder.add_strategy(Arc::new(RetryOnce));
    builder.add_strategy(Arc::new(CountInvocations(Arc::clone(&inner_invocations))));
    let pipeline = builder.build();

    let calls = Arc::new(AtomicUsize::new(0));
    let calls_in_op = Arc::clone(&calls);
    let outcome = pipeline
        .execute(move |_ctx| {
            let calls = Arc::clone(&calls_in_op);
            async move {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Outcome::failure("first attempt flaky")
                } else {
                    Outcome::Success("second attempt fine")
                }
            }
        })
        .await;

    assert_eq!(outcome, Outcome::Success("second attempt fine"));
    // The strategy registered *after* the retry was re-entered on the
    // second attempt: first outermost, re-invoked as a whole.
    assert_eq!(inner_invocations.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_retry_composed_with_hedging() {
    init_tracing();

    let mut builder = PipelineBuilder::<&'static str>::new("retry-then-hedge");
    builder.add_strategy(Arc::new(RetryOnce));
    builder
        .add_hedging(
            HedgingOptions::new()
                .with_hedge_operation(operation(|_ctx| async { Outcome::Success("hedged") })),
        )
        .unwrap();
    let pipeline = builder.build();

    let outcome = pipeline
        .execute(|_ctx| async { Outcome::<&'static str>::failure("always failing") })
        .await;

    // The hedge rescues the first attempt; the retry never needs its
    // second pass.
    assert_eq!(outcome, Outcome::Success("hedged"));
}

#[tokio::test]
async fn test_caller_cancellation_unwinds_hedged_call() {
    init_tracing();

    let ctx = ResilienceContext::new();
    let token = Arc::clone(ctx.cancellation());

    let mut builder = PipelineBuilder::<&'static str>::new("cancelled-call");
    builder.add_hedging(HedgingOptions::new()).unwrap();
    let pipeline = builder.build();

    let handle = tokio::spawn(async move {
        pipeline
            .execute_with_context(ctx, |ctx: ResilienceContext| async move {
                ctx.cancellation().cancelled().await;
                Outcome::Cancelled(ctx.cancellation().reason().unwrap_or_default())
            })
            .await
    });

    tokio::time::sleep(Duration::from_millis(20)).await;
    token.cancel("caller timed out");

    let outcome = tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .unwrap()
        .unwrap();

    assert!(outcome.is_cancelled());
}

#[tokio::test]
async fn test_strategies_never_observe_sibling_call_state() {
    init_tracing();

    struct StampExecution;

    #[async_trait]
    impl Strategy<bool> for StampExecution {
        async fn execute(
            &self,
            ctx: ResilienceContext,
            next: Operation<bool>,
        ) -> Outcome<bool> {
            // One strategy instance serves concurrent calls; per-call
            // state belongs in the context.
            ctx.properties().set("stamp", serde_json::json!(ctx.execution_id().to_string()));
            next(ctx).await
        }
    }

    let mut builder = PipelineBuilder::new("concurrent-calls");
    builder.add_strategy(Arc::new(StampExecution));
    let pipeline = Arc::new(builder.build());

    let mut handles = Vec::new();
    for _ in 0..16 {
        let pipeline = Arc::clone(&pipeline);
        handles.push(tokio::spawn(async move {
            pipeline
                .execute(|ctx: ResilienceContext| async move {
                    let stamp = ctx.properties().get("stamp");
                    Outcome::Success(
                        stamp == Some(serde_json::json!(ctx.execution_id().to_string())),
                    )
                })
                .await
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), Outcome::Success(true));
    }
}
