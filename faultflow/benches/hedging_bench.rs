//! Hedging execution benchmarks: primary fast path vs. failover path.

use criterion::{criterion_group, criterion_main, Criterion};
use faultflow::hedging::HedgingOptions;
use faultflow::pipeline::{PipelineBuilder, ResiliencePipeline};
use faultflow::strategy::{operation, Outcome};
use std::sync::Arc;

fn hedged_pipeline() -> Arc<ResiliencePipeline<&'static str>> {
    let mut builder = PipelineBuilder::new("bench");
    builder
        .add_hedging(
            HedgingOptions::new()
                .with_hedge_operation(operation(|_ctx| async { Outcome::Success("hedged") })),
        )
        .expect("valid options");
    Arc::new(builder.build())
}

fn hedging_benchmarks(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("runtime");
    let pipeline = hedged_pipeline();

    c.bench_function("hedging_primary", |b| {
        let pipeline = Arc::clone(&pipeline);
        b.to_async(&rt).iter(|| {
            let pipeline = Arc::clone(&pipeline);
            async move {
                pipeline
                    .execute(|_ctx| async { Outcome::Success("primary") })
                    .await
            }
        });
    });

    c.bench_function("hedging_secondary", |b| {
        let pipeline = Arc::clone(&pipeline);
        b.to_async(&rt).iter(|| {
            let pipeline = Arc::clone(&pipeline);
            async move {
                pipeline
                    .execute(|_ctx| async { Outcome::<&'static str>::failure("failure") })
                    .await
            }
        });
    });

    c.bench_function("hedging_primary_async_work", |b| {
        let pipeline = Arc::clone(&pipeline);
        b.to_async(&rt).iter(|| {
            let pipeline = Arc::clone(&pipeline);
            async move {
                pipeline
                    .execute(|_ctx| async {
                        tokio::task::yield_now().await;
                        Outcome::Success("primary")
                    })
                    .await
            }
        });
    });

    c.bench_function("hedging_secondary_async_work", |b| {
        let pipeline = Arc::clone(&pipeline);
        b.to_async(&rt).iter(|| {
            let pipeline = Arc::clone(&pipeline);
            async move {
                pipeline
                    .execute(|_ctx| async {
                        tokio::task::yield_now().await;
                        Outcome::<&'static str>::failure("failure")
                    })
                    .await
            }
        });
    });
}

criterion_group!(benches, hedging_benchmarks);
criterion_main!(benches);
