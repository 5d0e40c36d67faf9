//! The hedging race coordinator.

use super::{HedgeTrigger, HedgingOptions};
use crate::cancellation::CancellationToken;
use crate::clock::SharedClock;
use crate::context::ResilienceContext;
use crate::disposal::{try_dispose_safely, Disposable};
use crate::errors::ValidationError;
use crate::strategy::{Operation, Outcome, Strategy, StrategyOptions};
use async_trait::async_trait;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Races a primary attempt against one or more hedged attempts and returns
/// the first acceptable outcome.
///
/// Each invocation starts fresh: the race state lives entirely on the
/// stack of `execute`. Every branch runs on an independently forked
/// context, so branch-local property writes and cancellation never reach
/// siblings. Once a winner settles, the losing branches' tokens are
/// cancelled and a supervisor task tracks them to completion, routing any
/// discarded payloads through safe disposal - the winner never waits for
/// them.
pub struct HedgingStrategy<T>
where
    T: Disposable + Send + 'static,
{
    options: HedgingOptions<T>,
    clock: SharedClock,
}

impl<T> HedgingStrategy<T>
where
    T: Disposable + Send + 'static,
{
    /// Creates a hedging strategy after validating its options.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the options are invalid.
    pub fn new(options: HedgingOptions<T>, clock: SharedClock) -> Result<Self, ValidationError> {
        options.validate()?;
        Ok(Self::from_validated(options, clock))
    }

    pub(crate) fn from_validated(options: HedgingOptions<T>, clock: SharedClock) -> Self {
        Self { options, clock }
    }

    fn spawn_branch(
        index: usize,
        op: Operation<T>,
        parent: &ResilienceContext,
        tx: &mpsc::UnboundedSender<(usize, Outcome<T>)>,
    ) -> (Arc<CancellationToken>, JoinHandle<()>) {
        let branch_ctx = parent.fork();
        let token = Arc::clone(branch_ctx.cancellation());
        let watch = Arc::clone(&token);
        let tx = tx.clone();

        let handle = tokio::spawn(async move {
            // A panicking attempt must still settle, or the coordinator
            // would wait on the channel forever.
            let outcome = tokio::select! {
                result = AssertUnwindSafe(op(branch_ctx)).catch_unwind() => {
                    result.unwrap_or_else(|_| Outcome::failure("attempt panicked"))
                }
                () = watch.cancelled() => {
                    Outcome::Cancelled(watch.reason().unwrap_or_default())
                }
            };
            // The coordinator may be gone already; discarded outcomes are
            // then drained by the cleanup supervisor.
            let _ = tx.send((index, outcome));
        });

        (token, handle)
    }
}

/// Releases the payload of a discarded outcome, if it has one.
async fn discard<T>(outcome: Outcome<T>)
where
    T: Disposable + Send + 'static,
{
    if let Outcome::Success(mut value) = outcome {
        try_dispose_safely(&mut value, false).await;
    }
}

#[async_trait]
impl<T> Strategy<T> for HedgingStrategy<T>
where
    T: Disposable + Send + 'static,
{
    fn strategy_type(&self) -> &str {
        "Hedging"
    }

    async fn execute(&self, ctx: ResilienceContext, next: Operation<T>) -> Outcome<T> {
        if ctx.is_cancelled() {
            return Outcome::Cancelled(ctx.cancellation().reason().unwrap_or_default());
        }

        let (tx, mut rx) = mpsc::unbounded_channel::<(usize, Outcome<T>)>();
        let max_branches = self.options.max_hedged_attempts + 1;
        let hedge_op = self
            .options
            .hedge_operation
            .clone()
            .unwrap_or_else(|| Arc::clone(&next));

        let mut tokens = Vec::with_capacity(max_branches);
        let mut handles = Vec::with_capacity(max_branches);

        let (token, handle) = Self::spawn_branch(0, Arc::clone(&next), &ctx, &tx);
        tokens.push(token);
        handles.push(handle);
        let mut launched = 1usize;
        let mut settled = 0usize;
        let mut primary_outcome: Option<Outcome<T>> = None;

        loop {
            let received = match self.options.trigger {
                HedgeTrigger::AfterDelay(delay) if launched < max_branches => {
                    tokio::select! {
                        msg = rx.recv() => Some(msg),
                        () = self.clock.sleep(delay) => None,
                    }
                }
                _ => Some(rx.recv().await),
            };

            let Some(message) = received else {
                // Delay elapsed with no settlement: hedge on slowness.
                tracing::debug!(branch = launched, "hedging delay elapsed, launching hedge");
                let (token, handle) =
                    Self::spawn_branch(launched, Arc::clone(&hedge_op), &ctx, &tx);
                tokens.push(token);
                handles.push(handle);
                launched += 1;
                continue;
            };

            let Some((index, outcome)) = message else {
                break;
            };
            settled += 1;

            if (self.options.accept)(&outcome) {
                for (i, token) in tokens.iter().enumerate() {
                    if i != index {
                        token.cancel("lost hedging race");
                    }
                }
                tracing::debug!(winner = index, launched, "hedging race settled");

                // A held unacceptable primary result is now definitively
                // discarded; release whatever it owns.
                if let Some(held) = primary_outcome.take() {
                    discard(held).await;
                }

                // Losers keep running in the background; a supervisor
                // tracks them to completion and disposes whatever they
                // still produce. The winner does not wait for it.
                let remaining = launched - settled;
                let handles = std::mem::take(&mut handles);
                tokio::spawn(async move {
                    for _ in 0..remaining {
                        if let Some((_, discarded)) = rx.recv().await {
                            discard(discarded).await;
                        }
                    }
                    for handle in handles {
                        let _ = handle.await;
                    }
                });

                return outcome;
            }

            if index == 0 {
                // The primary's outcome is authoritative if everything
                // fails; hold on to it.
                primary_outcome = Some(outcome);
            } else {
                discard(outcome).await;
            }

            if launched < max_branches {
                tracing::debug!(branch = launched, "attempt settled unacceptably, hedging");
                let (token, handle) =
                    Self::spawn_branch(launched, Arc::clone(&hedge_op), &ctx, &tx);
                tokens.push(token);
                handles.push(handle);
                launched += 1;
            }

            if settled == launched {
                break;
            }
        }

        primary_outcome.unwrap_or_else(|| {
            Outcome::Cancelled(
                ctx.cancellation()
                    .reason()
                    .unwrap_or_else(|| "hedging race abandoned".to_string()),
            )
        })
    }
}

impl<T> std::fmt::Debug for HedgingStrategy<T>
where
    T: Disposable + Send + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HedgingStrategy")
            .field("options", &self.options)
            .finish()
    }
}
