//! Single-use pipeline builder.

use super::ResiliencePipeline;
use crate::clock::{SharedClock, SystemClock};
use crate::context::{ResilienceProperties, StrategyBuilderContext};
use crate::errors::ValidationError;
use crate::strategy::{EmptyOptions, Strategy, StrategyOptions};
use std::sync::Arc;

/// Factory producing a strategy from its build-time context.
pub type StrategyFactory<T> =
    Box<dyn FnOnce(&StrategyBuilderContext) -> Arc<dyn Strategy<T>> + Send>;

/// Callback invoked with the full ordered strategy list just before the
/// pipeline is assembled. The sole extension point for cross-cutting
/// concerns such as telemetry wrapping.
pub type OnPipelineCreated<T> = Box<dyn FnOnce(&mut Vec<Arc<dyn Strategy<T>>>) + Send>;

struct Entry<T>
where
    T: Send + 'static,
{
    factory: StrategyFactory<T>,
    strategy_name: String,
    strategy_type: String,
}

/// Append-only registry of strategy factories, compiled into a
/// [`ResiliencePipeline`] exactly once.
///
/// Strategies execute in registration order, first entry outermost: a retry
/// strategy registered first re-invokes the *entire* inner chain on each
/// attempt.
///
/// [`PipelineBuilder::build`] consumes the builder, so it cannot be
/// reconfigured or reused after the strategies have been materialized -
/// the single-use rule is enforced by ownership rather than a runtime
/// flag.
pub struct PipelineBuilder<T>
where
    T: Send + 'static,
{
    name: String,
    entries: Vec<Entry<T>>,
    properties: Arc<ResilienceProperties>,
    clock: SharedClock,
    on_pipeline_created: Option<OnPipelineCreated<T>>,
    typed: bool,
}

impl<T> PipelineBuilder<T>
where
    T: Send + 'static,
{
    /// Creates a new builder with the given diagnostic name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            properties: Arc::new(ResilienceProperties::new()),
            clock: Arc::new(SystemClock),
            on_pipeline_created: None,
            typed: true,
        }
    }

    /// Replaces the injected time source.
    #[must_use]
    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }

    /// Marks the builder as producing an erased (non-generic) call shape.
    #[must_use]
    pub fn erased(mut self) -> Self {
        self.typed = false;
        self
    }

    /// Registers a callback to observe or wrap the materialized strategy
    /// list before the pipeline is assembled.
    #[must_use]
    pub fn on_pipeline_created(mut self, callback: OnPipelineCreated<T>) -> Self {
        self.on_pipeline_created = Some(callback);
        self
    }

    /// Returns the builder name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the shared builder property bag.
    ///
    /// Strategies may capture this at factory time; it is considered
    /// read-only once `build` has run.
    #[must_use]
    pub fn properties(&self) -> &Arc<ResilienceProperties> {
        &self.properties
    }

    /// Returns the number of registered entries.
    #[must_use]
    pub fn strategy_count(&self) -> usize {
        self.entries.len()
    }

    /// Adds an already-constructed strategy.
    ///
    /// The strategy is wrapped in a factory returning it unchanged, paired
    /// with the empty-options marker.
    pub fn add_strategy(&mut self, strategy: Arc<dyn Strategy<T>>) {
        self.entries.push(Entry {
            factory: Box::new(move |_ctx| strategy),
            strategy_name: EmptyOptions.strategy_name().to_string(),
            strategy_type: EmptyOptions.strategy_type().to_string(),
        });
    }

    /// Adds a strategy produced by `factory`, configured by `options`.
    ///
    /// Options are validated here, before the entry is appended; a
    /// rejected entry leaves the builder untouched.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the options fail their declared
    /// constraints.
    pub fn add_strategy_with<F, O>(&mut self, factory: F, options: O) -> Result<(), ValidationError>
    where
        F: FnOnce(&StrategyBuilderContext) -> Arc<dyn Strategy<T>> + Send + 'static,
        O: StrategyOptions,
    {
        options.validate()?;

        self.entries.push(Entry {
            factory: Box::new(factory),
            strategy_name: options.strategy_name().to_string(),
            strategy_type: options.strategy_type().to_string(),
        });
        Ok(())
    }

    /// Materializes all registered strategies and composes them into a
    /// pipeline, consuming the builder.
    ///
    /// Zero entries yield a pass-through unit; exactly one entry yields
    /// that strategy directly, with no wrapper; more entries yield a chain
    /// executing in registration order.
    #[must_use]
    pub fn build(self) -> ResiliencePipeline<T> {
        let name = self.name;
        let properties = self.properties;
        let clock = self.clock;
        let typed = self.typed;

        let mut strategies: Vec<Arc<dyn Strategy<T>>> = self
            .entries
            .into_iter()
            .map(|entry| {
                let ctx = StrategyBuilderContext::new(
                    name.clone(),
                    Arc::clone(&properties),
                    entry.strategy_name,
                    entry.strategy_type,
                    Arc::clone(&clock),
                    typed,
                );
                (entry.factory)(&ctx)
            })
            .collect();

        if let Some(callback) = self.on_pipeline_created {
            callback(&mut strategies);
        }

        tracing::debug!(
            builder = %name,
            strategies = strategies.len(),
            "materialized resilience pipeline"
        );

        ResiliencePipeline::assemble(name, strategies)
    }
}

impl<T> std::fmt::Debug for PipelineBuilder<T>
where
    T: Send + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineBuilder")
            .field("name", &self.name)
            .field("strategy_count", &self.entries.len())
            .finish()
    }
}
