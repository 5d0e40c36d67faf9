//! Context handed to strategy factories at build time.

use super::ResilienceProperties;
use crate::clock::SharedClock;
use std::sync::Arc;

/// Value object passed to each strategy factory during
/// [`crate::pipeline::PipelineBuilder::build`].
///
/// Carries the builder identity, the shared builder properties, the entry's
/// own name and type tag, and the injected clock. Factories may capture any
/// of these; the builder is consumed by `build`, so nothing captured here
/// can desynchronize afterwards.
#[derive(Debug, Clone)]
pub struct StrategyBuilderContext {
    builder_name: String,
    builder_properties: Arc<ResilienceProperties>,
    strategy_name: String,
    strategy_type: String,
    clock: SharedClock,
    typed: bool,
}

impl StrategyBuilderContext {
    pub(crate) fn new(
        builder_name: String,
        builder_properties: Arc<ResilienceProperties>,
        strategy_name: String,
        strategy_type: String,
        clock: SharedClock,
        typed: bool,
    ) -> Self {
        Self {
            builder_name,
            builder_properties,
            strategy_name,
            strategy_type,
            clock,
            typed,
        }
    }

    /// Returns the name of the builder producing this strategy.
    #[must_use]
    pub fn builder_name(&self) -> &str {
        &self.builder_name
    }

    /// Returns the shared builder property bag.
    #[must_use]
    pub fn builder_properties(&self) -> &Arc<ResilienceProperties> {
        &self.builder_properties
    }

    /// Returns the diagnostic name of the strategy entry.
    #[must_use]
    pub fn strategy_name(&self) -> &str {
        &self.strategy_name
    }

    /// Returns the type tag of the strategy entry.
    #[must_use]
    pub fn strategy_type(&self) -> &str {
        &self.strategy_type
    }

    /// Returns the injected time source.
    #[must_use]
    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    /// Returns true when building for the generic (typed payload) shape.
    #[must_use]
    pub fn is_typed(&self) -> bool {
        self.typed
    }
}
