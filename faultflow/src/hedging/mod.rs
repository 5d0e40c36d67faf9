//! Hedging: racing a secondary attempt against a slow or failed primary.

mod options;
mod strategy;

pub use options::{AcceptFn, HedgeTrigger, HedgingOptions};
pub use strategy::HedgingStrategy;

use crate::disposal::Disposable;
use crate::errors::ValidationError;
use crate::pipeline::PipelineBuilder;
use crate::strategy::Strategy;
use std::sync::Arc;

impl<T> PipelineBuilder<T>
where
    T: Disposable + Send + 'static,
{
    /// Registers a hedging strategy configured by `options`.
    ///
    /// The strategy uses the builder's injected clock for hedge delays.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the options are invalid.
    pub fn add_hedging(&mut self, options: HedgingOptions<T>) -> Result<(), ValidationError> {
        let factory_options = options.clone();
        self.add_strategy_with(
            move |ctx| {
                let strategy: Arc<dyn Strategy<T>> = Arc::new(HedgingStrategy::from_validated(
                    factory_options,
                    Arc::clone(ctx.clock()),
                ));
                strategy
            },
            options,
        )
    }
}
