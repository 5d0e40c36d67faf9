//! Pipeline construction and composition.

mod builder;
mod chain;
#[allow(clippy::module_inception)]
mod pipeline;

#[cfg(test)]
mod integration_tests;

pub use builder::{OnPipelineCreated, PipelineBuilder, StrategyFactory};
pub use chain::StrategyChain;
pub use pipeline::ResiliencePipeline;
