//! Per-invocation and build-time context carriers.

mod builder_ctx;
mod execution;
mod properties;

pub use builder_ctx::StrategyBuilderContext;
pub use execution::ResilienceContext;
pub use properties::ResilienceProperties;
