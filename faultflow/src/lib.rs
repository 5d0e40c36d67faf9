//! # Faultflow
//!
//! A composable resilience-strategy engine for async operations.
//!
//! Faultflow wraps arbitrary user-supplied operations (typically remote
//! calls) with fault-handling behavior without hand-written retry or race
//! logic at every call site:
//!
//! - **Strategy pipelines**: independently-authored strategies validated,
//!   ordered, and fused into a single executable unit
//! - **Hedging**: racing a secondary attempt against a slow or failed
//!   primary, with correct cancellation of the losers
//! - **Safe disposal**: guaranteed-non-throwing release of results
//!   produced by losing concurrent attempts
//! - **Context propagation**: cancellation signals and a property bag
//!   carried through every nested strategy call
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use faultflow::prelude::*;
//!
//! let mut builder = PipelineBuilder::new("fetch-profile");
//! builder.add_hedging(HedgingOptions::new())?;
//! let pipeline = builder.build();
//!
//! let outcome = pipeline
//!     .execute(|ctx| async move { fetch(ctx).await })
//!     .await;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cancellation;
pub mod clock;
pub mod context;
pub mod disposal;
pub mod errors;
pub mod hedging;
pub mod pipeline;
pub mod strategy;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cancellation::CancellationToken;
    pub use crate::clock::{Clock, SharedClock, SystemClock};
    pub use crate::context::{ResilienceContext, ResilienceProperties, StrategyBuilderContext};
    pub use crate::disposal::{try_dispose_safely, Disposable, DisposalError};
    pub use crate::errors::{
        ConfigErrorInfo, ExecutionError, FaultflowError, ValidationError,
    };
    pub use crate::hedging::{HedgeTrigger, HedgingOptions, HedgingStrategy};
    pub use crate::pipeline::{PipelineBuilder, ResiliencePipeline, StrategyChain};
    pub use crate::strategy::{
        operation, BasicOptions, Operation, Outcome, Passthrough, Strategy, StrategyOptions,
    };
}
