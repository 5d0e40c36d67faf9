//! Per-invocation execution context.

use super::ResilienceProperties;
use crate::cancellation::CancellationToken;
use std::sync::Arc;
use uuid::Uuid;

/// Carrier of per-call state through one strategy invocation.
///
/// The context is created fresh for each top-level call and flows by handle
/// into every nested strategy, so property mutations made by an outer
/// strategy are visible to the strategies nested inside it.
///
/// Hedge branches must not share one mutable context; they receive derived
/// copies via [`ResilienceContext::fork`].
#[derive(Clone, Debug)]
pub struct ResilienceContext {
    inner: Arc<ContextInner>,
}

#[derive(Debug)]
struct ContextInner {
    execution_id: Uuid,
    pipeline_name: String,
    typed: bool,
    cancellation: Arc<CancellationToken>,
    properties: ResilienceProperties,
}

impl ResilienceContext {
    /// Creates a fresh context with a new cancellation token.
    #[must_use]
    pub fn new() -> Self {
        Self::with_parts(String::new(), true, CancellationToken::new(), ResilienceProperties::new())
    }

    pub(crate) fn with_parts(
        pipeline_name: String,
        typed: bool,
        cancellation: Arc<CancellationToken>,
        properties: ResilienceProperties,
    ) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                execution_id: Uuid::new_v4(),
                pipeline_name,
                typed,
                cancellation,
                properties,
            }),
        }
    }

    /// Sets the pipeline name, consuming the context.
    ///
    /// Only meaningful before the context is handed to a pipeline.
    #[must_use]
    pub fn with_pipeline_name(self, name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                execution_id: self.inner.execution_id,
                pipeline_name: name.into(),
                typed: self.inner.typed,
                cancellation: self.inner.cancellation.clone(),
                properties: self.inner.properties.clone(),
            }),
        }
    }

    /// Attaches a pre-existing cancellation token, consuming the context.
    #[must_use]
    pub fn with_cancellation(self, token: Arc<CancellationToken>) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                execution_id: self.inner.execution_id,
                pipeline_name: self.inner.pipeline_name.clone(),
                typed: self.inner.typed,
                cancellation: token,
                properties: self.inner.properties.clone(),
            }),
        }
    }

    /// Returns the unique id of this top-level execution.
    #[must_use]
    pub fn execution_id(&self) -> Uuid {
        self.inner.execution_id
    }

    /// Returns the name of the pipeline driving this execution.
    #[must_use]
    pub fn pipeline_name(&self) -> &str {
        &self.inner.pipeline_name
    }

    /// Returns true for the generic (typed payload) call shape.
    #[must_use]
    pub fn is_typed(&self) -> bool {
        self.inner.typed
    }

    /// Returns the cancellation token for this execution.
    #[must_use]
    pub fn cancellation(&self) -> &Arc<CancellationToken> {
        &self.inner.cancellation
    }

    /// Returns true if cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancellation.is_cancelled()
    }

    /// Returns the mutable property bag for this execution.
    #[must_use]
    pub fn properties(&self) -> &ResilienceProperties {
        &self.inner.properties
    }

    /// Derives an independent child context for a concurrent branch.
    ///
    /// The child gets a copy-on-fork snapshot of the property bag and a
    /// child cancellation token: cancelling the parent cancels the branch,
    /// while branch-local writes and cancellation never leak back to
    /// siblings.
    #[must_use]
    pub fn fork(&self) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                execution_id: self.inner.execution_id,
                pipeline_name: self.inner.pipeline_name.clone(),
                typed: self.inner.typed,
                cancellation: self.inner.cancellation.child(),
                properties: self.inner.properties.clone(),
            }),
        }
    }
}

impl Default for ResilienceContext {
    fn default() -> Self {
        Self::new()
    }
}
