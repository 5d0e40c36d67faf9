//! Hedging strategy configuration.

use crate::errors::{ConfigErrorInfo, ValidationError};
use crate::strategy::{Operation, Outcome, StrategyOptions};
use std::sync::Arc;
use std::time::Duration;

/// Result-classification rule: true for outcomes good enough to win the
/// race.
pub type AcceptFn<T> = Arc<dyn Fn(&Outcome<T>) -> bool + Send + Sync>;

/// When secondary attempts are launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HedgeTrigger {
    /// A hedge starts only when an attempt settles unacceptably.
    OnFailure,
    /// A hedge also starts when the delay elapses with no settlement -
    /// hedge on slowness. Unacceptable settlements still trigger a hedge
    /// immediately.
    AfterDelay(Duration),
}

/// Configuration for [`crate::hedging::HedgingStrategy`].
pub struct HedgingOptions<T> {
    /// Diagnostic label.
    pub name: String,
    /// Hedge launch trigger.
    pub trigger: HedgeTrigger,
    /// Maximum number of hedged attempts raced against the primary.
    pub max_hedged_attempts: usize,
    /// Alternate callback for hedged attempts. Defaults to re-running the
    /// primary callback.
    pub hedge_operation: Option<Operation<T>>,
    /// Classifies outcomes; the first accepted outcome wins the race.
    pub accept: AcceptFn<T>,
}

impl<T> HedgingOptions<T>
where
    T: 'static,
{
    /// Creates options with the defaults: failure-triggered, one hedge,
    /// primary callback reused, success-only acceptance.
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: String::new(),
            trigger: HedgeTrigger::OnFailure,
            max_hedged_attempts: 1,
            hedge_operation: None,
            accept: Arc::new(Outcome::is_success),
        }
    }

    /// Sets the diagnostic name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the hedge trigger.
    #[must_use]
    pub fn with_trigger(mut self, trigger: HedgeTrigger) -> Self {
        self.trigger = trigger;
        self
    }

    /// Sets the maximum number of hedged attempts.
    #[must_use]
    pub fn with_max_hedged_attempts(mut self, max: usize) -> Self {
        self.max_hedged_attempts = max;
        self
    }

    /// Sets the alternate callback used for hedged attempts.
    #[must_use]
    pub fn with_hedge_operation(mut self, op: Operation<T>) -> Self {
        self.hedge_operation = Some(op);
        self
    }

    /// Sets the result-classification rule.
    #[must_use]
    pub fn with_accept(mut self, accept: AcceptFn<T>) -> Self {
        self.accept = accept;
        self
    }
}

impl<T> Default for HedgingOptions<T>
where
    T: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for HedgingOptions<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            trigger: self.trigger,
            max_hedged_attempts: self.max_hedged_attempts,
            hedge_operation: self.hedge_operation.clone(),
            accept: Arc::clone(&self.accept),
        }
    }
}

impl<T> std::fmt::Debug for HedgingOptions<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HedgingOptions")
            .field("name", &self.name)
            .field("trigger", &self.trigger)
            .field("max_hedged_attempts", &self.max_hedged_attempts)
            .field("has_hedge_operation", &self.hedge_operation.is_some())
            .finish()
    }
}

impl<T> StrategyOptions for HedgingOptions<T>
where
    T: Send,
{
    fn strategy_name(&self) -> &str {
        &self.name
    }

    fn strategy_type(&self) -> &str {
        "Hedging"
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.max_hedged_attempts == 0 {
            return Err(ValidationError::new("The hedging options are not valid")
                .with_fields(vec!["max_hedged_attempts".to_string()])
                .with_error_info(
                    ConfigErrorInfo::new(
                        "CONFIG-002-NO_HEDGES",
                        "Hedging requires at least one hedged attempt",
                    )
                    .with_fix_hint("Set max_hedged_attempts to 1 or more."),
                ));
        }
        Ok(())
    }
}
