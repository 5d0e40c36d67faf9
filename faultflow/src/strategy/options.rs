//! Validated configuration for strategy entries.

use crate::errors::{ConfigErrorInfo, ValidationError};

/// Configuration attached to one strategy registration.
///
/// Options are validated when the entry is added to a builder and are
/// considered immutable from then on. The type tag identifies the kind of
/// strategy for diagnostics; the name is a free-form label and may stay
/// empty.
pub trait StrategyOptions: Send {
    /// Diagnostic label for this strategy instance. Defaults to empty.
    fn strategy_name(&self) -> &str {
        ""
    }

    /// Type tag identifying the kind of strategy. Must be non-empty.
    fn strategy_type(&self) -> &str;

    /// Validates the options against their declared constraints.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the offending fields.
    fn validate(&self) -> Result<(), ValidationError> {
        if self.strategy_type().is_empty() {
            return Err(ValidationError::new("The strategy options are not valid")
                .with_fields(vec!["strategy_type".to_string()])
                .with_error_info(
                    ConfigErrorInfo::new("CONFIG-001-EMPTY_TYPE", "Strategy type must not be empty")
                        .with_fix_hint("Give the strategy a descriptive type tag, e.g. \"Hedging\"."),
                ));
        }
        Ok(())
    }
}

/// Plain name/type options for strategies with no configuration.
#[derive(Debug, Clone, Default)]
pub struct BasicOptions {
    /// Diagnostic label.
    pub name: String,
    /// Type tag.
    pub strategy_type: String,
}

impl BasicOptions {
    /// Creates options with the given type tag.
    #[must_use]
    pub fn new(strategy_type: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            strategy_type: strategy_type.into(),
        }
    }

    /// Sets the diagnostic name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl StrategyOptions for BasicOptions {
    fn strategy_name(&self) -> &str {
        &self.name
    }

    fn strategy_type(&self) -> &str {
        &self.strategy_type
    }
}

/// Marker options backing pre-constructed strategy registrations.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyOptions;

impl StrategyOptions for EmptyOptions {
    fn strategy_type(&self) -> &str {
        "Empty"
    }
}
