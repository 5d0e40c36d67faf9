//! Error types for the faultflow engine.
//!
//! Engine-construction errors (validation failures) are fail-fast and
//! synchronous. Failures of the wrapped user operation are *not* errors in
//! this taxonomy; they travel through [`crate::strategy::Outcome`] as data
//! for strategies to act on.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The main error type for faultflow operations.
#[derive(Debug, Error)]
pub enum FaultflowError {
    /// Options or builder configuration failed validation.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The wrapped operation reported a failure.
    #[error("{0}")]
    Execution(#[from] ExecutionError),

    /// The execution was cancelled cooperatively.
    #[error("Execution cancelled: {0}")]
    Cancelled(String),
}

/// Metadata about a configuration error for better diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigErrorInfo {
    /// Error code (e.g., "CONFIG-002-EMPTY_TYPE").
    pub code: String,
    /// Short summary of the error.
    pub summary: String,
    /// Hint for fixing the error.
    pub fix_hint: Option<String>,
}

impl ConfigErrorInfo {
    /// Creates a new config error info.
    #[must_use]
    pub fn new(code: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            summary: summary.into(),
            fix_hint: None,
        }
    }

    /// Sets the fix hint.
    #[must_use]
    pub fn with_fix_hint(mut self, hint: impl Into<String>) -> Self {
        self.fix_hint = Some(hint.into());
        self
    }
}

/// Error raised when strategy options or builder configuration are invalid.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// The error message.
    pub message: String,
    /// The fields that failed validation.
    pub fields: Vec<String>,
    /// Optional config error info.
    pub error_info: Option<ConfigErrorInfo>,
}

impl ValidationError {
    /// Creates a new validation error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fields: Vec::new(),
            error_info: None,
        }
    }

    /// Sets the fields that failed validation.
    #[must_use]
    pub fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }

    /// Sets the config error info.
    #[must_use]
    pub fn with_error_info(mut self, info: ConfigErrorInfo) -> Self {
        self.error_info = Some(info);
        self
    }
}

/// A failure reported by a wrapped user operation.
///
/// This is outcome data, not an engine malfunction. Strategies such as
/// hedging inspect it to decide whether to launch further attempts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ExecutionError {
    /// Description of the failure.
    pub message: String,
}

impl ExecutionError {
    /// Creates a new execution error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
