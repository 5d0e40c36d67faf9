//! The result channel between user callbacks and strategies.

use crate::errors::ExecutionError;

/// Outcome of one attempt at the wrapped operation.
///
/// A failure here is data flowing through the pipeline, not an engine
/// error: strategies inspect it to decide whether to retry, hedge, or
/// short-circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The operation produced a usable result.
    Success(T),
    /// The operation reported a failure.
    Failure(ExecutionError),
    /// The attempt was cancelled before settling.
    Cancelled(String),
}

impl<T> Outcome<T> {
    /// Builds a failure outcome from a message.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(ExecutionError::new(message))
    }

    /// Returns true for a success outcome.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns true for a failure outcome.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Returns true for a cancelled outcome.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }

    /// Returns the success payload, if any.
    #[must_use]
    pub fn success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Consumes the outcome, returning the success payload if any.
    #[must_use]
    pub fn into_success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Converts into a `Result`, mapping cancellation to a failure value.
    ///
    /// # Errors
    ///
    /// Returns the carried [`ExecutionError`] for failure outcomes and a
    /// synthesized one for cancelled outcomes.
    pub fn into_result(self) -> Result<T, ExecutionError> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(err) => Err(err),
            Self::Cancelled(reason) => Err(ExecutionError::new(format!("cancelled: {reason}"))),
        }
    }
}

impl<T> From<Result<T, ExecutionError>> for Outcome<T> {
    fn from(result: Result<T, ExecutionError>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(err) => Self::Failure(err),
        }
    }
}
