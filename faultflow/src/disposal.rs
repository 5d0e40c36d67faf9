//! Guaranteed-non-throwing release of discarded results.
//!
//! A losing hedge branch may have acquired a resource (an open handle
//! embedded in its result) by the time it is discarded. The coordinator
//! routes such results through [`try_dispose_safely`], which releases them
//! exactly once and contains every failure, so faulty disposal logic in
//! user code can never destabilize the winning path.

use async_trait::async_trait;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

/// Failure while releasing a resource. Always contained by
/// [`try_dispose_safely`]; never surfaced to callers.
#[derive(Debug, Clone, Error)]
#[error("disposal failed: {message}")]
pub struct DisposalError {
    /// Description of the failure.
    pub message: String,
}

impl DisposalError {
    /// Creates a new disposal error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Disposal capability of a result payload.
///
/// The defaults declare no capability, so implementing this trait for a
/// plain value is a one-liner: `impl Disposable for MyResponse {}`. Types
/// owning resources override the probe(s) and the matching dispose
/// method(s).
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Disposable: Send {
    /// True if this value supports synchronous disposal.
    fn supports_sync_dispose(&self) -> bool {
        false
    }

    /// True if this value supports asynchronous disposal.
    fn supports_async_dispose(&self) -> bool {
        false
    }

    /// Releases the value synchronously.
    ///
    /// # Errors
    ///
    /// Implementations may report a [`DisposalError`]; callers going
    /// through [`try_dispose_safely`] never observe it.
    fn dispose(&mut self) -> Result<(), DisposalError> {
        Ok(())
    }

    /// Releases the value asynchronously.
    ///
    /// # Errors
    ///
    /// Implementations may report a [`DisposalError`]; callers going
    /// through [`try_dispose_safely`] never observe it.
    async fn dispose_async(&mut self) -> Result<(), DisposalError> {
        Ok(())
    }
}

impl Disposable for () {}
impl Disposable for bool {}
impl Disposable for i64 {}
impl Disposable for u64 {}
impl Disposable for f64 {}
impl Disposable for String {}
impl Disposable for &'static str {}
impl Disposable for serde_json::Value {}
impl Disposable for Vec<u8> {}

/// Releases `value` according to its capability and the requested mode,
/// without ever propagating a disposal failure.
///
/// - No capability: completes immediately as a no-op.
/// - `synchronous = true`: synchronous disposal is preferred; asynchronous
///   disposal runs only as the sole option.
/// - `synchronous = false`: asynchronous disposal is preferred and
///   awaited; synchronous disposal runs only as the sole option.
///
/// Errors and panics raised by the underlying disposal logic are swallowed.
/// Logging them is the caller's concern, not this helper's.
pub async fn try_dispose_safely<D>(value: &mut D, synchronous: bool)
where
    D: Disposable + ?Sized,
{
    if synchronous {
        if value.supports_sync_dispose() {
            dispose_sync_contained(value);
        } else if value.supports_async_dispose() {
            dispose_async_contained(value).await;
        }
    } else if value.supports_async_dispose() {
        dispose_async_contained(value).await;
    } else if value.supports_sync_dispose() {
        dispose_sync_contained(value);
    }
}

fn dispose_sync_contained<D: Disposable + ?Sized>(value: &mut D) {
    let _ = std::panic::catch_unwind(AssertUnwindSafe(|| value.dispose()));
}

async fn dispose_async_contained<D: Disposable + ?Sized>(value: &mut D) {
    let _ = AssertUnwindSafe(value.dispose_async()).catch_unwind().await;
}
