//! Cooperative cancellation for strategy executions.
//!
//! A [`CancellationToken`] is attached to every execution context and is
//! propagated by reference into nested strategies and hedge branches. The
//! hedging coordinator additionally cancels the tokens of losing branches
//! once a winner is chosen.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Token for coordinating cancellation across concurrent attempts.
///
/// Cancellation is idempotent: only the first reason is stored. Tokens can
/// be linked into parent/child trees via [`CancellationToken::child`] so a
/// derived context inherits cancellation without leaking its own back to
/// siblings.
pub struct CancellationToken {
    cancelled: AtomicBool,
    reason: Mutex<Option<String>>,
    callbacks: Mutex<Vec<Box<dyn FnOnce(String) + Send>>>,
    notify: Notify,
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.cancelled.load(Ordering::SeqCst))
            .field("reason", &self.reason.lock())
            .finish()
    }
}

impl CancellationToken {
    /// Creates a new cancellation token.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Returns true if cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Returns the cancellation reason if cancelled.
    #[must_use]
    pub fn reason(&self) -> Option<String> {
        self.reason.lock().clone()
    }

    /// Requests cancellation with a reason.
    ///
    /// Idempotent - only the first reason is stored.
    pub fn cancel(&self, reason: impl Into<String>) {
        let reason = reason.into();

        if !self.cancelled.swap(true, Ordering::SeqCst) {
            *self.reason.lock() = Some(reason.clone());

            let callbacks: Vec<_> = {
                let mut lock = self.callbacks.lock();
                std::mem::take(&mut *lock)
            };

            for callback in callbacks {
                // Suppress panics in callbacks
                std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    callback(reason.clone());
                }))
                .ok();
            }

            self.notify.notify_waiters();
        }
    }

    /// Registers a callback to run when cancellation is requested.
    ///
    /// If already cancelled, the callback is invoked immediately.
    pub fn on_cancel<F>(&self, callback: F)
    where
        F: FnOnce(String) + Send + 'static,
    {
        if self.is_cancelled() {
            let reason = self.reason().unwrap_or_default();
            callback(reason);
        } else {
            self.callbacks.lock().push(Box::new(callback));
        }
    }

    /// Resolves once cancellation has been requested.
    pub async fn cancelled(&self) {
        loop {
            if self.is_cancelled() {
                return;
            }
            let notified = self.notify.notified();
            // Re-check after registering so a cancel between the first
            // check and registration is not missed.
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }

    /// Creates a child token that is cancelled when this token is.
    ///
    /// Cancelling the child does not affect the parent.
    #[must_use]
    pub fn child(self: &Arc<Self>) -> Arc<Self> {
        let child = Self::new();

        if self.is_cancelled() {
            child.cancel(self.reason().unwrap_or_default());
        } else {
            let weak = Arc::downgrade(&child);
            self.on_cancel(move |reason| {
                if let Some(child) = weak.upgrade() {
                    child.cancel(reason);
                }
            });
        }

        child
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self {
            cancelled: AtomicBool::new(false),
            reason: Mutex::new(None),
            callbacks: Mutex::new(Vec::new()),
            notify: Notify::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_token_initial_state() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
        assert!(token.reason().is_none());
    }

    #[test]
    fn test_token_cancel() {
        let token = CancellationToken::new();

        token.cancel("lost hedging race");

        assert!(token.is_cancelled());
        assert_eq!(token.reason(), Some("lost hedging race".to_string()));
    }

    #[test]
    fn test_token_idempotent() {
        let token = CancellationToken::new();

        token.cancel("first");
        token.cancel("second");

        assert_eq!(token.reason(), Some("first".to_string()));
    }

    #[test]
    fn test_child_follows_parent() {
        let parent = CancellationToken::new();
        let child = parent.child();

        assert!(!child.is_cancelled());
        parent.cancel("parent gone");

        assert!(child.is_cancelled());
        assert_eq!(child.reason(), Some("parent gone".to_string()));
    }

    #[test]
    fn test_child_does_not_leak_to_parent() {
        let parent = CancellationToken::new();
        let child = parent.child();

        child.cancel("branch lost");

        assert!(!parent.is_cancelled());
    }

    #[test]
    fn test_child_of_cancelled_parent() {
        let parent = CancellationToken::new();
        parent.cancel("already done");

        let child = parent.child();
        assert!(child.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_future_resolves() {
        let token = CancellationToken::new();

        let waiter = token.clone();
        let handle = tokio::spawn(async move {
            waiter.cancelled().await;
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        token.cancel("done waiting");

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_cancelled_future_immediate() {
        let token = CancellationToken::new();
        token.cancel("pre-cancelled");

        // Resolves without waiting.
        token.cancelled().await;
    }
}
