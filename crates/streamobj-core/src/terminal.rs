//! Terminal-promise bookkeeping (C8): `object`/`usage`/`finishReason`/
//! `providerMetadata` as awaitables that resolve exactly once and never
//! panic a consumer who never awaits them.
//!
//! Grounded on the `DelayedPromise<T>` pattern (an `Arc<Mutex<Option<T>>>`
//! paired with a `Notify`) rather than a bare `oneshot::channel`: a
//! oneshot can only be awaited once and only by one receiver, but every
//! terminal value here may be awaited from multiple places (the public
//! API surface and, separately, `onFinish`/telemetry bookkeeping inside
//! the orchestrator) after it has already resolved.

use crate::error::EngineError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};

struct Inner<T> {
    value: Mutex<Option<Result<T, EngineError>>>,
    notify: Notify,
    observed: AtomicBool,
}

/// An awaitable that resolves exactly once, successfully or with an
/// [`EngineError`].
///
/// Resolving with an error never panics, regardless of whether any
/// consumer ever calls [`Terminal::wait`] — the error is simply logged at
/// debug level if it is dropped unobserved, rather than treated as an
/// unhandled rejection.
pub struct Terminal<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Terminal<T> {
    fn clone(&self) -> Self {
        Terminal {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for Terminal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Terminal<T> {
    /// Creates a new, unresolved terminal.
    pub fn new() -> Self {
        Terminal {
            inner: Arc::new(Inner {
                value: Mutex::new(None),
                notify: Notify::new(),
                observed: AtomicBool::new(false),
            }),
        }
    }

    /// Resolves the terminal. A second call is a no-op: terminal promises
    /// resolve exactly once (spec §2 "resolve terminal promises").
    pub async fn resolve(&self, result: Result<T, EngineError>)
    where
        T: Send,
    {
        let mut guard = self.inner.value.lock().await;
        if guard.is_some() {
            return;
        }
        *guard = Some(result);
        drop(guard);
        self.inner.notify.notify_waiters();
    }

    /// Returns true once [`Terminal::resolve`] has been called.
    pub async fn is_resolved(&self) -> bool {
        self.inner.value.lock().await.is_some()
    }
}

impl<T: Clone + Send> Terminal<T> {
    /// Waits for resolution and returns a clone of the resolved value.
    ///
    /// Multiple independent callers may each await the same terminal; all
    /// of them observe the same result.
    pub async fn wait(&self) -> Result<T, EngineError> {
        self.inner.observed.store(true, Ordering::Relaxed);
        loop {
            {
                let guard = self.inner.value.lock().await;
                if let Some(ref result) = *guard {
                    return result.clone();
                }
            }
            self.inner.notify.notified().await;
        }
    }
}

impl<T> Drop for Inner<T> {
    fn drop(&mut self) {
        if self.observed.load(Ordering::Relaxed) {
            return;
        }
        if let Ok(guard) = self.value.try_lock() {
            if let Some(Err(ref err)) = *guard {
                tracing::debug!(error = %err, "terminal promise resolved with an error but was never awaited");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolve_then_wait() {
        let terminal: Terminal<u32> = Terminal::new();
        assert!(!terminal.is_resolved().await);
        terminal.resolve(Ok(42)).await;
        assert!(terminal.is_resolved().await);
        assert_eq!(terminal.wait().await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_wait_blocks_until_resolved() {
        let terminal: Terminal<u32> = Terminal::new();
        let waiter = terminal.clone();
        let handle = tokio::spawn(async move { waiter.wait().await });
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        terminal.resolve(Ok(7)).await;
        assert_eq!(handle.await.unwrap().unwrap(), 7);
    }

    #[tokio::test]
    async fn test_multiple_waiters_all_observe_the_same_result() {
        let terminal: Terminal<u32> = Terminal::new();
        let a = terminal.clone();
        let b = terminal.clone();
        terminal.resolve(Ok(9)).await;
        assert_eq!(a.wait().await.unwrap(), 9);
        assert_eq!(b.wait().await.unwrap(), 9);
    }

    #[tokio::test]
    async fn test_second_resolve_is_ignored() {
        let terminal: Terminal<u32> = Terminal::new();
        terminal.resolve(Ok(1)).await;
        terminal.resolve(Ok(2)).await;
        assert_eq!(terminal.wait().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_error_resolution_never_observed_does_not_panic() {
        let terminal: Terminal<u32> = Terminal::new();
        terminal.resolve(Err(EngineError::Cancelled)).await;
        drop(terminal);
    }
}
