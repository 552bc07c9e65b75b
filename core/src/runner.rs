//! Run an action with a wall-clock bound.
//!
//! # Design
//! The action runs on its own worker thread and reports back over a
//! channel; the caller waits with `recv_timeout`. On timeout the runner
//! cancels the action's `CancelToken` and returns at once. The worker is
//! detached, so stopping is cooperative: an action that never looks at its
//! token keeps running until it finishes on its own, and whatever it then
//! produces is discarded.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;

/// Returned by `CancelToken::check` once cancellation has been requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation cancelled")]
pub struct Cancelled;

/// Cooperative cancellation signal shared between the runner and an action.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<TokenState>,
}

#[derive(Debug, Default)]
struct TokenState {
    cancelled: Mutex<bool>,
    wake: Condvar,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        *self.lock() = true;
        self.inner.wake.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self.lock()
    }

    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }

    /// Sleep for `duration` unless cancelled first.
    /// Returns `true` if the full duration elapsed.
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        let mut cancelled = self.lock();
        while !*cancelled {
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            cancelled = match self.inner.wake.wait_timeout(cancelled, deadline - now) {
                Ok((guard, _)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }
        false
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        // A bool cannot be left half-written, so a poisoned lock is still valid.
        self.inner
            .cancelled
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Run `action` on a worker thread and wait at most `timeout` for it.
///
/// Returns `Ok(true)` if it finished in time, `Ok(false)` if the bound
/// elapsed first (the token is cancelled and the worker left running), or
/// the action's own error if it failed in time. A panic inside the action
/// resumes on the caller when it happens in time.
pub fn run_with_timeout<F, E>(timeout: Duration, action: F) -> Result<bool, E>
where
    F: FnOnce(&CancelToken) -> Result<(), E> + Send + 'static,
    E: Send + 'static,
{
    let token = CancelToken::new();
    let worker_token = token.clone();
    let (tx, rx) = mpsc::sync_channel(1);

    let worker = thread::spawn(move || {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| action(&worker_token)));
        // The receiver is gone once the caller has timed out.
        let _ = tx.send(outcome);
    });

    match rx.recv_timeout(timeout) {
        Ok(Ok(result)) => {
            let _ = worker.join();
            result.map(|()| true)
        }
        Ok(Err(payload)) => {
            let _ = worker.join();
            panic::resume_unwind(payload)
        }
        Err(RecvTimeoutError::Timeout) => {
            token.cancel();
            tracing::debug!(
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                "action exceeded its bound; worker detached"
            );
            Ok(false)
        }
        Err(RecvTimeoutError::Disconnected) => {
            // The worker dropped its sender without reporting, which only a
            // panic while sending could cause.
            match worker.join() {
                Err(payload) => panic::resume_unwind(payload),
                Ok(()) => Ok(true),
            }
        }
    }
}

/// `run_with_timeout` with the bound given in milliseconds.
pub fn run_with_timeout_ms<F, E>(timeout_ms: u64, action: F) -> Result<bool, E>
where
    F: FnOnce(&CancelToken) -> Result<(), E> + Send + 'static,
    E: Send + 'static,
{
    run_with_timeout(Duration::from_millis(timeout_ms), action)
}
