//! Single-slot delayed execution.

use std::time::Duration;

use tokio::task::JoinHandle;

/// Runs at most one pending action after a delay; scheduling a new action
/// aborts the one still waiting.
///
/// Only the wait is cancellable. Once the delay has elapsed the action runs to
/// completion, so anything it spawns outlives later calls to
/// [`Debouncer::schedule`] or [`Debouncer::cancel`].
#[derive(Debug)]
pub struct Debouncer {
    name: &'static str,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            pending: None,
        }
    }

    /// Schedules `action` to run after `delay`, superseding any pending one.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule<F>(&mut self, delay: Duration, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.cancel() {
            tracing::debug!(debouncer = self.name, "pending action superseded");
        }
        self.pending = Some(tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            action();
        }));
    }

    /// Aborts the pending action. Returns `true` if one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
