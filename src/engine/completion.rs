// src/engine/completion.rs

//! Outstanding-work counter with blocking wait.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use tracing::trace;

#[derive(Debug, Default)]
struct TrackerState {
    outstanding: usize,
    closed: bool,
}

/// Counter of work that has been handed out but not finished.
///
/// Backs both [`JobScheduler::wait_for_all`](super::JobScheduler::wait_for_all)
/// (one unit per submitted job) and the per-thread barrier (one unit per
/// worker). The decrement and the "reached zero" check happen in the same
/// critical section as the notification, so a waiter cannot miss a wakeup.
#[derive(Debug, Default)]
pub struct CompletionTracker {
    state: Mutex<TrackerState>,
    drained: Condvar,
}

impl CompletionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracker that starts with `n` units outstanding.
    pub fn with_outstanding(n: usize) -> Self {
        Self {
            state: Mutex::new(TrackerState {
                outstanding: n,
                closed: false,
            }),
            drained: Condvar::new(),
        }
    }

    /// Register `n` more units of outstanding work.
    pub fn add(&self, n: usize) {
        let mut state = self.lock();
        state.outstanding += n;
        trace!(added = n, outstanding = state.outstanding, "tracker add");
    }

    /// Mark one unit as finished. Returns the remaining count.
    pub fn complete_one(&self) -> usize {
        self.complete(1)
    }

    /// Mark `n` units as finished (also used to roll back a rejected `add`).
    pub fn complete(&self, n: usize) -> usize {
        let mut state = self.lock();
        state.outstanding = state.outstanding.saturating_sub(n);
        let remaining = state.outstanding;
        if remaining == 0 {
            self.drained.notify_all();
        }
        remaining
    }

    pub fn outstanding(&self) -> usize {
        self.lock().outstanding
    }

    /// Block until the count reaches zero.
    ///
    /// Returns immediately if nothing is outstanding. If the tracker is
    /// closed while work is still outstanding, returns `Err` with the
    /// remaining count instead of blocking forever.
    pub fn wait(&self) -> Result<(), usize> {
        let mut state = self.lock();
        loop {
            if state.outstanding == 0 {
                return Ok(());
            }
            if state.closed {
                return Err(state.outstanding);
            }
            state = self
                .drained
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Wake every waiter; later waits fail fast if work is still outstanding.
    pub fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        self.drained.notify_all();
    }

    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
