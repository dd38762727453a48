// src/exec/barrier.rs

//! Per-thread barrier work items.
//!
//! A barrier round delivers one [`BarrierTask`] into every worker's private
//! slot of the ready queue. Each task decrements the round's countdown when
//! it is dropped, whether or not its payload ran, so the caller waiting on
//! the round always wakes up: tasks discarded by a shutdown count as
//! skipped instead of leaving the caller blocked.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, warn};

use crate::engine::completion::CompletionTracker;
use crate::exec::worker::panic_message;

/// Payload run once on every worker thread.
pub type PerThreadFn = dyn Fn() + Send + Sync + 'static;

/// Shared state of one `run_on_each_worker_once_and_wait` invocation.
pub(crate) struct BarrierRound {
    payload: Box<PerThreadFn>,
    remaining: CompletionTracker,
    failed: AtomicUsize,
    skipped: AtomicUsize,
    workers: usize,
}

impl BarrierRound {
    pub(crate) fn new(payload: Box<PerThreadFn>, workers: usize) -> Self {
        Self {
            payload,
            remaining: CompletionTracker::with_outstanding(workers),
            failed: AtomicUsize::new(0),
            skipped: AtomicUsize::new(0),
            workers,
        }
    }

    /// Block until every worker has either run or discarded its task.
    pub(crate) fn wait(&self) -> BarrierSummary {
        // Never closed, so this only returns once the countdown hits zero.
        let _ = self.remaining.wait();
        BarrierSummary {
            workers: self.workers,
            failed: self.failed.load(Ordering::Acquire),
            skipped: self.skipped.load(Ordering::Acquire),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BarrierSummary {
    pub(crate) workers: usize,
    pub(crate) failed: usize,
    pub(crate) skipped: usize,
}

/// One worker's share of a barrier round.
pub struct BarrierTask {
    round: Arc<BarrierRound>,
    ran: bool,
}

impl BarrierTask {
    pub(crate) fn new(round: Arc<BarrierRound>) -> Self {
        Self { round, ran: false }
    }

    /// Run the payload on the current worker thread.
    pub(crate) fn run(mut self, worker: usize) {
        self.ran = true;
        debug!(worker, "running per-thread function");

        let payload = &self.round.payload;
        if let Err(err) = panic::catch_unwind(AssertUnwindSafe(|| payload())) {
            warn!(
                worker,
                error = %panic_message(err.as_ref()),
                "per-thread function panicked"
            );
            self.round.failed.fetch_add(1, Ordering::AcqRel);
        }
    }
}

impl Drop for BarrierTask {
    fn drop(&mut self) {
        if !self.ran {
            self.round.skipped.fetch_add(1, Ordering::AcqRel);
        }
        self.round.remaining.complete_one();
    }
}

impl fmt::Debug for BarrierTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BarrierTask")
            .field("ran", &self.ran)
            .finish_non_exhaustive()
    }
}
