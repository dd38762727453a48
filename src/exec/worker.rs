// src/exec/worker.rs

//! The worker loop run by every pool thread.

use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::dag::ReadyJob;
use crate::engine::shared::Shared;
use crate::errors::JobFault;
use crate::exec::ready_queue::WorkItem;
use crate::job::{JobOutcome, Runnable};
use crate::types::JobState;

thread_local! {
    /// Id of the scheduler owning the current thread (0 = not a worker).
    static CURRENT_SCHEDULER: Cell<u64> = const { Cell::new(0) };
}

/// Id of the scheduler whose worker pool the calling thread belongs to.
pub(crate) fn current_scheduler() -> u64 {
    CURRENT_SCHEDULER.with(Cell::get)
}

/// Main loop of a worker thread.
///
/// `Idle -> Fetching -> Running -> reporting completion -> Idle`, until the
/// ready queue is closed.
pub(crate) fn worker_loop(index: usize, shared: Arc<Shared>) {
    CURRENT_SCHEDULER.with(|id| id.set(shared.id));
    info!(worker = index, "worker started");

    while let Some(item) = shared.queue.pop_blocking(index) {
        match item {
            WorkItem::Job(job) => run_job(index, &shared, job),
            WorkItem::Barrier(task) => task.run(index),
        }
    }

    CURRENT_SCHEDULER.with(|id| id.set(0));
    info!(worker = index, "worker stopped");
}

fn run_job(worker: usize, shared: &Shared, job: ReadyJob) {
    let ReadyJob { status, operation } = job;
    let id = status.id();

    status.advance(JobState::Running);
    debug!(worker, job = %id, name = ?status.name(), "running job");

    let outcome = execute(operation);
    if let JobOutcome::Faulted(fault) = &outcome {
        warn!(worker, job = %id, name = ?status.name(), %fault, "job faulted");
        shared.stats.record_fault();
    }
    status.record_outcome(outcome);

    // Graph lock is released before touching the queue.
    let newly_ready = shared.graph.on_job_finished(id);
    shared.queue.push_all(newly_ready);

    shared.stats.record_completion();
    let remaining = shared.tracker.complete_one();
    debug!(worker, job = %id, remaining, "job done");
}

/// Run a payload, turning errors and panics into a recorded fault.
fn execute(operation: Box<dyn Runnable>) -> JobOutcome {
    match panic::catch_unwind(AssertUnwindSafe(move || operation.run())) {
        Ok(Ok(())) => JobOutcome::Succeeded,
        Ok(Err(err)) => JobOutcome::Faulted(JobFault::Failed(format!("{err:#}"))),
        Err(payload) => JobOutcome::Faulted(JobFault::Panicked(panic_message(payload.as_ref()))),
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
