// src/engine/shared.rs

//! State shared between the facade and every worker thread.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use crate::dag::DependencyGraph;
use crate::engine::completion::CompletionTracker;
use crate::exec::ReadyQueue;

static NEXT_SCHEDULER_ID: AtomicU64 = AtomicU64::new(1);

/// Everything a worker needs: the graph, the queue, the completion tracker
/// and the counters. Owned through an `Arc` by the facade and each worker.
#[derive(Debug)]
pub(crate) struct Shared {
    /// Process-unique scheduler id (never 0).
    pub(crate) id: u64,
    pub(crate) graph: DependencyGraph,
    pub(crate) queue: ReadyQueue,
    pub(crate) tracker: CompletionTracker,
    pub(crate) stats: Counters,
}

impl Shared {
    pub(crate) fn new(workers: usize) -> Self {
        let id = NEXT_SCHEDULER_ID.fetch_add(1, Ordering::Relaxed);
        Self {
            id,
            graph: DependencyGraph::new(id),
            queue: ReadyQueue::new(workers),
            tracker: CompletionTracker::new(),
            stats: Counters::default(),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    submitted: AtomicUsize,
    completed: AtomicUsize,
    faulted: AtomicUsize,
}

impl Counters {
    pub(crate) fn record_submitted(&self, n: usize) {
        self.submitted.fetch_add(n, Ordering::Relaxed);
    }

    pub(crate) fn record_completion(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_fault(&self) {
        self.faulted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn submitted(&self) -> usize {
        self.submitted.load(Ordering::Relaxed)
    }

    pub(crate) fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    pub(crate) fn faulted(&self) -> usize {
        self.faulted.load(Ordering::Relaxed)
    }
}
