// src/exec/ready_queue.rs

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::dag::ReadyJob;
use crate::exec::barrier::BarrierTask;

/// What a worker pulls off the queue.
#[derive(Debug)]
pub enum WorkItem {
    /// A regular job whose prerequisites have all finished.
    Job(ReadyJob),
    /// This worker's share of a per-thread barrier round.
    Barrier(BarrierTask),
}

#[derive(Debug)]
struct QueueState {
    /// Shared FIFO of ready jobs, served to whichever worker asks first.
    jobs: VecDeque<ReadyJob>,
    /// One private slot per worker for barrier tasks.
    barriers: Vec<VecDeque<BarrierTask>>,
    closed: bool,
}

/// Multi-producer / multi-consumer queue of ready work.
///
/// Jobs are pushed by the submitting thread (immediately-ready part of a
/// batch) and by workers (dependents that just became ready); they are
/// served in FIFO order. Barrier tasks are addressed to a specific worker and
/// take precedence over regular jobs for that worker.
///
/// This lock is independent of the dependency graph lock and is never held
/// while the graph lock is taken.
#[derive(Debug)]
pub struct ReadyQueue {
    state: Mutex<QueueState>,
    available: Condvar,
}

impl ReadyQueue {
    pub fn new(workers: usize) -> Self {
        Self {
            state: Mutex::new(QueueState {
                jobs: VecDeque::new(),
                barriers: (0..workers).map(|_| VecDeque::new()).collect(),
                closed: false,
            }),
            available: Condvar::new(),
        }
    }

    /// Push one ready job. Never blocks on anything but the queue lock.
    pub fn push(&self, job: ReadyJob) {
        let mut state = self.lock();
        state.jobs.push_back(job);
        self.available.notify_one();
    }

    /// Push a set of ready jobs, waking as many workers as needed.
    pub fn push_all(&self, jobs: Vec<ReadyJob>) {
        match jobs.len() {
            0 => {}
            1 => {
                if let Some(job) = jobs.into_iter().next() {
                    self.push(job);
                }
            }
            _ => {
                let mut state = self.lock();
                state.jobs.extend(jobs);
                self.available.notify_all();
            }
        }
    }

    /// Deliver one barrier task to every worker's private slot.
    ///
    /// If the queue is already closed the tasks are dropped right away, which
    /// counts them as skipped for the waiting caller.
    pub(crate) fn post_barrier<F>(&self, mut make_task: F)
    where
        F: FnMut() -> BarrierTask,
    {
        let mut state = self.lock();
        if state.closed {
            let workers = state.barriers.len();
            drop(state);
            for _ in 0..workers {
                drop(make_task());
            }
            return;
        }

        for slot in state.barriers.iter_mut() {
            slot.push_back(make_task());
        }
        self.available.notify_all();
    }

    /// Block until there is work for `worker`, or the queue is closed.
    ///
    /// Returns `None` once the queue has been closed; remaining items are
    /// left for [`close`](Self::close) to discard.
    pub fn pop_blocking(&self, worker: usize) -> Option<WorkItem> {
        let mut state = self.lock();
        loop {
            if state.closed {
                return None;
            }

            if let Some(task) = state
                .barriers
                .get_mut(worker)
                .and_then(VecDeque::pop_front)
            {
                return Some(WorkItem::Barrier(task));
            }

            if let Some(job) = state.jobs.pop_front() {
                return Some(WorkItem::Job(job));
            }

            state = self
                .available
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Stop serving work and wake every blocked worker.
    ///
    /// Queued jobs and undelivered barrier tasks are discarded. Returns the
    /// number of jobs that were discarded.
    pub fn close(&self) -> usize {
        let (jobs, barriers) = {
            let mut state = self.lock();
            state.closed = true;
            self.available.notify_all();

            let jobs = std::mem::take(&mut state.jobs);
            let barriers: Vec<BarrierTask> = state
                .barriers
                .iter_mut()
                .flat_map(std::mem::take)
                .collect();
            (jobs, barriers)
        };

        // Barrier tasks signal their round on drop; do that outside the lock.
        let discarded = jobs.len();
        drop(barriers);
        debug!(discarded, "ready queue closed");
        discarded
    }

    /// Number of ready jobs waiting for a worker.
    pub(crate) fn len(&self) -> usize {
        self.lock().jobs.len()
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
