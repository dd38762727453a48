// src/engine/scheduler.rs

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use tracing::{debug, info, warn};

use crate::config::{SchedulerConfig, validate_scheduler_config};
use crate::engine::shared::Shared;
use crate::errors::{Result, SchedulerError};
use crate::exec::barrier::{BarrierRound, BarrierTask};
use crate::exec::worker::current_scheduler;
use crate::exec::WorkerPool;
use crate::job::{Job, JobHandle};

/// What happened to the pool when it was shut down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Jobs that reached `Done` over the scheduler's lifetime.
    pub completed: usize,
    /// Submitted jobs that never ran because the workers stopped first.
    pub abandoned: usize,
    /// Worker threads whose loop ended in a panic (job panics excluded).
    pub worker_panics: usize,
}

/// Point-in-time counters, for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerStats {
    pub workers: usize,
    pub submitted: usize,
    pub completed: usize,
    pub faulted: usize,
    /// Jobs submitted but not yet `Done`.
    pub outstanding: usize,
    /// Jobs in the ready queue waiting for a worker.
    pub queued: usize,
}

enum Lifecycle {
    Running(WorkerPool),
    Stopped(ShutdownReport),
}

/// Dependency-aware job scheduler backed by a fixed pool of worker threads.
///
/// The scheduler owns the dependency graph, the ready queue, the
/// completion tracker and the worker threads. Share it between submitting
/// threads with an `Arc`; every method takes `&self`.
///
/// ```no_run
/// use jobgraph::{Job, JobScheduler};
///
/// let scheduler = JobScheduler::with_threads(4)?;
/// let load = Job::new(|| println!("load"));
/// let simulate = Job::new(|| println!("simulate")).with_dependency(&load.handle());
/// scheduler.enqueue(vec![load, simulate])?;
/// scheduler.wait_for_all()?;
/// scheduler.shutdown()?;
/// # Ok::<(), jobgraph::SchedulerError>(())
/// ```
pub struct JobScheduler {
    shared: Arc<Shared>,
    workers: usize,
    /// `true` while submissions are accepted. Held shared for the whole of
    /// `enqueue` so shutdown cannot slip in between registration and push.
    accepting: RwLock<bool>,
    /// Serializes per-thread barrier rounds.
    barrier_serial: Mutex<()>,
    lifecycle: Mutex<Lifecycle>,
}

impl JobScheduler {
    /// Build a scheduler and start its worker threads.
    pub fn new(config: &SchedulerConfig) -> Result<Self> {
        validate_scheduler_config(config)?;

        let workers = config.resolved_worker_threads().max(1);
        let shared = Arc::new(Shared::new(workers));
        let pool = WorkerPool::spawn(workers, &config.thread_name_prefix, &shared)?;

        info!(scheduler = shared.id, workers, "job scheduler started");

        Ok(Self {
            shared,
            workers,
            accepting: RwLock::new(true),
            barrier_serial: Mutex::new(()),
            lifecycle: Mutex::new(Lifecycle::Running(pool)),
        })
    }

    /// Build a scheduler with `threads` workers (0 = hardware parallelism).
    pub fn with_threads(threads: usize) -> Result<Self> {
        Self::new(&SchedulerConfig::with_threads(threads))
    }

    pub fn worker_count(&self) -> usize {
        self.workers
    }

    /// Submit a batch of jobs.
    ///
    /// The batch is validated and merged into the live graph under the
    /// graph lock; jobs whose prerequisites are all finished are queued
    /// immediately. Returns without waiting for anything to run. Batches may
    /// be submitted while earlier ones are still draining, and their jobs
    /// may depend on jobs from those batches, finished or not.
    ///
    /// On error nothing from the batch is registered or run.
    pub fn enqueue(&self, jobs: Vec<Job>) -> Result<Vec<JobHandle>> {
        let accepting = self.accepting.read().unwrap_or_else(PoisonError::into_inner);
        if !*accepting {
            return Err(SchedulerError::ShutDown {
                outstanding: self.shared.tracker.outstanding(),
            });
        }

        if jobs.is_empty() {
            return Ok(Vec::new());
        }

        let count = jobs.len();
        let handles: Vec<JobHandle> = jobs.iter().map(Job::handle).collect();

        // Count the batch before it becomes visible: a worker finishing a
        // prerequisite from an earlier batch may release one of these jobs
        // before `register_batch` even returns.
        self.shared.tracker.add(count);

        let ready = match self.shared.graph.register_batch(jobs) {
            Ok(ready) => ready,
            Err(err) => {
                self.shared.tracker.complete(count);
                warn!(error = %err, batch = count, "rejected job batch");
                return Err(err);
            }
        };

        self.shared.stats.record_submitted(count);
        debug!(batch = count, ready = ready.len(), "enqueued job batch");

        self.shared.queue.push_all(ready);
        Ok(handles)
    }

    /// Submit a single job.
    pub fn enqueue_one(&self, job: Job) -> Result<JobHandle> {
        let handle = job.handle();
        self.enqueue(vec![job])?;
        Ok(handle)
    }

    /// Block until every job submitted so far has finished.
    ///
    /// Returns immediately if nothing is outstanding, and can be called any
    /// number of times. Fails with [`SchedulerError::ShutDown`] if the
    /// scheduler is shut down while jobs are still outstanding, and with
    /// [`SchedulerError::CalledFromWorker`] when called from inside a job.
    pub fn wait_for_all(&self) -> Result<()> {
        self.ensure_not_worker("wait_for_all")?;
        self.shared
            .tracker
            .wait()
            .map_err(|outstanding| SchedulerError::ShutDown { outstanding })
    }

    /// Run `f` exactly once on every worker thread and wait for all of them.
    ///
    /// Meant for per-thread setup (thread-local resources). Each worker runs
    /// the function before picking up further regular jobs, but a worker
    /// busy with a long job only gets to it once that job finishes.
    /// Concurrent calls are serialized.
    ///
    /// A panic inside `f` is caught on that worker and reported as
    /// [`SchedulerError::BarrierFault`] once every worker is done.
    pub fn run_on_each_worker_once_and_wait<F>(&self, f: F) -> Result<()>
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.ensure_not_worker("run_on_each_worker_once_and_wait")?;
        let _serial = self
            .barrier_serial
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let round = {
            let accepting = self.accepting.read().unwrap_or_else(PoisonError::into_inner);
            if !*accepting {
                return Err(SchedulerError::ShutDown {
                    outstanding: self.shared.tracker.outstanding(),
                });
            }

            let round = Arc::new(BarrierRound::new(Box::new(f), self.workers));
            self.shared
                .queue
                .post_barrier(|| BarrierTask::new(Arc::clone(&round)));
            round
        };

        let summary = round.wait();
        if summary.skipped > 0 {
            return Err(SchedulerError::ShutDown {
                outstanding: self.shared.tracker.outstanding(),
            });
        }
        if summary.failed > 0 {
            return Err(SchedulerError::BarrierFault {
                failed: summary.failed,
                workers: summary.workers,
            });
        }

        debug!(workers = summary.workers, "per-thread function ran on every worker");
        Ok(())
    }

    /// Stop accepting work, let every worker finish its current job, and
    /// join the threads.
    ///
    /// Jobs that were queued or still waiting on prerequisites are
    /// abandoned and counted in the report. Calling this again returns the
    /// same report.
    pub fn shutdown(&self) -> Result<ShutdownReport> {
        self.ensure_not_worker("shutdown")?;

        let mut lifecycle = self.lock_lifecycle();
        let pool = match &mut *lifecycle {
            Lifecycle::Stopped(report) => return Ok(*report),
            Lifecycle::Running(pool) => pool,
        };

        *self.accepting.write().unwrap_or_else(PoisonError::into_inner) = false;
        info!(scheduler = self.shared.id, "shutting down job scheduler");

        let discarded = self.shared.queue.close();
        let worker_panics = pool.join();
        let abandoned = self.shared.graph.abandon_all();
        self.shared.tracker.close();

        if abandoned > 0 {
            warn!(abandoned, discarded, "jobs abandoned at shutdown");
        }

        let report = ShutdownReport {
            completed: self.shared.stats.completed(),
            abandoned,
            worker_panics,
        };
        *lifecycle = Lifecycle::Stopped(report);

        info!(?report, "job scheduler stopped");
        Ok(report)
    }

    pub fn is_shut_down(&self) -> bool {
        !*self.accepting.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Jobs submitted but not yet finished.
    pub fn outstanding(&self) -> usize {
        self.shared.tracker.outstanding()
    }

    pub fn stats(&self) -> SchedulerStats {
        SchedulerStats {
            workers: self.workers,
            submitted: self.shared.stats.submitted(),
            completed: self.shared.stats.completed(),
            faulted: self.shared.stats.faulted(),
            outstanding: self.shared.tracker.outstanding(),
            queued: self.shared.queue.len(),
        }
    }

    fn ensure_not_worker(&self, operation: &'static str) -> Result<()> {
        if current_scheduler() == self.shared.id {
            return Err(SchedulerError::CalledFromWorker(operation));
        }
        Ok(())
    }

    fn lock_lifecycle(&self) -> MutexGuard<'_, Lifecycle> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for JobScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobScheduler")
            .field("id", &self.shared.id)
            .field("workers", &self.workers)
            .field("outstanding", &self.outstanding())
            .field("shut_down", &self.is_shut_down())
            .finish_non_exhaustive()
    }
}

impl Drop for JobScheduler {
    fn drop(&mut self) {
        if let Err(err) = self.shutdown() {
            // Dropped from one of our own workers: we cannot join ourselves,
            // but the other workers must still be released.
            warn!(error = %err, "job scheduler dropped without orderly shutdown");
            self.shared.queue.close();
            self.shared.tracker.close();
        }
    }
}
