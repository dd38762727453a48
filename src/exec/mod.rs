// src/exec/mod.rs

//! Execution layer: worker threads and the queue feeding them.
//!
//! - [`ready_queue`] is the lock + condvar MPMC queue of [`WorkItem`]s.
//! - [`worker`] owns the per-thread loop that runs jobs and reports
//!   completions back to the dependency graph.
//! - [`pool`] spawns and joins the fixed set of worker threads.
//! - [`barrier`] implements the "run once on every worker" work item.

pub mod barrier;
pub mod pool;
pub mod ready_queue;
pub mod worker;

pub use barrier::{BarrierTask, PerThreadFn};
pub use pool::WorkerPool;
pub use ready_queue::{ReadyQueue, WorkItem};
