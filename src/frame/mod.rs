// src/frame/mod.rs

//! Demo host: runs a TOML frame description on a [`JobScheduler`].
//!
//! This is what the `jobgraph` binary drives. Each frame builds fresh jobs
//! from the description ([`builder`]), submits them as one batch, waits for
//! the graph to drain and summarizes the outcome.

pub mod builder;

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::config::FrameFile;
use crate::engine::JobScheduler;
use crate::errors::Result;

pub use builder::{FrameJobs, build_frame_jobs};

/// Outcome of one frame.
#[derive(Debug, Clone)]
pub struct FrameSummary {
    pub frame: u64,
    pub jobs: usize,
    /// Names of the jobs that finished with a fault.
    pub faulted: Vec<String>,
    pub elapsed: Duration,
}

/// Submit one frame's jobs and wait for all of them.
pub fn run_frame(scheduler: &JobScheduler, frame: &FrameFile, frame_index: u64) -> Result<FrameSummary> {
    let FrameJobs { jobs, handles } = build_frame_jobs(frame, frame_index);
    let count = jobs.len();

    let start = Instant::now();
    scheduler.enqueue(jobs)?;
    scheduler.wait_for_all()?;
    let elapsed = start.elapsed();

    let faulted: Vec<String> = handles
        .iter()
        .filter(|(_, handle)| handle.fault().is_some())
        .map(|(name, _)| name.clone())
        .collect();

    debug!(frame = frame_index, jobs = count, ?elapsed, "frame drained");

    Ok(FrameSummary {
        frame: frame_index,
        jobs: count,
        faulted,
        elapsed,
    })
}

/// Log the name of every worker thread once, before the first frame.
pub fn announce_workers(scheduler: &JobScheduler) -> Result<()> {
    scheduler.run_on_each_worker_once_and_wait(|| {
        let thread = std::thread::current();
        info!(thread = thread.name().unwrap_or("<unnamed>"), "worker ready");
    })
}
