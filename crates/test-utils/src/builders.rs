#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use jobgraph::config::{FrameFile, JobConfig, RawFrameFile, SchedulerConfig};
use jobgraph::Job;

/// Builder for `FrameFile` to simplify test setup.
pub struct FrameFileBuilder {
    frame: RawFrameFile,
}

impl FrameFileBuilder {
    pub fn new() -> Self {
        Self {
            frame: RawFrameFile {
                scheduler: SchedulerConfig::default(),
                job: BTreeMap::new(),
            },
        }
    }

    pub fn with_job(mut self, name: &str, job: JobConfig) -> Self {
        self.frame.job.insert(name.to_string(), job);
        self
    }

    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.frame.scheduler.worker_threads = threads;
        self
    }

    /// The unvalidated frame, for tests that expect validation to fail.
    pub fn build_raw(self) -> RawFrameFile {
        self.frame
    }

    pub fn build(self) -> FrameFile {
        FrameFile::try_from(self.frame).expect("Failed to build valid frame from builder")
    }
}

impl Default for FrameFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `JobConfig`.
pub struct JobConfigBuilder {
    job: JobConfig,
}

impl JobConfigBuilder {
    pub fn new() -> Self {
        Self {
            job: JobConfig::default(),
        }
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.job.after.push(dep.to_string());
        self
    }

    pub fn cost_us(mut self, cost: u64) -> Self {
        self.job.cost_us = cost;
        self
    }

    pub fn fail(mut self, val: bool) -> Self {
        self.job.fail = val;
        self
    }

    pub fn build(self) -> JobConfig {
        self.job
    }
}

impl Default for JobConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `n` independent jobs that each increment `counter` once.
pub fn counter_jobs(n: usize, counter: &Arc<AtomicUsize>) -> Vec<Job> {
    (0..n)
        .map(|i| {
            let counter = Arc::clone(counter);
            Job::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .with_name(format!("counter-{i}"))
        })
        .collect()
}
