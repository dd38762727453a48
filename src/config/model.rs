// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

/// Frame description as read from a TOML file, before validation.
///
/// ```toml
/// [scheduler]
/// worker_threads = 0
///
/// [job.update_transforms]
/// cost_us = 200
///
/// [job.cull]
/// after = ["update_transforms"]
/// cost_us = 100
/// ```
///
/// All sections are optional at parse time; validation requires at least
/// one job.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFrameFile {
    /// Worker pool settings from `[scheduler]`.
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// All jobs from `[job.<name>]`, keyed by job name.
    #[serde(default)]
    pub job: BTreeMap<String, JobConfig>,
}

/// A validated frame description.
///
/// Only constructed through `TryFrom<RawFrameFile>`, so holders can rely on
/// every `after` entry naming an existing job and the graph being acyclic.
#[derive(Debug, Clone)]
pub struct FrameFile {
    pub scheduler: SchedulerConfig,
    pub job: BTreeMap<String, JobConfig>,
}

impl FrameFile {
    pub(crate) fn new_unchecked(scheduler: SchedulerConfig, job: BTreeMap<String, JobConfig>) -> Self {
        Self { scheduler, job }
    }
}

/// `[scheduler]` section, also the construction-time settings of
/// [`JobScheduler`](crate::engine::JobScheduler).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SchedulerConfig {
    /// Number of worker threads. 0 = available hardware parallelism.
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,

    /// Worker threads are named `<prefix>-<index>`.
    #[serde(default = "default_thread_name_prefix")]
    pub thread_name_prefix: String,
}

fn default_worker_threads() -> usize {
    0
}

fn default_thread_name_prefix() -> String {
    "jobgraph-worker".to_string()
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            worker_threads: default_worker_threads(),
            thread_name_prefix: default_thread_name_prefix(),
        }
    }
}

impl SchedulerConfig {
    /// Config with an explicit worker count (0 = hardware parallelism).
    pub fn with_threads(worker_threads: usize) -> Self {
        Self {
            worker_threads,
            ..Self::default()
        }
    }

    /// Resolve worker thread count (0 means use available parallelism).
    pub fn resolved_worker_threads(&self) -> usize {
        if self.worker_threads == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        } else {
            self.worker_threads
        }
    }
}

/// `[job.<name>]` section: a synthetic workload for the demo host.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobConfig {
    /// Jobs that must finish before this one starts.
    #[serde(default)]
    pub after: Vec<String>,

    /// Busy-work duration in microseconds.
    #[serde(default)]
    pub cost_us: u64,

    /// If true, the job reports a failure instead of succeeding.
    #[serde(default)]
    pub fail: bool,
}
