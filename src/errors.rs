// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::types::JobId;

#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("{job} depends on {dependency}, which was never submitted to this scheduler")]
    UnknownDependency { job: JobId, dependency: JobId },

    #[error("{0} cannot depend on itself")]
    SelfDependency(JobId),

    #[error("Cycle detected in job graph: {0}")]
    DependencyCycle(String),

    #[error("scheduler has been shut down ({outstanding} jobs outstanding)")]
    ShutDown { outstanding: usize },

    #[error("{0} called from a worker thread of the same scheduler; this would deadlock")]
    CalledFromWorker(&'static str),

    #[error("per-thread function panicked on {failed} of {workers} workers")]
    BarrierFault { failed: usize, workers: usize },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Fault raised by a job's operation.
///
/// Faults never escape the worker loop; they are recorded on the job's
/// status slot and readable through [`JobHandle::outcome`](crate::job::JobHandle::outcome).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JobFault {
    #[error("job panicked: {0}")]
    Panicked(String),

    #[error("job failed: {0}")]
    Failed(String),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
