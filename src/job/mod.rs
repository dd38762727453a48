// src/job/mod.rs

//! Jobs: a payload plus its prerequisites.
//!
//! - [`runnable`] defines the [`Runnable`] payload trait and closure adapters.
//! - [`handle`] holds the shared status slot and the public [`JobHandle`].
//!
//! A [`Job`] is built by the producer, wired to its prerequisites with
//! [`Job::add_dependency`], and then moved into
//! [`JobScheduler::enqueue`](crate::engine::JobScheduler::enqueue). Because
//! submission takes the job by value, it cannot be re-submitted or mutated
//! afterwards; the producer keeps [`JobHandle`]s instead.

pub mod handle;
pub mod runnable;

use std::fmt;
use std::sync::Arc;

use anyhow::Result;

use crate::types::JobId;

pub use handle::{JobHandle, JobOutcome};
pub(crate) use handle::JobStatus;
pub use runnable::Runnable;
use runnable::{ClosureJob, FallibleJob};

/// A schedulable unit of work with zero or more prerequisites.
pub struct Job {
    status: Arc<JobStatus>,
    operation: Box<dyn Runnable>,
    dependencies: Vec<JobHandle>,
}

impl Job {
    /// Build a job from an infallible closure.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self::from_runnable(ClosureJob::new(f))
    }

    /// Build a job from a closure whose error is recorded as the job's fault.
    pub fn fallible<F>(f: F) -> Self
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        Self::from_runnable(FallibleJob::new(f))
    }

    /// Build a job from any [`Runnable`].
    pub fn from_runnable<R: Runnable>(operation: R) -> Self {
        Self {
            status: Arc::new(JobStatus::new(JobId::next())),
            operation: Box::new(operation),
            dependencies: Vec::new(),
        }
    }

    /// Attach a diagnostic name, used in log output. The first name wins.
    pub fn with_name(self, name: impl Into<String>) -> Self {
        self.status.set_name(name.into());
        self
    }

    pub fn id(&self) -> JobId {
        self.status.id()
    }

    pub fn name(&self) -> Option<&str> {
        self.status.name()
    }

    pub fn handle(&self) -> JobHandle {
        JobHandle {
            status: Arc::clone(&self.status),
        }
    }

    /// Declare that this job must not start before `prerequisite` is done.
    ///
    /// Adding the same prerequisite twice has no further effect.
    pub fn add_dependency(&mut self, prerequisite: &JobHandle) {
        if self
            .dependencies
            .iter()
            .any(|d| d.id() == prerequisite.id())
        {
            return;
        }
        self.dependencies.push(prerequisite.clone());
    }

    /// Builder-style variant of [`Job::add_dependency`].
    pub fn with_dependency(mut self, prerequisite: &JobHandle) -> Self {
        self.add_dependency(prerequisite);
        self
    }

    /// Ids of the declared prerequisites, in insertion order.
    pub fn dependencies(&self) -> impl Iterator<Item = JobId> + '_ {
        self.dependencies.iter().map(JobHandle::id)
    }

    pub(crate) fn prerequisites(&self) -> &[JobHandle] {
        &self.dependencies
    }

    /// Split the job for registration in the dependency graph.
    pub(crate) fn into_parts(self) -> (Arc<JobStatus>, Box<dyn Runnable>, Vec<JobHandle>) {
        (self.status, self.operation, self.dependencies)
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("id", &self.id())
            .field("name", &self.name())
            .field("state", &self.status.state())
            .field("dependencies", &self.dependencies().collect::<Vec<_>>())
            .finish()
    }
}
