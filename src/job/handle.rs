// src/job/handle.rs

//! Shared per-job status slot and the read-only handle callers keep.

use std::fmt;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crate::errors::JobFault;
use crate::types::{JobId, JobState};

/// Final outcome of a job, available once it reached [`JobState::Done`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Succeeded,
    Faulted(JobFault),
}

/// State shared between a [`Job`](super::Job), its handles and the scheduler.
///
/// `state` is only advanced by the scheduler. The `Done` transition happens
/// under the dependency graph lock, after the outcome has been recorded, so
/// anyone observing `Done` also observes the outcome.
pub(crate) struct JobStatus {
    id: JobId,
    name: OnceLock<String>,
    state: AtomicU8,
    /// Identifier of the scheduler this job was submitted to (0 = none).
    owner: AtomicU64,
    outcome: Mutex<Option<JobOutcome>>,
}

impl JobStatus {
    pub(crate) fn new(id: JobId) -> Self {
        Self {
            id,
            name: OnceLock::new(),
            state: AtomicU8::new(JobState::Unsubmitted as u8),
            owner: AtomicU64::new(0),
            outcome: Mutex::new(None),
        }
    }

    pub(crate) fn id(&self) -> JobId {
        self.id
    }

    pub(crate) fn name(&self) -> Option<&str> {
        self.name.get().map(String::as_str)
    }

    pub(crate) fn set_name(&self, name: String) {
        let _ = self.name.set(name);
    }

    pub(crate) fn state(&self) -> JobState {
        JobState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Move the job forward to `next`.
    pub(crate) fn advance(&self, next: JobState) {
        let prev = self.state.swap(next as u8, Ordering::AcqRel);
        debug_assert!(
            prev < next as u8,
            "{} moved backwards: {} -> {}",
            self.id,
            JobState::from_u8(prev),
            next
        );
    }

    /// Bind this job to the scheduler it is being registered with.
    pub(crate) fn bind(&self, owner: u64) {
        self.owner.store(owner, Ordering::Release);
    }

    pub(crate) fn owner(&self) -> u64 {
        self.owner.load(Ordering::Acquire)
    }

    pub(crate) fn record_outcome(&self, outcome: JobOutcome) {
        let mut slot = self.outcome.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(outcome);
    }

    pub(crate) fn outcome(&self) -> Option<JobOutcome> {
        self.outcome
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Cheap, cloneable, read-only reference to a job.
///
/// Handles are how callers express dependencies and how they read a job's
/// state and outcome after submission. A handle never allows mutating the job.
#[derive(Clone)]
pub struct JobHandle {
    pub(crate) status: Arc<JobStatus>,
}

impl JobHandle {
    pub fn id(&self) -> JobId {
        self.status.id()
    }

    pub fn name(&self) -> Option<&str> {
        self.status.name()
    }

    pub fn state(&self) -> JobState {
        self.status.state()
    }

    pub fn is_done(&self) -> bool {
        self.state() == JobState::Done
    }

    /// Outcome of the job, or `None` while it has not finished.
    pub fn outcome(&self) -> Option<JobOutcome> {
        if !self.is_done() {
            return None;
        }
        self.status.outcome()
    }

    /// The recorded fault, if the job finished with one.
    pub fn fault(&self) -> Option<JobFault> {
        match self.outcome() {
            Some(JobOutcome::Faulted(fault)) => Some(fault),
            _ => None,
        }
    }
}

impl fmt::Debug for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobHandle")
            .field("id", &self.id())
            .field("name", &self.name())
            .field("state", &self.state())
            .finish()
    }
}
