// src/dag/node.rs

//! Graph node bookkeeping and the ready-to-run job type.

use std::fmt;
use std::sync::Arc;

use crate::job::{JobStatus, Runnable};
use crate::types::{JobId, JobState};

/// A registered, not yet finished job.
pub(crate) struct Node {
    pub(crate) status: Arc<JobStatus>,
    /// Number of prerequisites that have not reached `Done`.
    pub(crate) pending: usize,
    /// Jobs that list this one as a prerequisite.
    pub(crate) dependents: Vec<JobId>,
    /// The payload, present until the job is handed to the ready queue.
    operation: Option<Box<dyn Runnable>>,
}

impl Node {
    pub(crate) fn new(status: Arc<JobStatus>, operation: Box<dyn Runnable>, pending: usize) -> Self {
        Self {
            status,
            pending,
            dependents: Vec::new(),
            operation: Some(operation),
        }
    }

    /// Move the payload out for the ready queue.
    ///
    /// Returns `None` if it was already taken, which makes "enters the ready
    /// queue exactly once" structural.
    pub(crate) fn take_ready(&mut self) -> Option<ReadyJob> {
        let operation = self.operation.take()?;
        self.status.advance(JobState::Ready);
        Some(ReadyJob {
            status: Arc::clone(&self.status),
            operation,
        })
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.status.id())
            .field("pending", &self.pending)
            .field("dependents", &self.dependents)
            .field("dispatched", &self.operation.is_none())
            .finish()
    }
}

/// A job whose prerequisites have all completed, owned by the ready queue
/// until a worker picks it up.
pub struct ReadyJob {
    pub(crate) status: Arc<JobStatus>,
    pub(crate) operation: Box<dyn Runnable>,
}

impl ReadyJob {
    pub fn id(&self) -> JobId {
        self.status.id()
    }

    pub fn name(&self) -> Option<&str> {
        self.status.name()
    }
}

impl fmt::Debug for ReadyJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadyJob")
            .field("id", &self.id())
            .field("name", &self.name())
            .finish_non_exhaustive()
    }
}
