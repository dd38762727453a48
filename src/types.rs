// src/types.rs

//! Small value types shared across the crate.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_JOB_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque, process-unique identifier of a [`Job`](crate::job::Job).
///
/// Ids are handed out when the job value is constructed, so a handle can be
/// used as a dependency of another job before either is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId(u64);

impl JobId {
    pub(crate) fn next() -> Self {
        JobId(NEXT_JOB_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job#{}", self.0)
    }
}

/// Lifecycle of a job.
///
/// A job only ever moves forward through these states:
///
/// `Unsubmitted -> Pending -> Ready -> Running -> Done`
///
/// - `Unsubmitted`: constructed but not yet handed to a scheduler.
/// - `Pending`: registered, at least one prerequisite has not finished.
/// - `Ready`: sitting in the ready queue.
/// - `Running`: a worker is executing the operation.
/// - `Done`: the operation returned (successfully or with a fault).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum JobState {
    #[default]
    Unsubmitted = 0,
    Pending = 1,
    Ready = 2,
    Running = 3,
    Done = 4,
}

impl JobState {
    pub(crate) fn from_u8(raw: u8) -> Self {
        match raw {
            0 => JobState::Unsubmitted,
            1 => JobState::Pending,
            2 => JobState::Ready,
            3 => JobState::Running,
            _ => JobState::Done,
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobState::Unsubmitted => "unsubmitted",
            JobState::Pending => "pending",
            JobState::Ready => "ready",
            JobState::Running => "running",
            JobState::Done => "done",
        };
        f.write_str(s)
    }
}
