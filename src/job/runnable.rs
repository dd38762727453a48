// src/job/runnable.rs

//! The work payload abstraction.
//!
//! The scheduler never looks inside a job; it only needs something it can
//! call exactly once on a worker thread. [`Runnable::run`] consumes the boxed
//! payload, so a second invocation cannot be expressed.

use anyhow::Result;

/// Opaque unit of work executed by a worker thread.
///
/// Returning `Err` marks the job as faulted; the error is recorded on the
/// job's status slot and does not propagate to the pool.
pub trait Runnable: Send + 'static {
    fn run(self: Box<Self>) -> Result<()>;
}

/// Adapter for infallible closures.
pub(crate) struct ClosureJob<F> {
    f: F,
}

impl<F> ClosureJob<F>
where
    F: FnOnce() + Send + 'static,
{
    pub(crate) fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Runnable for ClosureJob<F>
where
    F: FnOnce() + Send + 'static,
{
    fn run(self: Box<Self>) -> Result<()> {
        (self.f)();
        Ok(())
    }
}

/// Adapter for closures that report failure through `anyhow`.
pub(crate) struct FallibleJob<F> {
    f: F,
}

impl<F> FallibleJob<F>
where
    F: FnOnce() -> Result<()> + Send + 'static,
{
    pub(crate) fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Runnable for FallibleJob<F>
where
    F: FnOnce() -> Result<()> + Send + 'static,
{
    fn run(self: Box<Self>) -> Result<()> {
        (self.f)()
    }
}
