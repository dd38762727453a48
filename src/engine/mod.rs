// src/engine/mod.rs

//! Scheduler facade.
//!
//! [`JobScheduler`] is the public entry point. It owns:
//! - the dependency graph ([`crate::dag`]),
//! - the ready queue and worker pool ([`crate::exec`]),
//! - the [`CompletionTracker`] behind `wait_for_all`.
//!
//! There is no process-wide instance; construct one and share it by
//! reference or `Arc`. Several schedulers can coexist, e.g. in tests.

pub mod completion;
pub mod scheduler;
pub(crate) mod shared;

pub use completion::CompletionTracker;
pub use scheduler::{JobScheduler, SchedulerStats, ShutdownReport};
