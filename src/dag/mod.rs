// src/dag/mod.rs

//! Dependency tracking.
//!
//! - [`graph`] holds the live graph of unfinished jobs and decides when a
//!   job becomes ready.
//! - [`node`] provides per-job bookkeeping and the [`ReadyJob`] type handed
//!   to the ready queue.
//! - [`validate`] rejects malformed batches (unknown prerequisites,
//!   self-dependencies, cycles) before anything is registered.

pub mod graph;
pub mod node;
pub mod validate;

pub use graph::DependencyGraph;
pub use node::ReadyJob;
