// src/lib.rs

//! Dependency-aware, multi-threaded job scheduler.
//!
//! Callers build [`Job`]s, wire prerequisites with [`Job::add_dependency`],
//! and submit them in batches to a [`JobScheduler`]. Independent jobs run
//! concurrently on a fixed pool of worker threads; a job never starts before
//! its prerequisites have finished. New batches can be merged into the live
//! graph while earlier ones are still draining.

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod frame;
pub mod job;
pub mod logging;
pub mod types;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::FrameFile;

pub use crate::engine::{JobScheduler, SchedulerStats, ShutdownReport};
pub use crate::errors::{JobFault, SchedulerError};
pub use crate::job::{Job, JobHandle, JobOutcome, Runnable};
pub use crate::types::{JobId, JobState};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - frame file loading
/// - scheduler construction (CLI overrides applied)
/// - per-thread worker setup
/// - the frame loop and its summaries
pub fn run(args: CliArgs) -> Result<()> {
    let frame = load_and_validate(&args.config)
        .with_context(|| format!("loading frame description '{}'", args.config))?;

    if args.dry_run {
        print_dry_run(&frame);
        return Ok(());
    }

    let mut scheduler_cfg = frame.scheduler.clone();
    if let Some(threads) = args.threads {
        scheduler_cfg.worker_threads = threads;
    }

    let scheduler = JobScheduler::new(&scheduler_cfg)?;
    frame::announce_workers(&scheduler)?;

    for index in 0..args.frames {
        let summary = frame::run_frame(&scheduler, &frame, index)?;
        println!(
            "frame {}: {} jobs in {:?}{}",
            summary.frame,
            summary.jobs,
            summary.elapsed,
            if summary.faulted.is_empty() {
                String::new()
            } else {
                format!(", faulted: {}", summary.faulted.join(", "))
            }
        );
    }

    let report = scheduler.shutdown()?;
    info!(
        completed = report.completed,
        abandoned = report.abandoned,
        "all frames done"
    );
    Ok(())
}

/// Simple dry-run output: print jobs in dependency order.
fn print_dry_run(frame: &FrameFile) {
    println!("jobgraph dry-run");
    println!(
        "  scheduler.worker_threads = {} (resolved: {})",
        frame.scheduler.worker_threads,
        frame.scheduler.resolved_worker_threads()
    );
    println!(
        "  scheduler.thread_name_prefix = {}",
        frame.scheduler.thread_name_prefix
    );
    println!();

    println!("jobs ({}), in dependency order:", frame.job.len());
    for name in frame.topological_order() {
        let Some(job) = frame.job.get(name) else {
            continue;
        };
        println!("  - {name}");
        if !job.after.is_empty() {
            println!("      after: {:?}", job.after);
        }
        if job.cost_us > 0 {
            println!("      cost_us: {}", job.cost_us);
        }
        if job.fail {
            println!("      fail: true");
        }
    }

    debug!("dry-run complete (no execution)");
}
