// src/exec/pool.rs

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{error, info};

use crate::engine::shared::Shared;
use crate::errors::Result;
use crate::exec::worker::{panic_message, worker_loop};

/// Fixed-size set of worker threads.
///
/// The size is decided at construction and never changes. Threads live
/// until the ready queue is closed, then [`join`](Self::join) collects them.
#[derive(Debug)]
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `size` named worker threads serving `shared.queue`.
    ///
    /// If a thread cannot be spawned, the threads already started are shut
    /// down and joined before the error is returned.
    pub(crate) fn spawn(size: usize, name_prefix: &str, shared: &Arc<Shared>) -> Result<Self> {
        let mut pool = Self {
            handles: Vec::with_capacity(size),
        };

        for index in 0..size {
            let worker_shared = Arc::clone(shared);
            let spawned = thread::Builder::new()
                .name(format!("{name_prefix}-{index}"))
                .spawn(move || worker_loop(index, worker_shared));

            match spawned {
                Ok(handle) => pool.handles.push(handle),
                Err(err) => {
                    error!(worker = index, error = %err, "failed to spawn worker thread");
                    shared.queue.close();
                    pool.join();
                    return Err(err.into());
                }
            }
        }

        info!(workers = size, "worker pool started");
        Ok(pool)
    }

    /// Join every worker. Returns how many threads ended in a panic.
    ///
    /// Job panics are caught inside the worker loop, so a non-zero count
    /// means the loop itself failed.
    pub fn join(&mut self) -> usize {
        let mut panicked = 0;
        for handle in self.handles.drain(..) {
            let name = handle.thread().name().unwrap_or("<unnamed>").to_string();
            if let Err(payload) = handle.join() {
                error!(
                    thread = %name,
                    error = %panic_message(payload.as_ref()),
                    "worker thread panicked"
                );
                panicked += 1;
            }
        }
        info!(panicked, "worker pool joined");
        panicked
    }
}
