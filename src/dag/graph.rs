// src/dag/graph.rs

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, trace, warn};

use crate::dag::node::{Node, ReadyJob};
use crate::dag::validate::validate_batch;
use crate::errors::Result;
use crate::job::Job;
use crate::types::{JobId, JobState};

/// Live dependency graph of every submitted, not yet finished job.
///
/// For each node we keep how many prerequisites are still outstanding and
/// the reverse edges (which jobs to notify when it finishes). Finished nodes
/// are retired immediately; jobs submitted later that depend on them read the
/// `Done` state from the prerequisite's handle instead.
///
/// All mutation happens under one mutex, held for the whole of
/// [`register_batch`](Self::register_batch) and
/// [`on_job_finished`](Self::on_job_finished). That keeps "a job is handed
/// to the ready queue exactly once" atomic with respect to concurrent
/// completions from workers still draining earlier batches.
#[derive(Debug)]
pub struct DependencyGraph {
    /// Identifier of the owning scheduler, stamped on every registered job.
    owner: u64,
    nodes: Mutex<HashMap<JobId, Node>>,
}

impl DependencyGraph {
    pub fn new(owner: u64) -> Self {
        Self {
            owner,
            nodes: Mutex::new(HashMap::new()),
        }
    }

    /// Validate and register a batch.
    ///
    /// Returns the jobs that are ready immediately: those with no
    /// prerequisites, or whose prerequisites have all finished already. On
    /// error nothing from the batch is registered.
    pub fn register_batch(&self, batch: Vec<Job>) -> Result<Vec<ReadyJob>> {
        let mut nodes = self.lock();

        validate_batch(&nodes, self.owner, &batch)?;

        // First pass: create nodes and count unfinished prerequisites. The
        // prerequisite states are read under the lock, so a completion that
        // races with this registration is either already visible as `Done`
        // or will find the reverse edge added below.
        let mut edges: Vec<(JobId, JobId)> = Vec::new();
        let mut order: Vec<JobId> = Vec::with_capacity(batch.len());

        for job in batch {
            let (status, operation, deps) = job.into_parts();
            let id = status.id();

            let mut pending = 0;
            for dep in &deps {
                if dep.state() != JobState::Done {
                    pending += 1;
                    edges.push((dep.id(), id));
                }
            }

            status.bind(self.owner);
            status.advance(JobState::Pending);
            debug!(job = %id, name = ?status.name(), pending, "registered job");

            nodes.insert(id, Node::new(status, operation, pending));
            order.push(id);
        }

        // Second pass: reverse edges. In-batch prerequisites only exist now.
        for (prerequisite, dependent) in edges {
            match nodes.get_mut(&prerequisite) {
                Some(node) => {
                    trace!(%prerequisite, %dependent, "added reverse edge");
                    node.dependents.push(dependent);
                }
                None => {
                    // Validation guarantees every unfinished prerequisite is
                    // present; keep the dependent runnable rather than stuck.
                    warn!(%prerequisite, %dependent, "prerequisite missing from graph");
                    if let Some(node) = nodes.get_mut(&dependent) {
                        node.pending = node.pending.saturating_sub(1);
                    }
                }
            }
        }

        let ready: Vec<ReadyJob> = order
            .iter()
            .filter_map(|id| {
                let node = nodes.get_mut(id)?;
                if node.pending == 0 { node.take_ready() } else { None }
            })
            .collect();

        debug!(
            registered = order.len(),
            ready = ready.len(),
            live = nodes.len(),
            "batch registered"
        );

        Ok(ready)
    }

    /// Mark `id` as done and return the dependents that just became ready.
    pub fn on_job_finished(&self, id: JobId) -> Vec<ReadyJob> {
        let mut nodes = self.lock();

        let Some(node) = nodes.remove(&id) else {
            warn!(job = %id, "completion for job not in graph; ignoring");
            return Vec::new();
        };

        node.status.advance(JobState::Done);

        let mut ready = Vec::new();
        for dependent in node.dependents {
            let Some(dep_node) = nodes.get_mut(&dependent) else {
                warn!(job = %id, %dependent, "dependent missing from graph");
                continue;
            };

            dep_node.pending = dep_node.pending.saturating_sub(1);
            if dep_node.pending == 0 {
                if let Some(job) = dep_node.take_ready() {
                    debug!(job = %dependent, after = %id, "prerequisites satisfied; ready");
                    ready.push(job);
                }
            }
        }

        ready
    }

    /// Number of registered jobs that have not finished.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `id` is registered and not yet finished.
    pub fn contains(&self, id: JobId) -> bool {
        self.lock().contains_key(&id)
    }

    /// Drop every remaining node, returning how many were discarded.
    ///
    /// Only used once the workers are gone, for jobs that can never run.
    pub(crate) fn abandon_all(&self) -> usize {
        let mut nodes = self.lock();
        let count = nodes.len();
        nodes.clear();
        count
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<JobId, Node>> {
        self.nodes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
