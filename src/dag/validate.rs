// src/dag/validate.rs

//! Batch validation performed before anything is registered.
//!
//! A batch is rejected as a whole if any job:
//! - depends on itself,
//! - depends on a job that is neither in the batch, nor live in the graph,
//!   nor already finished on this scheduler,
//! - takes part in a dependency cycle.
//!
//! Cycles can only form inside a single batch: a job can only name
//! prerequisites whose handles already exist, and its prerequisites are
//! frozen once it is submitted. Checking the batch's own edges is therefore
//! enough to keep the whole live graph acyclic.

use std::collections::{HashMap, HashSet};

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::dag::node::Node;
use crate::errors::{Result, SchedulerError};
use crate::job::Job;
use crate::types::{JobId, JobState};

pub(crate) fn validate_batch(
    nodes: &HashMap<JobId, Node>,
    owner: u64,
    batch: &[Job],
) -> Result<()> {
    let in_batch: HashSet<JobId> = batch.iter().map(Job::id).collect();

    validate_dependencies(nodes, owner, batch, &in_batch)?;
    validate_acyclic(batch, &in_batch)?;
    Ok(())
}

fn validate_dependencies(
    nodes: &HashMap<JobId, Node>,
    owner: u64,
    batch: &[Job],
    in_batch: &HashSet<JobId>,
) -> Result<()> {
    for job in batch {
        for dep in job.prerequisites() {
            let dep_id = dep.id();

            if dep_id == job.id() {
                return Err(SchedulerError::SelfDependency(job.id()));
            }

            if in_batch.contains(&dep_id) || nodes.contains_key(&dep_id) {
                continue;
            }

            // Retired from the graph: fine only if it finished here.
            let finished_here =
                dep.status.owner() == owner && dep.status.state() == JobState::Done;
            if !finished_here {
                return Err(SchedulerError::UnknownDependency {
                    job: job.id(),
                    dependency: dep_id,
                });
            }
        }
    }
    Ok(())
}

fn validate_acyclic(batch: &[Job], in_batch: &HashSet<JobId>) -> Result<()> {
    // Edge direction: prerequisite -> dependent.
    let mut graph: DiGraphMap<JobId, ()> = DiGraphMap::new();

    for job in batch {
        graph.add_node(job.id());
    }

    for job in batch {
        for dep in job.dependencies().filter(|d| in_batch.contains(d)) {
            graph.add_edge(dep, job.id(), ());
        }
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(SchedulerError::DependencyCycle(format!(
            "cycle detected in submitted batch involving {}",
            cycle.node_id()
        ))),
    }
}
