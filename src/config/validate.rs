// src/config/validate.rs

use std::collections::BTreeMap;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{FrameFile, JobConfig, RawFrameFile, SchedulerConfig};
use crate::errors::{Result, SchedulerError};

impl TryFrom<RawFrameFile> for FrameFile {
    type Error = SchedulerError;

    fn try_from(raw: RawFrameFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_frame(&raw)?;
        Ok(FrameFile::new_unchecked(raw.scheduler, raw.job))
    }
}

fn validate_raw_frame(frame: &RawFrameFile) -> Result<()> {
    ensure_has_jobs(frame)?;
    validate_scheduler_config(&frame.scheduler)?;
    validate_job_dependencies(frame)?;
    validate_frame_dag(frame)?;
    Ok(())
}

fn ensure_has_jobs(frame: &RawFrameFile) -> Result<()> {
    if frame.job.is_empty() {
        return Err(SchedulerError::ConfigError(
            "frame must contain at least one [job.<name>] section".to_string(),
        ));
    }
    Ok(())
}

/// Checks shared by frame files and programmatic scheduler construction.
pub fn validate_scheduler_config(cfg: &SchedulerConfig) -> Result<()> {
    if cfg.thread_name_prefix.trim().is_empty() {
        return Err(SchedulerError::ConfigError(
            "[scheduler].thread_name_prefix must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_job_dependencies(frame: &RawFrameFile) -> Result<()> {
    for (name, job) in frame.job.iter() {
        for dep in job.after.iter() {
            if dep == name {
                return Err(SchedulerError::ConfigError(format!(
                    "job '{}' cannot depend on itself in `after`",
                    name
                )));
            }
            if !frame.job.contains_key(dep) {
                return Err(SchedulerError::ConfigError(format!(
                    "job '{}' has unknown dependency '{}' in `after`",
                    name, dep
                )));
            }
        }
    }
    Ok(())
}

fn validate_frame_dag(frame: &RawFrameFile) -> Result<()> {
    // Edge direction: dep -> job, so `after = ["A"]` on B adds A -> B.
    let graph = dependency_graph(&frame.job);

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(SchedulerError::DependencyCycle(format!(
            "cycle detected in frame involving job '{}'",
            cycle.node_id()
        ))),
    }
}

fn dependency_graph(jobs: &BTreeMap<String, JobConfig>) -> DiGraphMap<&str, ()> {
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in jobs.keys() {
        graph.add_node(name.as_str());
    }

    for (name, job) in jobs.iter() {
        for dep in job.after.iter() {
            graph.add_edge(dep.as_str(), name.as_str(), ());
        }
    }

    graph
}

impl FrameFile {
    /// Job names in a dependency-respecting order (prerequisites first).
    pub fn topological_order(&self) -> Vec<&str> {
        let graph = dependency_graph(&self.job);

        // Acyclic by construction; fall back to name order regardless.
        toposort(&graph, None)
            .unwrap_or_else(|_| self.job.keys().map(String::as_str).collect())
    }
}
