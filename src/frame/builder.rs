// src/frame/builder.rs

//! Turn a frame description into jobs.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use anyhow::bail;

use crate::config::{FrameFile, JobConfig};
use crate::job::{Job, JobHandle};

/// The jobs of one frame plus a handle per job name.
#[derive(Debug)]
pub struct FrameJobs {
    pub jobs: Vec<Job>,
    pub handles: BTreeMap<String, JobHandle>,
}

/// Build fresh jobs for frame number `frame_index`.
///
/// Jobs are created in topological order so every prerequisite's handle
/// exists before the job naming it in `after`.
pub fn build_frame_jobs(frame: &FrameFile, frame_index: u64) -> FrameJobs {
    let mut jobs = Vec::with_capacity(frame.job.len());
    let mut handles: BTreeMap<String, JobHandle> = BTreeMap::new();

    for name in frame.topological_order() {
        let Some(cfg) = frame.job.get(name) else {
            continue;
        };

        let mut job = synthetic_job(name, cfg, frame_index).with_name(name);
        for dep in &cfg.after {
            if let Some(handle) = handles.get(dep) {
                job.add_dependency(handle);
            }
        }

        handles.insert(name.to_string(), job.handle());
        jobs.push(job);
    }

    FrameJobs { jobs, handles }
}

fn synthetic_job(name: &str, cfg: &JobConfig, frame_index: u64) -> Job {
    let name = name.to_string();
    let cost = Duration::from_micros(cfg.cost_us);
    let fail = cfg.fail;

    Job::fallible(move || {
        spin_for(cost);
        if fail {
            bail!("job '{name}' is configured to fail (frame {frame_index})");
        }
        Ok(())
    })
}

/// Busy-wait to simulate CPU-bound work.
fn spin_for(cost: Duration) {
    let start = Instant::now();
    while start.elapsed() < cost {
        std::hint::spin_loop();
    }
}
