use std::collections::HashSet;
use std::time::Duration;

use jobgraph::{Job, JobScheduler, JobState};
use jobgraph_test_utils::recorder::Recorder;
use jobgraph_test_utils::with_timeout;
use proptest::prelude::*;

// Strategy to generate a random DAG as adjacency lists.
// Acyclic by construction: job N may only depend on jobs 0..N-1.
fn dag_strategy(max_jobs: usize) -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1..=max_jobs).prop_flat_map(|num_jobs| {
        proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..4),
            num_jobs,
        )
        .prop_map(|raw_deps| {
            raw_deps
                .into_iter()
                .enumerate()
                .map(|(i, potential)| {
                    if i == 0 {
                        return Vec::new();
                    }
                    let unique: HashSet<usize> = potential.into_iter().map(|d| d % i).collect();
                    unique.into_iter().collect()
                })
                .collect()
        })
    })
}

fn job_name(i: usize) -> String {
    format!("job_{}", i)
}

/// One recorded job per entry of `deps`, in index order.
fn build_jobs(rec: &Recorder, deps: &[Vec<usize>]) -> Vec<Job> {
    let mut jobs: Vec<Job> = Vec::with_capacity(deps.len());
    for (i, job_deps) in deps.iter().enumerate() {
        let mut job = rec.job(&job_name(i), Duration::from_micros(20));
        for &d in job_deps {
            job.add_dependency(&jobs[d].handle());
        }
        jobs.push(job);
    }
    jobs
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn test_random_dag_respects_edges_and_runs_each_job_once(
        deps in dag_strategy(24),
        threads in 1..6usize,
        reverse in any::<bool>(),
    ) {
        let check = deps.clone();
        let (rec, handles) = with_timeout(move || {
            let scheduler = JobScheduler::with_threads(threads).unwrap();
            let rec = Recorder::new();

            let mut jobs = build_jobs(&rec, &deps);
            if reverse {
                jobs.reverse();
            }
            let handles = scheduler.enqueue(jobs).unwrap();
            scheduler.wait_for_all().unwrap();
            (rec, handles)
        });

        prop_assert_eq!(rec.total_runs(), check.len());
        for handle in &handles {
            prop_assert_eq!(handle.state(), JobState::Done);
        }
        for (i, job_deps) in check.iter().enumerate() {
            prop_assert_eq!(rec.runs(&job_name(i)), 1);
            for &d in job_deps {
                let before = rec.span(&job_name(d)).unwrap();
                let after = rec.span(&job_name(i)).unwrap();
                prop_assert!(before.end <= after.start, "job_{} started before job_{} finished", i, d);
            }
        }
    }

    #[test]
    fn test_split_submission_matches_single_batch(
        deps in dag_strategy(16),
        split in any::<prop::sample::Index>(),
    ) {
        let check = deps.clone();
        let rec = with_timeout(move || {
            let scheduler = JobScheduler::with_threads(3).unwrap();
            let rec = Recorder::new();

            // Jobs are in topological order, so any prefix/suffix split keeps
            // every prerequisite in the same or an earlier batch.
            let mut first = build_jobs(&rec, &deps);
            let second = first.split_off(split.index(deps.len() + 1));
            scheduler.enqueue(first).unwrap();
            scheduler.enqueue(second).unwrap();
            scheduler.wait_for_all().unwrap();
            rec
        });

        prop_assert_eq!(rec.total_runs(), check.len());
        for (i, job_deps) in check.iter().enumerate() {
            for &d in job_deps {
                let before = rec.span(&job_name(d)).unwrap();
                let after = rec.span(&job_name(i)).unwrap();
                prop_assert!(before.end <= after.start);
            }
        }
    }
}
