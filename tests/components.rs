// tests/components.rs

mod common;

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use common::with_timeout;
use jobgraph::dag::DependencyGraph;
use jobgraph::engine::CompletionTracker;
use jobgraph::{Job, JobState};

#[test]
fn test_graph_releases_dependents_as_prerequisites_finish() {
    let graph = DependencyGraph::new(7);

    let a = Job::new(|| {}).with_name("a");
    let b = Job::new(|| {}).with_name("b");
    let c = Job::new(|| {})
        .with_name("c")
        .with_dependency(&a.handle())
        .with_dependency(&b.handle());
    let (a_id, b_id, c_id) = (a.id(), b.id(), c.id());
    let c_handle = c.handle();

    let ready = graph.register_batch(vec![c, b, a]).unwrap();
    let mut ready_ids: Vec<_> = ready.iter().map(|job| job.id()).collect();
    ready_ids.sort();
    assert_eq!(ready_ids, vec![a_id, b_id]);
    assert_eq!(c_handle.state(), JobState::Pending);
    assert_eq!(graph.len(), 3);

    assert!(graph.on_job_finished(a_id).is_empty());
    let released = graph.on_job_finished(b_id);
    assert_eq!(released.len(), 1);
    assert_eq!(released[0].id(), c_id);
    assert_eq!(released[0].name(), Some("c"));
    assert_eq!(c_handle.state(), JobState::Ready);

    assert!(graph.on_job_finished(c_id).is_empty());
    assert!(graph.is_empty());
    assert_eq!(c_handle.state(), JobState::Done);
}

#[test]
fn test_graph_treats_finished_prerequisite_as_satisfied() {
    let graph = DependencyGraph::new(3);

    let first = Job::new(|| {});
    let first_handle = first.handle();
    graph.register_batch(vec![first]).unwrap();
    graph.on_job_finished(first_handle.id());
    assert!(!graph.contains(first_handle.id()));

    let second = Job::new(|| {}).with_dependency(&first_handle);
    let ready = graph.register_batch(vec![second]).unwrap();
    assert_eq!(ready.len(), 1);
}

#[test]
fn test_graph_failed_batch_registers_nothing() {
    let graph = DependencyGraph::new(5);

    let outsider = Job::new(|| {});
    let ok = Job::new(|| {});
    let ok_handle = ok.handle();
    let bad = Job::new(|| {}).with_dependency(&outsider.handle());

    assert!(graph.register_batch(vec![ok, bad]).is_err());
    assert!(graph.is_empty());
    assert_eq!(ok_handle.state(), JobState::Unsubmitted);
}

#[test]
fn test_tracker_wait_returns_at_zero() {
    with_timeout(|| {
        let tracker = Arc::new(CompletionTracker::new());
        assert_eq!(tracker.wait(), Ok(()));

        tracker.add(3);
        let worker = {
            let tracker = Arc::clone(&tracker);
            thread::spawn(move || {
                for _ in 0..3 {
                    thread::sleep(Duration::from_millis(5));
                    tracker.complete_one();
                }
            })
        };

        assert_eq!(tracker.wait(), Ok(()));
        assert_eq!(tracker.outstanding(), 0);
        worker.join().unwrap();
    });
}

#[test]
fn test_tracker_close_releases_waiters() {
    with_timeout(|| {
        let tracker = Arc::new(CompletionTracker::with_outstanding(2));
        let waiter = {
            let tracker = Arc::clone(&tracker);
            thread::spawn(move || tracker.wait())
        };

        thread::sleep(Duration::from_millis(20));
        tracker.close();

        assert_eq!(waiter.join().unwrap(), Err(2));
    });
}
