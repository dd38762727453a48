#![allow(dead_code)]
#![allow(unused_imports)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use jobgraph::Job;

pub use jobgraph_test_utils::builders;
pub use jobgraph_test_utils::recorder::Recorder;
pub use jobgraph_test_utils::{init_tracing, with_timeout};

/// A job that applies `op` to the shared value.
pub fn arithmetic_job(value: &Arc<AtomicUsize>, op: fn(usize) -> usize) -> Job {
    let value = Arc::clone(value);
    Job::new(move || {
        let current = value.load(Ordering::SeqCst);
        value.store(op(current), Ordering::SeqCst);
    })
}
