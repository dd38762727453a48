use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use jobgraph::Job;

/// When a job's operation started and finished.
#[derive(Debug, Clone, Copy)]
pub struct Span {
    pub start: Instant,
    pub end: Instant,
}

/// Records execution spans and run counts of named jobs.
///
/// Every job built through [`Recorder::job`] logs its start and end instants
/// and how many times its body ran, so tests can check ordering and
/// exactly-once execution.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    inner: Arc<Mutex<RecorderState>>,
}

#[derive(Debug, Default)]
struct RecorderState {
    spans: HashMap<String, Span>,
    runs: HashMap<String, usize>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A job that records itself under `name` and busy-waits for `work`.
    pub fn job(&self, name: &str, work: Duration) -> Job {
        let inner = Arc::clone(&self.inner);
        let key = name.to_string();

        Job::new(move || {
            let start = Instant::now();
            while start.elapsed() < work {
                std::hint::spin_loop();
            }
            let end = Instant::now();

            let mut state = inner.lock().unwrap();
            *state.runs.entry(key.clone()).or_insert(0) += 1;
            state.spans.insert(key, Span { start, end });
        })
        .with_name(name)
    }

    pub fn span(&self, name: &str) -> Option<Span> {
        self.inner.lock().unwrap().spans.get(name).copied()
    }

    pub fn runs(&self, name: &str) -> usize {
        self.inner.lock().unwrap().runs.get(name).copied().unwrap_or(0)
    }

    pub fn total_runs(&self) -> usize {
        self.inner.lock().unwrap().runs.values().sum()
    }

    /// Panic unless `first` finished no later than `second` started.
    pub fn assert_finished_before(&self, first: &str, second: &str) {
        let a = self
            .span(first)
            .unwrap_or_else(|| panic!("job {first} never ran"));
        let b = self
            .span(second)
            .unwrap_or_else(|| panic!("job {second} never ran"));
        assert!(
            a.end <= b.start,
            "{second} started before {first} finished ({:?} vs {:?})",
            b.start,
            a.end
        );
    }
}
