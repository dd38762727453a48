pub mod builders;
pub mod recorder;

use std::sync::Once;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .with_thread_names(true)
            .init();
    });
}

/// Run a blocking closure with a 10-second watchdog.
///
/// Scheduler tests block on condition variables; if an invariant breaks they
/// hang instead of failing. Running the body on a helper thread turns a hang
/// into a test failure.
pub fn with_timeout<F, T>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    with_timeout_of(Duration::from_secs(10), f)
}

/// Like [`with_timeout`] with an explicit limit.
pub fn with_timeout_of<F, T>(limit: Duration, f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let body = thread::spawn(move || {
        let _ = tx.send(f());
    });

    match rx.recv_timeout(limit) {
        Ok(value) => value,
        Err(mpsc::RecvTimeoutError::Timeout) => {
            panic!("Test timed out after {limit:?}")
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            // The body panicked; surface its panic instead of a generic one.
            match body.join() {
                Err(payload) => std::panic::resume_unwind(payload),
                Ok(()) => panic!("test body exited without producing a value"),
            }
        }
    }
}
