#![allow(dead_code)]

use std::thread;
use std::time::{Duration, Instant};

/// Polls `cond` until it holds, failing the test after a few seconds.
///
/// Used to observe that a thread has reached its wait queue before the test
/// moves on; the synchronizers themselves never spin.
pub fn wait_until(what: &str, mut cond: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !cond() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        thread::sleep(Duration::from_millis(1));
    }
}

/// Routes `tracing` output through the test harness.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}
