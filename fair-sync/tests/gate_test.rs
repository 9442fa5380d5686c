mod common;

use fair_sync::{Gate, Timeout, WaitOutcome};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn test_open_gate_passes_immediately() {
    let gate = Gate::new(true);
    assert!(gate.is_open());
    assert_eq!(gate.wait(Timeout::ZERO), WaitOutcome::Granted);
    assert_eq!(gate.wait(Timeout::Infinite), WaitOutcome::Granted);
}

#[test]
fn test_closed_gate_times_out() {
    let gate = Gate::default();
    assert!(!gate.is_open());
    assert_eq!(gate.wait(Timeout::ZERO), WaitOutcome::TimedOut);

    let start = Instant::now();
    assert_eq!(gate.wait(Duration::from_millis(50)), WaitOutcome::TimedOut);
    assert!(start.elapsed() >= Duration::from_millis(40));
}

#[test]
fn test_open_releases_all_waiters() {
    let gate = Arc::new(Gate::new(false));
    let started = Arc::new(AtomicUsize::new(0));

    let waiters: Vec<_> = (0..4)
        .map(|_| {
            let gate = Arc::clone(&gate);
            let started = Arc::clone(&started);
            thread::spawn(move || {
                started.fetch_add(1, Ordering::SeqCst);
                gate.wait(Timeout::Infinite)
            })
        })
        .collect();
    common::wait_until("waiters to start", || started.load(Ordering::SeqCst) == 4);
    common::wait_until("waiters to park", || gate.waiting() == 4);

    gate.open();
    assert_eq!(gate.waiting(), 0);
    for waiter in waiters {
        assert_eq!(waiter.join().unwrap(), WaitOutcome::Granted);
    }
}

#[test]
fn test_pulse_releases_parked_waiter() {
    let gate = Arc::new(Gate::new(false));

    let waiter = {
        let gate = Arc::clone(&gate);
        thread::spawn(move || gate.wait(Duration::from_secs(10)))
    };
    common::wait_until("waiter to park", || gate.waiting() == 1);

    // Opening and closing straight away still lets the parked waiter through.
    gate.open();
    gate.close();
    assert!(!gate.is_open());
    assert_eq!(waiter.join().unwrap(), WaitOutcome::Granted);
    assert_eq!(gate.waiting(), 0);
}

#[test]
fn test_timed_out_waiter_leaves_count() {
    let gate = Arc::new(Gate::new(false));

    let waiter = {
        let gate = Arc::clone(&gate);
        thread::spawn(move || gate.wait(Duration::from_millis(50)))
    };
    common::wait_until("waiter to park", || gate.waiting() == 1);

    assert_eq!(waiter.join().unwrap(), WaitOutcome::TimedOut);
    assert_eq!(gate.waiting(), 0);
}

#[test]
fn test_close_then_wait_blocks_again() {
    let gate = Gate::new(false);
    gate.open();
    gate.open();
    assert_eq!(gate.wait(Timeout::ZERO), WaitOutcome::Granted);

    gate.close();
    assert_eq!(gate.wait(Duration::from_millis(10)), WaitOutcome::TimedOut);
}
