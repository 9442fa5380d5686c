mod common;

use common::wait_until;
use fair_sync::{AcquireError, FairSemaphore, InvalidUnits, Timeout, WaitOutcome};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn test_semaphore_creation() {
    let sem = FairSemaphore::new(5);
    assert_eq!(sem.available_permits(), 5);
    assert_eq!(sem.waiting(), 0);

    let empty = FairSemaphore::new(0);
    assert_eq!(empty.try_acquire(1), Ok(false));
}

#[test]
fn test_zero_units_rejected() {
    let sem = FairSemaphore::new(5);

    let err: InvalidUnits = sem.acquire(0, Timeout::Infinite).unwrap_err();
    assert_eq!(err.to_string(), "unit count must be at least one");
    assert!(sem.try_acquire(0).is_err());
    assert!(sem.release(0).is_err());
    assert_eq!(
        sem.permit(0, Timeout::Infinite).unwrap_err(),
        AcquireError::InvalidUnits
    );
    assert_eq!(sem.available_permits(), 5);
}

#[test]
fn test_single_permit_handoff() {
    let sem = Arc::new(FairSemaphore::new(1));
    assert_eq!(sem.acquire(1, Timeout::Infinite), Ok(WaitOutcome::Granted));

    let waiter = {
        let sem = Arc::clone(&sem);
        thread::spawn(move || sem.acquire(1, Timeout::Infinite))
    };
    wait_until("waiter to queue", || sem.waiting() == 1);

    sem.release(1).unwrap();
    assert_eq!(waiter.join().unwrap(), Ok(WaitOutcome::Granted));
    assert_eq!(sem.available_permits(), 0);
    assert_eq!(sem.waiting(), 0);
}

#[test]
fn test_timeout_with_no_permits() {
    let sem = FairSemaphore::new(0);

    let start = Instant::now();
    let outcome = sem.acquire(3, Duration::from_millis(100));
    let elapsed = start.elapsed();

    assert_eq!(outcome, Ok(WaitOutcome::TimedOut));
    assert!(elapsed >= Duration::from_millis(90), "returned after {elapsed:?}");
    assert_eq!(sem.available_permits(), 0);
    assert_eq!(sem.waiting(), 0);
}

#[test]
fn test_zero_timeout_still_tries_fast_path() {
    let sem = FairSemaphore::new(2);
    assert_eq!(sem.acquire(2, Timeout::ZERO), Ok(WaitOutcome::Granted));
    assert_eq!(sem.acquire(1, Timeout::ZERO), Ok(WaitOutcome::TimedOut));
    assert_eq!(sem.waiting(), 0);
}

#[test]
fn test_release_scan_continues_past_first_grant() {
    let sem = Arc::new(FairSemaphore::new(3));

    let big = {
        let sem = Arc::clone(&sem);
        thread::spawn(move || sem.acquire(5, Timeout::Infinite))
    };
    wait_until("first request to queue", || sem.waiting() == 1);

    let small = {
        let sem = Arc::clone(&sem);
        thread::spawn(move || sem.acquire(4, Timeout::Infinite))
    };
    wait_until("second request to queue", || sem.waiting() == 2);

    sem.release(10).unwrap();
    // Both grants are committed by the release itself.
    assert_eq!(sem.available_permits(), 4);
    assert_eq!(sem.waiting(), 0);

    assert_eq!(big.join().unwrap(), Ok(WaitOutcome::Granted));
    assert_eq!(small.join().unwrap(), Ok(WaitOutcome::Granted));
}

#[test]
fn test_no_queue_jumping_while_others_wait() {
    let sem = Arc::new(FairSemaphore::new(2));

    let head = {
        let sem = Arc::clone(&sem);
        thread::spawn(move || sem.acquire(3, Timeout::Infinite))
    };
    wait_until("head to queue", || sem.waiting() == 1);

    // Two units are free, but the head of the queue comes first.
    assert_eq!(sem.try_acquire(1), Ok(false));
    assert_eq!(
        sem.acquire(1, Duration::from_millis(20)),
        Ok(WaitOutcome::TimedOut)
    );
    assert_eq!(sem.available_permits(), 2);
    assert_eq!(sem.waiting(), 1);

    sem.release(1).unwrap();
    assert_eq!(head.join().unwrap(), Ok(WaitOutcome::Granted));
    assert_eq!(sem.available_permits(), 0);
}

#[test]
fn test_release_has_no_ceiling() {
    let sem = FairSemaphore::new(1);
    sem.release(5).unwrap();
    assert_eq!(sem.available_permits(), 6);
}

#[test]
#[should_panic(expected = "overflow")]
fn test_release_overflow_panics() {
    let sem = FairSemaphore::new(usize::MAX);
    let _ = sem.release(1);
}

#[test]
fn test_permit_released_on_drop() {
    let sem = FairSemaphore::new(3);
    {
        let permit = sem.permit(2, Timeout::Infinite).unwrap();
        assert_eq!(permit.num_permits(), 2);
        assert_eq!(sem.available_permits(), 1);
    }
    assert_eq!(sem.available_permits(), 3);
}

#[test]
fn test_permit_timeout_error() {
    let sem = FairSemaphore::new(1);
    let _held = sem.permit(1, Timeout::Infinite).unwrap();

    let err = sem.permit(1, Duration::from_millis(10)).unwrap_err();
    assert!(err.is_timed_out());
    assert_eq!(err.to_string(), "timed out while waiting");
}

#[test]
fn test_permit_forget_merge_split() {
    let sem = FairSemaphore::new(6);

    let forgotten = sem.permit(1, Timeout::Infinite).unwrap();
    forgotten.forget();
    assert_eq!(sem.available_permits(), 5);

    let mut a = sem.permit(2, Timeout::Infinite).unwrap();
    let b = sem.permit(1, Timeout::Infinite).unwrap();
    a.merge(b);
    assert_eq!(a.num_permits(), 3);
    assert_eq!(sem.available_permits(), 2);

    let part = a.split(2).unwrap();
    assert_eq!(part.num_permits(), 2);
    assert!(a.split(5).is_none());
    assert!(a.split(0).is_none());

    drop(part);
    assert_eq!(sem.available_permits(), 4);
    drop(a);
    assert_eq!(sem.available_permits(), 5);
}

#[test]
#[should_panic(expected = "different semaphores")]
fn test_permit_merge_across_semaphores_panics() {
    let first = FairSemaphore::new(1);
    let second = FairSemaphore::new(1);
    let mut a = first.permit(1, Timeout::Infinite).unwrap();
    let b = second.permit(1, Timeout::Infinite).unwrap();
    a.merge(b);
}

#[test]
fn test_permit_release_wakes_waiter() {
    let sem = Arc::new(FairSemaphore::new(0));
    let waiter = {
        let sem = Arc::clone(&sem);
        thread::spawn(move || {
            let permit = sem.permit(1, Timeout::Infinite).unwrap();
            permit.num_permits()
        })
    };

    wait_until("waiter to queue", || sem.waiting() == 1);
    sem.release(2).unwrap();
    assert_eq!(waiter.join().unwrap(), 1);
    assert_eq!(sem.available_permits(), 2);
}
