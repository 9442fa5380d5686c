use crate::cancel::CancelToken;
use crate::error::WaitOutcome;
use crate::timeout::Timeout;
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Something a cancellation can poke so that a parked thread re-examines its token.
pub(crate) trait Unpark: Send + Sync {
    fn unpark(&self);
}

/// Resolution flag and wake handle of a request record.
///
/// The flag is only written and read while the owning synchronizer's
/// exclusion lock is held, so relaxed ordering is sufficient; the lock
/// provides the happens-before edge.
pub(crate) struct Signal {
    resolved: AtomicBool,
    cond: Arc<Condvar>,
}

impl Signal {
    pub(crate) fn new() -> Self {
        Self {
            resolved: AtomicBool::new(false),
            cond: Arc::new(Condvar::new()),
        }
    }

    pub(crate) fn is_resolved(&self) -> bool {
        self.resolved.load(Ordering::Relaxed)
    }

    /// Marks the request resolved and wakes its single owner.
    pub(crate) fn resolve(&self) {
        self.resolved.store(true, Ordering::Relaxed);
        self.cond.notify_one();
    }

    /// Marks the request resolved and wakes every thread sharing it.
    pub(crate) fn resolve_all(&self) {
        self.resolved.store(true, Ordering::Relaxed);
        self.cond.notify_all();
    }
}

impl fmt::Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

/// Wakes threads parked on `cond` on behalf of a cancellation.
struct ParkedOn<S> {
    lock: Arc<Mutex<S>>,
    cond: Arc<Condvar>,
}

impl<S: Send> Unpark for ParkedOn<S> {
    fn unpark(&self) {
        // Taking the exclusion lock orders the notification after the waiter
        // has either parked or observed the token under the same lock.
        // On a shared batch condvar this also wakes the other members; they
        // find nothing changed and park again on their remaining budget.
        let _guard = self.lock.lock();
        self.cond.notify_all();
    }
}

/// Why a waiter stopped waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Wake {
    Resolved,
    Cancelled,
    TimedOut,
}

impl From<Wake> for WaitOutcome {
    fn from(wake: Wake) -> Self {
        match wake {
            Wake::Resolved => WaitOutcome::Granted,
            Wake::Cancelled => WaitOutcome::Cancelled,
            Wake::TimedOut => WaitOutcome::TimedOut,
        }
    }
}

/// Atomically releases the exclusion lock and parks on `cond`.
///
/// Returns the budget left once the lock has been reacquired. A wakeup
/// reported as a timeout by the condition variable exhausts the budget.
pub(crate) fn park<S>(guard: &mut MutexGuard<'_, S>, cond: &Condvar, budget: Timeout) -> Timeout {
    match budget {
        Timeout::Infinite => {
            cond.wait(guard);
            Timeout::Infinite
        }
        Timeout::After(d) => {
            let start = Instant::now();
            if cond.wait_for(guard, d).timed_out() {
                Timeout::ZERO
            } else {
                budget.consume(start.elapsed())
            }
        }
    }
}

/// Parks until `signal` is resolved, the token is cancelled or the budget runs out.
///
/// Resolution always wins: it is checked first after every wakeup, so a grant
/// that raced a cancellation is reported as such. The token stays cancelled
/// either way and is seen again by the next wait that suspends with it.
pub(crate) fn wait_for_resolution<S: Send + 'static>(
    lock: &Arc<Mutex<S>>,
    guard: &mut MutexGuard<'_, S>,
    signal: &Signal,
    mut budget: Timeout,
    cancel: Option<&CancelToken>,
) -> Wake {
    let _registration = cancel.map(|token| {
        token.register(Arc::new(ParkedOn {
            lock: Arc::clone(lock),
            cond: Arc::clone(&signal.cond),
        }))
    });

    loop {
        if signal.is_resolved() {
            return Wake::Resolved;
        }
        if cancel.is_some_and(CancelToken::is_cancelled) {
            return Wake::Cancelled;
        }
        if budget.is_expired() {
            return Wake::TimedOut;
        }
        budget = park(guard, &signal.cond, budget);
    }
}
