use crate::error::InvalidUnits;
use crate::wait_queue::queue::RequestQueue;
use crate::wait_queue::request::SemaphoreRequest;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::trace;

/// A counting semaphore that serves waiters strictly in arrival order.
///
/// Callers may take several units at once. An uncontended acquire is
/// granted immediately, but once anyone is queued every new caller queues
/// behind them, even if enough permits happen to be free for its own
/// request. A large request at the head of the queue therefore holds back
/// smaller requests behind it; fairness is preferred over throughput.
///
/// Blocking acquires take a [`Timeout`](crate::Timeout) and, optionally, a
/// [`CancelToken`](crate::CancelToken). Releases never block.
///
/// # Examples
///
/// ```rust
/// use fair_sync::{FairSemaphore, Timeout, WaitOutcome};
/// use std::time::Duration;
///
/// let sem = FairSemaphore::new(2);
/// assert_eq!(sem.acquire(2, Timeout::Infinite), Ok(WaitOutcome::Granted));
/// assert_eq!(
///     sem.acquire(1, Duration::from_millis(10)),
///     Ok(WaitOutcome::TimedOut)
/// );
///
/// sem.release(2).unwrap();
/// assert_eq!(sem.available_permits(), 2);
/// ```
#[derive(Debug)]
pub struct FairSemaphore {
    pub(crate) state: Arc<Mutex<SemaphoreState>>,
}

#[derive(Debug)]
pub(crate) struct SemaphoreState {
    pub(crate) permits: usize,
    pub(crate) queue: RequestQueue<SemaphoreRequest>,
}

impl FairSemaphore {
    /// Creates a semaphore holding `permits` units.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fair_sync::FairSemaphore;
    ///
    /// let sem = FairSemaphore::new(3);
    /// assert_eq!(sem.available_permits(), 3);
    /// assert_eq!(sem.waiting(), 0);
    /// ```
    pub fn new(permits: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(SemaphoreState {
                permits,
                queue: RequestQueue::new(),
            })),
        }
    }

    /// Returns the number of units that are free right now.
    ///
    /// Free units are not necessarily available to a new caller: while
    /// requests are queued, newcomers queue as well.
    pub fn available_permits(&self) -> usize {
        self.state.lock().permits
    }

    /// Returns the number of queued acquire requests.
    pub fn waiting(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Returns `units` to the semaphore and serves queued requests.
    ///
    /// Requests are served from the head of the queue for as long as the
    /// head fits in the free units; the first one that does not fit stops
    /// the scan. Served requests are granted before this method returns.
    ///
    /// No ceiling is enforced: callers must not release more than they
    /// acquired if they want the initial capacity preserved.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidUnits`] if `units` is zero.
    ///
    /// # Panics
    ///
    /// Panics if the free unit count would overflow `usize`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fair_sync::FairSemaphore;
    ///
    /// let sem = FairSemaphore::new(0);
    /// sem.release(2).unwrap();
    /// assert_eq!(sem.available_permits(), 2);
    /// assert!(sem.release(0).is_err());
    /// ```
    pub fn release(&self, units: usize) -> Result<(), InvalidUnits> {
        if units == 0 {
            return Err(InvalidUnits::new());
        }

        let mut state = self.state.lock();
        state.permits = match state.permits.checked_add(units) {
            Some(permits) => permits,
            None => panic!(
                "releasing {} units would overflow the permit count ({})",
                units, state.permits
            ),
        };
        let granted = state.grant_waiters();
        if granted > 0 {
            trace!(units, granted, left = state.permits, "release served waiters");
        }
        Ok(())
    }
}

impl SemaphoreState {
    /// Grants queued requests in order while the head fits.
    ///
    /// Commit-then-signal: the units are taken out of `permits` here, on
    /// behalf of the waiter, before it is woken.
    pub(crate) fn grant_waiters(&mut self) -> usize {
        let mut granted = 0;
        while let Some(head) = self.queue.front() {
            if head.units > self.permits {
                break;
            }
            self.permits -= head.units;
            head.signal.resolve();
            self.queue.pop_front();
            granted += 1;
        }
        granted
    }

    /// Withdraws a request that timed out or was cancelled.
    ///
    /// Removing the head may let the requests behind it through, since
    /// they were only blocked by its size.
    pub(crate) fn quit_waiting(&mut self, request: &Arc<SemaphoreRequest>) {
        if self.queue.remove(request) == Some(0) {
            let granted = self.grant_waiters();
            if granted > 0 {
                trace!(granted, left = self.permits, "withdrawn head unblocked waiters");
            }
        }
    }
}
