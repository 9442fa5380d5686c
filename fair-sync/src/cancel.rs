use crate::wait_queue::park::Unpark;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// A cooperative cancellation signal for blocking waits.
///
/// [`cancel`](Self::cancel) marks the token cancelled and wakes every thread
/// currently parked with it. The cancellation is observed at suspension
/// points and stays on the token until [`clear`](Self::clear) is called:
///
/// - a wait that ends because of it reports
///   [`WaitOutcome::Cancelled`](crate::WaitOutcome::Cancelled);
/// - a wait that was granted at the same time reports success, and the next
///   wait that has to suspend with this token is cancelled immediately;
/// - uncontended fast paths never look at the token.
///
/// Clones share the same state, so one token can cancel a whole group of
/// waiters.
///
/// # Examples
///
/// ```rust
/// use fair_sync::{CancelToken, FairSemaphore, Timeout, WaitOutcome};
/// use std::sync::Arc;
/// use std::thread;
///
/// let sem = Arc::new(FairSemaphore::new(0));
/// let token = CancelToken::new();
///
/// let waiter = {
///     let sem = Arc::clone(&sem);
///     let token = token.clone();
///     thread::spawn(move || sem.acquire_cancellable(1, Timeout::Infinite, &token))
/// };
///
/// while sem.waiting() == 0 {
///     thread::yield_now();
/// }
/// token.cancel();
///
/// assert_eq!(waiter.join().unwrap(), Ok(WaitOutcome::Cancelled));
/// assert!(token.is_cancelled());
/// assert!(token.clear());
/// ```
#[derive(Clone, Default)]
pub struct CancelToken {
    inner: Arc<Mutex<TokenState>>,
}

#[derive(Default)]
struct TokenState {
    cancelled: bool,
    next_id: u64,
    parked: Vec<(u64, Arc<dyn Unpark>)>,
}

impl CancelToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels every current and future slow-path wait using this token.
    pub fn cancel(&self) {
        let parked: Vec<_> = {
            let mut state = self.inner.lock();
            state.cancelled = true;
            state.parked.iter().map(|(_, p)| Arc::clone(p)).collect()
        };
        // The token lock is released first: unparking takes the exclusion lock
        // of each synchronizer, which a waiter may hold while registering.
        for p in parked {
            p.unpark();
        }
    }

    /// Returns `true` if the token has been cancelled and not cleared since.
    pub fn is_cancelled(&self) -> bool {
        self.inner.lock().cancelled
    }

    /// Resets the token so it can be reused. Returns whether it was cancelled.
    pub fn clear(&self) -> bool {
        std::mem::take(&mut self.inner.lock().cancelled)
    }

    pub(crate) fn register(&self, waiter: Arc<dyn Unpark>) -> Registration<'_> {
        let mut state = self.inner.lock();
        let id = state.next_id;
        state.next_id += 1;
        state.parked.push((id, waiter));
        Registration { token: self, id }
    }
}

impl fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("CancelToken")
            .field("cancelled", &state.cancelled)
            .field("parked", &state.parked.len())
            .finish()
    }
}

/// Keeps a parked waiter reachable from its token; deregisters on drop.
pub(crate) struct Registration<'a> {
    token: &'a CancelToken,
    id: u64,
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        let mut state = self.token.inner.lock();
        if let Some(pos) = state.parked.iter().position(|(id, _)| *id == self.id) {
            state.parked.swap_remove(pos);
        }
    }
}
