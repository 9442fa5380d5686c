use crate::cancel::CancelToken;
use crate::error::WaitOutcome;
use crate::timeout::Timeout;
use crate::wait_queue::park::{wait_for_resolution, Wake};
use crate::wait_queue::request::WaitBatch;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::trace;

/// A manual-reset gate.
///
/// While open, [`wait`](Self::wait) returns immediately. While closed,
/// waiters block until the next [`open`](Self::open). Every thread waiting at
/// the moment of an `open` is released by it, even if the gate is closed
/// again before that thread gets to run.
///
/// # Examples
///
/// ```rust
/// use fair_sync::{Gate, Timeout, WaitOutcome};
/// use std::sync::Arc;
/// use std::thread;
///
/// let gate = Arc::new(Gate::new(false));
/// let waiter = {
///     let gate = Arc::clone(&gate);
///     thread::spawn(move || gate.wait(Timeout::Infinite))
/// };
///
/// gate.open();
/// assert_eq!(waiter.join().unwrap(), WaitOutcome::Granted);
/// ```
#[derive(Debug)]
pub struct Gate {
    state: Arc<Mutex<GateState>>,
}

#[derive(Debug)]
struct GateState {
    open: bool,
    /// Shared by everyone waiting for the next `open`; replaced once resolved.
    waiters: Arc<WaitBatch>,
}

impl Gate {
    /// Creates a gate in the given state.
    pub fn new(open: bool) -> Self {
        Self {
            state: Arc::new(Mutex::new(GateState {
                open,
                waiters: Arc::new(WaitBatch::new()),
            })),
        }
    }

    /// Returns `true` if the gate is open.
    pub fn is_open(&self) -> bool {
        self.state.lock().open
    }

    /// Opens the gate and releases every waiter.
    pub fn open(&self) {
        let mut state = self.state.lock();
        if state.open {
            return;
        }
        state.open = true;
        let released = state.waiters.waiting();
        if released > 0 {
            state.waiters.signal.resolve_all();
            state.waiters = Arc::new(WaitBatch::new());
        }
        trace!(released, "gate opened");
    }

    /// Returns the number of threads blocked until the next `open`.
    pub fn waiting(&self) -> usize {
        self.state.lock().waiters.waiting()
    }

    /// Closes the gate. Threads released by an earlier `open` are unaffected.
    pub fn close(&self) {
        self.state.lock().open = false;
    }

    /// Waits until the gate is opened, at most `timeout`.
    pub fn wait(&self, timeout: impl Into<Timeout>) -> WaitOutcome {
        self.wait_inner(timeout.into(), None)
    }

    /// Waits until the gate is opened, at most `timeout` or until `cancel`
    /// is cancelled.
    pub fn wait_cancellable(&self, timeout: impl Into<Timeout>, cancel: &CancelToken) -> WaitOutcome {
        self.wait_inner(timeout.into(), Some(cancel))
    }

    fn wait_inner(&self, timeout: Timeout, cancel: Option<&CancelToken>) -> WaitOutcome {
        let mut state = self.state.lock();
        if state.open {
            return WaitOutcome::Granted;
        }
        if timeout.is_expired() {
            return WaitOutcome::TimedOut;
        }

        let waiters = Arc::clone(&state.waiters);
        waiters.join();

        let wake = wait_for_resolution(&self.state, &mut state, &waiters.signal, timeout, cancel);
        if wake != Wake::Resolved {
            waiters.leave();
            trace!(?wake, "gate wait withdrawn");
        }
        wake.into()
    }
}

impl Default for Gate {
    fn default() -> Self {
        Self::new(false)
    }
}
