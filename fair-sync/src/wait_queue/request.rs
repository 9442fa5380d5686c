use crate::wait_queue::park::Signal;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A blocked `acquire` waiting for `units` permits.
#[derive(Debug)]
pub(crate) struct SemaphoreRequest {
    pub(crate) units: usize,
    pub(crate) signal: Signal,
}

impl SemaphoreRequest {
    pub(crate) fn new(units: usize) -> Self {
        Self {
            units,
            signal: Signal::new(),
        }
    }
}

/// A blocked `begin_write`.
#[derive(Debug)]
pub(crate) struct WriteRequest {
    pub(crate) signal: Signal,
}

impl WriteRequest {
    pub(crate) fn new() -> Self {
        Self {
            signal: Signal::new(),
        }
    }
}

/// Every thread blocked together on one shared record: the pending readers
/// of a rwlock, or the waiters of a closed gate.
///
/// Once resolved, a batch is replaced by a fresh one rather than reset, so
/// threads arriving later never share a record with an already released group.
/// `waiting` is only touched under the owner's exclusion lock.
#[derive(Debug)]
pub(crate) struct WaitBatch {
    waiting: AtomicUsize,
    pub(crate) signal: Signal,
}

impl WaitBatch {
    pub(crate) fn new() -> Self {
        Self {
            waiting: AtomicUsize::new(0),
            signal: Signal::new(),
        }
    }

    pub(crate) fn waiting(&self) -> usize {
        self.waiting.load(Ordering::Relaxed)
    }

    pub(crate) fn join(&self) {
        self.waiting.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn leave(&self) {
        let prev = self.waiting.fetch_sub(1, Ordering::Relaxed);
        debug_assert!(prev > 0, "waiter left an empty batch");
    }
}
