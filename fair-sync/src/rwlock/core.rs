use crate::wait_queue::queue::RequestQueue;
use crate::wait_queue::request::{WaitBatch, WriteRequest};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{trace, warn};

/// A readers-writers lock that gives writers priority over new readers.
///
/// Any number of readers may hold the lock together; a writer holds it
/// alone. Writers are served one at a time in arrival order. Once a writer
/// is queued or active, newly arriving readers wait until it is done, which
/// keeps a steady stream of readers from starving writers.
///
/// Readers that block are grouped: every reader waiting at the same time
/// shares one batch, and the whole batch is admitted in a single transition
/// when the lock is handed over to readers.
///
/// The raw `begin_*`/`end_*` operations must be paired by the caller; the
/// [`read`](Self::read) and [`write`](Self::write) variants return guards
/// that do it on drop.
///
/// # Examples
///
/// ```rust
/// use fair_sync::{FairRwLock, Timeout, WaitOutcome};
///
/// let lock = FairRwLock::new();
///
/// assert_eq!(lock.begin_read(Timeout::Infinite), WaitOutcome::Granted);
/// assert_eq!(lock.begin_read(Timeout::Infinite), WaitOutcome::Granted);
/// assert_eq!(lock.readers(), 2);
///
/// // A writer cannot get in while readers are active.
/// assert_eq!(lock.begin_write(Timeout::ZERO), WaitOutcome::TimedOut);
///
/// lock.end_read();
/// lock.end_read();
/// assert_eq!(lock.begin_write(Timeout::ZERO), WaitOutcome::Granted);
/// assert!(lock.is_writing());
/// lock.end_write();
/// ```
#[derive(Debug)]
pub struct FairRwLock {
    pub(crate) state: Arc<Mutex<LockState>>,
}

#[derive(Debug)]
pub(crate) struct LockState {
    pub(crate) writing: bool,
    pub(crate) readers: usize,
    pub(crate) writers: RequestQueue<WriteRequest>,
    pub(crate) batch: Arc<WaitBatch>,
}

impl FairRwLock {
    /// Creates an idle lock.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(LockState {
                writing: false,
                readers: 0,
                writers: RequestQueue::new(),
                batch: Arc::new(WaitBatch::new()),
            })),
        }
    }

    /// Returns the number of readers holding the lock.
    pub fn readers(&self) -> usize {
        self.state.lock().readers
    }

    /// Returns `true` if a writer holds the lock.
    pub fn is_writing(&self) -> bool {
        self.state.lock().writing
    }

    /// Returns the number of queued writers.
    pub fn waiting_writers(&self) -> usize {
        self.state.lock().writers.len()
    }

    /// Returns the number of readers in the pending batch.
    pub fn waiting_readers(&self) -> usize {
        self.state.lock().batch.waiting()
    }

    /// Releases a read hold.
    ///
    /// The last reader to leave hands the lock over to the next writer.
    ///
    /// Calling this without an active reader is a contract violation: it
    /// panics in debug builds and is ignored otherwise.
    pub fn end_read(&self) {
        let mut state = self.state.lock();
        debug_assert!(state.readers > 0, "end_read called with no active reader");
        if state.readers == 0 {
            warn!("end_read called with no active reader");
            return;
        }

        state.readers -= 1;
        if state.readers == 0 {
            state.hand_off();
        }
    }

    /// Releases the write hold.
    ///
    /// The lock goes to the next queued writer if there is one, otherwise
    /// to every reader that is waiting.
    ///
    /// Calling this while no writer holds the lock is a contract violation:
    /// it panics in debug builds and is ignored otherwise.
    pub fn end_write(&self) {
        let mut state = self.state.lock();
        debug_assert!(state.writing, "end_write called with no active writer");
        if !state.writing {
            warn!("end_write called with no active writer");
            return;
        }

        state.writing = false;
        state.hand_off();
    }
}

impl Default for FairRwLock {
    fn default() -> Self {
        Self::new()
    }
}

impl LockState {
    /// Passes an idle lock on: writers first, then the pending reader batch.
    pub(crate) fn hand_off(&mut self) {
        debug_assert!(!self.writing && self.readers == 0);
        if !self.grant_writer() {
            self.grant_readers();
        }
    }

    /// Hands the lock to the writer at the head of the queue.
    ///
    /// `writing` is set here rather than by the woken writer.
    pub(crate) fn grant_writer(&mut self) -> bool {
        let Some(writer) = self.writers.pop_front() else {
            return false;
        };
        self.writing = true;
        writer.signal.resolve();
        trace!(queued = self.writers.len(), "writer granted");
        true
    }

    /// Admits the whole pending reader batch and installs a fresh one.
    pub(crate) fn grant_readers(&mut self) {
        let waiting = self.batch.waiting();
        if waiting == 0 {
            return;
        }
        debug_assert!(!self.writing);
        self.readers += waiting;
        self.batch.signal.resolve_all();
        self.batch = Arc::new(WaitBatch::new());
        trace!(admitted = waiting, readers = self.readers, "reader batch granted");
    }

    /// Withdraws a writer that timed out or was cancelled.
    ///
    /// If that leaves no writer queued or active, the readers it was
    /// holding back can go.
    pub(crate) fn quit_waiting_for_write(&mut self, request: &Arc<WriteRequest>) {
        self.writers.remove(request);
        if self.writers.is_empty() && !self.writing {
            self.grant_readers();
        }
    }
}
