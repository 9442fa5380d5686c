use crate::cancel::CancelToken;
use crate::error::{AcquireError, WaitOutcome};
use crate::rwlock::guards::{ReadGuard, WriteGuard};
use crate::timeout::Timeout;
use crate::wait_queue::park::{wait_for_resolution, Wake};
use crate::wait_queue::request::WriteRequest;
use std::sync::Arc;
use tracing::trace;

impl super::FairRwLock {
    // === Read side ===

    /// Starts reading, waiting at most `timeout`.
    ///
    /// Granted immediately if no writer holds the lock and none is queued.
    /// A granted read must be ended with [`end_read`](Self::end_read).
    pub fn begin_read(&self, timeout: impl Into<Timeout>) -> WaitOutcome {
        self.begin_read_inner(timeout.into(), None)
    }

    /// Starts reading, waiting at most `timeout` or until `cancel` is cancelled.
    pub fn begin_read_cancellable(
        &self,
        timeout: impl Into<Timeout>,
        cancel: &CancelToken,
    ) -> WaitOutcome {
        self.begin_read_inner(timeout.into(), Some(cancel))
    }

    /// Like [`begin_read`](Self::begin_read), but returns a guard that ends
    /// the read when dropped.
    ///
    /// # Errors
    ///
    /// Returns [`AcquireError::TimedOut`] when the budget runs out.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fair_sync::{FairRwLock, Timeout};
    ///
    /// let lock = FairRwLock::new();
    /// let a = lock.read(Timeout::Infinite).unwrap();
    /// let b = lock.read(Timeout::Infinite).unwrap();
    /// assert_eq!(lock.readers(), 2);
    /// drop((a, b));
    /// assert_eq!(lock.readers(), 0);
    /// ```
    pub fn read(&self, timeout: impl Into<Timeout>) -> Result<ReadGuard<'_>, AcquireError> {
        self.begin_read_inner(timeout.into(), None).into_result()?;
        Ok(ReadGuard::new(self))
    }

    /// Like [`begin_read_cancellable`](Self::begin_read_cancellable), but
    /// returns a guard that ends the read when dropped.
    ///
    /// # Errors
    ///
    /// Returns [`AcquireError::TimedOut`] or [`AcquireError::Cancelled`].
    pub fn read_cancellable(
        &self,
        timeout: impl Into<Timeout>,
        cancel: &CancelToken,
    ) -> Result<ReadGuard<'_>, AcquireError> {
        self.begin_read_inner(timeout.into(), Some(cancel))
            .into_result()?;
        Ok(ReadGuard::new(self))
    }

    // === Write side ===

    /// Starts writing, waiting at most `timeout`.
    ///
    /// Granted immediately if the lock is idle. A granted write must be
    /// ended with [`end_write`](Self::end_write).
    pub fn begin_write(&self, timeout: impl Into<Timeout>) -> WaitOutcome {
        self.begin_write_inner(timeout.into(), None)
    }

    /// Starts writing, waiting at most `timeout` or until `cancel` is cancelled.
    pub fn begin_write_cancellable(
        &self,
        timeout: impl Into<Timeout>,
        cancel: &CancelToken,
    ) -> WaitOutcome {
        self.begin_write_inner(timeout.into(), Some(cancel))
    }

    /// Like [`begin_write`](Self::begin_write), but returns a guard that ends
    /// the write when dropped.
    ///
    /// # Errors
    ///
    /// Returns [`AcquireError::TimedOut`] when the budget runs out.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fair_sync::{FairRwLock, Timeout};
    ///
    /// let lock = FairRwLock::new();
    /// let guard = lock.write(Timeout::Infinite).unwrap();
    /// assert!(lock.read(Timeout::ZERO).unwrap_err().is_timed_out());
    /// drop(guard);
    /// assert!(!lock.is_writing());
    /// ```
    pub fn write(&self, timeout: impl Into<Timeout>) -> Result<WriteGuard<'_>, AcquireError> {
        self.begin_write_inner(timeout.into(), None).into_result()?;
        Ok(WriteGuard::new(self))
    }

    /// Like [`begin_write_cancellable`](Self::begin_write_cancellable), but
    /// returns a guard that ends the write when dropped.
    ///
    /// # Errors
    ///
    /// Returns [`AcquireError::TimedOut`] or [`AcquireError::Cancelled`].
    pub fn write_cancellable(
        &self,
        timeout: impl Into<Timeout>,
        cancel: &CancelToken,
    ) -> Result<WriteGuard<'_>, AcquireError> {
        self.begin_write_inner(timeout.into(), Some(cancel))
            .into_result()?;
        Ok(WriteGuard::new(self))
    }

    fn begin_read_inner(&self, timeout: Timeout, cancel: Option<&CancelToken>) -> WaitOutcome {
        let mut state = self.state.lock();

        if !state.writing && state.writers.is_empty() {
            state.readers += 1;
            return WaitOutcome::Granted;
        }
        if timeout.is_expired() {
            return WaitOutcome::TimedOut;
        }

        let batch = Arc::clone(&state.batch);
        batch.join();
        trace!(batch = batch.waiting(), "reader queued");

        let wake = wait_for_resolution(&self.state, &mut state, &batch.signal, timeout, cancel);
        if wake != Wake::Resolved {
            // A smaller batch never unblocks a writer, so no hand-off here.
            batch.leave();
            trace!(?wake, "reader withdrawn");
        }
        wake.into()
    }

    fn begin_write_inner(&self, timeout: Timeout, cancel: Option<&CancelToken>) -> WaitOutcome {
        let mut state = self.state.lock();

        if !state.writing && state.readers == 0 {
            state.writing = true;
            return WaitOutcome::Granted;
        }
        if timeout.is_expired() {
            return WaitOutcome::TimedOut;
        }

        let request = Arc::new(WriteRequest::new());
        state.writers.push_back(Arc::clone(&request));
        trace!(queued = state.writers.len(), "writer queued");

        let wake = wait_for_resolution(&self.state, &mut state, &request.signal, timeout, cancel);
        if wake != Wake::Resolved {
            state.quit_waiting_for_write(&request);
            trace!(?wake, "writer withdrawn");
        }
        wake.into()
    }
}
