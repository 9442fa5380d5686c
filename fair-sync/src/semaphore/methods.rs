use crate::cancel::CancelToken;
use crate::error::{AcquireError, InvalidUnits, WaitOutcome};
use crate::semaphore::permits::SemaphorePermit;
use crate::timeout::Timeout;
use crate::wait_queue::park::{wait_for_resolution, Wake};
use crate::wait_queue::request::SemaphoreRequest;
use std::sync::Arc;
use tracing::trace;

impl super::FairSemaphore {
    // === Acquire methods ===

    /// Acquires `units` permits, waiting at most `timeout`.
    ///
    /// Returns [`WaitOutcome::Granted`] or [`WaitOutcome::TimedOut`]. The
    /// caller owns granted units until it hands them back with
    /// [`release`](Self::release).
    ///
    /// A zero timeout still attempts the fast path before giving up.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidUnits`] if `units` is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fair_sync::{FairSemaphore, Timeout, WaitOutcome};
    ///
    /// let sem = FairSemaphore::new(5);
    /// assert_eq!(sem.acquire(3, Timeout::ZERO), Ok(WaitOutcome::Granted));
    /// assert_eq!(sem.acquire(3, Timeout::ZERO), Ok(WaitOutcome::TimedOut));
    /// assert_eq!(sem.available_permits(), 2);
    /// ```
    pub fn acquire(
        &self,
        units: usize,
        timeout: impl Into<Timeout>,
    ) -> Result<WaitOutcome, InvalidUnits> {
        self.acquire_inner(units, timeout.into(), None)
    }

    /// Acquires `units` permits, waiting at most `timeout` or until `cancel`
    /// is cancelled.
    ///
    /// If the grant and the cancellation race, the grant wins: the call
    /// returns [`WaitOutcome::Granted`] and the cancellation stays pending on
    /// the token.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidUnits`] if `units` is zero.
    pub fn acquire_cancellable(
        &self,
        units: usize,
        timeout: impl Into<Timeout>,
        cancel: &CancelToken,
    ) -> Result<WaitOutcome, InvalidUnits> {
        self.acquire_inner(units, timeout.into(), Some(cancel))
    }

    /// Acquires `units` permits only if that is possible without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidUnits`] if `units` is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fair_sync::FairSemaphore;
    ///
    /// let sem = FairSemaphore::new(1);
    /// assert_eq!(sem.try_acquire(1), Ok(true));
    /// assert_eq!(sem.try_acquire(1), Ok(false));
    /// ```
    pub fn try_acquire(&self, units: usize) -> Result<bool, InvalidUnits> {
        Ok(self.acquire_inner(units, Timeout::ZERO, None)?.is_granted())
    }

    // === Guard methods ===

    /// Like [`acquire`](Self::acquire), but returns a permit that releases
    /// the units when dropped.
    ///
    /// # Errors
    ///
    /// Returns [`AcquireError::InvalidUnits`] for a zero unit count and
    /// [`AcquireError::TimedOut`] when the budget runs out.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fair_sync::{FairSemaphore, Timeout};
    ///
    /// let sem = FairSemaphore::new(3);
    /// {
    ///     let permit = sem.permit(2, Timeout::Infinite).unwrap();
    ///     assert_eq!(permit.num_permits(), 2);
    ///     assert_eq!(sem.available_permits(), 1);
    /// }
    /// assert_eq!(sem.available_permits(), 3);
    /// ```
    pub fn permit(
        &self,
        units: usize,
        timeout: impl Into<Timeout>,
    ) -> Result<SemaphorePermit<'_>, AcquireError> {
        self.acquire_inner(units, timeout.into(), None)?
            .into_result()?;
        Ok(SemaphorePermit::new(self, units))
    }

    /// Like [`acquire_cancellable`](Self::acquire_cancellable), but returns
    /// a permit that releases the units when dropped.
    ///
    /// # Errors
    ///
    /// Returns [`AcquireError::InvalidUnits`] for a zero unit count,
    /// [`AcquireError::TimedOut`] when the budget runs out and
    /// [`AcquireError::Cancelled`] when the token is cancelled first.
    pub fn permit_cancellable(
        &self,
        units: usize,
        timeout: impl Into<Timeout>,
        cancel: &CancelToken,
    ) -> Result<SemaphorePermit<'_>, AcquireError> {
        self.acquire_inner(units, timeout.into(), Some(cancel))?
            .into_result()?;
        Ok(SemaphorePermit::new(self, units))
    }

    fn acquire_inner(
        &self,
        units: usize,
        timeout: Timeout,
        cancel: Option<&CancelToken>,
    ) -> Result<WaitOutcome, InvalidUnits> {
        if units == 0 {
            return Err(InvalidUnits::new());
        }

        let mut state = self.state.lock();

        // Fast path: only when nobody is queued ahead of us.
        if state.queue.is_empty() && units <= state.permits {
            state.permits -= units;
            return Ok(WaitOutcome::Granted);
        }
        if timeout.is_expired() {
            return Ok(WaitOutcome::TimedOut);
        }

        let request = Arc::new(SemaphoreRequest::new(units));
        state.queue.push_back(Arc::clone(&request));
        trace!(units, queued = state.queue.len(), "acquire queued");

        let wake = wait_for_resolution(&self.state, &mut state, &request.signal, timeout, cancel);
        if wake != Wake::Resolved {
            state.quit_waiting(&request);
            trace!(units, ?wake, "acquire withdrawn");
        }
        Ok(wake.into())
    }
}
