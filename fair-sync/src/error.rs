use std::fmt;

/// Result of a blocking acquire-style operation.
///
/// Contention is not an error: running out of time or being cancelled are
/// ordinary outcomes that the caller is expected to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[must_use = "a wait may have failed; check the outcome before using the resource"]
pub enum WaitOutcome {
    /// The resource was granted and must eventually be released.
    Granted,
    /// The wait budget ran out before the request could be served.
    TimedOut,
    /// The wait was cancelled through a [`CancelToken`](crate::CancelToken)
    /// before the request was served.
    Cancelled,
}

impl WaitOutcome {
    /// Returns `true` if the resource was granted.
    pub fn is_granted(&self) -> bool {
        matches!(self, WaitOutcome::Granted)
    }

    /// Returns `true` if the wait budget ran out.
    pub fn is_timed_out(&self) -> bool {
        matches!(self, WaitOutcome::TimedOut)
    }

    /// Returns `true` if the wait was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, WaitOutcome::Cancelled)
    }

    /// Converts the outcome into a `Result`, mapping failures to [`AcquireError`].
    pub fn into_result(self) -> Result<(), AcquireError> {
        match self {
            WaitOutcome::Granted => Ok(()),
            WaitOutcome::TimedOut => Err(AcquireError::TimedOut),
            WaitOutcome::Cancelled => Err(AcquireError::Cancelled),
        }
    }
}

/// Error returned when a unit count of zero is passed to a semaphore.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidUnits(());

impl InvalidUnits {
    pub(crate) fn new() -> InvalidUnits {
        InvalidUnits(())
    }
}

impl fmt::Display for InvalidUnits {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "unit count must be at least one")
    }
}

impl std::error::Error for InvalidUnits {}

/// Error returned by the guard-returning acquire methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireError {
    /// A unit count of zero was requested.
    InvalidUnits,
    /// The wait budget ran out.
    TimedOut,
    /// The wait was cancelled.
    Cancelled,
}

impl AcquireError {
    /// Returns `true` if the error was caused by an invalid unit count.
    pub fn is_invalid_units(&self) -> bool {
        matches!(self, AcquireError::InvalidUnits)
    }

    /// Returns `true` if the error was caused by the wait budget running out.
    pub fn is_timed_out(&self) -> bool {
        matches!(self, AcquireError::TimedOut)
    }

    /// Returns `true` if the error was caused by cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AcquireError::Cancelled)
    }
}

impl From<InvalidUnits> for AcquireError {
    fn from(_: InvalidUnits) -> Self {
        AcquireError::InvalidUnits
    }
}

impl fmt::Display for AcquireError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcquireError::InvalidUnits => write!(fmt, "unit count must be at least one"),
            AcquireError::TimedOut => write!(fmt, "timed out while waiting"),
            AcquireError::Cancelled => write!(fmt, "cancelled while waiting"),
        }
    }
}

impl std::error::Error for AcquireError {}
