use std::time::Duration;

/// How long a blocking operation may wait before giving up.
///
/// The budget is consumed across wakeups: every time a waiter is woken
/// without being granted, the time it spent parked is subtracted and it
/// parks again with whatever is left.
///
/// # Examples
///
/// ```rust
/// use fair_sync::Timeout;
/// use std::time::Duration;
///
/// let bounded: Timeout = Duration::from_millis(50).into();
/// assert_eq!(bounded.remaining(), Some(Duration::from_millis(50)));
///
/// let unbounded: Timeout = None.into();
/// assert_eq!(unbounded, Timeout::Infinite);
/// assert!(Timeout::ZERO.is_expired());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timeout {
    /// Wait until granted or cancelled.
    Infinite,
    /// Wait at most the given duration.
    After(Duration),
}

impl Timeout {
    /// A budget that is already spent. Operations still try their fast path.
    pub const ZERO: Timeout = Timeout::After(Duration::ZERO);

    /// Returns `true` if no waiting time is left.
    pub fn is_expired(&self) -> bool {
        matches!(self, Timeout::After(d) if d.is_zero())
    }

    /// Returns the time left, or `None` for an infinite budget.
    pub fn remaining(&self) -> Option<Duration> {
        match self {
            Timeout::Infinite => None,
            Timeout::After(d) => Some(*d),
        }
    }

    /// Charges `elapsed` against the budget.
    pub(crate) fn consume(self, elapsed: Duration) -> Timeout {
        match self {
            Timeout::Infinite => Timeout::Infinite,
            Timeout::After(d) => Timeout::After(d.saturating_sub(elapsed)),
        }
    }
}

impl Default for Timeout {
    fn default() -> Self {
        Timeout::Infinite
    }
}

impl From<Duration> for Timeout {
    fn from(d: Duration) -> Self {
        Timeout::After(d)
    }
}

impl From<Option<Duration>> for Timeout {
    fn from(d: Option<Duration>) -> Self {
        d.map_or(Timeout::Infinite, Timeout::After)
    }
}
