use std::fmt;

/// Units acquired from a [`FairSemaphore`](super::FairSemaphore), released
/// back when dropped.
///
/// # Examples
///
/// ```rust
/// use fair_sync::{FairSemaphore, Timeout};
///
/// let sem = FairSemaphore::new(3);
/// let permit = sem.permit(1, Timeout::Infinite).unwrap();
/// assert_eq!(permit.num_permits(), 1);
/// drop(permit);
/// assert_eq!(sem.available_permits(), 3);
/// ```
#[must_use = "dropping the permit releases the units immediately"]
pub struct SemaphorePermit<'a> {
    sem: &'a super::FairSemaphore,
    permits: usize,
}

impl<'a> SemaphorePermit<'a> {
    pub(crate) fn new(sem: &'a super::FairSemaphore, permits: usize) -> Self {
        Self { sem, permits }
    }

    /// Forgets this permit without releasing it back to the semaphore.
    ///
    /// The units are removed from circulation permanently.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fair_sync::{FairSemaphore, Timeout};
    ///
    /// let sem = FairSemaphore::new(3);
    /// let permit = sem.permit(1, Timeout::Infinite).unwrap();
    ///
    /// assert_eq!(sem.available_permits(), 2);
    /// permit.forget();
    /// assert_eq!(sem.available_permits(), 2);
    /// ```
    pub fn forget(mut self) {
        self.permits = 0;
    }

    /// Returns the number of units held by this permit.
    pub fn num_permits(&self) -> usize {
        self.permits
    }

    /// Merges another permit into this one.
    ///
    /// # Panics
    ///
    /// Panics if the permits belong to different semaphores.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fair_sync::{FairSemaphore, Timeout};
    ///
    /// let sem = FairSemaphore::new(5);
    /// let mut permit1 = sem.permit(2, Timeout::Infinite).unwrap();
    /// let permit2 = sem.permit(1, Timeout::Infinite).unwrap();
    ///
    /// permit1.merge(permit2);
    /// assert_eq!(permit1.num_permits(), 3);
    /// ```
    pub fn merge(&mut self, mut other: Self) {
        if !std::ptr::eq(self.sem, other.sem) {
            panic!("Cannot merge permits from different semaphores");
        }
        self.permits += other.permits;
        // Prevent double release
        other.permits = 0;
    }

    /// Splits `n` units off into a new permit.
    ///
    /// Returns `None` if `n` is zero or larger than the units held.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fair_sync::{FairSemaphore, Timeout};
    ///
    /// let sem = FairSemaphore::new(5);
    /// let mut permit = sem.permit(3, Timeout::Infinite).unwrap();
    ///
    /// let split = permit.split(2).unwrap();
    /// assert_eq!(permit.num_permits(), 1);
    /// assert_eq!(split.num_permits(), 2);
    /// assert!(permit.split(2).is_none());
    /// ```
    pub fn split(&mut self, n: usize) -> Option<Self> {
        if n == 0 || n > self.permits {
            return None;
        }
        self.permits -= n;
        Some(Self {
            sem: self.sem,
            permits: n,
        })
    }
}

impl Drop for SemaphorePermit<'_> {
    fn drop(&mut self) {
        if self.permits == 0 {
            return;
        }
        // Non-zero, so release cannot fail.
        let _ = self.sem.release(self.permits);
    }
}

impl fmt::Debug for SemaphorePermit<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SemaphorePermit")
            .field("permits", &self.permits)
            .finish()
    }
}
