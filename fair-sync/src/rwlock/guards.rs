use std::fmt;

/// A read hold on a [`FairRwLock`](super::FairRwLock), ended when dropped.
#[must_use = "dropping the guard ends the read immediately"]
pub struct ReadGuard<'a> {
    lock: &'a super::FairRwLock,
}

impl<'a> ReadGuard<'a> {
    pub(crate) fn new(lock: &'a super::FairRwLock) -> Self {
        Self { lock }
    }
}

impl Drop for ReadGuard<'_> {
    fn drop(&mut self) {
        self.lock.end_read();
    }
}

impl fmt::Debug for ReadGuard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadGuard").finish_non_exhaustive()
    }
}

/// The write hold on a [`FairRwLock`](super::FairRwLock), ended when dropped.
#[must_use = "dropping the guard ends the write immediately"]
pub struct WriteGuard<'a> {
    lock: &'a super::FairRwLock,
}

impl<'a> WriteGuard<'a> {
    pub(crate) fn new(lock: &'a super::FairRwLock) -> Self {
        Self { lock }
    }
}

impl Drop for WriteGuard<'_> {
    fn drop(&mut self) {
        self.lock.end_write();
    }
}

impl fmt::Debug for WriteGuard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteGuard").finish_non_exhaustive()
    }
}
