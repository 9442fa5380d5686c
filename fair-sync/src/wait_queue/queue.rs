use std::collections::VecDeque;
use std::sync::Arc;

/// Pending requests in arrival order.
///
/// The queue shares each record with the thread that created it; the thread
/// keeps its own handle so that it can still read the resolution flag after
/// a release has popped the record.
#[derive(Debug)]
pub(crate) struct RequestQueue<R> {
    requests: VecDeque<Arc<R>>,
}

impl<R> RequestQueue<R> {
    pub(crate) fn new() -> Self {
        Self {
            requests: VecDeque::new(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.requests.len()
    }

    pub(crate) fn push_back(&mut self, request: Arc<R>) {
        self.requests.push_back(request);
    }

    pub(crate) fn front(&self) -> Option<&Arc<R>> {
        self.requests.front()
    }

    pub(crate) fn pop_front(&mut self) -> Option<Arc<R>> {
        self.requests.pop_front()
    }

    /// Withdraws `request`, returning the position it occupied.
    pub(crate) fn remove(&mut self, request: &Arc<R>) -> Option<usize> {
        let pos = self
            .requests
            .iter()
            .position(|queued| Arc::ptr_eq(queued, request))?;
        self.requests.remove(pos);
        Some(pos)
    }
}
