//! Waiting machinery shared by every synchronizer in the crate.
//!
//! Each synchronizer guards its state with a single exclusion lock. A caller
//! that cannot be served immediately creates a request record, queues it and
//! parks on the record's [`Signal`](park::Signal). Release-side code never
//! creates records: it commits the state transition on behalf of the waiter,
//! marks the record resolved and only then wakes it, so the woken thread has
//! nothing left to decide.
//!
//! - [`park`]: the suspend/resume primitive and the wait loop.
//! - [`request`]: per-waiter and per-reader-batch records.
//! - [`queue`]: FIFO queue of records.

pub(crate) mod park;
pub(crate) mod queue;
pub(crate) mod request;
