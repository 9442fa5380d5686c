//! # fair-sync
//!
//! **Fair, cancellable blocking synchronizers for threads.**
//!
//! ## Features
//! - [`FairSemaphore`]: counting semaphore with multi-unit acquire and
//!   strict FIFO service.
//! - [`FairRwLock`]: readers-writers lock with writer priority and batched
//!   reader admission.
//! - [`Gate`]: manual-reset gate.
//! - Every blocking call takes a [`Timeout`] and can be cancelled through a
//!   [`CancelToken`]; outcomes are reported as a [`WaitOutcome`] rather
//!   than as errors.
//! - No busy-waiting: waiters park on a condition variable.
//!
//! ## How it works
//!
//! Each instance guards its state with one exclusion lock. A caller that
//! can be served right away takes the fast path; otherwise it queues a
//! request record and parks. Releases commit the state change on the
//! waiter's behalf before waking it, so a woken waiter only has to check
//! its record. If a grant and a cancellation race, the grant wins and the
//! cancellation stays pending on the token for the next wait.
//!
//! ## Quick Start
//! ```rust
//! use fair_sync::{FairSemaphore, Timeout, WaitOutcome};
//! use std::sync::Arc;
//! use std::thread;
//!
//! let sem = Arc::new(FairSemaphore::new(1));
//! assert_eq!(sem.acquire(1, Timeout::Infinite), Ok(WaitOutcome::Granted));
//!
//! let waiter = {
//!     let sem = Arc::clone(&sem);
//!     thread::spawn(move || sem.acquire(1, Timeout::Infinite))
//! };
//!
//! sem.release(1).unwrap();
//! assert_eq!(waiter.join().unwrap(), Ok(WaitOutcome::Granted));
//! assert_eq!(sem.available_permits(), 0);
//! ```
//!
//! Nesting several synchronizers is the caller's responsibility: there is no
//! deadlock detection across instances.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs, unreachable_pub, missing_debug_implementations)]
#![deny(rust_2018_idioms)]

mod cancel;
mod error;
mod gate;
mod rwlock;
mod semaphore;
mod timeout;
mod wait_queue;

pub use cancel::CancelToken;
pub use error::{AcquireError, InvalidUnits, WaitOutcome};
pub use gate::Gate;
pub use rwlock::{FairRwLock, ReadGuard, WriteGuard};
pub use semaphore::{FairSemaphore, SemaphorePermit};
pub use timeout::Timeout;
