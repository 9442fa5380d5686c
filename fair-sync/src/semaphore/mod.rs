pub(crate) mod core;
pub(crate) mod methods;
pub(crate) mod permits;

pub use self::core::FairSemaphore;
pub use permits::SemaphorePermit;
