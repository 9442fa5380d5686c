pub(crate) mod core;
pub(crate) mod guards;
pub(crate) mod methods;

pub use self::core::FairRwLock;
pub use guards::{ReadGuard, WriteGuard};
