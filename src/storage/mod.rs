//! On-disk coordination for index builds.

pub mod lock;

pub use lock::{BuildLock, LockInfo};
