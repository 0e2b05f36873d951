//! Scheduler runner -- owns the worker pool and the shared ready queue.
//!
//! Split into focused submodules:
//! - `core`: Scheduler struct, the shared region, constructors, and accessors
//! - `lifecycle`: start, stop, join, and drop
//! - `submission`: submit and cancel
//! - `worker`: the per-thread worker loop

mod core;
mod lifecycle;
mod submission;
mod worker;

pub use self::core::Scheduler;
