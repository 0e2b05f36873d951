//! Bounded, in-process priority task scheduler.
//!
//! A fixed pool of worker threads consumes [`WorkItem`]s from a single shared
//! queue ordered by priority (higher first) with earliest-created-first
//! tie-break. Queued items can be cancelled best-effort; shutdown drains the
//! queue to completion.

pub mod error;
pub mod id;
pub mod item;
pub mod metrics;
pub mod queue;
pub mod runner;
pub mod state;

pub use error::SchedulerError;
pub use id::{AtomicIdGenerator, IdGenerator, ItemId};
pub use item::{Job, WorkItem};
pub use metrics::SchedulerMetrics;
pub use runner::Scheduler;
pub use state::Lifecycle;

pub use priosched_core::SchedulerConfig;
