use std::io;

/// Errors surfaced by [`Scheduler`](crate::Scheduler) operations.
///
/// Cancelling an unknown id is deliberately absent: it is a silent no-op.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("worker count must be at least 1")]
    InvalidWorkerCount,
    #[error("cannot start scheduler from lifecycle {0}")]
    AlreadyStarted(crate::Lifecycle),
    #[error("scheduler is stopped; submission rejected")]
    Stopped,
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] io::Error),
    #[error("join called from a worker thread")]
    JoinFromWorker,
}
