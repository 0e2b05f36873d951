use std::sync::Arc;
use std::thread;

use tracing::{debug, error, info, warn};

use crate::error::SchedulerError;
use crate::state::Lifecycle;

use super::worker::worker_loop;
use super::Scheduler;

impl Scheduler {
    /// Spawn `worker_count` worker threads and start serving the queue.
    ///
    /// Only valid once, from `NotStarted`. If the OS refuses a thread, the
    /// workers already spawned are stopped and joined before the error is
    /// returned, leaving the scheduler `Stopped`.
    pub fn start(&self, worker_count: usize) -> Result<(), SchedulerError> {
        if worker_count == 0 {
            return Err(SchedulerError::InvalidWorkerCount);
        }

        // Reject before touching the handle lock, which `join` holds while
        // it waits on the workers. Lifecycle never returns to `NotStarted`.
        let lifecycle = self.shared.lock_region().lifecycle;
        if !lifecycle.can_transition_to(Lifecycle::Running) {
            return Err(SchedulerError::AlreadyStarted(lifecycle));
        }

        let mut workers = self.lock_workers();
        {
            let mut region = self.shared.lock_region();
            if !region.lifecycle.can_transition_to(Lifecycle::Running) {
                return Err(SchedulerError::AlreadyStarted(region.lifecycle));
            }
            region.lifecycle = Lifecycle::Running;
            region.worker_count = worker_count;
            region.live_workers = worker_count;
        }

        for index in 0..worker_count {
            let shared = Arc::clone(&self.shared);
            let spawned = thread::Builder::new()
                .name(format!("{}-{}", self.config.thread_name_prefix, index))
                .spawn(move || worker_loop(index, shared));

            match spawned {
                Ok(handle) => workers.push(handle),
                Err(e) => {
                    error!(error = %e, worker = index, "Failed to spawn worker thread");
                    {
                        let mut region = self.shared.lock_region();
                        region.live_workers -= worker_count - index;
                    }
                    self.shared.request_stop();
                    for handle in workers.drain(..) {
                        let _ = handle.join();
                    }
                    self.shared.lock_region().lifecycle = Lifecycle::Stopped;
                    return Err(SchedulerError::Spawn(e));
                }
            }
        }

        info!(workers = worker_count, "Scheduler started");
        Ok(())
    }

    /// Start with the pool size from this scheduler's config.
    pub fn start_configured(&self) -> Result<(), SchedulerError> {
        self.start(self.config.resolved_worker_threads())
    }

    /// Ask the workers to drain the queue and exit. Does not block.
    ///
    /// Idempotent. On a scheduler that never started, anything queued is
    /// dropped and the lifecycle goes straight to `Stopped`.
    pub fn stop(&self) {
        self.shared.request_stop();
    }

    /// Stop, then block until every worker has drained the queue and exited.
    ///
    /// Idempotent and safe to call from several threads at once; later
    /// callers wait for the first join to finish. Returns
    /// [`SchedulerError::JoinFromWorker`] when called from one of this
    /// scheduler's own workers, which could never finish joining itself.
    pub fn join(&self) -> Result<(), SchedulerError> {
        if self
            .shared
            .lock_region()
            .worker_ids
            .contains(&thread::current().id())
        {
            return Err(SchedulerError::JoinFromWorker);
        }

        self.stop();

        let mut workers = self.lock_workers();
        let handles = std::mem::take(&mut *workers);
        let joined = handles.len();
        for handle in handles {
            if handle.join().is_err() {
                error!("Worker thread terminated by a panic outside a work item");
            }
        }

        let mut region = self.shared.lock_region();
        if region.lifecycle == Lifecycle::StopRequested {
            region.lifecycle = Lifecycle::Stopped;
            let metrics = region.metrics.clone();
            drop(region);
            info!(
                joined,
                executed = metrics.executed,
                panicked = metrics.panicked,
                cancelled = metrics.discarded_cancelled,
                "Scheduler stopped"
            );
        }
        Ok(())
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        match self.join() {
            Ok(()) => {}
            Err(SchedulerError::JoinFromWorker) => {
                // Last handle released inside a job: the workers finish on their own.
                debug!("Scheduler dropped on its own worker; stopping without join");
                self.stop();
            }
            Err(e) => warn!(error = %e, "Scheduler join failed during drop"),
        }
    }
}
