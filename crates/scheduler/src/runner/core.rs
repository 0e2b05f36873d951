use std::collections::HashSet;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{JoinHandle, ThreadId};

use priosched_core::SchedulerConfig;
use tracing::{info, warn};

use crate::metrics::SchedulerMetrics;
use crate::queue::ReadyQueue;
use crate::state::Lifecycle;

/// Everything guarded by the single exclusion lock. Queue mutation, the
/// pop-and-cancel check, and lifecycle changes all happen under it.
pub(super) struct Region {
    pub(super) queue: ReadyQueue,
    pub(super) lifecycle: Lifecycle,
    pub(super) metrics: SchedulerMetrics,
    /// Workers spawned and not yet exited.
    pub(super) live_workers: usize,
    /// Size of the pool created by `start`.
    pub(super) worker_count: usize,
    /// Threads that have ever run the worker loop for this scheduler.
    pub(super) worker_ids: HashSet<ThreadId>,
}

impl Region {
    /// Will a newly queued item still reach a worker?
    pub(super) fn accepts_submission(&self) -> bool {
        match self.lifecycle {
            Lifecycle::StopRequested => self.live_workers > 0,
            other => other.accepts_work(),
        }
    }
}

/// State shared between the scheduler handle and its workers.
pub(super) struct Shared {
    region: Mutex<Region>,
    /// Signalled on "queue non-empty" and on every lifecycle change.
    pub(super) available: Condvar,
}

impl Shared {
    fn new() -> Self {
        Self {
            region: Mutex::new(Region {
                queue: ReadyQueue::new(),
                lifecycle: Lifecycle::NotStarted,
                metrics: SchedulerMetrics::default(),
                live_workers: 0,
                worker_count: 0,
                worker_ids: HashSet::new(),
            }),
            available: Condvar::new(),
        }
    }

    /// Jobs never run under this lock, so a poisoned guard still holds a
    /// consistent region.
    pub(super) fn lock_region(&self) -> MutexGuard<'_, Region> {
        self.region.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Running -> StopRequested, or NotStarted -> Stopped. Later calls are no-ops.
    pub(super) fn request_stop(&self) {
        let mut region = self.lock_region();
        let lifecycle = region.lifecycle;
        match lifecycle {
            Lifecycle::Running => {
                region.lifecycle = Lifecycle::StopRequested;
                let backlog = region.queue.len();
                drop(region);
                self.available.notify_all();
                info!(backlog, "Scheduler stop requested, draining queue");
            }
            Lifecycle::NotStarted => {
                region.lifecycle = Lifecycle::Stopped;
                let dropped = region.queue.clear();
                region.metrics.dropped_unstarted += dropped as u64;
                drop(region);
                if dropped > 0 {
                    warn!(dropped, "Scheduler stopped before start; queued items dropped");
                } else {
                    info!("Scheduler stopped before start");
                }
            }
            Lifecycle::StopRequested | Lifecycle::Stopped => {}
        }
    }
}

/// Bounded priority task scheduler.
///
/// A fixed pool of OS threads consumes [`WorkItem`](crate::WorkItem)s from
/// one shared queue ordered by priority (higher first), then creation time,
/// then submission order. All operations take `&self`, so a scheduler can be
/// shared between producer threads behind an `Arc`.
///
/// `stop` drains: every item queued before the workers exit is executed or
/// cancel-discarded. Dropping the scheduler stops and joins it.
pub struct Scheduler {
    pub(super) shared: Arc<Shared>,
    /// Join handles; the lock is held for the whole join so concurrent
    /// joiners serialize instead of racing.
    pub(super) workers: Mutex<Vec<JoinHandle<()>>>,
    pub(super) config: SchedulerConfig,
}

impl Scheduler {
    /// Create a scheduler with default settings. No threads run until `start`.
    pub fn new() -> Self {
        Self::with_config(&SchedulerConfig::default())
    }

    /// Create a scheduler using `config` for thread naming and `start_configured`.
    pub fn with_config(config: &SchedulerConfig) -> Self {
        Self {
            shared: Arc::new(Shared::new()),
            workers: Mutex::new(Vec::new()),
            config: config.clone(),
        }
    }

    pub(super) fn lock_workers(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.workers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current lifecycle state.
    pub fn lifecycle(&self) -> Lifecycle {
        self.shared.lock_region().lifecycle
    }

    /// Items waiting in the queue (including cancelled ones not yet discarded).
    pub fn queue_depth(&self) -> usize {
        self.shared.lock_region().queue.len()
    }

    /// Recorded cancellations not yet consumed by a worker.
    pub fn pending_cancellations(&self) -> usize {
        self.shared.lock_region().queue.pending_cancellations()
    }

    /// Pool size given to `start` (0 before start).
    pub fn worker_count(&self) -> usize {
        self.shared.lock_region().worker_count
    }

    /// Get a snapshot of the current scheduler metrics.
    pub fn metrics(&self) -> SchedulerMetrics {
        self.shared.lock_region().metrics.clone()
    }

    /// Settings this scheduler was built with.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
