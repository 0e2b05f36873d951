use std::fmt;
use std::time::Instant;

use crate::id::{AtomicIdGenerator, IdGenerator, ItemId};

/// The side effect a [`WorkItem`] performs when it reaches a worker.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// A priority-tagged, timestamped, uniquely identified unit of deferred work.
///
/// Higher `priority` runs first; equal priorities run in `created_at` order.
/// `id` and `created_at` are fixed at construction. Priority can be changed
/// only while the producer still owns the item, since submission moves it
/// into the scheduler.
pub struct WorkItem {
    priority: i64,
    created_at: Instant,
    id: ItemId,
    label: Option<String>,
    job: Job,
}

impl WorkItem {
    /// Create an item whose id comes from the process-wide generator.
    pub fn new<F>(priority: i64, job: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self::with_ids(AtomicIdGenerator::global(), priority, job)
    }

    /// Create an item drawing its id from `ids`. Do not mix generators in one
    /// scheduler; see [`IdGenerator`].
    pub fn with_ids<F>(ids: &dyn IdGenerator, priority: i64, job: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            priority,
            created_at: Instant::now(),
            id: ids.next_id(),
            label: None,
            job: Box::new(job),
        }
    }

    /// Attach a human-readable name used in log events.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn priority(&self) -> i64 {
        self.priority
    }

    pub fn set_priority(&mut self, priority: i64) {
        self.priority = priority;
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Run the job. Consumes the item, so it can run at most once.
    pub fn execute(self) {
        (self.job)()
    }
}

impl fmt::Debug for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkItem")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .field("created_at", &self.created_at)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
