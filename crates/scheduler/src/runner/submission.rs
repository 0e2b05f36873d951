use tracing::debug;

use crate::error::SchedulerError;
use crate::id::ItemId;
use crate::item::WorkItem;

use super::Scheduler;

impl Scheduler {
    /// Queue `item` and wake one idle worker.
    ///
    /// Accepted before `start` (runs once workers exist) and after `stop`
    /// while workers are still draining. Rejected with
    /// [`SchedulerError::Stopped`] once no worker is left to run it.
    pub fn submit(&self, item: WorkItem) -> Result<ItemId, SchedulerError> {
        let id = item.id();
        let priority = item.priority();

        let mut region = self.shared.lock_region();
        if !region.accepts_submission() {
            region.metrics.rejected += 1;
            let lifecycle = region.lifecycle;
            drop(region);
            debug!(item = %id, %lifecycle, "Submission rejected");
            return Err(SchedulerError::Stopped);
        }
        region.queue.push(item);
        let depth = region.queue.len();
        region.metrics.record_submit(depth);
        drop(region);

        self.shared.available.notify_one();
        debug!(item = %id, priority, depth, "Submitted work item");
        Ok(id)
    }

    /// Best-effort cancellation of a queued item.
    ///
    /// If recorded before a worker dequeues the item, the item is discarded
    /// unexecuted. Ids that are running, finished, already discarded, or
    /// unknown are ignored silently.
    pub fn cancel(&self, id: ItemId) {
        let recorded = self.shared.lock_region().queue.cancel(id);
        self.shared.available.notify_one();
        if recorded {
            debug!(item = %id, "Cancellation recorded");
        } else {
            debug!(item = %id, "Cancellation ignored, item not queued");
        }
    }
}
