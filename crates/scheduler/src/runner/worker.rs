use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::item::WorkItem;
use crate::queue::Dequeued;

use super::core::Shared;

/// Per-thread loop: wait for work, pop the head, discard or execute, repeat.
///
/// Exits only when the queue is empty and the scheduler is no longer
/// running, so a stop request drains whatever is queued.
pub(super) fn worker_loop(index: usize, shared: Arc<Shared>) {
    let mut region = shared.lock_region();
    region.worker_ids.insert(thread::current().id());
    debug!(worker = index, "Worker started");

    loop {
        region = shared
            .available
            .wait_while(region, |r| r.queue.is_empty() && r.lifecycle.is_running())
            .unwrap_or_else(PoisonError::into_inner);

        let Some(next) = region.queue.pop() else {
            region.live_workers -= 1;
            break;
        };

        match next {
            Dequeued::Cancelled(id) => {
                region.metrics.discarded_cancelled += 1;
                debug!(worker = index, item = %id, "Discarded cancelled work item");
            }
            Dequeued::Ready(item) => {
                region.metrics.active_workers += 1;
                drop(region);

                let (elapsed, panicked) = run_item(index, item);

                region = shared.lock_region();
                region.metrics.active_workers -= 1;
                region.metrics.record_execution(elapsed, panicked);
            }
        }
    }

    drop(region);
    debug!(worker = index, "Worker exited");
}

/// Execute one item outside the lock. A panicking job is contained here.
fn run_item(worker: usize, item: WorkItem) -> (Duration, bool) {
    let id = item.id();
    let priority = item.priority();
    let label = item.label().map(str::to_owned);

    let start = Instant::now();
    let outcome = panic::catch_unwind(AssertUnwindSafe(move || item.execute()));
    let elapsed = start.elapsed();

    match outcome {
        Ok(()) => {
            debug!(
                worker,
                item = %id,
                priority,
                label = label.as_deref().unwrap_or(""),
                elapsed_ms = elapsed.as_millis() as u64,
                "Work item executed"
            );
            (elapsed, false)
        }
        Err(payload) => {
            warn!(
                worker,
                item = %id,
                priority,
                label = label.as_deref().unwrap_or(""),
                panic = panic_message(payload.as_ref()),
                "Work item panicked"
            );
            (elapsed, true)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
