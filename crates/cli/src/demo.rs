use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use priosched::{ItemId, Scheduler, WorkItem};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::WorkloadConfig;

/// What the demo workload submitted and what actually ran.
#[derive(Debug, Clone, Serialize)]
pub struct WorkloadReport {
    pub submitted: usize,
    pub cancel_requested: usize,
    /// Shared with the jobs; read it after the scheduler has been joined.
    #[serde(skip)]
    pub ran: Arc<AtomicUsize>,
}

impl WorkloadReport {
    pub fn ran(&self) -> usize {
        self.ran.load(Ordering::SeqCst)
    }
}

/// Spread priorities over `0..levels` so consecutive items differ.
fn priority_for(index: usize, levels: i64) -> i64 {
    if levels <= 1 {
        return 0;
    }
    ((index as i64).wrapping_mul(7919)).rem_euclid(levels)
}

/// Submit the demo workload, then cancel every `cancel_every`-th item.
pub fn run_workload(scheduler: &Scheduler, workload: &WorkloadConfig) -> Result<WorkloadReport> {
    let ran = Arc::new(AtomicUsize::new(0));
    let mut ids: Vec<ItemId> = Vec::with_capacity(workload.tasks);

    for index in 0..workload.tasks {
        let priority = priority_for(index, workload.priority_levels);
        let sleep = Duration::from_millis(workload.task_ms);
        let should_panic = workload.panic_every > 0 && (index + 1) % workload.panic_every == 0;
        let ran = Arc::clone(&ran);

        let item = WorkItem::new(priority, move || {
            thread::sleep(sleep);
            if should_panic {
                panic!("demo item {index} failed on purpose");
            }
            ran.fetch_add(1, Ordering::SeqCst);
        })
        .with_label(format!("demo-{index}"));

        let id = scheduler
            .submit(item)
            .with_context(|| format!("failed to submit demo item {index}"))?;
        ids.push(id);
    }
    debug!(submitted = ids.len(), "Demo workload submitted");

    let mut cancel_requested = 0;
    if workload.cancel_every > 0 {
        for id in ids.iter().skip(workload.cancel_every - 1).step_by(workload.cancel_every) {
            scheduler.cancel(*id);
            cancel_requested += 1;
        }
    }

    info!(
        submitted = ids.len(),
        cancel_requested,
        "Demo workload queued"
    );
    Ok(WorkloadReport {
        submitted: ids.len(),
        cancel_requested,
        ran,
    })
}
