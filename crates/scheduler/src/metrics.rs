use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Scheduler operational counters. A snapshot is returned by
/// [`Scheduler::metrics`](crate::Scheduler::metrics).
#[derive(Debug, Clone, Default, Serialize)]
pub struct SchedulerMetrics {
    /// Items accepted by `submit`.
    pub submitted: u64,
    /// Submissions rejected because the scheduler was stopped.
    pub rejected: u64,
    /// Items whose job ran to completion.
    pub executed: u64,
    /// Items whose job panicked (the worker survived).
    pub panicked: u64,
    /// Items discarded at dequeue because they were cancelled.
    pub discarded_cancelled: u64,
    /// Items dropped unexecuted because the scheduler stopped before starting.
    pub dropped_unstarted: u64,
    /// Workers currently inside a job.
    pub active_workers: usize,
    /// Largest queue length observed at submission.
    pub peak_queue_depth: usize,
    /// Mean job duration over executed and panicked items.
    pub avg_execution: Duration,
    /// Wall-clock time the most recent job finished.
    pub last_executed_at: Option<DateTime<Utc>>,
}

impl SchedulerMetrics {
    pub(crate) fn record_submit(&mut self, queue_depth: usize) {
        self.submitted += 1;
        self.peak_queue_depth = self.peak_queue_depth.max(queue_depth);
    }

    /// Record a finished job.
    pub(crate) fn record_execution(&mut self, duration: Duration, panicked: bool) {
        if panicked {
            self.panicked += 1;
        } else {
            self.executed += 1;
        }
        self.last_executed_at = Some(Utc::now());

        // Incremental mean: new_avg = prev_avg + (duration - prev_avg) / count
        let count = self.executed + self.panicked;
        self.avg_execution = if count == 1 {
            duration
        } else {
            let prev_nanos = self.avg_execution.as_nanos() as f64;
            let cur_nanos = duration.as_nanos() as f64;
            let avg_nanos = prev_nanos + (cur_nanos - prev_nanos) / count as f64;
            Duration::from_nanos(avg_nanos as u64)
        };
    }

    /// Items that left the queue one way or another.
    pub fn completed(&self) -> u64 {
        self.executed + self.panicked + self.discarded_cancelled + self.dropped_unstarted
    }
}
