use std::path::PathBuf;

use clap::Parser;

/// Run a demo workload on the priority task scheduler.
///
/// Starts a fixed pool of workers, submits a batch of prioritized work
/// items, cancels some of them, then stops and drains the queue.
#[derive(Parser, Debug)]
#[command(name = "priosched", version, about = "Priority task scheduler demo")]
pub struct CliArgs {
    /// Number of worker threads (default: WORKER_THREADS, else 8)
    pub workers: Option<usize>,

    /// Path to a TOML workload file
    #[arg(long, env = "PRIOSCHED_WORKLOAD")]
    pub config: Option<PathBuf>,

    /// Number of work items to submit (overrides the workload file)
    #[arg(long)]
    pub tasks: Option<usize>,

    /// Milliseconds each work item sleeps (overrides the workload file)
    #[arg(long)]
    pub task_ms: Option<u64>,

    /// Cancel every K-th submitted item; 0 disables (overrides the workload file)
    #[arg(long)]
    pub cancel_every: Option<usize>,

    /// Print final metrics as JSON on stdout
    #[arg(long)]
    pub json: bool,
}
