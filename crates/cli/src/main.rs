mod cli;
mod config;
mod demo;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use priosched::Scheduler;
use priosched_core::config::{load_dotenv, Config};

use crate::cli::CliArgs;
use crate::config::WorkloadConfig;

fn main() -> Result<()> {
    load_dotenv();
    let config = Config::from_env();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log.filter)),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();
    config.log_summary();
    config
        .scheduler
        .validate()
        .context("invalid scheduler configuration")?;

    let workload = WorkloadConfig::load(args.config.as_deref())
        .context("failed to load workload")?
        .with_overrides(&args);
    let workers = args
        .workers
        .unwrap_or_else(|| config.scheduler.resolved_worker_threads());

    info!(workers, tasks = workload.tasks, "Job scheduler starting");

    let scheduler = Scheduler::with_config(&config.scheduler);
    scheduler
        .start(workers)
        .context("failed to start scheduler")?;

    let report = demo::run_workload(&scheduler, &workload)?;

    scheduler.stop();
    scheduler.join().context("failed to join scheduler")?;

    let metrics = scheduler.metrics();
    if args.json {
        let out = serde_json::json!({
            "workers": workers,
            "ran": report.ran(),
            "workload": &report,
            "metrics": metrics,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        info!(
            submitted = metrics.submitted,
            completed = metrics.completed(),
            executed = metrics.executed,
            panicked = metrics.panicked,
            cancelled = metrics.discarded_cancelled,
            peak_queue_depth = metrics.peak_queue_depth,
            avg_execution_ms = metrics.avg_execution.as_millis() as u64,
            "Job scheduler finished"
        );
    }

    Ok(())
}
