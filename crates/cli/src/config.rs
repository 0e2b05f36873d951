use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cli::CliArgs;

/// Demo workload loaded from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadConfig {
    /// Number of work items to submit.
    #[serde(default = "default_tasks")]
    pub tasks: usize,

    /// How long each item sleeps, in milliseconds.
    #[serde(default = "default_task_ms")]
    pub task_ms: u64,

    /// Priorities are spread over `0..priority_levels`.
    #[serde(default = "default_priority_levels")]
    pub priority_levels: i64,

    /// Cancel every K-th submitted item (0 = never).
    #[serde(default)]
    pub cancel_every: usize,

    /// Make every K-th item panic to exercise failure isolation (0 = never).
    #[serde(default)]
    pub panic_every: usize,
}

fn default_tasks() -> usize {
    32
}

fn default_task_ms() -> u64 {
    10
}

fn default_priority_levels() -> i64 {
    10
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            tasks: default_tasks(),
            task_ms: default_task_ms(),
            priority_levels: default_priority_levels(),
            cancel_every: 0,
            panic_every: 0,
        }
    }
}

impl WorkloadConfig {
    /// Load the workload from `path`. Returns defaults when no path is given
    /// or the file does not exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        if path.exists() {
            debug!(?path, "Loading workload");
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read workload: {}", path.display()))?;
            let config: Self = toml::from_str(&content)
                .with_context(|| format!("failed to parse workload: {}", path.display()))?;
            Ok(config)
        } else {
            debug!(?path, "Workload file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Apply command-line overrides. Priority: cli flag > workload file > default.
    pub fn with_overrides(mut self, args: &CliArgs) -> Self {
        if let Some(tasks) = args.tasks {
            self.tasks = tasks;
        }
        if let Some(task_ms) = args.task_ms {
            self.task_ms = task_ms;
        }
        if let Some(cancel_every) = args.cancel_every {
            self.cancel_every = cancel_every;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::Parser;

    #[test]
    fn test_default_workload() {
        let config = WorkloadConfig::default();
        assert_eq!(config.tasks, 32);
        assert_eq!(config.task_ms, 10);
        assert_eq!(config.priority_levels, 10);
        assert_eq!(config.cancel_every, 0);
    }

    #[test]
    fn test_load_without_path_uses_defaults() {
        let config = WorkloadConfig::load(None).unwrap();
        assert_eq!(config.tasks, 32);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = WorkloadConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.tasks, 32);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workload.toml");
        std::fs::write(&path, "tasks = 5\ncancel_every = 2\n").unwrap();

        let config = WorkloadConfig::load(Some(&path)).unwrap();
        assert_eq!(config.tasks, 5);
        assert_eq!(config.cancel_every, 2);
        assert_eq!(config.task_ms, 10);
    }

    #[test]
    fn test_load_invalid_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "tasks = \"many\"").unwrap();

        let err = WorkloadConfig::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("failed to parse workload"));
    }

    #[test]
    fn test_cli_overrides_file() {
        let args = CliArgs::parse_from(["priosched", "4", "--tasks", "7", "--task-ms", "1"]);
        assert_eq!(args.workers, Some(4));

        let config = WorkloadConfig {
            tasks: 100,
            cancel_every: 3,
            ..WorkloadConfig::default()
        }
        .with_overrides(&args);
        assert_eq!(config.tasks, 7);
        assert_eq!(config.task_ms, 1);
        assert_eq!(config.cancel_every, 3);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = WorkloadConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: WorkloadConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.tasks, config.tasks);
        assert_eq!(parsed.priority_levels, config.priority_levels);
    }
}
