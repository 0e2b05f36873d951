//! Scheduler lifecycle state machine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle of a [`Scheduler`](crate::Scheduler).
///
/// Transitions only move forward:
/// - NotStarted -> Running -> StopRequested -> Stopped
/// - NotStarted -> Stopped (stopped before ever starting)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Lifecycle {
    /// Constructed; no workers yet. Submissions queue up.
    NotStarted,
    /// Workers are serving the queue.
    Running,
    /// Workers drain the remaining queue, then exit.
    StopRequested,
    /// Every worker has been joined.
    Stopped,
}

impl Lifecycle {
    /// Workers keep waiting for new work only in this state.
    pub fn is_running(self) -> bool {
        self == Lifecycle::Running
    }

    /// Can a submitted item still be executed by some worker, now or later?
    pub fn accepts_work(self) -> bool {
        !matches!(self, Lifecycle::Stopped)
    }

    /// Whether moving to `next` keeps the lifecycle monotonic.
    pub fn can_transition_to(self, next: Lifecycle) -> bool {
        matches!(
            (self, next),
            (Lifecycle::NotStarted, Lifecycle::Running)
                | (Lifecycle::NotStarted, Lifecycle::Stopped)
                | (Lifecycle::Running, Lifecycle::StopRequested)
                | (Lifecycle::StopRequested, Lifecycle::Stopped)
        )
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Lifecycle::NotStarted => "not-started",
            Lifecycle::Running => "running",
            Lifecycle::StopRequested => "stop-requested",
            Lifecycle::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_transitions_allowed() {
        assert!(Lifecycle::NotStarted.can_transition_to(Lifecycle::Running));
        assert!(Lifecycle::Running.can_transition_to(Lifecycle::StopRequested));
        assert!(Lifecycle::StopRequested.can_transition_to(Lifecycle::Stopped));
        assert!(Lifecycle::NotStarted.can_transition_to(Lifecycle::Stopped));
    }

    #[test]
    fn no_way_back_to_running() {
        assert!(!Lifecycle::StopRequested.can_transition_to(Lifecycle::Running));
        assert!(!Lifecycle::Stopped.can_transition_to(Lifecycle::Running));
        assert!(!Lifecycle::Running.can_transition_to(Lifecycle::Running));
        assert!(!Lifecycle::Running.can_transition_to(Lifecycle::NotStarted));
    }

    #[test]
    fn only_stopped_rejects_work() {
        assert!(Lifecycle::NotStarted.accepts_work());
        assert!(Lifecycle::Running.accepts_work());
        assert!(Lifecycle::StopRequested.accepts_work());
        assert!(!Lifecycle::Stopped.accepts_work());
    }
}
