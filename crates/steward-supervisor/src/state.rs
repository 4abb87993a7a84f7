//! Reconstructed lifecycle state.
//!
//! The supervisor holds nothing in memory between invocations, so the state
//! of the managed service is rebuilt on demand from two observations: does a
//! pid record exist, and is that pid alive.

use std::fmt;

/// What one invocation can conclude about the managed service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    /// No pid record on disk
    Absent,
    /// Record present and the pid is alive
    Running { pid: u32 },
    /// Record present but the pid is no longer alive
    Stale { pid: u32 },
}

impl ServiceState {
    /// Combine the persisted record with a liveness answer.
    pub fn classify(record: Option<u32>, alive: bool) -> Self {
        match record {
            None => ServiceState::Absent,
            Some(pid) if alive => ServiceState::Running { pid },
            Some(pid) => ServiceState::Stale { pid },
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, ServiceState::Running { .. })
    }

    /// The recorded pid, whatever its liveness.
    pub fn pid(&self) -> Option<u32> {
        match self {
            ServiceState::Absent => None,
            ServiceState::Running { pid } | ServiceState::Stale { pid } => Some(*pid),
        }
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceState::Absent => write!(f, "absent"),
            ServiceState::Running { pid } => write!(f, "running (pid {})", pid),
            ServiceState::Stale { pid } => write!(f, "stale (pid {})", pid),
        }
    }
}
