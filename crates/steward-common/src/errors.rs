//! Error types for supervisor operations.

use thiserror::Error;

/// Result type alias for supervisor operations.
pub type SupervisorResult<T> = std::result::Result<T, SupervisorError>;

/// Error taxonomy for supervisor operations.
///
/// One variant per failure class an operator can encounter. The first five
/// map onto lifecycle outcomes (`stop` on an absent record, a record whose
/// process died, a launch that never came up, an undeliverable kill signal,
/// a failed source fetch); the rest cover the I/O surfaces underneath them.
#[derive(Error, Debug, Clone)]
pub enum SupervisorError {
    /// An operation that needs a persisted record found none.
    #[error("No managed process record for '{name}'")]
    MissingState { name: String },

    /// The persisted record points at a process that is no longer alive.
    #[error("Stale record for '{name}': pid {pid} is not running")]
    StaleState { name: String, pid: u32 },

    /// The managed process failed to launch or died during the startup
    /// grace interval.
    #[error("Failed to start '{name}': {reason}")]
    SpawnFailed { name: String, reason: String },

    /// The termination signal could not be delivered.
    #[error("Failed to terminate pid {pid}: {reason}")]
    TerminationFailed { pid: u32, reason: String },

    /// Fetching the latest source revision failed.
    #[error("Source update failed: {reason}")]
    UpdateFailed { reason: String },

    /// The state record file could not be read, written, or parsed.
    #[error("State store error: {reason}")]
    StateStore { reason: String },

    /// The captured-output file could not be created, opened, or read.
    #[error("Log sink error: {reason}")]
    LogSink { reason: String },

    /// The OS liveness query itself failed (not "process is gone").
    #[error("Liveness check failed for pid {pid}: {reason}")]
    Liveness { pid: u32, reason: String },
}

impl SupervisorError {
    pub fn missing_state(name: impl Into<String>) -> Self {
        Self::MissingState { name: name.into() }
    }

    pub fn stale_state(name: impl Into<String>, pid: u32) -> Self {
        Self::StaleState {
            name: name.into(),
            pid,
        }
    }

    pub fn spawn_failed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SpawnFailed {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn termination_failed(pid: u32, reason: impl Into<String>) -> Self {
        Self::TerminationFailed {
            pid,
            reason: reason.into(),
        }
    }

    pub fn update_failed(reason: impl Into<String>) -> Self {
        Self::UpdateFailed {
            reason: reason.into(),
        }
    }

    pub fn state_store(reason: impl Into<String>) -> Self {
        Self::StateStore {
            reason: reason.into(),
        }
    }

    pub fn log_sink(reason: impl Into<String>) -> Self {
        Self::LogSink {
            reason: reason.into(),
        }
    }

    pub fn liveness(pid: u32, reason: impl Into<String>) -> Self {
        Self::Liveness {
            pid,
            reason: reason.into(),
        }
    }
}
