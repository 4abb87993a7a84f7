//! # steward-state
//!
//! Durable pid record for the steward supervisor.
//!
//! The supervisor is stateless between invocations; the only thing that
//! connects one CLI run to the next is a small text file holding the pid of
//! the launched service. This crate owns that file: writing it atomically,
//! reading it back, and removing it.
//!
//! The file holds a single decimal pid followed by a newline.

use std::path::{Path, PathBuf};

use steward_common::{SupervisorError, SupervisorResult};

/// Handle to the pid record file for one managed service.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Create a store backed by the given file path. No I/O happens until
    /// the first operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the underlying record file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist `pid` as the current record (atomic write).
    ///
    /// The content is written to a temporary sibling file and renamed into
    /// place, so a concurrent reader sees either the old record or the new
    /// one, never a partial write.
    pub async fn write(&self, pid: u32) -> SupervisorResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                SupervisorError::state_store(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let content = format!("{}\n", pid);
        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, content).await.map_err(|e| {
            SupervisorError::state_store(format!(
                "Failed to write record file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        tokio::fs::rename(&temp_path, &self.path).await.map_err(|e| {
            SupervisorError::state_store(format!(
                "Failed to rename record file into {}: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Read the recorded pid, or `None` when no record exists.
    ///
    /// A record that exists but does not hold a valid pid is an error, not
    /// an absent record; absence and corruption get different handling
    /// upstream. Valid pids are positive and fit in `i32`.
    pub async fn read(&self) -> SupervisorResult<Option<u32>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(SupervisorError::state_store(format!(
                    "Failed to read record file {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let pid = content.trim().parse::<u32>().map_err(|e| {
            SupervisorError::state_store(format!(
                "Invalid pid in record file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        // 0 and values past i32::MAX address process groups, not processes,
        // once they reach a signal call
        if pid == 0 || pid > i32::MAX as u32 {
            return Err(SupervisorError::state_store(format!(
                "Invalid pid in record file {}: {} is out of range",
                self.path.display(),
                pid
            )));
        }

        Ok(Some(pid))
    }

    /// Remove the record. Removing an absent record is a no-op.
    pub async fn clear(&self) -> SupervisorResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SupervisorError::state_store(format!(
                "Failed to delete record file {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}
